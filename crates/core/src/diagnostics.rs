//! Diagnostics collector and the fail-fast / accumulate policy.

use crate::error::{CompileError, Diagnostic};
use serde::Deserialize;

/// What to do with a compile error raised inside a recoverable construct.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Policy {
    /// Abort the pass on the first error.
    #[default]
    FailFast,
    /// Record the error, substitute a placeholder and keep walking.
    Accumulate,
}

#[derive(Debug, Default)]
pub struct Diagnostics {
    policy: Policy,
    errors: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new(policy: Policy) -> Self {
        Diagnostics {
            policy,
            errors: Vec::new(),
        }
    }

    /// Hand `error` to the policy: `Err` means the caller must propagate it.
    pub fn absorb(&mut self, file: &str, error: CompileError) -> Result<(), CompileError> {
        match self.policy {
            Policy::FailFast => Err(error),
            Policy::Accumulate => {
                tracing::debug!(file, kind = error.kind(), "recorded compile error: {}", error);
                self.errors.push(Diagnostic::new(file, error));
                Ok(())
            }
        }
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_errors(self) -> Vec<Diagnostic> {
        self.errors
    }
}
