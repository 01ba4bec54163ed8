//! Per-pass compile state: current-file stack, diagnostics, provenance.

use crate::diagnostics::{Diagnostics, Policy};
use crate::error::{Build, BuildError, CompileError, Diagnostic, Error};
use crate::model::ModelNode;
use crate::provenance::ProvenanceStore;
use crate::source::SourceProvider;
use crate::syntax::{Span, SyntaxNode};
use std::path::Path;

/// Filename used when nothing has been pushed on the file stack.
pub const ANONYMOUS_FILE: &str = "<input>";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    pub policy: Policy,
}

impl CompileOptions {
    pub fn accumulate() -> Self {
        CompileOptions {
            policy: Policy::Accumulate,
        }
    }
}

/// State owned by exactly one compile pass.
pub struct Compiler<'a> {
    provider: &'a dyn SourceProvider,
    files: Vec<String>,
    diagnostics: Diagnostics,
    provenance: ProvenanceStore,
}

impl<'a> Compiler<'a> {
    pub fn new(provider: &'a dyn SourceProvider, options: &CompileOptions) -> Self {
        Compiler {
            provider,
            files: Vec::new(),
            diagnostics: Diagnostics::new(options.policy),
            provenance: ProvenanceStore::new(),
        }
    }

    pub fn provider(&self) -> &dyn SourceProvider {
        self.provider
    }

    pub fn push_file_state(&mut self, absolute_filename: impl Into<String>) {
        self.files.push(absolute_filename.into());
    }

    pub fn pop_file_state(&mut self) -> Option<String> {
        self.files.pop()
    }

    pub fn current_file(&self) -> &str {
        self.files.last().map_or(ANONYMOUS_FILE, String::as_str)
    }

    /// Files currently being compiled, outermost first.
    pub fn file_stack(&self) -> &[String] {
        &self.files
    }

    /// Resolve a path written in the current document.
    pub fn resolve_reference(&self, reference: &str) -> Result<String, Error> {
        let base = Path::new(self.current_file())
            .parent()
            .unwrap_or(Path::new("."));
        let resolved = self
            .provider
            .resolve_import(base, reference)
            .map_err(|source| Error::Io {
                path: reference.to_owned(),
                source,
            })?;
        Ok(resolved.to_string_lossy().into_owned())
    }

    /// Finalize `node`: attach provenance for `syntax` in the current file.
    pub fn record<T: ModelNode>(&mut self, node: T, syntax: &SyntaxNode) -> T {
        self.record_span(node, syntax.span)
    }

    pub fn record_span<T: ModelNode>(&mut self, node: T, span: Span) -> T {
        let file = self.files.last().map_or(ANONYMOUS_FILE, String::as_str);
        self.provenance.record(node, file, span)
    }

    /// Run one construct build. Under the accumulate policy a compile error
    /// is recorded and `placeholder` returned; fatal errors always propagate.
    pub fn recover<T, F>(&mut self, placeholder: T, build: F) -> Build<T>
    where
        F: FnOnce(&mut Self) -> Build<T>,
    {
        match build(self) {
            Err(BuildError::Compile(error)) => {
                let file = self.current_file().to_owned();
                self.diagnostics.absorb(&file, error)?;
                Ok(placeholder)
            }
            other => other,
        }
    }

    /// Report an error found outside a builder, e.g. by the import loader.
    pub fn report(&mut self, file: &str, error: CompileError) -> Result<(), Error> {
        self.diagnostics
            .absorb(file, error)
            .map_err(|error| Error::Compile(Diagnostic::new(file, error)))
    }

    /// Turn a builder result into a pass-level result, locating a compile
    /// error in the current file.
    pub fn settle<T>(&self, result: Build<T>) -> Result<T, Error> {
        result.map_err(|e| match e {
            BuildError::Compile(error) => {
                Error::Compile(Diagnostic::new(self.current_file(), error))
            }
            BuildError::Fatal(error) => error,
        })
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.diagnostics.errors()
    }

    pub fn provenance(&self) -> &ProvenanceStore {
        &self.provenance
    }

    pub fn finish(self) -> (Vec<Diagnostic>, ProvenanceStore) {
        (self.diagnostics.into_errors(), self.provenance)
    }
}
