use crate::syntax::Span;
use std::fmt;

/// A mistake in a scenario document.
///
/// Every variant carries the span of the offending node. The filename is
/// attached when the error becomes a [`Diagnostic`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
    #[error("expected a {expected} value")]
    NotAllowedValueType { span: Span, expected: &'static str },

    #[error("a value is required here")]
    NoRequiredValue { span: Span },

    #[error("key '{key}' is not allowed in {construct} (allowed keys: {})", .allowed.join(", "))]
    NotAllowedKey {
        span: Span,
        construct: &'static str,
        key: String,
        allowed: Vec<String>,
    },

    #[error("{construct} is missing required keys: {}", .missing.join(", "))]
    RequiredKeyNotExist {
        span: Span,
        construct: &'static str,
        missing: Vec<String>,
    },

    #[error("invalid template string: {reason}")]
    InvalidTemplate { span: Span, reason: String },

    #[error("a step must name exactly one step kind, found: {}", .keys.join(", "))]
    AmbiguousStep { span: Span, keys: Vec<String> },

    #[error("cannot resolve reference '{reference}'")]
    UnresolvedReference { span: Span, reference: String },

    #[error("import cycle detected: {}", .cycle.join(" \u{2192} "))]
    ImportCycle { span: Span, cycle: Vec<String> },
}

impl CompileError {
    pub fn span(&self) -> Span {
        match self {
            CompileError::NotAllowedValueType { span, .. }
            | CompileError::NoRequiredValue { span }
            | CompileError::NotAllowedKey { span, .. }
            | CompileError::RequiredKeyNotExist { span, .. }
            | CompileError::InvalidTemplate { span, .. }
            | CompileError::AmbiguousStep { span, .. }
            | CompileError::UnresolvedReference { span, .. }
            | CompileError::ImportCycle { span, .. } => *span,
        }
    }

    /// Stable kind tag used in JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            CompileError::NotAllowedValueType { .. } => "NotAllowedValueType",
            CompileError::NoRequiredValue { .. } => "NoRequiredValue",
            CompileError::NotAllowedKey { .. } => "NotAllowedKey",
            CompileError::RequiredKeyNotExist { .. } => "RequiredKeyNotExist",
            CompileError::InvalidTemplate { .. } => "InvalidTemplate",
            CompileError::AmbiguousStep { .. } => "AmbiguousStep",
            CompileError::UnresolvedReference { .. } => "UnresolvedReference",
            CompileError::ImportCycle { .. } => "ImportCycle",
        }
    }
}

/// A [`CompileError`] located in a file.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub file: String,
    pub error: CompileError,
}

impl Diagnostic {
    pub fn new(file: impl Into<String>, error: CompileError) -> Self {
        Diagnostic {
            file: file.into(),
            error,
        }
    }

    pub fn to_json_value(&self) -> serde_json::Value {
        let span = self.error.span();
        serde_json::json!({
            "column":  span.start.column,
            "file":    self.file,
            "kind":    self.error.kind(),
            "line":    span.start.line,
            "message": self.error.to_string(),
        })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = self.error.span().start;
        write!(
            f,
            "{}:{}:{}: {}",
            self.file, start.line, start.column, self.error
        )
    }
}

impl std::error::Error for Diagnostic {}

/// Failure of a whole compile pass.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// First document mistake, in fail-fast mode.
    #[error("{0}")]
    Compile(Diagnostic),

    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse '{file}': {message}")]
    Parse { file: String, message: String },
}

impl Error {
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            Error::Compile(diagnostic) => diagnostic.to_json_value(),
            other => serde_json::json!({
                "kind":    "Fatal",
                "message": other.to_string(),
            }),
        }
    }
}

/// Error type threaded through the builders.
///
/// `Compile` may be absorbed by the diagnostics policy; `Fatal` always
/// aborts the pass.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Fatal(#[from] Error),
}

pub type Build<T> = Result<T, BuildError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Position;

    fn at(line: u32, column: u32) -> Span {
        Span::new(Position::new(line, column), Position::new(line, column + 4))
    }

    #[test]
    fn not_allowed_key_lists_every_allowed_key() {
        let err = CompileError::NotAllowedKey {
            span: at(3, 5),
            construct: "find",
            key: "qurey".into(),
            allowed: vec!["query".into(), "with_text".into(), "action".into()],
        };
        assert_eq!(
            err.to_string(),
            "key 'qurey' is not allowed in find (allowed keys: query, with_text, action)"
        );
    }

    #[test]
    fn diagnostic_renders_file_line_column() {
        let d = Diagnostic::new(
            "login.yml",
            CompileError::RequiredKeyNotExist {
                span: at(7, 3),
                construct: "find",
                missing: vec!["query".into()],
            },
        );
        assert_eq!(d.to_string(), "login.yml:7:3: find is missing required keys: query");
    }

    #[test]
    fn diagnostic_json_shape() {
        let d = Diagnostic::new("a.yml", CompileError::NoRequiredValue { span: at(2, 1) });
        let v = d.to_json_value();
        assert_eq!(v["kind"], "NoRequiredValue");
        assert_eq!(v["file"], "a.yml");
        assert_eq!(v["line"], 2);
        assert_eq!(v["column"], 1);
    }
}
