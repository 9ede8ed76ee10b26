use std::fmt;
use thiserror::Error;

/// Failure kinds surfaced by the transpilation core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or incomplete input for a format parser.
    Parse,
    /// Structurally well-formed workflow that breaks a validation rule.
    Validation,
    /// Unsupported format key or a fault not classified by a parser.
    Transpiler,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Parse => write!(f, "ParseError"),
            ErrorKind::Validation => write!(f, "ValidationError"),
            ErrorKind::Transpiler => write!(f, "TranspilerError"),
        }
    }
}

/// Base error for the library. Every failure is terminal for the call that raised it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("{0}")]
    Parse(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Transpiler(String),
}

impl WorkflowError {
    pub fn parse<T: Into<String>>(message: T) -> Self {
        WorkflowError::Parse(message.into())
    }

    pub fn validation<T: Into<String>>(message: T) -> Self {
        WorkflowError::Validation(message.into())
    }

    pub fn transpiler<T: Into<String>>(message: T) -> Self {
        WorkflowError::Transpiler(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            WorkflowError::Parse(_) => ErrorKind::Parse,
            WorkflowError::Validation(_) => ErrorKind::Validation,
            WorkflowError::Transpiler(_) => ErrorKind::Transpiler,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            WorkflowError::Parse(message)
            | WorkflowError::Validation(message)
            | WorkflowError::Transpiler(message) => message,
        }
    }

    pub fn is_parse(&self) -> bool {
        self.kind() == ErrorKind::Parse
    }

    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    pub fn is_transpiler(&self) -> bool {
        self.kind() == ErrorKind::Transpiler
    }
}

pub type Result<T, E = WorkflowError> = std::result::Result<T, E>;
