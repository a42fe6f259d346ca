//! Typed failures raised during interpretation. Nothing is caught at this
//! layer; errors propagate to the host interpreter loop.

use std::error::Error;
use std::fmt;

pub mod messages {
    pub const INSECURE_EXTEND: &str = "insecure: cannot extend object";
    pub const NOT_A_STRING: &str = "not a string";
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Type,
    Security,
    Name,
    Pattern,
}

impl ErrorKind {
    fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Type => "type error",
            ErrorKind::Security => "security error",
            ErrorKind::Name => "name error",
            ErrorKind::Pattern => "pattern error",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub message: String,
}

impl RuntimeError {
    pub fn type_error(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Type,
            message: message.into(),
        }
    }

    pub fn security(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Security,
            message: message.into(),
        }
    }

    pub fn name(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Name,
            message: message.into(),
        }
    }

    pub fn pattern(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Pattern,
            message: message.into(),
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.as_str(), self.message)
    }
}

impl Error for RuntimeError {}
