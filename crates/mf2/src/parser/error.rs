//! Parse and validation error types.

use thiserror::Error;

/// An error that occurred while turning source text into a valid message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// A syntax error with location information.
    #[error("syntax error at {line}:{column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    /// Unexpected end of input.
    #[error("unexpected end of input at {line}:{column}")]
    UnexpectedEof { line: usize, column: usize },

    /// The message parsed but is structurally invalid.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// A structural violation found by `Message::validate`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid message at {path}: {reason}")]
pub struct ValidationError {
    /// Dotted path to the offending node, e.g. `body.variants[1].keys[0]`.
    pub path: String,
    pub reason: String,
}

impl ValidationError {
    pub(crate) fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
