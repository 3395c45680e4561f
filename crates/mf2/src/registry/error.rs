//! Error types raised by function contracts and function bodies.

use thiserror::Error;

use super::Context;
use crate::locale::LocaleError;
use crate::types::ValueKind;

/// The operand did not satisfy a function's contract.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OperandError {
    /// The function requires an operand but none was given.
    #[error("operand is required")]
    Missing,

    /// The function forbids an operand but one was given.
    #[error("operand is not allowed")]
    Unexpected,

    /// The operand has the wrong type.
    #[error("expected {expected} operand, got {received}")]
    WrongType {
        expected: String,
        received: ValueKind,
    },

    /// The operand has the right type but an unusable value.
    #[error("invalid operand: {0}")]
    Invalid(String),
}

/// An option did not satisfy a function's contract.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptionError {
    /// The option name is not part of the contract.
    #[error("unknown option '{option}'")]
    Unknown { option: String },

    /// The option value is outside the allow-list.
    #[error("option '{option}' must be one of [{}], got '{value}'", allowed.join(", "))]
    NotAllowed {
        option: String,
        value: String,
        allowed: Vec<String>,
    },

    /// The option value failed its validator.
    #[error("invalid value for option '{option}': {reason}")]
    Invalid { option: String, reason: String },

    /// The option value has the wrong type for a typed accessor.
    #[error("option '{option}' expects {expected}, got {received}")]
    TypeMismatch {
        option: String,
        expected: ValueKind,
        received: ValueKind,
    },

    /// Options that cannot be combined.
    #[error("conflicting options: {}", options.join(", "))]
    Conflict { options: Vec<String> },
}

impl OptionError {
    /// The name of the offending option, when there is a single one.
    pub fn option(&self) -> Option<&str> {
        match self {
            OptionError::Unknown { option }
            | OptionError::NotAllowed { option, .. }
            | OptionError::Invalid { option, .. }
            | OptionError::TypeMismatch { option, .. } => Some(option),
            OptionError::Conflict { .. } => None,
        }
    }
}

/// An error returned by a registry call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FuncError {
    /// No function is registered under this name.
    #[error("unknown function '{name}'")]
    Unknown { name: String },

    #[error(transparent)]
    BadOperand(#[from] OperandError),

    #[error(transparent)]
    BadOption(#[from] OptionError),

    /// The function has no contract for the requested context.
    #[error("function cannot be used in {0} context")]
    UnsupportedContext(Context),

    /// The value has no selection-key resolver.
    #[error("value cannot be used as a selector")]
    NotSelectable,

    #[error(transparent)]
    Locale(#[from] LocaleError),

    /// The function body itself failed.
    #[error("{0}")]
    Failed(String),
}
