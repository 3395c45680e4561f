//! Error types for message execution.

use serde::Serialize;
use strsim::levenshtein;
use thiserror::Error;

use crate::parser::ParseError;
use crate::registry::{OperandError, OptionError};

/// An error that occurred while parsing or executing a message.
///
/// Every error is terminal: execution stops at the first one. Output
/// already written to the sink stays written.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The source text is not a well-formed message.
    #[error("syntax error: {0}")]
    Syntax(#[from] ParseError),

    /// A variable has no binding.
    #[error("unresolved variable '${name}'")]
    UnresolvedVariable { name: String },

    /// An annotation names a function that is not registered.
    #[error("unknown function ':{name}'{}", format_suggestions(suggestions))]
    UnknownFunction {
        name: String,
        suggestions: Vec<String>,
    },

    /// An annotation sets the same option twice.
    #[error("duplicate option '{option}' in ':{function}'")]
    DuplicateOptionName { function: String, option: String },

    /// A variable is declared twice.
    #[error("duplicate declaration of '${name}'")]
    DuplicateDeclaration { name: String },

    /// A private-use or reserved annotation, or a function that cannot
    /// format.
    #[error("unsupported expression: {detail}")]
    UnsupportedExpression { detail: String },

    /// A reserved statement.
    #[error("unsupported statement '.{keyword}'")]
    UnsupportedStatement { keyword: String },

    /// The operand does not satisfy the function's contract.
    #[error("bad operand for ':{function}': {source}")]
    BadOperand {
        function: String,
        #[source]
        source: OperandError,
    },

    /// An option does not satisfy the function's contract.
    #[error("bad option for ':{function}': {source}")]
    BadOption {
        function: String,
        #[source]
        source: OptionError,
    },

    /// A value that cannot select was used as a selector.
    #[error("bad selector: {detail}")]
    BadSelector { detail: String },

    /// A function body failed.
    #[error("formatting error in ':{function}': {message}")]
    Formatting { function: String, message: String },

    /// No variant matched the selectors.
    #[error("no variant matched")]
    NoVariantMatched,

    /// The output sink refused a write.
    #[error("failed to write output")]
    Write,
}

/// The stable category of an [`Error`], for callers that branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    Syntax,
    UnresolvedVariable,
    UnknownFunction,
    DuplicateOptionName,
    DuplicateDeclaration,
    UnsupportedExpression,
    UnsupportedStatement,
    BadOperand,
    BadOption,
    BadSelector,
    Formatting,
    NoVariantMatched,
    Write,
}

impl Error {
    /// The category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Syntax(_) => ErrorKind::Syntax,
            Error::UnresolvedVariable { .. } => ErrorKind::UnresolvedVariable,
            Error::UnknownFunction { .. } => ErrorKind::UnknownFunction,
            Error::DuplicateOptionName { .. } => ErrorKind::DuplicateOptionName,
            Error::DuplicateDeclaration { .. } => ErrorKind::DuplicateDeclaration,
            Error::UnsupportedExpression { .. } => ErrorKind::UnsupportedExpression,
            Error::UnsupportedStatement { .. } => ErrorKind::UnsupportedStatement,
            Error::BadOperand { .. } => ErrorKind::BadOperand,
            Error::BadOption { .. } => ErrorKind::BadOption,
            Error::BadSelector { .. } => ErrorKind::BadSelector,
            Error::Formatting { .. } => ErrorKind::Formatting,
            Error::NoVariantMatched => ErrorKind::NoVariantMatched,
            Error::Write => ErrorKind::Write,
        }
    }
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!("; did you mean: {}?", suggestions.join(", "))
    }
}

/// Find the names closest to `target` by edit distance.
///
/// Allows one edit for names of up to three characters and two edits
/// otherwise. Returns at most three names, closest first.
///
/// # Example
///
/// ```
/// use mf2::compute_suggestions;
///
/// let names = ["number", "integer", "string"];
/// assert_eq!(compute_suggestions("nubmer", &names), vec!["number"]);
/// assert!(compute_suggestions("xyz", &names).is_empty());
/// ```
pub fn compute_suggestions(target: &str, available: &[&str]) -> Vec<String> {
    let max_distance = if target.chars().count() <= 3 { 1 } else { 2 };
    let mut scored: Vec<(usize, &str)> = available
        .iter()
        .map(|name| (levenshtein(target, name), *name))
        .filter(|(distance, _)| *distance <= max_distance)
        .collect();
    scored.sort_unstable();
    scored
        .into_iter()
        .take(3)
        .map(|(_, name)| name.to_string())
        .collect()
}
