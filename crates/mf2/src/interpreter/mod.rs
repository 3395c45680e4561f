//! MF2 interpreter for executing messages.
//!
//! This module provides the execution engine that takes parsed messages and
//! produces formatted text. It resolves declarations, dispatches annotations
//! to the function registry, selects matcher variants and writes output.

mod context;
mod error;
mod evaluator;
mod template;

pub use context::ExecContext;
pub use error::{Error, ErrorKind, compute_suggestions};
pub use evaluator::{
    execute_message, resolve_declarations, resolve_expression, select_variant, write_pattern,
};
pub use template::Template;
