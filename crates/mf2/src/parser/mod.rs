//! MF2 message parser, AST, validation and serialization.
//!
//! The parser produces an AST that can be used for execution or by external
//! tooling. `Message::validate` performs structural checks and
//! `Message::serialize` renders canonical syntax.

pub mod ast;
pub mod error;
mod message;
mod serialize;
mod validate;

pub use ast::*;
pub use error::{ParseError, ValidationError};
pub use message::parse_message;
