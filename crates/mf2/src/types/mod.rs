mod resolved;
mod value;

pub use resolved::{FormatFn, Provenance, ResolvedValue, SelectFn};
pub use value::{Value, ValueKind, parse_number};
