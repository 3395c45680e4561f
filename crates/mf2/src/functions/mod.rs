//! Built-in functions.
//!
//! Every built-in is an ordinary [`Func`]: its contract declares the options
//! it accepts and the registry checks them before the body runs.

mod datetime;
mod number;
mod string;

pub use datetime::{date_function, datetime_function, parse_datetime, time_function};
pub use number::{integer_function, number_function};
pub use string::string_function;

use crate::registry::{Func, Registry};

/// Names and constructors of the built-in functions.
pub const BUILTINS: [(&str, fn() -> Func); 6] = [
    ("number", number_function),
    ("integer", integer_function),
    ("datetime", datetime_function),
    ("date", date_function),
    ("time", time_function),
    ("string", string_function),
];

pub(crate) fn register_builtins(registry: &mut Registry) {
    for (name, build) in BUILTINS {
        registry.insert(name, build());
    }
}
