pub mod functions;
pub mod interpreter;
pub mod locale;
pub mod parser;
pub mod registry;
pub mod types;

pub use interpreter::{Error, ErrorKind, ExecContext, Template, compute_suggestions};
pub use locale::{
    DateTimeFields, DateTimeFormat, DateTimeStyle, DecimalNumber, DefaultLocaleProvider, Grouping,
    Locale, LocaleError, LocaleProvider, MonthWidth, NumberFormat, NumberStyle, NumericWidth,
    PluralKind, TextWidth,
};
pub use mf2_syntax::PluralCategory;
pub use parser::{Message, ParseError, ValidationError, parse_message};
pub use registry::{
    Constraint, Context, Contract, Func, FuncError, OperandError, OptionError, OptionSpec,
    Options, Registry, Requirement,
};
pub use types::{Provenance, ResolvedValue, Value, ValueKind};

/// Creates a `HashMap<String, Value>` of message bindings from key-value pairs.
///
/// Values are converted via `Into<Value>`, so integers, floats, strings,
/// booleans and chrono dates can be passed directly.
///
/// # Example
///
/// ```
/// use mf2::{bindings, Value};
///
/// let b = bindings! { "count" => 3, "name" => "Alice" };
/// assert_eq!(b.len(), 2);
/// assert_eq!(b["count"].as_int(), Some(3));
/// assert_eq!(b["name"].as_str(), Some("Alice"));
/// ```
#[macro_export]
macro_rules! bindings {
    {} => {
        ::std::collections::HashMap::<String, $crate::Value>::new()
    };
    { $($key:expr => $value:expr),+ $(,)? } => {
        {
            let mut map = ::std::collections::HashMap::<String, $crate::Value>::new();
            $(
                map.insert($key.to_string(), ::std::convert::Into::<$crate::Value>::into($value));
            )+
            map
        }
    };
}
