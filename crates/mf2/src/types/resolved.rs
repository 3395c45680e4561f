use std::fmt::{Debug, Formatter as FmtFormatter, Result as FmtResult};
use std::sync::Arc;

use super::Value;
use crate::registry::{FuncError, Options};

/// Renders a resolved value as text.
pub type FormatFn = Arc<dyn Fn(&Value) -> Result<String, FuncError> + Send + Sync>;

/// Picks the variant key a resolved value matches from the candidate keys.
///
/// Returns `None` when no candidate matches.
pub type SelectFn = Arc<dyn Fn(&Value, &[String]) -> Result<Option<String>, FuncError> + Send + Sync>;

/// How a resolved value was produced: the function name and its explicit options.
///
/// Functions read this to see how an earlier resolution of their operand was
/// configured, e.g. `:number` inheriting the options of an `.input` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Provenance {
    pub function: String,
    pub options: Options,
}

/// The run-time result of evaluating an expression.
///
/// Carries the underlying value, at most one formatter, at most one
/// selection-key resolver and the provenance of the function that produced it.
///
/// # Example
///
/// ```
/// use mf2::{ResolvedValue, Value};
///
/// let shout = ResolvedValue::new("hi").with_formatter(|v: &Value| Ok(v.to_string().to_uppercase()));
/// assert_eq!(shout.format().unwrap(), "HI");
/// assert_eq!(shout.value(), &Value::from("hi"));
/// ```
#[derive(Clone)]
pub struct ResolvedValue {
    value: Value,
    formatter: Option<FormatFn>,
    selector: Option<SelectFn>,
    provenance: Option<Provenance>,
}

impl ResolvedValue {
    /// A resolved value with default stringification and no selector.
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            formatter: None,
            selector: None,
            provenance: None,
        }
    }

    /// Replace the formatter.
    pub fn with_formatter(
        mut self,
        formatter: impl Fn(&Value) -> Result<String, FuncError> + Send + Sync + 'static,
    ) -> Self {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    /// Replace the selection-key resolver.
    pub fn with_selector(
        mut self,
        selector: impl Fn(&Value, &[String]) -> Result<Option<String>, FuncError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.selector = Some(Arc::new(selector));
        self
    }

    /// Replace the provenance.
    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = Some(provenance);
        self
    }

    /// Get the underlying value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Consume this resolved value, returning the underlying value.
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Get the provenance, if a function produced this value.
    pub fn provenance(&self) -> Option<&Provenance> {
        self.provenance.as_ref()
    }

    /// Check whether this value can act as a selector.
    pub fn is_selectable(&self) -> bool {
        self.selector.is_some()
    }

    /// Render the value with its formatter, or its default stringification.
    ///
    /// # Errors
    ///
    /// Returns the formatter's error.
    pub fn format(&self) -> Result<String, FuncError> {
        match &self.formatter {
            Some(formatter) => formatter(&self.value),
            None => Ok(self.value.to_string()),
        }
    }

    /// Pick the matching key among `keys`.
    ///
    /// # Errors
    ///
    /// Returns [`FuncError::NotSelectable`] when the value has no selector,
    /// or the selector's own error.
    pub fn select_key(&self, keys: &[String]) -> Result<Option<String>, FuncError> {
        match &self.selector {
            Some(selector) => selector(&self.value, keys),
            None => Err(FuncError::NotSelectable),
        }
    }
}

impl From<Value> for ResolvedValue {
    fn from(value: Value) -> Self {
        ResolvedValue::new(value)
    }
}

impl Debug for ResolvedValue {
    fn fmt(&self, f: &mut FmtFormatter<'_>) -> FmtResult {
        f.debug_struct("ResolvedValue")
            .field("value", &self.value)
            .field("formatter", &self.formatter.is_some())
            .field("selector", &self.selector.is_some())
            .field("provenance", &self.provenance)
            .finish()
    }
}
