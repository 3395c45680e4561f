//! Resolved function options and their typed accessors.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use super::OptionError;
use crate::types::{Value, ValueKind};

/// The options passed to a function body.
///
/// Holds the options written in the message (explicit) and the contract
/// defaults for the ones that were omitted. Accessors look at explicit
/// values first, then defaults, then the caller's fallback.
///
/// # Example
///
/// ```
/// use mf2::Options;
///
/// let options = Options::new().with("style", "percent").with("minimumFractionDigits", 2);
/// assert_eq!(options.get_string("style", "decimal", &["decimal", "percent"]).unwrap(), "percent");
/// assert_eq!(options.get_int("minimumFractionDigits", 0, 0..=20).unwrap(), 2);
/// assert_eq!(options.get_int("maximumFractionDigits", 3, 0..=20).unwrap(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    explicit: BTreeMap<String, Value>,
    defaults: BTreeMap<String, Value>,
}

impl Options {
    /// Create an empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an explicit option.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.explicit.insert(name.into(), value.into());
        self
    }

    pub(crate) fn from_explicit(explicit: BTreeMap<String, Value>) -> Self {
        Self {
            explicit,
            defaults: BTreeMap::new(),
        }
    }

    pub(crate) fn set_default(&mut self, name: &str, value: Value) {
        if !self.explicit.contains_key(name) {
            self.defaults.insert(name.to_string(), value);
        }
    }

    /// Get an option value, explicit or defaulted.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.explicit.get(name).or_else(|| self.defaults.get(name))
    }

    /// Check whether the option has a value, explicit or defaulted.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Check whether the message set this option explicitly.
    pub fn is_explicit(&self, name: &str) -> bool {
        self.explicit.contains_key(name)
    }

    /// The options written in the message.
    pub fn explicit(&self) -> &BTreeMap<String, Value> {
        &self.explicit
    }

    /// Check whether no option was set explicitly.
    pub fn is_empty(&self) -> bool {
        self.explicit.is_empty()
    }

    /// Layer these options over the explicit options of an earlier resolution.
    ///
    /// Explicit options here win; the earlier explicit options fill the gaps;
    /// defaults come from this set.
    pub fn inherit(&self, base: &Options) -> Options {
        let mut explicit = base.explicit.clone();
        explicit.extend(
            self.explicit
                .iter()
                .map(|(name, value)| (name.clone(), value.clone())),
        );
        let defaults = self
            .defaults
            .iter()
            .filter(|(name, _)| !explicit.contains_key(*name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        Options { explicit, defaults }
    }

    /// Get a string option.
    ///
    /// Returns `fallback` when the option is absent. When `allowed` is not
    /// empty the value must be one of its entries.
    ///
    /// # Errors
    ///
    /// Returns [`OptionError::TypeMismatch`] for non-string values and
    /// [`OptionError::NotAllowed`] for values outside `allowed`.
    pub fn get_string(
        &self,
        name: &str,
        fallback: &str,
        allowed: &[&str],
    ) -> Result<String, OptionError> {
        Ok(self
            .get_opt_string(name, allowed)?
            .unwrap_or_else(|| fallback.to_string()))
    }

    /// Get a string option, or `None` when it is absent.
    ///
    /// # Errors
    ///
    /// See [`Options::get_string`].
    pub fn get_opt_string(
        &self,
        name: &str,
        allowed: &[&str],
    ) -> Result<Option<String>, OptionError> {
        let Some(value) = self.get(name) else {
            return Ok(None);
        };
        let Value::String(s) = value else {
            return Err(mismatch(name, ValueKind::String, value));
        };
        if !allowed.is_empty() && !allowed.contains(&s.as_str()) {
            return Err(OptionError::NotAllowed {
                option: name.to_string(),
                value: s.clone(),
                allowed: allowed.iter().map(ToString::to_string).collect(),
            });
        }
        Ok(Some(s.clone()))
    }

    /// Get an integer option within `allowed`.
    ///
    /// Accepts integer values and strings that are integer literals.
    ///
    /// # Errors
    ///
    /// Returns [`OptionError::TypeMismatch`] for non-integer values and
    /// [`OptionError::Invalid`] for values outside `allowed`.
    pub fn get_int(
        &self,
        name: &str,
        fallback: i64,
        allowed: RangeInclusive<i64>,
    ) -> Result<i64, OptionError> {
        Ok(self.get_opt_int(name, allowed)?.unwrap_or(fallback))
    }

    /// Get an integer option, or `None` when it is absent.
    ///
    /// # Errors
    ///
    /// See [`Options::get_int`].
    pub fn get_opt_int(
        &self,
        name: &str,
        allowed: RangeInclusive<i64>,
    ) -> Result<Option<i64>, OptionError> {
        let Some(value) = self.get(name) else {
            return Ok(None);
        };
        let n = int_value(value).ok_or_else(|| mismatch(name, ValueKind::Int, value))?;
        if !allowed.contains(&n) {
            return Err(OptionError::Invalid {
                option: name.to_string(),
                reason: format!(
                    "{n} is outside {}..={}",
                    allowed.start(),
                    allowed.end()
                ),
            });
        }
        Ok(Some(n))
    }

    /// Get a boolean option.
    ///
    /// Accepts boolean values and the strings `true` and `false`.
    ///
    /// # Errors
    ///
    /// Returns [`OptionError::TypeMismatch`] for anything else.
    pub fn get_bool(&self, name: &str, fallback: bool) -> Result<bool, OptionError> {
        match self.get(name) {
            None => Ok(fallback),
            Some(Value::Bool(b)) => Ok(*b),
            Some(Value::String(s)) if s == "true" => Ok(true),
            Some(Value::String(s)) if s == "false" => Ok(false),
            Some(other) => Err(mismatch(name, ValueKind::Bool, other)),
        }
    }
}

/// Read an integer from an integer value or an integer literal string.
pub(crate) fn int_value(value: &Value) -> Option<i64> {
    match value {
        Value::Int(n) => Some(*n),
        Value::String(s) if mf2_syntax::is_number_literal(s) => s.parse().ok(),
        _ => None,
    }
}

fn mismatch(name: &str, expected: ValueKind, received: &Value) -> OptionError {
    OptionError::TypeMismatch {
        option: name.to_string(),
        expected,
        received: received.kind(),
    }
}
