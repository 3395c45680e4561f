//! Declarative contracts that describe what a function accepts.

use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use bon::Builder;

use super::{FuncError, OperandError, OptionError, Options};
use crate::types::Value;

/// Validates an operand value.
pub type OperandValidator = Arc<dyn Fn(&Value) -> Result<(), OperandError> + Send + Sync>;

/// Whether a function takes an operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Requirement {
    Required,
    #[default]
    Optional,
    Forbidden,
}

/// A check applied to an option value.
#[derive(Clone)]
pub enum Constraint {
    /// The value, rendered as text, must be one of these.
    OneOf(Vec<String>),

    /// A custom validator returning the rejection reason.
    Custom(Arc<dyn Fn(&Value) -> Result<(), String> + Send + Sync>),
}

impl Constraint {
    /// An allow-list constraint.
    pub fn one_of<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Constraint::OneOf(allowed.into_iter().map(Into::into).collect())
    }

    /// A validator constraint.
    pub fn custom(validator: impl Fn(&Value) -> Result<(), String> + Send + Sync + 'static) -> Self {
        Constraint::Custom(Arc::new(validator))
    }

    fn check(&self, option: &str, value: &Value) -> Result<(), OptionError> {
        match self {
            Constraint::OneOf(allowed) => {
                let text = value.to_string();
                if allowed.contains(&text) {
                    Ok(())
                } else {
                    Err(OptionError::NotAllowed {
                        option: option.to_string(),
                        value: text,
                        allowed: allowed.clone(),
                    })
                }
            }
            Constraint::Custom(validator) => {
                validator(value).map_err(|reason| OptionError::Invalid {
                    option: option.to_string(),
                    reason,
                })
            }
        }
    }
}

impl Debug for Constraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Constraint::OneOf(allowed) => f.debug_tuple("OneOf").field(allowed).finish(),
            Constraint::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// How one option is declared in a contract.
///
/// # Example
///
/// ```
/// use mf2::{Constraint, OptionSpec};
///
/// let spec = OptionSpec::builder()
///     .default_value("decimal")
///     .constraint(Constraint::one_of(["decimal", "percent"]))
///     .build();
/// assert!(spec.default_value.is_some());
/// ```
#[derive(Debug, Clone, Default, Builder)]
pub struct OptionSpec {
    /// Applied when the option is omitted.
    #[builder(into)]
    pub default_value: Option<Value>,

    /// Checked against explicit values.
    pub constraint: Option<Constraint>,
}

impl OptionSpec {
    /// An option with no default and no constraint.
    pub fn any() -> Self {
        Self::default()
    }

    /// An option restricted to `allowed`.
    pub fn one_of<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            default_value: None,
            constraint: Some(Constraint::one_of(allowed)),
        }
    }
}

/// The operand requirement and option declarations for one context.
///
/// # Example
///
/// ```
/// use mf2::{Contract, OptionSpec, Requirement};
///
/// let contract = Contract::new()
///     .operand(Requirement::Required)
///     .option("style", OptionSpec::one_of(["short", "long"]));
/// assert_eq!(contract.requirement(), Requirement::Required);
/// ```
#[derive(Clone, Default)]
pub struct Contract {
    operand: Requirement,
    validator: Option<OperandValidator>,
    options: BTreeMap<String, OptionSpec>,
}

impl Contract {
    /// A contract with an optional operand and no options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the operand requirement.
    pub fn operand(mut self, requirement: Requirement) -> Self {
        self.operand = requirement;
        self
    }

    /// Set the operand validator, run only when an operand is present.
    pub fn operand_validator(
        mut self,
        validator: impl Fn(&Value) -> Result<(), OperandError> + Send + Sync + 'static,
    ) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Declare an option.
    pub fn option(mut self, name: impl Into<String>, spec: OptionSpec) -> Self {
        self.options.insert(name.into(), spec);
        self
    }

    /// The operand requirement.
    pub fn requirement(&self) -> Requirement {
        self.operand
    }

    /// The declared option names, in order.
    pub fn option_names(&self) -> impl Iterator<Item = &str> {
        self.options.keys().map(String::as_str)
    }

    /// Check an operand and explicit options against this contract.
    ///
    /// Options are checked before the operand: unknown names first, then
    /// allow-lists and validators in name order. Defaults for omitted
    /// options are applied to the returned set once every check passes.
    ///
    /// # Errors
    ///
    /// Returns the first [`OptionError`] or [`OperandError`] found.
    pub fn check(
        &self,
        operand: Option<&Value>,
        explicit: BTreeMap<String, Value>,
    ) -> Result<Options, FuncError> {
        if let Some(name) = explicit.keys().find(|name| !self.options.contains_key(*name)) {
            return Err(OptionError::Unknown {
                option: name.clone(),
            }
            .into());
        }
        for (name, value) in &explicit {
            if let Some(constraint) = self.options.get(name).and_then(|spec| spec.constraint.as_ref()) {
                constraint.check(name, value)?;
            }
        }

        match (self.operand, operand) {
            (Requirement::Required, None) => return Err(OperandError::Missing.into()),
            (Requirement::Forbidden, Some(_)) => return Err(OperandError::Unexpected.into()),
            (_, Some(value)) => {
                if let Some(validator) = &self.validator {
                    validator(value)?;
                }
            }
            (_, None) => {}
        }

        let mut options = Options::from_explicit(explicit);
        for (name, spec) in &self.options {
            if let Some(default) = &spec.default_value {
                options.set_default(name, default.clone());
            }
        }
        Ok(options)
    }
}

impl Debug for Contract {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Contract")
            .field("operand", &self.operand)
            .field("validator", &self.validator.is_some())
            .field("options", &self.options)
            .finish()
    }
}
