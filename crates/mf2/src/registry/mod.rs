//! The function registry: named functions, their contracts and the shared
//! validation path every call goes through.

mod contract;
mod error;
mod options;

use std::collections::{BTreeMap, HashMap};
use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::sync::Arc;

use tracing::trace;

pub use contract::{Constraint, Contract, OperandValidator, OptionSpec, Requirement};
pub use error::{FuncError, OperandError, OptionError};
pub use options::Options;
pub(crate) use options::int_value;

use crate::functions::register_builtins;
use crate::locale::Locale;
use crate::types::{Provenance, ResolvedValue, Value};

/// Where a function is being called from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    /// Placeholders and declarations.
    Format,
    /// Matcher selectors.
    Select,
}

impl Display for Context {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            Context::Format => "format",
            Context::Select => "select",
        })
    }
}

/// The body of a function: operand, checked options and locale in, resolved value out.
pub type FuncBody = Arc<
    dyn Fn(Option<&ResolvedValue>, &Options, &Locale) -> Result<ResolvedValue, FuncError>
        + Send
        + Sync,
>;

/// A function usable as an annotation: a body plus one contract per
/// context it supports.
///
/// # Example
///
/// ```
/// use mf2::{Contract, Func, Requirement, ResolvedValue};
///
/// let upper = Func::new(|operand, _options, _locale| {
///     let text = operand.map(|v| v.value().to_string()).unwrap_or_default();
///     Ok(ResolvedValue::new(text.to_uppercase()))
/// })
/// .format_contract(Contract::new().operand(Requirement::Required));
/// assert!(upper.supports(mf2::Context::Format));
/// assert!(!upper.supports(mf2::Context::Select));
/// ```
#[derive(Clone)]
pub struct Func {
    body: FuncBody,
    format: Option<Contract>,
    select: Option<Contract>,
    inherits: Vec<String>,
}

impl Func {
    /// Wrap a function body. The function supports no context until a
    /// contract is attached.
    pub fn new(
        body: impl Fn(Option<&ResolvedValue>, &Options, &Locale) -> Result<ResolvedValue, FuncError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            body: Arc::new(body),
            format: None,
            select: None,
            inherits: Vec::new(),
        }
    }

    /// Allow the function in placeholders and declarations.
    pub fn format_contract(mut self, contract: Contract) -> Self {
        self.format = Some(contract);
        self
    }

    /// Allow the function as a matcher selector.
    pub fn select_contract(mut self, contract: Contract) -> Self {
        self.select = Some(contract);
        self
    }

    /// Inherit the explicit options of operands produced by these functions.
    ///
    /// Options given to this call override the inherited ones.
    pub fn inherit_options_from<I, S>(mut self, functions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inherits = functions.into_iter().map(Into::into).collect();
        self
    }

    /// Get the contract for a context.
    pub fn contract(&self, context: Context) -> Option<&Contract> {
        match context {
            Context::Format => self.format.as_ref(),
            Context::Select => self.select.as_ref(),
        }
    }

    /// Check whether the function has a contract for `context`.
    pub fn supports(&self, context: Context) -> bool {
        self.contract(context).is_some()
    }

    fn call(
        &self,
        name: &str,
        context: Context,
        operand: Option<&ResolvedValue>,
        explicit: BTreeMap<String, Value>,
        locale: &Locale,
    ) -> Result<ResolvedValue, FuncError> {
        let contract = self
            .contract(context)
            .ok_or(FuncError::UnsupportedContext(context))?;
        let mut options = contract.check(operand.map(ResolvedValue::value), explicit)?;

        if let Some(base) = operand
            .and_then(ResolvedValue::provenance)
            .filter(|p| self.inherits.iter().any(|f| *f == p.function))
        {
            options = options.inherit(&base.options);
        }

        trace!(function = name, %context, options = ?options.explicit(), "Calling function");
        let resolved = (self.body)(operand, &options, locale)?;
        Ok(resolved.with_provenance(Provenance {
            function: name.to_string(),
            options,
        }))
    }
}

impl Debug for Func {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Func")
            .field("format", &self.format)
            .field("select", &self.select)
            .field("inherits", &self.inherits)
            .finish_non_exhaustive()
    }
}

/// A catalog of named functions.
///
/// Each [`Template`](crate::Template) owns its own registry, so functions
/// added to one template never leak into another.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    funcs: HashMap<String, Func>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in functions.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        register_builtins(&mut registry);
        registry
    }

    /// Register a function, replacing any existing one with the same name.
    pub fn insert(&mut self, name: impl Into<String>, func: Func) {
        self.funcs.insert(name.into(), func);
    }

    /// Register a function, builder style.
    pub fn with(mut self, name: impl Into<String>, func: Func) -> Self {
        self.insert(name, func);
        self
    }

    /// Get a function by name.
    pub fn get(&self, name: &str) -> Option<&Func> {
        self.funcs.get(name)
    }

    /// Check whether a function is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.funcs.contains_key(name)
    }

    /// The registered function names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.funcs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Call a function in format context.
    ///
    /// The format contract is checked before the body runs, and the result
    /// is stamped with the function name and its options.
    ///
    /// # Errors
    ///
    /// Returns [`FuncError::Unknown`] for unregistered names,
    /// [`FuncError::UnsupportedContext`] when the function has no format
    /// contract, the contract violation, or the body's own error.
    pub fn format(
        &self,
        name: &str,
        operand: Option<&ResolvedValue>,
        options: BTreeMap<String, Value>,
        locale: &Locale,
    ) -> Result<ResolvedValue, FuncError> {
        self.call(Context::Format, name, operand, options, locale)
    }

    /// Call a function in select context.
    ///
    /// # Errors
    ///
    /// As [`Registry::format`], against the select contract.
    pub fn select(
        &self,
        name: &str,
        operand: Option<&ResolvedValue>,
        options: BTreeMap<String, Value>,
        locale: &Locale,
    ) -> Result<ResolvedValue, FuncError> {
        self.call(Context::Select, name, operand, options, locale)
    }

    /// Call a function in the given context.
    ///
    /// # Errors
    ///
    /// See [`Registry::format`].
    pub fn call(
        &self,
        context: Context,
        name: &str,
        operand: Option<&ResolvedValue>,
        options: BTreeMap<String, Value>,
        locale: &Locale,
    ) -> Result<ResolvedValue, FuncError> {
        let func = self.get(name).ok_or_else(|| FuncError::Unknown {
            name: name.to_string(),
        })?;
        func.call(name, context, operand, options, locale)
    }
}
