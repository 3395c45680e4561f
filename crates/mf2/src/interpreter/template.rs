//! The user-facing template API.

use std::collections::HashMap;
use std::fmt::Write;

use bon::Builder;
use tracing::debug;

use crate::interpreter::{Error, ExecContext, execute_message};
use crate::locale::Locale;
use crate::parser::{Message, ParseError, parse_message};
use crate::registry::{Func, Registry};
use crate::types::Value;

/// A parsed message together with the locale and functions it runs with.
///
/// Each template owns its own [`Registry`], seeded with the built-in
/// functions, so functions added to one template never affect another.
/// A parsed template is immutable during execution and can be shared
/// across threads.
///
/// # Example
///
/// ```
/// use mf2::{Template, bindings};
///
/// let template = Template::builder()
///     .locale("en")
///     .build()
///     .parse("Hello, {$name}! You have {$count :number} messages.")
///     .unwrap();
///
/// let text = template.format(&bindings! { "name" => "Ana", "count" => 1200 }).unwrap();
/// assert_eq!(text, "Hello, Ana! You have 1,200 messages.");
/// ```
#[derive(Debug, Clone, Builder)]
pub struct Template {
    /// Locale passed to every function call.
    #[builder(into, default)]
    locale: Locale,

    /// Functions available to annotations.
    #[builder(default = Registry::with_builtins())]
    registry: Registry,

    /// The parsed message; empty until [`Template::parse`] is called.
    #[builder(skip)]
    message: Message,
}

impl Default for Template {
    fn default() -> Self {
        Template::builder().build()
    }
}

impl Template {
    /// Create a template for the `en` locale with the built-in functions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate `source`, replacing the current message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Syntax`] when the source does not parse or the
    /// parsed message is structurally invalid.
    pub fn parse(self, source: &str) -> Result<Self, Error> {
        let message = parse_message(source)?;
        self.with_message(message)
    }

    /// Use an already built message, validating it first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Syntax`] when the message is structurally invalid.
    pub fn with_message(mut self, message: Message) -> Result<Self, Error> {
        message.validate().map_err(ParseError::from)?;
        self.message = message;
        Ok(self)
    }

    /// Register a function on this template, replacing any with the same name.
    pub fn add_func(&mut self, name: impl Into<String>, func: Func) -> &mut Self {
        self.registry.insert(name, func);
        self
    }

    /// Execute the message, writing the output to `out`.
    ///
    /// # Errors
    ///
    /// Returns the first error met during execution. Output written before
    /// the error is not retracted, so a failed call may leave partial text
    /// in `out`.
    pub fn execute<W: Write + ?Sized>(
        &self,
        out: &mut W,
        bindings: &HashMap<String, Value>,
    ) -> Result<(), Error> {
        debug!(locale = self.locale.tag(), bindings = bindings.len(), "Executing message");
        let mut ctx = ExecContext::new(bindings);
        execute_message(&self.message, &mut ctx, &self.registry, &self.locale, out)
    }

    /// Execute the message into a new string.
    ///
    /// # Errors
    ///
    /// See [`Template::execute`].
    pub fn format(&self, bindings: &HashMap<String, Value>) -> Result<String, Error> {
        let mut out = String::new();
        self.execute(&mut out, bindings)?;
        Ok(out)
    }

    /// The parsed message.
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// The locale.
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// The function registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}
