//! Binding environment for one execution.

use std::collections::{HashMap, HashSet};

use crate::interpreter::Error;
use crate::types::{ResolvedValue, Value};

/// Execution context carrying the variable bindings of one call.
///
/// The context tracks:
/// - Caller-supplied input values
/// - Values bound by `.input` and `.local` declarations
/// - Names already declared, for duplicate detection
pub struct ExecContext<'a> {
    /// Values supplied by the caller.
    input: &'a HashMap<String, Value>,
    /// Values bound by declarations; these shadow the input.
    locals: HashMap<String, ResolvedValue>,
    /// Names declared so far.
    declared: HashSet<String>,
}

impl<'a> ExecContext<'a> {
    /// Create a context seeded from caller input.
    pub fn new(input: &'a HashMap<String, Value>) -> Self {
        Self {
            input,
            locals: HashMap::new(),
            declared: HashSet::new(),
        }
    }

    /// Look up a variable, declared bindings first.
    pub fn lookup(&self, name: &str) -> Option<ResolvedValue> {
        self.locals
            .get(name)
            .cloned()
            .or_else(|| self.input.get(name).cloned().map(ResolvedValue::new))
    }

    /// Reserve a name for a declaration.
    ///
    /// Returns an error if the name was already declared.
    pub fn declare(&mut self, name: &str) -> Result<(), Error> {
        if !self.declared.insert(name.to_string()) {
            return Err(Error::DuplicateDeclaration {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Bind a resolved value to a declared name.
    pub fn bind(&mut self, name: &str, value: ResolvedValue) {
        self.locals.insert(name.to_string(), value);
    }
}
