//! The `:string` function.

use crate::registry::{Contract, Func, Requirement};
use crate::types::ResolvedValue;

/// The `:string` function.
///
/// Formats its operand's text, or nothing when there is no operand. As a
/// selector it needs an operand and matches the key equal to that text.
/// Takes no options.
pub fn string_function() -> Func {
    Func::new(|operand, _options, _locale| {
        let text = operand
            .map(|resolved| resolved.value().to_string())
            .unwrap_or_default();
        Ok(ResolvedValue::new(text).with_selector(|value, keys| {
            let text = value.to_string();
            Ok(keys.iter().find(|key| **key == text).cloned())
        }))
    })
    .format_contract(Contract::new().operand(Requirement::Optional))
    .select_contract(Contract::new().operand(Requirement::Required))
}
