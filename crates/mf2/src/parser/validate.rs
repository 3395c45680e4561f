//! Structural validation of message ASTs.
//!
//! Validation is depth-first, declarations before body, and stops at the
//! first violation. Semantic conditions (unresolved variables, unknown
//! functions, duplicate options or declarations) are left to execution.

use mf2_syntax::{
    is_keyword, is_name, is_number_literal, is_private_use_sigil, is_reserved_sigil,
    is_unquoted_literal,
};

use super::ast::*;
use super::error::ValidationError;

impl Message {
    /// Check the message for structural violations.
    ///
    /// # Errors
    ///
    /// Returns the first violation found, with a path to the offending node.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Message::Simple(pattern) => validate_pattern(pattern, "pattern"),
            Message::Complex(complex) => {
                for (i, declaration) in complex.declarations.iter().enumerate() {
                    validate_declaration(declaration, &format!("declarations[{i}]"))?;
                }
                validate_body(&complex.body, "body")
            }
        }
    }
}

fn validate_declaration(declaration: &Declaration, path: &str) -> Result<(), ValidationError> {
    match declaration {
        Declaration::Input(input) => {
            validate_variable(&input.variable, &format!("{path}.variable"))?;
            if let Some(annotation) = &input.annotation {
                validate_annotation(annotation, &format!("{path}.annotation"))?;
            }
            Ok(())
        }
        Declaration::Local(local) => {
            validate_variable(&local.variable, &format!("{path}.variable"))?;
            validate_expression(&local.expression, &format!("{path}.expression"))
        }
        Declaration::Reserved(statement) => {
            if !is_name(&statement.keyword) || is_keyword(&statement.keyword) {
                return Err(ValidationError::new(
                    format!("{path}.keyword"),
                    format!("'{}' is not a reserved keyword", statement.keyword),
                ));
            }
            if statement.expressions.is_empty() {
                return Err(ValidationError::new(
                    format!("{path}.expressions"),
                    "reserved statement requires at least one expression",
                ));
            }
            for (i, expression) in statement.expressions.iter().enumerate() {
                validate_expression(expression, &format!("{path}.expressions[{i}]"))?;
            }
            Ok(())
        }
    }
}

fn validate_body(body: &ComplexBody, path: &str) -> Result<(), ValidationError> {
    match body {
        ComplexBody::QuotedPattern(pattern) => validate_pattern(pattern, &format!("{path}.pattern")),
        ComplexBody::Matcher(matcher) => validate_matcher(matcher, path),
    }
}

fn validate_matcher(matcher: &Matcher, path: &str) -> Result<(), ValidationError> {
    if matcher.selectors.is_empty() {
        return Err(ValidationError::new(
            format!("{path}.selectors"),
            "matcher requires at least one selector",
        ));
    }
    for (i, selector) in matcher.selectors.iter().enumerate() {
        validate_expression(selector, &format!("{path}.selectors[{i}]"))?;
    }
    if matcher.variants.is_empty() {
        return Err(ValidationError::new(
            format!("{path}.variants"),
            "matcher requires at least one variant",
        ));
    }
    for (i, variant) in matcher.variants.iter().enumerate() {
        let variant_path = format!("{path}.variants[{i}]");
        if variant.keys.len() != matcher.selectors.len() {
            return Err(ValidationError::new(
                format!("{variant_path}.keys"),
                format!(
                    "variant has {} keys but the matcher has {} selectors",
                    variant.keys.len(),
                    matcher.selectors.len()
                ),
            ));
        }
        for (k, key) in variant.keys.iter().enumerate() {
            if let VariantKey::Literal(literal) = key {
                validate_literal(literal, &format!("{variant_path}.keys[{k}]"))?;
            }
        }
        validate_pattern(&variant.pattern, &format!("{variant_path}.pattern"))?;
    }
    if !matcher.variants.iter().any(Variant::is_fallback) {
        return Err(ValidationError::new(
            format!("{path}.variants"),
            "matcher requires a variant whose keys are all '*'",
        ));
    }
    Ok(())
}

fn validate_pattern(pattern: &[Pattern], path: &str) -> Result<(), ValidationError> {
    for (i, part) in pattern.iter().enumerate() {
        if let Pattern::Placeholder(expression) = part {
            validate_expression(expression, &format!("{path}[{i}]"))?;
        }
    }
    Ok(())
}

fn validate_expression(expression: &Expression, path: &str) -> Result<(), ValidationError> {
    if expression.operand.is_none() && expression.annotation.is_none() {
        return Err(ValidationError::new(
            path,
            "expression requires an operand or an annotation",
        ));
    }
    if let Some(operand) = &expression.operand {
        validate_operand(operand, &format!("{path}.operand"))?;
    }
    if let Some(annotation) = &expression.annotation {
        validate_annotation(annotation, &format!("{path}.annotation"))?;
    }
    Ok(())
}

fn validate_operand(operand: &Operand, path: &str) -> Result<(), ValidationError> {
    match operand {
        Operand::Literal(literal) => validate_literal(literal, path),
        Operand::Variable(variable) => validate_variable(variable, path),
    }
}

fn validate_variable(variable: &Variable, path: &str) -> Result<(), ValidationError> {
    if is_name(variable.name()) {
        Ok(())
    } else {
        Err(ValidationError::new(
            path,
            format!("'{}' is not a valid variable name", variable.name()),
        ))
    }
}

fn validate_literal(literal: &Literal, path: &str) -> Result<(), ValidationError> {
    match literal {
        Literal::Quoted(_) => Ok(()),
        Literal::Unquoted(Unquoted::Name(name)) if is_unquoted_literal(name) => Ok(()),
        Literal::Unquoted(Unquoted::Name(name)) => Err(ValidationError::new(
            path,
            format!("'{name}' is not a valid unquoted literal"),
        )),
        Literal::Unquoted(Unquoted::Number(number)) if is_number_literal(number) => Ok(()),
        Literal::Unquoted(Unquoted::Number(number)) => Err(ValidationError::new(
            path,
            format!("'{number}' is not a valid number literal"),
        )),
    }
}

fn validate_identifier(identifier: &Identifier, path: &str) -> Result<(), ValidationError> {
    let namespace_ok = identifier.namespace.as_deref().is_none_or(is_name);
    if namespace_ok && is_name(&identifier.name) {
        Ok(())
    } else {
        Err(ValidationError::new(
            path,
            format!("'{identifier}' is not a valid identifier"),
        ))
    }
}

fn validate_annotation(annotation: &Annotation, path: &str) -> Result<(), ValidationError> {
    match annotation {
        Annotation::Function(function) => {
            validate_identifier(&function.identifier, &format!("{path}.identifier"))?;
            for (i, option) in function.options.iter().enumerate() {
                let option_path = format!("{path}.options[{i}]");
                validate_identifier(&option.identifier, &option_path)?;
                validate_operand(&option.value, &format!("{option_path}.value"))?;
            }
            Ok(())
        }
        Annotation::PrivateUse(opaque) if is_private_use_sigil(opaque.sigil) => Ok(()),
        Annotation::PrivateUse(opaque) => Err(ValidationError::new(
            path,
            format!("'{}' is not a private-use sigil", opaque.sigil),
        )),
        Annotation::Reserved(opaque) if is_reserved_sigil(opaque.sigil) => Ok(()),
        Annotation::Reserved(opaque) => Err(ValidationError::new(
            path,
            format!("'{}' is not a reserved sigil", opaque.sigil),
        )),
    }
}
