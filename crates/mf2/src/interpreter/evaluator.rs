//! Execution engine for MF2 messages.
//!
//! Walks a validated message against a registry and caller bindings:
//! declarations are resolved in order into the binding context, then the
//! body's pattern is written to the sink piece by piece.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

use tracing::debug;

use crate::interpreter::error::compute_suggestions;
use crate::interpreter::{Error, ExecContext};
use crate::locale::Locale;
use crate::parser::{
    Annotation, ComplexBody, Declaration, Expression, Function, FunctionPrefix, Literal, Matcher,
    Message, Operand, Pattern, Unquoted, VariantKey,
};
use crate::registry::{Context, FuncError, Registry};
use crate::types::{ResolvedValue, Value, parse_number};

/// Execute a message, writing its output to `out`.
///
/// # Arguments
///
/// * `message` - The parsed, validated message
/// * `ctx` - Binding context seeded with the caller's input
/// * `registry` - Functions available to annotations
/// * `locale` - Locale passed to every function call
/// * `out` - Output sink
///
/// # Errors
///
/// Returns the first error met. Text written before the error stays in
/// `out`.
pub fn execute_message<W: Write + ?Sized>(
    message: &Message,
    ctx: &mut ExecContext<'_>,
    registry: &Registry,
    locale: &Locale,
    out: &mut W,
) -> Result<(), Error> {
    match message {
        Message::Simple(pattern) => write_pattern(pattern, ctx, registry, locale, out),
        Message::Complex(complex) => {
            resolve_declarations(&complex.declarations, ctx, registry, locale)?;
            match &complex.body {
                ComplexBody::QuotedPattern(pattern) => {
                    write_pattern(pattern, ctx, registry, locale, out)
                }
                ComplexBody::Matcher(matcher) => {
                    let pattern = select_variant(matcher, ctx, registry, locale)?;
                    write_pattern(pattern, ctx, registry, locale, out)
                }
            }
        }
    }
}

/// Resolve declarations in document order, binding each result.
///
/// A name is reserved before its declaration is evaluated, so redeclaring
/// it fails without evaluating anything.
pub fn resolve_declarations(
    declarations: &[Declaration],
    ctx: &mut ExecContext<'_>,
    registry: &Registry,
    locale: &Locale,
) -> Result<(), Error> {
    for declaration in declarations {
        match declaration {
            Declaration::Input(input) => {
                let name = input.variable.name();
                ctx.declare(name)?;
                let operand = Operand::Variable(input.variable.clone());
                let value = resolve_parts(
                    Some(&operand),
                    input.annotation.as_ref(),
                    Context::Format,
                    ctx,
                    registry,
                    locale,
                )?;
                debug!(variable = name, "Bound input declaration");
                ctx.bind(name, value);
            }
            Declaration::Local(local) => {
                let name = local.variable.name();
                ctx.declare(name)?;
                let value =
                    resolve_expression(&local.expression, Context::Format, ctx, registry, locale)?;
                debug!(variable = name, "Bound local declaration");
                ctx.bind(name, value);
            }
            Declaration::Reserved(statement) => {
                return Err(Error::UnsupportedStatement {
                    keyword: statement.keyword.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Write a pattern: text verbatim, placeholders as their formatted value.
pub fn write_pattern<W: Write + ?Sized>(
    pattern: &[Pattern],
    ctx: &ExecContext<'_>,
    registry: &Registry,
    locale: &Locale,
    out: &mut W,
) -> Result<(), Error> {
    for part in pattern {
        match part {
            Pattern::Text(text) => out.write_str(text).map_err(|_| Error::Write)?,
            Pattern::Placeholder(expression) => {
                let value = resolve_expression(expression, Context::Format, ctx, registry, locale)?;
                let text = value
                    .format()
                    .map_err(|e| func_error(produced_by(&value), e, registry))?;
                out.write_str(&text).map_err(|_| Error::Write)?;
            }
        }
    }
    Ok(())
}

/// Pick the variant of a matcher.
///
/// Each selector is asked once for its key among the literal keys used at
/// its position. A variant is a candidate when each of its keys is a
/// wildcard or equals the selector's key; the candidate with the fewest
/// wildcards wins, ties going to the earliest.
pub fn select_variant<'m>(
    matcher: &'m Matcher,
    ctx: &ExecContext<'_>,
    registry: &Registry,
    locale: &Locale,
) -> Result<&'m [Pattern], Error> {
    let mut matched: Vec<Option<String>> = Vec::with_capacity(matcher.selectors.len());
    for (position, selector) in matcher.selectors.iter().enumerate() {
        let value = resolve_expression(selector, Context::Select, ctx, registry, locale)?;
        if !value.is_selectable() {
            return Err(Error::BadSelector {
                detail: format!("selector {selector} has no selection function"),
            });
        }
        let keys = keys_at(matcher, position);
        let key = value
            .select_key(&keys)
            .map_err(|e| func_error(produced_by(&value), e, registry))?;
        matched.push(key);
    }

    let (index, variant) = matcher
        .variants
        .iter()
        .enumerate()
        .filter(|(_, variant)| {
            variant.keys.len() == matched.len()
                && variant
                    .keys
                    .iter()
                    .zip(&matched)
                    .all(|(key, selected)| match key {
                        VariantKey::Wildcard => true,
                        VariantKey::Literal(literal) => {
                            selected.as_deref() == Some(literal.as_str())
                        }
                    })
        })
        .min_by_key(|(_, variant)| variant.wildcard_count())
        .ok_or(Error::NoVariantMatched)?;
    debug!(variant = index, "Selected variant");
    Ok(&variant.pattern)
}

/// The distinct literal keys at one selector position, in variant order.
fn keys_at(matcher: &Matcher, position: usize) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for variant in &matcher.variants {
        if let Some(VariantKey::Literal(literal)) = variant.keys.get(position) {
            let key = literal.as_str();
            if !keys.iter().any(|k| k == key) {
                keys.push(key.to_string());
            }
        }
    }
    keys
}

/// Resolve an expression in the given context.
pub fn resolve_expression(
    expression: &Expression,
    context: Context,
    ctx: &ExecContext<'_>,
    registry: &Registry,
    locale: &Locale,
) -> Result<ResolvedValue, Error> {
    resolve_parts(
        expression.operand.as_ref(),
        expression.annotation.as_ref(),
        context,
        ctx,
        registry,
        locale,
    )
}

fn resolve_parts(
    operand: Option<&Operand>,
    annotation: Option<&Annotation>,
    context: Context,
    ctx: &ExecContext<'_>,
    registry: &Registry,
    locale: &Locale,
) -> Result<ResolvedValue, Error> {
    if let Some(Annotation::Function(function)) = annotation {
        check_duplicate_options(function)?;
    }
    let operand = operand.map(|op| resolve_operand(op, ctx)).transpose()?;
    match annotation {
        None => operand.ok_or_else(|| Error::UnsupportedExpression {
            detail: "expression has neither operand nor annotation".to_string(),
        }),
        Some(Annotation::Function(function)) => {
            let options = resolve_options(function, ctx)?;
            let name = function.identifier.to_string();
            match function.prefix {
                FunctionPrefix::Call => registry
                    .call(context, &name, operand.as_ref(), options, locale)
                    .map_err(|e| func_error(&name, e, registry)),
                FunctionPrefix::Open | FunctionPrefix::Close if context == Context::Select => {
                    Err(Error::BadSelector {
                        detail: format!("markup '{}{name}' cannot select", function.prefix.sigil()),
                    })
                }
                FunctionPrefix::Open | FunctionPrefix::Close => Ok(ResolvedValue::new("")),
            }
        }
        Some(Annotation::PrivateUse(opaque)) => Err(Error::UnsupportedExpression {
            detail: format!("private-use annotation '{}{}'", opaque.sigil, opaque.body),
        }),
        Some(Annotation::Reserved(opaque)) => Err(Error::UnsupportedExpression {
            detail: format!("reserved annotation '{}{}'", opaque.sigil, opaque.body),
        }),
    }
}

fn resolve_operand(operand: &Operand, ctx: &ExecContext<'_>) -> Result<ResolvedValue, Error> {
    match operand {
        Operand::Literal(literal) => Ok(ResolvedValue::new(literal_value(literal))),
        Operand::Variable(variable) => {
            ctx.lookup(variable.name())
                .ok_or_else(|| Error::UnresolvedVariable {
                    name: variable.name().to_string(),
                })
        }
    }
}

/// Quoted and name literals are strings; number literals are numbers.
fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::Unquoted(Unquoted::Number(digits)) => {
            parse_number(digits).unwrap_or_else(|| Value::String(digits.clone()))
        }
        Literal::Quoted(_) | Literal::Unquoted(Unquoted::Name(_)) => {
            Value::String(literal.as_str().to_string())
        }
    }
}

/// Reject an annotation naming an option twice, before any operand or
/// option value is resolved.
fn check_duplicate_options(function: &Function) -> Result<(), Error> {
    let mut seen = BTreeSet::new();
    for option in &function.options {
        let name = option.identifier.to_string();
        if seen.contains(&name) {
            return Err(Error::DuplicateOptionName {
                function: function.identifier.to_string(),
                option: name,
            });
        }
        seen.insert(name);
    }
    Ok(())
}

fn resolve_options(
    function: &Function,
    ctx: &ExecContext<'_>,
) -> Result<BTreeMap<String, Value>, Error> {
    let mut options = BTreeMap::new();
    for option in &function.options {
        let value = resolve_operand(&option.value, ctx)?.into_value();
        options.insert(option.identifier.to_string(), value);
    }
    Ok(options)
}

fn produced_by(value: &ResolvedValue) -> &str {
    value.provenance().map_or("", |p| p.function.as_str())
}

/// Translate a registry error into the execution error taxonomy.
fn func_error(function: &str, error: FuncError, registry: &Registry) -> Error {
    let function = function.to_string();
    match error {
        FuncError::Unknown { name } => Error::UnknownFunction {
            suggestions: compute_suggestions(&name, &registry.names()),
            name,
        },
        FuncError::BadOperand(source) => Error::BadOperand { function, source },
        FuncError::BadOption(source) => Error::BadOption { function, source },
        FuncError::UnsupportedContext(Context::Select) | FuncError::NotSelectable => {
            Error::BadSelector {
                detail: format!("':{function}' cannot be used as a selector"),
            }
        }
        FuncError::UnsupportedContext(Context::Format) => Error::UnsupportedExpression {
            detail: format!("':{function}' cannot be used for formatting"),
        },
        FuncError::Locale(e) => Error::Formatting {
            function,
            message: e.to_string(),
        },
        FuncError::Failed(message) => Error::Formatting { function, message },
    }
}
