//! Message parser using winnow.
//!
//! Parses MF2 source text into a [`Message`]. Handles:
//! - Simple messages (a bare pattern) and complex messages (declarations + body)
//! - Text escapes `\\ \{ \}` and quoted-literal escapes `\\ \|`
//! - Function, private-use and reserved annotations
//! - `.input`, `.local` and reserved statements
//! - Quoted pattern bodies and `.match` matchers

use mf2_syntax::{
    INPUT_KEYWORD, LOCAL_KEYWORD, MATCH_KEYWORD, is_name_char, is_name_start,
    is_private_use_sigil, is_reserved_sigil, is_whitespace, needs_quoted_escape,
    needs_text_escape,
};
use winnow::ascii::{digit0, digit1};
use winnow::combinator::{alt, cut_err, not, opt, preceded, repeat, terminated};
use winnow::error::{ContextError, ErrMode, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{any, one_of, take_while};

use super::ast::*;
use super::error::ParseError;

/// Parse MF2 source text into a message AST.
///
/// The result is not validated; call [`Message::validate`] for structural checks.
pub fn parse_message(input: &str) -> Result<Message, ParseError> {
    let mut remaining = input;
    match message(&mut remaining) {
        Ok(m) => {
            if remaining.is_empty() {
                Ok(m)
            } else {
                let (line, column) = calculate_position(input, remaining);
                Err(ParseError::Syntax {
                    line,
                    column,
                    message: format!(
                        "unexpected character: '{}'",
                        remaining.chars().next().unwrap_or('?')
                    ),
                })
            }
        }
        Err(e) => {
            let (line, column) = calculate_position(input, remaining);
            if remaining.is_empty() {
                Err(ParseError::UnexpectedEof { line, column })
            } else {
                Err(ParseError::Syntax {
                    line,
                    column,
                    message: describe(e),
                })
            }
        }
    }
}

/// Calculate line and column from original input and remaining input.
fn calculate_position(original: &str, remaining: &str) -> (usize, usize) {
    let consumed = original.len() - remaining.len();
    let consumed_str = &original[..consumed];
    let line = consumed_str.chars().filter(|&c| c == '\n').count() + 1;
    let column = match consumed_str.rfind('\n') {
        Some(pos) => consumed_str[pos + 1..].chars().count() + 1,
        None => consumed_str.chars().count() + 1,
    };
    (line, column)
}

fn describe(err: ErrMode<ContextError>) -> String {
    let message = match err {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => e.to_string(),
        ErrMode::Incomplete(_) => String::new(),
    };
    if message.is_empty() {
        "unexpected input".to_string()
    } else {
        format!("parse error: {message}")
    }
}

/// A message is complex when its first non-whitespace characters are `.` or `{{`.
fn message(input: &mut &str) -> ModalResult<Message> {
    let rest = input.trim_start_matches(is_whitespace);
    if rest.starts_with('.') || rest.starts_with("{{") {
        complex_message.map(Message::Complex).parse_next(input)
    } else {
        pattern.map(Message::Simple).parse_next(input)
    }
}

// =============================================================================
// Patterns
// =============================================================================

/// Parse a pattern, merging adjacent text.
fn pattern(input: &mut &str) -> ModalResult<Vec<Pattern>> {
    let parts: Vec<Pattern> = repeat(0.., pattern_part).parse_next(input)?;
    Ok(merge_text(parts))
}

/// Merge adjacent Text parts into single parts.
fn merge_text(parts: Vec<Pattern>) -> Vec<Pattern> {
    let mut result = Vec::with_capacity(parts.len());

    for part in parts {
        match part {
            Pattern::Text(text) => {
                if let Some(Pattern::Text(prev)) = result.last_mut() {
                    prev.push_str(&text);
                } else {
                    result.push(Pattern::Text(text));
                }
            }
            other => result.push(other),
        }
    }

    result
}

fn pattern_part(input: &mut &str) -> ModalResult<Pattern> {
    alt((
        text_run.map(|s: &str| Pattern::Text(s.to_string())),
        text_escape.map(|c| Pattern::Text(c.to_string())),
        expression.map(Pattern::Placeholder),
    ))
    .parse_next(input)
}

fn text_run<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |c: char| !needs_text_escape(c)).parse_next(input)
}

/// Parse a text escape: `\\`, `\{` or `\}`.
fn text_escape(input: &mut &str) -> ModalResult<char> {
    preceded(
        '\\',
        cut_err(one_of(['\\', '{', '}'])).context(StrContext::Label("text escape")),
    )
    .parse_next(input)
}

// =============================================================================
// Expressions
// =============================================================================

/// Parse an expression: `{ operand? annotation? }`.
fn expression(input: &mut &str) -> ModalResult<Expression> {
    '{'.parse_next(input)?;
    cut_err(expression_body).parse_next(input)
}

fn expression_body(input: &mut &str) -> ModalResult<Expression> {
    ws(input)?;
    let operand = opt(operand).parse_next(input)?;
    let annotation = match operand {
        Some(_) => opt(preceded(ws, annotation)).parse_next(input)?,
        None => Some(
            annotation
                .context(StrContext::Label("expression"))
                .context(StrContext::Expected(StrContextValue::Description(
                    "operand or annotation",
                )))
                .parse_next(input)?,
        ),
    };
    ws(input)?;
    '}'.context(StrContext::Expected(StrContextValue::CharLiteral('}')))
        .parse_next(input)?;
    Ok(Expression {
        operand,
        annotation,
    })
}

fn operand(input: &mut &str) -> ModalResult<Operand> {
    alt((
        variable.map(Operand::Variable),
        literal.map(Operand::Literal),
    ))
    .parse_next(input)
}

/// Parse a variable: `$name`.
fn variable(input: &mut &str) -> ModalResult<Variable> {
    preceded(
        '$',
        cut_err(name).context(StrContext::Label("variable name")),
    )
    .map(Variable)
    .parse_next(input)
}

/// Parse a literal. An unquoted token is a number only when the whole
/// token is a number literal, so `2-digit` stays one name literal.
fn literal(input: &mut &str) -> ModalResult<Literal> {
    alt((
        quoted.map(Literal::Quoted),
        terminated(number_literal, not(one_of(is_name_char))).map(Literal::number),
        unquoted_name.map(Literal::name),
    ))
    .parse_next(input)
}

fn unquoted_name(input: &mut &str) -> ModalResult<String> {
    (
        one_of(|c: char| is_name_start(c) || c.is_ascii_digit()),
        take_while(0.., is_name_char),
    )
        .take()
        .map(ToString::to_string)
        .parse_next(input)
}

/// Parse a quoted literal: `|text|` with `\\` and `\|` escapes.
fn quoted(input: &mut &str) -> ModalResult<String> {
    '|'.parse_next(input)?;
    cut_err(terminated(
        repeat(
            0..,
            alt((
                take_while(1.., |c: char| !needs_quoted_escape(c)),
                preceded('\\', one_of(['\\', '|']).take()),
            )),
        ),
        '|'.context(StrContext::Expected(StrContextValue::CharLiteral('|'))),
    ))
    .parse_next(input)
}

/// Parse a number literal, returning its source text.
fn number_literal<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        opt('-'),
        alt(('0'.void(), (one_of('1'..='9'), digit0).void())),
        opt(('.', digit1)),
        opt((one_of(['e', 'E']), opt(one_of(['+', '-'])), digit1)),
    )
        .take()
        .parse_next(input)
}

/// Parse a name: name-start followed by name-chars.
fn name(input: &mut &str) -> ModalResult<String> {
    (one_of(is_name_start), take_while(0.., is_name_char))
        .take()
        .map(ToString::to_string)
        .parse_next(input)
}

/// Parse an identifier: `name` or `namespace:name`.
fn identifier(input: &mut &str) -> ModalResult<Identifier> {
    (name, opt(preceded(':', name)))
        .map(|(first, second)| match second {
            Some(name) => Identifier {
                namespace: Some(first),
                name,
            },
            None => Identifier {
                namespace: None,
                name: first,
            },
        })
        .parse_next(input)
}

// =============================================================================
// Annotations
// =============================================================================

fn annotation(input: &mut &str) -> ModalResult<Annotation> {
    alt((
        function.map(Annotation::Function),
        private_use.map(Annotation::PrivateUse),
        reserved.map(Annotation::Reserved),
    ))
    .parse_next(input)
}

/// Parse a function annotation: `:name opt=value ...`.
fn function(input: &mut &str) -> ModalResult<Function> {
    let prefix = any.verify_map(FunctionPrefix::from_sigil).parse_next(input)?;
    let identifier = cut_err(identifier)
        .context(StrContext::Label("function name"))
        .parse_next(input)?;
    let options: Vec<FunctionOption> = repeat(0.., preceded(s, option)).parse_next(input)?;
    Ok(Function {
        prefix,
        identifier,
        options,
    })
}

/// Parse an option: `name = value`.
fn option(input: &mut &str) -> ModalResult<FunctionOption> {
    let identifier = identifier(input)?;
    (ws, '=', ws).parse_next(input)?;
    let value = cut_err(operand)
        .context(StrContext::Label("option value"))
        .parse_next(input)?;
    Ok(FunctionOption { identifier, value })
}

fn private_use(input: &mut &str) -> ModalResult<OpaqueAnnotation> {
    let sigil = any.verify(|c: &char| is_private_use_sigil(*c)).parse_next(input)?;
    let body = reserved_body(input)?;
    Ok(OpaqueAnnotation { sigil, body })
}

fn reserved(input: &mut &str) -> ModalResult<OpaqueAnnotation> {
    let sigil = any.verify(|c: &char| is_reserved_sigil(*c)).parse_next(input)?;
    let body = reserved_body(input)?;
    Ok(OpaqueAnnotation { sigil, body })
}

/// Parse the raw body of a reserved construct, up to the next `{` or `}`.
fn reserved_body(input: &mut &str) -> ModalResult<String> {
    let body: String = repeat(
        0..,
        alt((
            take_while(1.., |c: char| !matches!(c, '\\' | '{' | '}' | '|')),
            ('\\', one_of(['\\', '{', '|', '}'])).take(),
            quoted.take(),
        )),
    )
    .parse_next(input)?;
    Ok(body.trim_end_matches(is_whitespace).to_string())
}

// =============================================================================
// Complex messages
// =============================================================================

fn complex_message(input: &mut &str) -> ModalResult<ComplexMessage> {
    ws(input)?;
    let declarations: Vec<Declaration> =
        repeat(0.., terminated(declaration, ws)).parse_next(input)?;
    let body = complex_body(input)?;
    ws(input)?;
    Ok(ComplexMessage { declarations, body })
}

/// Parse a declaration; backtracks on `.match` so the body parser can take it.
fn declaration(input: &mut &str) -> ModalResult<Declaration> {
    let keyword = preceded('.', name)
        .verify(|k: &str| k != MATCH_KEYWORD)
        .parse_next(input)?;
    match keyword.as_str() {
        INPUT_KEYWORD => cut_err(input_declaration)
            .map(Declaration::Input)
            .parse_next(input),
        LOCAL_KEYWORD => cut_err(local_declaration)
            .map(Declaration::Local)
            .parse_next(input),
        _ => cut_err(|i: &mut &str| reserved_statement(i, keyword.clone()))
            .map(Declaration::Reserved)
            .parse_next(input),
    }
}

/// Parse the rest of `.input {$name annotation?}`.
fn input_declaration(input: &mut &str) -> ModalResult<InputDeclaration> {
    (ws, '{', ws).parse_next(input)?;
    let variable = variable
        .context(StrContext::Expected(StrContextValue::CharLiteral('$')))
        .parse_next(input)?;
    let annotation = opt(preceded(ws, annotation)).parse_next(input)?;
    ws(input)?;
    '}'.context(StrContext::Expected(StrContextValue::CharLiteral('}')))
        .parse_next(input)?;
    Ok(InputDeclaration {
        variable,
        annotation,
    })
}

/// Parse the rest of `.local $name = {expression}`.
fn local_declaration(input: &mut &str) -> ModalResult<LocalDeclaration> {
    s(input)?;
    let variable = variable
        .context(StrContext::Expected(StrContextValue::CharLiteral('$')))
        .parse_next(input)?;
    (ws, '=', ws)
        .context(StrContext::Expected(StrContextValue::CharLiteral('=')))
        .parse_next(input)?;
    let expression = expression
        .context(StrContext::Expected(StrContextValue::CharLiteral('{')))
        .parse_next(input)?;
    Ok(LocalDeclaration {
        variable,
        expression,
    })
}

fn reserved_statement(input: &mut &str, keyword: String) -> ModalResult<ReservedStatement> {
    let body = reserved_body(input)?;
    // The statement's expressions end where the quoted body begins.
    let expressions: Vec<Expression> = repeat(1.., preceded((ws, not("{{")), expression))
        .context(StrContext::Expected(StrContextValue::CharLiteral('{')))
        .parse_next(input)?;
    Ok(ReservedStatement {
        keyword,
        body: body.trim_start_matches(is_whitespace).to_string(),
        expressions,
    })
}

fn complex_body(input: &mut &str) -> ModalResult<ComplexBody> {
    alt((
        quoted_pattern.map(ComplexBody::QuotedPattern),
        matcher.map(ComplexBody::Matcher),
    ))
    .context(StrContext::Expected(StrContextValue::Description(
        "quoted pattern or .match",
    )))
    .parse_next(input)
}

/// Parse a quoted pattern: `{{pattern}}`.
fn quoted_pattern(input: &mut &str) -> ModalResult<Vec<Pattern>> {
    "{{".parse_next(input)?;
    cut_err(terminated(
        pattern,
        "}}".context(StrContext::Expected(StrContextValue::StringLiteral("}}"))),
    ))
    .parse_next(input)
}

/// Parse a matcher: `.match {sel}+ variant+`.
fn matcher(input: &mut &str) -> ModalResult<Matcher> {
    ('.', MATCH_KEYWORD).parse_next(input)?;
    cut_err(matcher_body).parse_next(input)
}

fn matcher_body(input: &mut &str) -> ModalResult<Matcher> {
    let selectors: Vec<Expression> = repeat(1.., preceded(ws, expression))
        .context(StrContext::Label("selector"))
        .parse_next(input)?;
    let variants: Vec<Variant> = repeat(1.., preceded(ws, variant))
        .context(StrContext::Label("variant"))
        .parse_next(input)?;
    Ok(Matcher {
        selectors,
        variants,
    })
}

/// Parse a variant: `key key ... {{pattern}}`.
fn variant(input: &mut &str) -> ModalResult<Variant> {
    let first = key(input)?;
    let rest: Vec<VariantKey> = repeat(0.., preceded(s, key)).parse_next(input)?;
    ws(input)?;
    let pattern = cut_err(quoted_pattern)
        .context(StrContext::Expected(StrContextValue::StringLiteral("{{")))
        .parse_next(input)?;
    let mut keys = Vec::with_capacity(rest.len() + 1);
    keys.push(first);
    keys.extend(rest);
    Ok(Variant { keys, pattern })
}

fn key(input: &mut &str) -> ModalResult<VariantKey> {
    alt((
        '*'.value(VariantKey::Wildcard),
        literal.map(VariantKey::Literal),
    ))
    .parse_next(input)
}

// =============================================================================
// Whitespace
// =============================================================================

/// Parse required whitespace.
fn s(input: &mut &str) -> ModalResult<()> {
    take_while(1.., is_whitespace).void().parse_next(input)
}

/// Parse optional whitespace.
fn ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., is_whitespace).void().parse_next(input)
}
