//! Canonical serialization of message ASTs.
//!
//! Expressions render as `{operand annotation}` with single spaces, each
//! declaration ends with a newline, and matcher variants go on their own
//! lines. Serializing a parsed canonical message reproduces its source.

use std::fmt::{Display, Formatter, Result as FmtResult, Write};

use mf2_syntax::{escape_quoted, escape_text, is_whitespace};

use super::ast::*;

impl Message {
    /// Render the message in canonical syntax.
    pub fn serialize(&self) -> String {
        self.to_string()
    }
}

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Message::Simple(pattern) if reads_as_complex(pattern) => {
                write_quoted_pattern(f, pattern)
            }
            Message::Simple(pattern) => write_pattern(f, pattern),
            Message::Complex(complex) => {
                for declaration in &complex.declarations {
                    writeln!(f, "{declaration}")?;
                }
                match &complex.body {
                    ComplexBody::QuotedPattern(pattern) => write_quoted_pattern(f, pattern),
                    ComplexBody::Matcher(matcher) => write!(f, "{matcher}"),
                }
            }
        }
    }
}

/// A simple message starting with `.` would be re-read as a complex message.
/// Leading text may be split over several nodes.
fn reads_as_complex(pattern: &[Pattern]) -> bool {
    for part in pattern {
        let Pattern::Text(text) = part else {
            return false;
        };
        let rest = text.trim_start_matches(is_whitespace);
        if !rest.is_empty() {
            return rest.starts_with('.');
        }
    }
    false
}

fn write_pattern(f: &mut Formatter<'_>, pattern: &[Pattern]) -> FmtResult {
    for part in pattern {
        match part {
            Pattern::Text(text) => f.write_str(&escape_text(text))?,
            Pattern::Placeholder(expression) => write!(f, "{expression}")?,
        }
    }
    Ok(())
}

fn write_quoted_pattern(f: &mut Formatter<'_>, pattern: &[Pattern]) -> FmtResult {
    f.write_str("{{")?;
    write_pattern(f, pattern)?;
    f.write_str("}}")
}

impl Display for Declaration {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Declaration::Input(input) => {
                write!(f, ".input {{{}", input.variable)?;
                if let Some(annotation) = &input.annotation {
                    write!(f, " {annotation}")?;
                }
                f.write_char('}')
            }
            Declaration::Local(local) => {
                write!(f, ".local {} = {}", local.variable, local.expression)
            }
            Declaration::Reserved(statement) => {
                write!(f, ".{}", statement.keyword)?;
                if !statement.body.is_empty() {
                    write!(f, " {}", statement.body)?;
                }
                for expression in &statement.expressions {
                    write!(f, " {expression}")?;
                }
                Ok(())
            }
        }
    }
}

impl Display for Matcher {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(".match")?;
        for selector in &self.selectors {
            write!(f, " {selector}")?;
        }
        for variant in &self.variants {
            f.write_char('\n')?;
            for key in &variant.keys {
                write!(f, "{key} ")?;
            }
            write_quoted_pattern(f, &variant.pattern)?;
        }
        Ok(())
    }
}

impl Display for VariantKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            VariantKey::Literal(literal) => write!(f, "{literal}"),
            VariantKey::Wildcard => f.write_char('*'),
        }
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_char('{')?;
        match (&self.operand, &self.annotation) {
            (Some(operand), Some(annotation)) => write!(f, "{operand} {annotation}")?,
            (Some(operand), None) => write!(f, "{operand}")?,
            (None, Some(annotation)) => write!(f, "{annotation}")?,
            (None, None) => {}
        }
        f.write_char('}')
    }
}

impl Display for Operand {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Operand::Literal(literal) => write!(f, "{literal}"),
            Operand::Variable(variable) => write!(f, "{variable}"),
        }
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "${}", self.0)
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Literal::Quoted(s) => write!(f, "|{}|", escape_quoted(s)),
            Literal::Unquoted(Unquoted::Name(s) | Unquoted::Number(s)) => f.write_str(s),
        }
    }
}

impl Display for Annotation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Annotation::Function(function) => write!(f, "{function}"),
            Annotation::PrivateUse(opaque) | Annotation::Reserved(opaque) => {
                write!(f, "{}{}", opaque.sigil, opaque.body)
            }
        }
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}{}", self.prefix.sigil(), self.identifier)?;
        for option in &self.options {
            write!(f, " {}={}", option.identifier, option.value)?;
        }
        Ok(())
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.namespace {
            Some(namespace) => write!(f, "{namespace}:{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}
