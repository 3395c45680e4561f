//! Public AST types for MF2 messages.
//!
//! These types are public to enable external tooling (linters, formatters, etc.).
//! Every node family is a closed enum, so adding a grammar production forces
//! an update everywhere the family is matched.

use serde::{Deserialize, Serialize};

/// A parsed message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Message {
    /// A message without declarations: just a pattern.
    Simple(Vec<Pattern>),
    /// A message with declarations and a body.
    Complex(ComplexMessage),
}

impl Default for Message {
    fn default() -> Self {
        Message::Simple(Vec::new())
    }
}

/// Declarations followed by a body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexMessage {
    pub declarations: Vec<Declaration>,
    pub body: ComplexBody,
}

/// One element of a pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Pattern {
    /// Literal text, unescaped.
    Text(String),
    /// An expression whose formatted result is inserted into the output.
    Placeholder(Expression),
}

/// An operand with an optional annotation: `{$count :number}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Expression {
    pub operand: Option<Operand>,
    pub annotation: Option<Annotation>,
}

/// A literal or a variable reference.
///
/// Used both as the operand of an expression and as the value of an option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operand {
    Literal(Literal),
    Variable(Variable),
}

/// A variable reference, stored without the `$` sigil.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variable(pub String);

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

/// A literal value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    /// `|quoted text|`, stored unescaped.
    Quoted(String),
    /// A bare name or number.
    Unquoted(Unquoted),
}

impl Literal {
    /// A quoted literal.
    pub fn quoted(s: impl Into<String>) -> Self {
        Literal::Quoted(s.into())
    }

    /// An unquoted name literal.
    pub fn name(s: impl Into<String>) -> Self {
        Literal::Unquoted(Unquoted::Name(s.into()))
    }

    /// An unquoted number literal, stored as its source text.
    pub fn number(s: impl Into<String>) -> Self {
        Literal::Unquoted(Unquoted::Number(s.into()))
    }

    /// The literal's content, without quoting or escapes.
    pub fn as_str(&self) -> &str {
        match self {
            Literal::Quoted(s) | Literal::Unquoted(Unquoted::Name(s) | Unquoted::Number(s)) => s,
        }
    }
}

/// Unquoted literal forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Unquoted {
    Name(String),
    Number(String),
}

/// The annotation attached to an expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Annotation {
    Function(Function),
    /// `^...` or `&...`; opaque and rejected at execution.
    PrivateUse(OpaqueAnnotation),
    /// Reserved for future syntax; opaque and rejected at execution.
    Reserved(OpaqueAnnotation),
}

/// The sigil and raw body of a private-use or reserved annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpaqueAnnotation {
    pub sigil: char,
    pub body: String,
}

/// A function annotation: `:number style=percent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub prefix: FunctionPrefix,
    pub identifier: Identifier,
    pub options: Vec<FunctionOption>,
}

impl Function {
    /// A `:name` function with no options.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            prefix: FunctionPrefix::Call,
            identifier: Identifier::new(name),
            options: Vec::new(),
        }
    }

    /// Appends an option.
    pub fn option(mut self, name: impl Into<String>, value: Operand) -> Self {
        self.options.push(FunctionOption {
            identifier: Identifier::new(name),
            value,
        });
        self
    }
}

/// The sigil of a function annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FunctionPrefix {
    /// `:` - a regular function call.
    Call,
    /// `+` - opens a markup span.
    Open,
    /// `-` - closes a markup span.
    Close,
}

impl FunctionPrefix {
    pub fn sigil(self) -> char {
        match self {
            FunctionPrefix::Call => ':',
            FunctionPrefix::Open => '+',
            FunctionPrefix::Close => '-',
        }
    }

    pub fn from_sigil(c: char) -> Option<Self> {
        match c {
            ':' => Some(FunctionPrefix::Call),
            '+' => Some(FunctionPrefix::Open),
            '-' => Some(FunctionPrefix::Close),
            _ => None,
        }
    }
}

/// A name with an optional namespace: `ns:name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier {
    pub namespace: Option<String>,
    pub name: String,
}

impl Identifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            name: name.into(),
        }
    }

    pub fn namespaced(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            name: name.into(),
        }
    }
}

/// A function option: `name=value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionOption {
    pub identifier: Identifier,
    pub value: Operand,
}

/// A statement before the body of a complex message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Declaration {
    /// `.input {$x :fn}`
    Input(InputDeclaration),
    /// `.local $x = {expr}`
    Local(LocalDeclaration),
    /// `.keyword ...`; opaque and rejected at execution.
    Reserved(ReservedStatement),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputDeclaration {
    pub variable: Variable,
    pub annotation: Option<Annotation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalDeclaration {
    pub variable: Variable,
    pub expression: Expression,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservedStatement {
    /// Keyword without the leading `.`.
    pub keyword: String,
    /// Raw body between the keyword and the first expression.
    pub body: String,
    pub expressions: Vec<Expression>,
}

/// The body of a complex message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ComplexBody {
    /// `{{pattern}}`
    QuotedPattern(Vec<Pattern>),
    /// `.match {sel} ... key {{pattern}} ...`
    Matcher(Matcher),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matcher {
    pub selectors: Vec<Expression>,
    pub variants: Vec<Variant>,
}

/// One key per selector, guarding a pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub keys: Vec<VariantKey>,
    pub pattern: Vec<Pattern>,
}

impl Variant {
    /// Number of wildcard keys; fewer means more specific.
    pub fn wildcard_count(&self) -> usize {
        self.keys
            .iter()
            .filter(|key| matches!(key, VariantKey::Wildcard))
            .count()
    }

    /// True if every key is `*`.
    pub fn is_fallback(&self) -> bool {
        self.keys
            .iter()
            .all(|key| matches!(key, VariantKey::Wildcard))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VariantKey {
    Literal(Literal),
    /// `*`, matches anything.
    Wildcard,
}
