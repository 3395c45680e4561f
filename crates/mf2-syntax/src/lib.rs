//! Shared MessageFormat 2 grammar tables.
//!
//! This crate centralizes the character classes, escaping rules and keyword
//! tables of the message syntax so that the parser, the validator, the
//! serializer and the built-in functions cannot drift apart.

use std::borrow::Cow;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Sigils that introduce a private-use annotation.
pub const PRIVATE_USE_SIGILS: &[char] = &['^', '&'];

/// Sigils that introduce a reserved annotation.
pub const RESERVED_SIGILS: &[char] = &['!', '@', '#', '%', '*', '<', '>', '/', '?', '~'];

/// Keyword of an input declaration (`.input`).
pub const INPUT_KEYWORD: &str = "input";

/// Keyword of a local declaration (`.local`).
pub const LOCAL_KEYWORD: &str = "local";

/// Keyword of a matcher (`.match`).
pub const MATCH_KEYWORD: &str = "match";

/// Returns true for the statement keywords that are not reserved statements.
pub fn is_keyword(name: &str) -> bool {
    matches!(name, INPUT_KEYWORD | LOCAL_KEYWORD | MATCH_KEYWORD)
}

/// Whitespace as the message grammar defines it.
pub fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | '\u{3000}')
}

/// Characters that may start a name.
pub fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic()
        || c == '_'
        || matches!(c,
            '\u{C0}'..='\u{D6}'
            | '\u{D8}'..='\u{F6}'
            | '\u{F8}'..='\u{2FF}'
            | '\u{370}'..='\u{37D}'
            | '\u{37F}'..='\u{1FFF}'
            | '\u{200C}'..='\u{200D}'
            | '\u{2070}'..='\u{218F}'
            | '\u{2C00}'..='\u{2FEF}'
            | '\u{3001}'..='\u{D7FF}'
            | '\u{F900}'..='\u{FDCF}'
            | '\u{FDF0}'..='\u{FFFD}'
            | '\u{10000}'..='\u{EFFFF}')
}

/// Characters that may continue a name.
pub fn is_name_char(c: char) -> bool {
    is_name_start(c)
        || c.is_ascii_digit()
        || matches!(c, '-' | '.' | '\u{B7}' | '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}')
}

/// Returns true if `s` is a well-formed name.
pub fn is_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if is_name_start(first) => chars.all(is_name_char),
        _ => false,
    }
}

/// Returns true if `s` is a well-formed unquoted literal: a number
/// literal, or a run of name characters starting with a name-start
/// character or a digit (`other`, `2-digit`).
pub fn is_unquoted_literal(s: &str) -> bool {
    if is_number_literal(s) {
        return true;
    }
    s.chars()
        .next()
        .is_some_and(|c| is_name_start(c) || c.is_ascii_digit())
        && s.chars().all(is_name_char)
}

/// Returns true if `s` is a number literal.
///
/// ```text
/// number-literal = ["-"] (%x30 / (%x31-39 *DIGIT)) ["." 1*DIGIT] [%i"e" ["-" / "+"] 1*DIGIT]
/// ```
pub fn is_number_literal(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;
    if bytes.first() == Some(&b'-') {
        i += 1;
    }
    match bytes.get(i) {
        Some(b'0') => i += 1,
        Some(b'1'..=b'9') => {
            while bytes.get(i).is_some_and(u8::is_ascii_digit) {
                i += 1;
            }
        }
        _ => return false,
    }
    if bytes.get(i) == Some(&b'.') {
        i += 1;
        let start = i;
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        if i == start {
            return false;
        }
    }
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let start = i;
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        if i == start {
            return false;
        }
    }
    i == bytes.len()
}

/// Returns true if `c` starts a private-use annotation.
pub fn is_private_use_sigil(c: char) -> bool {
    PRIVATE_USE_SIGILS.contains(&c)
}

/// Returns true if `c` starts a reserved annotation.
pub fn is_reserved_sigil(c: char) -> bool {
    RESERVED_SIGILS.contains(&c)
}

/// Characters that must be escaped in pattern text.
pub fn needs_text_escape(c: char) -> bool {
    matches!(c, '\\' | '{' | '}')
}

/// Characters that must be escaped inside a quoted literal.
pub fn needs_quoted_escape(c: char) -> bool {
    matches!(c, '\\' | '|')
}

/// Escapes `\`, `{` and `}` in pattern text.
pub fn escape_text(s: &str) -> Cow<'_, str> {
    escape_with(s, needs_text_escape)
}

/// Escapes `\` and `|` in the content of a quoted literal.
pub fn escape_quoted(s: &str) -> Cow<'_, str> {
    escape_with(s, needs_quoted_escape)
}

fn escape_with(s: &str, needs_escape: fn(char) -> bool) -> Cow<'_, str> {
    if !s.chars().any(needs_escape) {
        return Cow::Borrowed(s);
    }
    let mut escaped = String::with_capacity(s.len() + 4);
    for c in s.chars() {
        if needs_escape(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    Cow::Owned(escaped)
}

/// CLDR plural categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl PluralCategory {
    /// All categories in CLDR order.
    pub const ALL: [PluralCategory; 6] = [
        PluralCategory::Zero,
        PluralCategory::One,
        PluralCategory::Two,
        PluralCategory::Few,
        PluralCategory::Many,
        PluralCategory::Other,
    ];

    /// The keyword used for this category in variant keys.
    pub fn as_str(self) -> &'static str {
        match self {
            PluralCategory::Zero => "zero",
            PluralCategory::One => "one",
            PluralCategory::Two => "two",
            PluralCategory::Few => "few",
            PluralCategory::Many => "many",
            PluralCategory::Other => "other",
        }
    }
}

impl Display for PluralCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a plural category keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPluralCategory(pub String);

impl Display for UnknownPluralCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "unknown plural category '{}'", self.0)
    }
}

impl std::error::Error for UnknownPluralCategory {}

impl FromStr for PluralCategory {
    type Err = UnknownPluralCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PluralCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownPluralCategory(s.to_string()))
    }
}

/// Returns true if `key` is one of the six plural category keywords.
pub fn is_plural_category(key: &str) -> bool {
    key.parse::<PluralCategory>().is_ok()
}
