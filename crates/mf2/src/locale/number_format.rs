//! Number rendering for the default locale provider.

use std::fmt::{Display, Formatter, Result as FmtResult};

use bon::Builder;
use mf2_syntax::is_number_literal;

use super::LocaleError;

/// Plain decimal or percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberStyle {
    #[default]
    Decimal,
    /// The value is multiplied by 100 and shown with the locale's percent sign.
    Percent,
}

/// When the integer part gets group separators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Grouping {
    /// The locale's convention.
    #[default]
    Auto,
    /// From four integer digits on.
    Always,
    /// From five integer digits on.
    Min2,
    Never,
}

/// How to round and lay out a number.
///
/// Significant-digit bounds, when either is set, take precedence over the
/// fraction-digit bounds.
///
/// # Example
///
/// ```
/// use mf2::{DecimalNumber, Locale, NumberFormat, NumberStyle};
///
/// let format = NumberFormat::builder()
///     .style(NumberStyle::Percent)
///     .maximum_fraction_digits(1)
///     .build();
/// let value = DecimalNumber::from_f64(0.1234).unwrap();
/// assert_eq!(Locale::from("en").format_number(&value, &format).unwrap(), "12.3%");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct NumberFormat {
    #[builder(default)]
    pub style: NumberStyle,
    #[builder(default = 1)]
    pub minimum_integer_digits: usize,
    pub minimum_fraction_digits: Option<usize>,
    pub maximum_fraction_digits: Option<usize>,
    pub minimum_significant_digits: Option<usize>,
    pub maximum_significant_digits: Option<usize>,
    #[builder(default)]
    pub grouping: Grouping,
}

impl Default for NumberFormat {
    fn default() -> Self {
        NumberFormat::builder().build()
    }
}

/// An exact decimal number: a sign, integer digits and fraction digits.
///
/// Integers convert without loss. Floats convert through their shortest
/// round-trip decimal form, so rounding works on the digits a reader
/// would write rather than on the binary value.
///
/// # Example
///
/// ```
/// use mf2::DecimalNumber;
///
/// assert_eq!(DecimalNumber::from(i64::MAX).to_string(), "9223372036854775807");
/// assert_eq!(DecimalNumber::from_f64(-0.1).unwrap().to_string(), "-0.1");
/// assert_eq!(DecimalNumber::from_literal("12.50").unwrap().to_string(), "12.5");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecimalNumber {
    negative: bool,
    /// No leading zeros except a lone `0`.
    integer: String,
    /// No trailing zeros.
    fraction: String,
}

impl DecimalNumber {
    /// Convert a float.
    ///
    /// # Errors
    ///
    /// Returns [`LocaleError::NonFinite`] for NaN and infinities.
    pub fn from_f64(value: f64) -> Result<Self, LocaleError> {
        if !value.is_finite() {
            return Err(LocaleError::NonFinite(value));
        }
        // `Display` for f64 never uses exponent notation.
        let text = value.abs().to_string();
        let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));
        Ok(Self::from_parts(value.is_sign_negative(), integer, fraction))
    }

    /// Parse a number literal such as `-12.50` or `1e3`.
    ///
    /// Literals without an exponent are read digit for digit; literals with
    /// one go through `f64`. Returns `None` for anything else.
    pub fn from_literal(literal: &str) -> Option<Self> {
        if !is_number_literal(literal) {
            return None;
        }
        if literal.contains(['e', 'E']) {
            return literal
                .parse::<f64>()
                .ok()
                .and_then(|f| Self::from_f64(f).ok());
        }
        let (negative, unsigned) = match literal.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, literal),
        };
        let (integer, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        Some(Self::from_parts(negative, integer, fraction))
    }

    fn from_parts(negative: bool, integer: &str, fraction: &str) -> Self {
        let mut number = Self {
            negative,
            integer: integer.to_string(),
            fraction: fraction.to_string(),
        };
        number.normalize();
        number
    }

    /// True for values below zero, and for negative zero.
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// True if every digit is zero.
    pub fn is_zero(&self) -> bool {
        self.first_nonzero().is_none()
    }

    fn normalize(&mut self) {
        let trimmed = self.integer.trim_start_matches('0');
        self.integer = if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed.to_string()
        };
        let kept = self.fraction.trim_end_matches('0').len();
        self.fraction.truncate(kept);
    }

    fn digits(&self) -> Vec<u8> {
        self.integer.bytes().chain(self.fraction.bytes()).collect()
    }

    /// Index into [`Self::digits`] of the first non-zero digit.
    fn first_nonzero(&self) -> Option<usize> {
        self.integer
            .bytes()
            .chain(self.fraction.bytes())
            .position(|b| b != b'0')
    }

    /// Multiply by 100.
    fn scale_by_hundred(&mut self) {
        while self.fraction.len() < 2 {
            self.fraction.push('0');
        }
        let rest = self.fraction.split_off(2);
        self.integer.push_str(&self.fraction);
        self.fraction = rest;
        self.normalize();
    }

    /// Round to `places` fraction digits, halves away from zero. Negative
    /// places round to tens, hundreds and so on.
    fn round_to(&mut self, places: i64) {
        let digits = self.digits();
        let mut point = self.integer.len();
        let keep = to_i64(point).saturating_add(places);
        if keep >= to_i64(digits.len()) {
            return;
        }
        let Ok(keep) = usize::try_from(keep) else {
            self.integer = "0".to_string();
            self.fraction.clear();
            return;
        };
        let mut head = digits[..keep].to_vec();
        if digits[keep] >= b'5' && increment(&mut head) {
            point += 1;
        }
        if head.len() < point {
            head.resize(point, b'0');
        }
        let (integer, fraction) = head.split_at(point);
        self.integer = ascii(integer);
        self.fraction = ascii(fraction);
        self.normalize();
    }

    /// Round to `max` significant digits and return how many fraction
    /// digits `min` significant digits need.
    fn round_significant(&mut self, min: usize, max: usize) -> usize {
        if let Some(first) = self.first_nonzero() {
            let places = to_i64(first) + to_i64(max) - to_i64(self.integer.len());
            self.round_to(places);
        }
        match self.first_nonzero() {
            Some(first) => (first + min).saturating_sub(self.integer.len()),
            None => min.saturating_sub(1),
        }
    }
}

impl From<i64> for DecimalNumber {
    fn from(value: i64) -> Self {
        Self::from_parts(value < 0, &value.unsigned_abs().to_string(), "")
    }
}

impl Display for DecimalNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if self.negative {
            f.write_str("-")?;
        }
        f.write_str(&self.integer)?;
        if !self.fraction.is_empty() {
            write!(f, ".{}", self.fraction)?;
        }
        Ok(())
    }
}

fn to_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn ascii(digits: &[u8]) -> String {
    digits.iter().copied().map(char::from).collect()
}

/// Add one in the last place. Returns true when a new leading digit was
/// needed, as in `99` -> `100`.
fn increment(digits: &mut Vec<u8>) -> bool {
    for digit in digits.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            return false;
        }
    }
    digits.insert(0, b'1');
    true
}

/// A rounded number split into its parts, before localization.
struct Digits {
    negative: bool,
    zero: bool,
    integer: String,
    fraction: String,
}

impl NumberFormat {
    /// Render `value` rounded as configured, with `.` as the decimal
    /// separator and no grouping. Zero never carries a sign here.
    ///
    /// This is the form plural rules and exact matching work on.
    ///
    /// # Errors
    ///
    /// Returns [`LocaleError::DigitBounds`] when a minimum exceeds its
    /// maximum.
    pub fn render_plain(&self, value: &DecimalNumber) -> Result<String, LocaleError> {
        let digits = self.digits(value)?;
        let mut out = String::new();
        if digits.negative && !digits.zero {
            out.push('-');
        }
        out.push_str(&digits.integer);
        if !digits.fraction.is_empty() {
            out.push('.');
            out.push_str(&digits.fraction);
        }
        Ok(out)
    }

    fn digits(&self, value: &DecimalNumber) -> Result<Digits, LocaleError> {
        let mut number = value.clone();
        if self.style == NumberStyle::Percent {
            number.scale_by_hundred();
        }

        let min_fraction = if self.minimum_significant_digits.is_some()
            || self.maximum_significant_digits.is_some()
        {
            let (min, max) = bounds(
                "significant",
                self.minimum_significant_digits,
                self.maximum_significant_digits,
                21,
            )?;
            number.round_significant(min.max(1), max.max(1))
        } else {
            let default_max = match self.style {
                NumberStyle::Decimal => 3,
                NumberStyle::Percent => 0,
            };
            let (min, max) = bounds(
                "fraction",
                self.minimum_fraction_digits,
                self.maximum_fraction_digits,
                default_max,
            )?;
            number.round_to(to_i64(max));
            min
        };

        let mut integer = number.integer.clone();
        while integer.len() < self.minimum_integer_digits {
            integer.insert(0, '0');
        }
        let mut fraction = number.fraction.clone();
        while fraction.len() < min_fraction {
            fraction.push('0');
        }
        Ok(Digits {
            negative: number.negative,
            zero: number.is_zero(),
            integer,
            fraction,
        })
    }
}

/// Resolve a minimum/maximum pair. A maximum left unset grows to the minimum.
fn bounds(
    kind: &str,
    min: Option<usize>,
    max: Option<usize>,
    default_max: usize,
) -> Result<(usize, usize), LocaleError> {
    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(LocaleError::DigitBounds(format!(
            "minimum {kind} digits {min} exceeds maximum {max}"
        ))),
        (min, Some(max)) => Ok((min.unwrap_or(0), max)),
        (min, None) => {
            let min = min.unwrap_or(0);
            Ok((min, default_max.max(min)))
        }
    }
}

/// Separators and percent placement of a language.
struct Symbols {
    decimal: char,
    group: char,
    min_grouping: usize,
    percent: Percent,
}

enum Percent {
    Suffix(&'static str),
    Prefix(&'static str),
}

impl Symbols {
    const fn new(decimal: char, group: char, min_grouping: usize, percent: Percent) -> Self {
        Self {
            decimal,
            group,
            min_grouping,
            percent,
        }
    }

    fn for_language(lang: &str) -> Self {
        const NBSP: char = '\u{a0}';
        const NNBSP: char = '\u{202f}';
        match lang {
            "de" | "da" | "id" | "nl" => Symbols::new(',', '.', 1, Percent::Suffix("\u{a0}%")),
            "es" => Symbols::new(',', '.', 2, Percent::Suffix("\u{a0}%")),
            "it" | "pt" | "ro" | "el" => Symbols::new(',', '.', 1, Percent::Suffix("%")),
            "fr" => Symbols::new(',', NNBSP, 1, Percent::Suffix("\u{a0}%")),
            "ru" | "uk" | "cs" | "sk" | "fi" | "nb" | "sv" => {
                Symbols::new(',', NBSP, 1, Percent::Suffix("\u{a0}%"))
            }
            "pl" => Symbols::new(',', NBSP, 2, Percent::Suffix("%")),
            "tr" => Symbols::new(',', '.', 1, Percent::Prefix("%")),
            _ => Symbols::new('.', ',', 1, Percent::Suffix("%")),
        }
    }
}

fn group_integer(integer: &str, separator: char, min_grouping: usize) -> String {
    if integer.len() < 3 + min_grouping {
        return integer.to_string();
    }
    let mut out = String::with_capacity(integer.len() * 2);
    let first = integer.len() % 3;
    for (i, c) in integer.chars().enumerate() {
        if i > 0 && i % 3 == first {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

/// Render a number for a language using the built-in symbol table.
///
/// Negative values that round to zero keep their sign (`-0`).
pub(super) fn format(
    lang: &str,
    value: &DecimalNumber,
    format: &NumberFormat,
) -> Result<String, LocaleError> {
    let digits = format.digits(value)?;
    let symbols = Symbols::for_language(lang);

    let integer = match format.grouping {
        Grouping::Never => digits.integer,
        Grouping::Always => group_integer(&digits.integer, symbols.group, 1),
        Grouping::Min2 => group_integer(&digits.integer, symbols.group, 2),
        Grouping::Auto => group_integer(&digits.integer, symbols.group, symbols.min_grouping),
    };
    let mut number = integer;
    if !digits.fraction.is_empty() {
        number.push(symbols.decimal);
        number.push_str(&digits.fraction);
    }

    let sign = if digits.negative { "-" } else { "" };
    Ok(match (format.style, symbols.percent) {
        (NumberStyle::Decimal, _) => format!("{sign}{number}"),
        (NumberStyle::Percent, Percent::Suffix(suffix)) => format!("{sign}{number}{suffix}"),
        (NumberStyle::Percent, Percent::Prefix(prefix)) => format!("{sign}{prefix}{number}"),
    })
}
