//! The `:number` and `:integer` functions.

use std::ops::RangeInclusive;

use mf2_syntax::is_plural_category;

use crate::locale::{DecimalNumber, Grouping, Locale, NumberFormat, NumberStyle, PluralKind};
use crate::registry::{
    Constraint, Contract, Func, FuncError, OperandError, OptionError, OptionSpec, Options,
    Requirement, int_value,
};
use crate::types::{ResolvedValue, Value};

const STYLES: [&str; 2] = ["decimal", "percent"];
const SIGN_DISPLAYS: [&str; 5] = ["auto", "always", "exceptZero", "never", "negative"];
const GROUPINGS: [&str; 4] = ["auto", "always", "never", "min2"];
const SELECTS: [&str; 3] = ["plural", "ordinal", "exact"];

/// When to show a sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SignDisplay {
    /// Negative numbers, including negatives that round to zero (`-0`).
    Auto,
    Always,
    ExceptZero,
    Never,
    /// Negative numbers only, never on zero.
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SelectMode {
    Plural,
    Ordinal,
    Exact,
}

/// Everything the formatter and selector of one resolution need.
#[derive(Debug, Clone)]
struct NumberSettings {
    format: NumberFormat,
    sign: SignDisplay,
    select: SelectMode,
}

impl NumberSettings {
    fn from_options(options: &Options, integer: bool) -> Result<Self, OptionError> {
        let style = match options.get_string("style", "decimal", &STYLES)?.as_str() {
            "percent" => NumberStyle::Percent,
            _ => NumberStyle::Decimal,
        };
        let sign = match options.get_string("signDisplay", "auto", &SIGN_DISPLAYS)?.as_str() {
            "always" => SignDisplay::Always,
            "exceptZero" => SignDisplay::ExceptZero,
            "never" => SignDisplay::Never,
            "negative" => SignDisplay::Negative,
            _ => SignDisplay::Auto,
        };
        let grouping = match options.get_string("useGrouping", "auto", &GROUPINGS)?.as_str() {
            "always" => Grouping::Always,
            "never" => Grouping::Never,
            "min2" => Grouping::Min2,
            _ => Grouping::Auto,
        };
        let select = match options.get_string("select", "plural", &SELECTS)?.as_str() {
            "ordinal" => SelectMode::Ordinal,
            "exact" => SelectMode::Exact,
            _ => SelectMode::Plural,
        };
        let digit_bound = |name: &str, range: RangeInclusive<i64>| -> Result<Option<usize>, OptionError> {
            Ok(options
                .get_opt_int(name, range)?
                .map(|n| usize::try_from(n).unwrap_or(0)))
        };

        let (minimum_fraction_digits, maximum_fraction_digits) = if integer {
            (Some(0), Some(0))
        } else {
            (
                digit_bound("minimumFractionDigits", 0..=20)?,
                digit_bound("maximumFractionDigits", 0..=20)?,
            )
        };
        let format = NumberFormat {
            style,
            minimum_integer_digits: digit_bound("minimumIntegerDigits", 1..=21)?.unwrap_or(1),
            minimum_fraction_digits,
            maximum_fraction_digits,
            minimum_significant_digits: digit_bound("minimumSignificantDigits", 1..=21)?,
            maximum_significant_digits: digit_bound("maximumSignificantDigits", 1..=21)?,
            grouping,
        };
        Ok(Self {
            format,
            sign,
            select,
        })
    }

    fn format(&self, locale: &Locale, value: &Value) -> Result<String, FuncError> {
        let n = number(value)?;
        let rendered = locale.format_number(&n, &self.format)?;
        let is_zero = self
            .format
            .render_plain(&n)?
            .bytes()
            .all(|b| matches!(b, b'0' | b'.' | b'-'));
        Ok(apply_sign(rendered, self.sign, is_zero))
    }

    fn select(
        &self,
        locale: &Locale,
        value: &Value,
        keys: &[String],
    ) -> Result<Option<String>, FuncError> {
        let n = number(value)?;
        let exact = self.select == SelectMode::Exact || keys.iter().any(|k| !is_plural_category(k));
        if exact {
            let formatted = self.format(locale, value)?;
            let plain = self.format.render_plain(&n)?;
            return Ok(keys
                .iter()
                .find(|k| **k == formatted)
                .or_else(|| keys.iter().find(|k| **k == plain))
                .cloned());
        }

        let kind = match self.select {
            SelectMode::Ordinal => PluralKind::Ordinal,
            _ => PluralKind::Cardinal,
        };
        let category = locale.plural_category(&self.format.render_plain(&n)?, kind)?;
        Ok(keys.iter().find(|k| *k == category.as_str()).cloned())
    }
}

/// Apply a sign display policy to a rendered number.
fn apply_sign(rendered: String, sign: SignDisplay, is_zero: bool) -> String {
    let negative = rendered.starts_with('-');
    match sign {
        SignDisplay::Auto => rendered,
        SignDisplay::Negative if is_zero => rendered.trim_start_matches('-').to_string(),
        SignDisplay::Negative => rendered,
        SignDisplay::Always if !negative => format!("+{rendered}"),
        SignDisplay::ExceptZero if is_zero => rendered.trim_start_matches('-').to_string(),
        SignDisplay::ExceptZero if !negative => format!("+{rendered}"),
        SignDisplay::Never => rendered.trim_start_matches('-').to_string(),
        SignDisplay::Always | SignDisplay::ExceptZero => rendered,
    }
}

/// Read a numeric value exactly: integers digit for digit, number-literal
/// strings as written.
fn number(value: &Value) -> Result<DecimalNumber, FuncError> {
    match value {
        Value::Int(n) => Ok(DecimalNumber::from(*n)),
        Value::Float(f) => Ok(DecimalNumber::from_f64(*f)?),
        Value::String(s) => DecimalNumber::from_literal(s)
            .ok_or_else(|| FuncError::Failed(format!("'{s}' is not a number"))),
        other => Err(FuncError::Failed(format!("'{other}' is not a number"))),
    }
}

fn check_operand(value: &Value) -> Result<(), OperandError> {
    match value {
        Value::Int(_) | Value::Float(_) => Ok(()),
        Value::String(s) if value.to_number().is_none() => {
            Err(OperandError::Invalid(format!("'{s}' is not a number")))
        }
        Value::String(_) => Ok(()),
        other => Err(OperandError::WrongType {
            expected: "number".to_string(),
            received: other.kind(),
        }),
    }
}

fn digits(range: RangeInclusive<i64>) -> OptionSpec {
    OptionSpec::builder()
        .constraint(Constraint::custom(move |value| match int_value(value) {
            Some(n) if range.contains(&n) => Ok(()),
            Some(n) => Err(format!(
                "{n} is outside {}..={}",
                range.start(),
                range.end()
            )),
            None => Err(format!("expected an integer, got {}", value.kind())),
        }))
        .build()
}

fn keyword(default: &str, allowed: &[&str]) -> OptionSpec {
    OptionSpec::builder()
        .default_value(default)
        .constraint(Constraint::one_of(allowed.iter().copied()))
        .build()
}

fn contract() -> Contract {
    Contract::new()
        .operand(Requirement::Required)
        .operand_validator(check_operand)
        .option("style", keyword("decimal", &STYLES))
        .option("signDisplay", keyword("auto", &SIGN_DISPLAYS))
        .option("useGrouping", keyword("auto", &GROUPINGS))
        .option("select", keyword("plural", &SELECTS))
        .option("minimumIntegerDigits", digits(1..=21))
        .option("minimumFractionDigits", digits(0..=20))
        .option("maximumFractionDigits", digits(0..=20))
        .option("minimumSignificantDigits", digits(1..=21))
        .option("maximumSignificantDigits", digits(1..=21))
}

fn build(integer: bool) -> Func {
    Func::new(move |operand, options, locale| {
        let operand = operand.ok_or(OperandError::Missing)?;
        let value = operand
            .value()
            .to_number()
            .ok_or_else(|| OperandError::Invalid(format!("'{}' is not a number", operand.value())))?;
        let settings = NumberSettings::from_options(options, integer)?;
        // Surface rounding errors at resolution rather than at output.
        settings.format.render_plain(&number(&value)?)?;

        let format_settings = settings.clone();
        let format_locale = locale.clone();
        let select_locale = locale.clone();
        Ok(ResolvedValue::new(value)
            .with_formatter(move |v| format_settings.format(&format_locale, v))
            .with_selector(move |v, keys| settings.select(&select_locale, v, keys)))
    })
    .format_contract(contract())
    .select_contract(contract())
    .inherit_options_from(["number", "integer"])
}

/// The `:number` function.
///
/// Formats and selects on numbers. Accepts numeric operands and strings
/// that are number literals.
///
/// Selection compares keys as exact strings when `select=exact` or when any
/// key is not a plural category name; otherwise it returns the plural
/// category of the rounded value (ordinal with `select=ordinal`).
pub fn number_function() -> Func {
    build(false)
}

/// The `:integer` function: `:number` rounded to whole numbers.
pub fn integer_function() -> Func {
    build(true)
}
