//! The `:datetime`, `:date` and `:time` functions.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

use crate::locale::{
    DateTimeFields, DateTimeFormat, DateTimeStyle, Locale, MonthWidth, NumericWidth, TextWidth,
};
use crate::registry::{
    Constraint, Contract, Func, FuncError, OperandError, OptionError, OptionSpec, Options,
    Requirement,
};
use crate::types::{ResolvedValue, Value};

const STYLES: [&str; 4] = ["full", "long", "medium", "short"];
const TEXT_WIDTHS: [&str; 3] = ["long", "short", "narrow"];
const NUMERIC_WIDTHS: [&str; 2] = ["numeric", "2-digit"];
const MONTH_WIDTHS: [&str; 5] = ["numeric", "2-digit", "long", "short", "narrow"];

const STYLE_OPTIONS: [&str; 2] = ["dateStyle", "timeStyle"];
const FIELD_OPTIONS: [&str; 8] = [
    "weekday", "year", "month", "day", "hour", "minute", "second", "hour12",
];

/// Parse a date string with the relaxed ISO-8601 profile.
///
/// Accepts RFC 3339, `YYYY-MM-DD[T| ]HH:MM[:SS[.fff]]` with an optional
/// `Z` or `±HH:MM` suffix, and bare `YYYY-MM-DD`. Values without an offset
/// are taken as UTC.
///
/// # Example
///
/// ```
/// use mf2::functions::parse_datetime;
///
/// let dt = parse_datetime("2024-03-15 09:30").unwrap();
/// assert_eq!(dt.to_rfc3339(), "2024-03-15T09:30:00+00:00");
/// assert!(parse_datetime("15/03/2024").is_none());
/// ```
pub fn parse_datetime(input: &str) -> Option<DateTime<FixedOffset>> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt);
    }

    let (local, offset) = split_offset(input)?;
    const PATTERNS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    let naive = PATTERNS
        .iter()
        .find_map(|pattern| NaiveDateTime::parse_from_str(local, pattern).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(local, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;
    naive.and_local_timezone(offset).single()
}

/// Split a trailing `Z` or `±HH:MM` from a date string.
fn split_offset(input: &str) -> Option<(&str, FixedOffset)> {
    let utc = FixedOffset::east_opt(0)?;
    if let Some(local) = input.strip_suffix('Z').or_else(|| input.strip_suffix('z')) {
        return Some((local, utc));
    }
    // Only look for a signed suffix after the time part, not the date dashes.
    if input.len() > 16 && input.is_char_boundary(input.len() - 6) {
        let (local, suffix) = input.split_at(input.len() - 6);
        if let Some(offset) = parse_offset(suffix) {
            return Some((local, offset));
        }
    }
    Some((input, utc))
}

/// Parse a time zone option: `UTC`, `Z` or `±HH:MM`.
pub(crate) fn parse_offset(zone: &str) -> Option<FixedOffset> {
    if zone.eq_ignore_ascii_case("utc") || zone == "Z" {
        return FixedOffset::east_opt(0);
    }
    let (sign, rest) = match zone.as_bytes().first()? {
        b'+' => (1, &zone[1..]),
        b'-' => (-1, &zone[1..]),
        _ => return None,
    };
    let (hours, minutes) = rest.split_once(':')?;
    let two_digits = |field: &str| field.len() == 2 && field.bytes().all(|b| b.is_ascii_digit());
    if !two_digits(hours) || !two_digits(minutes) {
        return None;
    }
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

fn check_operand(value: &Value) -> Result<(), OperandError> {
    match value {
        Value::DateTime(_) => Ok(()),
        Value::String(s) if parse_datetime(s).is_none() => {
            Err(OperandError::Invalid(format!("'{s}' is not an ISO 8601 date")))
        }
        Value::String(_) => Ok(()),
        other => Err(OperandError::WrongType {
            expected: "datetime".to_string(),
            received: other.kind(),
        }),
    }
}

fn keywords(allowed: &[&str]) -> OptionSpec {
    OptionSpec::one_of(allowed.iter().copied())
}

fn time_zone() -> OptionSpec {
    OptionSpec::builder()
        .default_value("UTC")
        .constraint(Constraint::custom(|value| match value {
            Value::String(zone) if parse_offset(zone).is_some() => Ok(()),
            other => Err(format!("'{other}' is not UTC, Z or ±HH:MM")),
        }))
        .build()
}

fn boolean() -> OptionSpec {
    OptionSpec::builder()
        .constraint(Constraint::custom(|value| match value {
            Value::Bool(_) => Ok(()),
            Value::String(s) if s == "true" || s == "false" => Ok(()),
            other => Err(format!("'{other}' is not a boolean")),
        }))
        .build()
}

fn style_option(name: &str, options: &Options) -> Result<Option<DateTimeStyle>, OptionError> {
    Ok(options
        .get_opt_string(name, &STYLES)?
        .map(|style| match style.as_str() {
            "full" => DateTimeStyle::Full,
            "long" => DateTimeStyle::Long,
            "short" => DateTimeStyle::Short,
            _ => DateTimeStyle::Medium,
        }))
}

fn numeric_option(name: &str, options: &Options) -> Result<Option<NumericWidth>, OptionError> {
    Ok(options
        .get_opt_string(name, &NUMERIC_WIDTHS)?
        .map(|width| match width.as_str() {
            "2-digit" => NumericWidth::TwoDigit,
            _ => NumericWidth::Numeric,
        }))
}

/// Read the `:datetime` options into a format, rejecting styles mixed with fields.
fn datetime_format(options: &Options) -> Result<DateTimeFormat, OptionError> {
    let styles: Vec<&str> = STYLE_OPTIONS
        .into_iter()
        .filter(|name| options.is_explicit(name))
        .collect();
    let fields: Vec<&str> = FIELD_OPTIONS
        .into_iter()
        .filter(|name| options.is_explicit(name))
        .collect();
    if !styles.is_empty() && !fields.is_empty() {
        return Err(OptionError::Conflict {
            options: styles.into_iter().chain(fields).map(str::to_string).collect(),
        });
    }

    if fields.is_empty() {
        let date = style_option("dateStyle", options)?;
        let time = style_option("timeStyle", options)?;
        return Ok(match (date, time) {
            (None, None) => DateTimeFormat::Styles {
                date: Some(DateTimeStyle::Medium),
                time: Some(DateTimeStyle::Short),
            },
            (date, time) => DateTimeFormat::Styles { date, time },
        });
    }

    let weekday = options
        .get_opt_string("weekday", &TEXT_WIDTHS)?
        .map(|width| match width.as_str() {
            "short" => TextWidth::Short,
            "narrow" => TextWidth::Narrow,
            _ => TextWidth::Long,
        });
    let month = options
        .get_opt_string("month", &MONTH_WIDTHS)?
        .map(|width| match width.as_str() {
            "2-digit" => MonthWidth::TwoDigit,
            "long" => MonthWidth::Long,
            "short" => MonthWidth::Short,
            "narrow" => MonthWidth::Narrow,
            _ => MonthWidth::Numeric,
        });
    let hour12 = if options.is_explicit("hour12") {
        Some(options.get_bool("hour12", false)?)
    } else {
        None
    };
    Ok(DateTimeFormat::Fields(DateTimeFields {
        weekday,
        year: numeric_option("year", options)?,
        month,
        day: numeric_option("day", options)?,
        hour: numeric_option("hour", options)?,
        minute: numeric_option("minute", options)?,
        second: numeric_option("second", options)?,
        hour12,
    }))
}

fn resolve(
    operand: Option<&ResolvedValue>,
    options: &Options,
    locale: &Locale,
    format: DateTimeFormat,
) -> Result<ResolvedValue, FuncError> {
    let operand = operand.ok_or(OperandError::Missing)?;
    let instant = match operand.value() {
        Value::DateTime(dt) => *dt,
        Value::String(s) => parse_datetime(s)
            .ok_or_else(|| OperandError::Invalid(format!("'{s}' is not an ISO 8601 date")))?,
        other => {
            return Err(OperandError::WrongType {
                expected: "datetime".to_string(),
                received: other.kind(),
            }
            .into());
        }
    };

    let zone = options.get_string("timeZone", "UTC", &[])?;
    let offset = parse_offset(&zone).ok_or_else(|| OptionError::Invalid {
        option: "timeZone".to_string(),
        reason: format!("'{zone}' is not UTC, Z or ±HH:MM"),
    })?;
    let shifted = instant.with_timezone(&offset);

    // Render once so locale failures surface at resolution.
    locale.format_datetime(&shifted, &format)?;
    let locale = locale.clone();
    Ok(ResolvedValue::new(shifted).with_formatter(move |value| {
        let dt = value
            .as_datetime()
            .ok_or_else(|| FuncError::Failed(format!("'{value}' is not a datetime")))?;
        Ok(locale.format_datetime(dt, &format)?)
    }))
}

/// The `:datetime` function.
///
/// Takes either `dateStyle`/`timeStyle` or individual field options; mixing
/// the two is a conflicting-options error. With neither, renders the medium
/// date and short time.
pub fn datetime_function() -> Func {
    let mut contract = Contract::new()
        .operand(Requirement::Required)
        .operand_validator(check_operand)
        .option("dateStyle", keywords(&STYLES))
        .option("timeStyle", keywords(&STYLES))
        .option("weekday", keywords(&TEXT_WIDTHS))
        .option("month", keywords(&MONTH_WIDTHS))
        .option("hour12", boolean())
        .option("timeZone", time_zone());
    for field in ["year", "day", "hour", "minute", "second"] {
        contract = contract.option(field, keywords(&NUMERIC_WIDTHS));
    }
    Func::new(|operand, options, locale| {
        let format = datetime_format(options)?;
        resolve(operand, options, locale, format)
    })
    .format_contract(contract)
}

fn single_style(default: &str, date: bool) -> Func {
    let contract = Contract::new()
        .operand(Requirement::Required)
        .operand_validator(check_operand)
        .option(
            "style",
            OptionSpec::builder()
                .default_value(default)
                .constraint(Constraint::one_of(STYLES))
                .build(),
        )
        .option("timeZone", time_zone());
    Func::new(move |operand, options, locale| {
        let style = style_option("style", options)?;
        let format = if date {
            DateTimeFormat::Styles {
                date: style,
                time: None,
            }
        } else {
            DateTimeFormat::Styles {
                date: None,
                time: style,
            }
        };
        resolve(operand, options, locale, format)
    })
    .format_contract(contract)
}

/// The `:date` function: a date in one `style` (default `medium`).
pub fn date_function() -> Func {
    single_style("medium", true)
}

/// The `:time` function: a time in one `style` (default `short`).
pub fn time_function() -> Func {
    single_style("short", false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_relaxed_iso_dates() {
        let parsed = |s: &str| parse_datetime(s).map(|dt| dt.to_rfc3339());
        assert_eq!(
            parsed("2024-03-15T09:30:00Z").as_deref(),
            Some("2024-03-15T09:30:00+00:00")
        );
        assert_eq!(
            parsed("2024-03-15T09:30:00+02:00").as_deref(),
            Some("2024-03-15T09:30:00+02:00")
        );
        assert_eq!(
            parsed("2024-03-15T09:30").as_deref(),
            Some("2024-03-15T09:30:00+00:00")
        );
        assert_eq!(
            parsed("2024-03-15 09:30-05:00").as_deref(),
            Some("2024-03-15T09:30:00-05:00")
        );
        assert_eq!(
            parsed("2024-03-15").as_deref(),
            Some("2024-03-15T00:00:00+00:00")
        );
        assert_eq!(parsed("March 15"), None);
        assert_eq!(parsed("2024-13-01"), None);
    }

    #[test]
    fn parses_time_zone_options() {
        assert_eq!(parse_offset("UTC").map(|o| o.local_minus_utc()), Some(0));
        assert_eq!(parse_offset("Z").map(|o| o.local_minus_utc()), Some(0));
        assert_eq!(
            parse_offset("+05:30").map(|o| o.local_minus_utc()),
            Some(19_800)
        );
        assert_eq!(
            parse_offset("-08:00").map(|o| o.local_minus_utc()),
            Some(-28_800)
        );
        assert_eq!(parse_offset("Europe/Paris"), None);
        assert_eq!(parse_offset("+5:30"), None);
    }
}
