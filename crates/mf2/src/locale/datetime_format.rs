//! Date and time rendering for the default locale provider.

use std::fmt::Write;

use bon::Builder;
use chrono::{DateTime, FixedOffset};

use super::LocaleError;

/// A predefined date or time length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateTimeStyle {
    Full,
    Long,
    Medium,
    Short,
}

/// Width of a named field (weekday).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextWidth {
    Long,
    Short,
    Narrow,
}

/// Width of a numeric field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericWidth {
    Numeric,
    TwoDigit,
}

/// Width of the month field, which may be numeric or named.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthWidth {
    Numeric,
    TwoDigit,
    Long,
    Short,
    Narrow,
}

/// Individually chosen date and time fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Builder)]
pub struct DateTimeFields {
    pub weekday: Option<TextWidth>,
    pub year: Option<NumericWidth>,
    pub month: Option<MonthWidth>,
    pub day: Option<NumericWidth>,
    pub hour: Option<NumericWidth>,
    pub minute: Option<NumericWidth>,
    pub second: Option<NumericWidth>,
    /// Use a 12-hour clock; the language's convention when unset.
    pub hour12: Option<bool>,
}

impl DateTimeFields {
    /// Check whether no field is selected.
    pub fn is_empty(&self) -> bool {
        self.weekday.is_none()
            && self.year.is_none()
            && self.month.is_none()
            && self.day.is_none()
            && self.hour.is_none()
            && self.minute.is_none()
            && self.second.is_none()
    }
}

/// What to render: style lengths or individual fields.
///
/// # Example
///
/// ```
/// use chrono::DateTime;
/// use mf2::{DateTimeFormat, DateTimeStyle, Locale};
///
/// let dt = DateTime::parse_from_rfc3339("2024-03-15T15:45:00Z").unwrap();
/// let format = DateTimeFormat::Styles {
///     date: Some(DateTimeStyle::Medium),
///     time: Some(DateTimeStyle::Short),
/// };
/// assert_eq!(Locale::from("en").format_datetime(&dt, &format).unwrap(), "Mar 15, 2024, 3:45 PM");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateTimeFormat {
    Styles {
        date: Option<DateTimeStyle>,
        time: Option<DateTimeStyle>,
    },
    Fields(DateTimeFields),
}

/// Numeric field order of a language's dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Order {
    /// 3/15/24
    MonthDayYear,
    /// 15.03.24
    DayMonthYearDots,
    /// 15/03/2024
    DayMonthYearSlashes,
    /// 2024/03/15
    YearMonthDay,
}

fn order(lang: &str) -> Order {
    match lang {
        "en" => Order::MonthDayYear,
        "de" | "ru" | "pl" | "tr" | "uk" | "cs" | "sk" | "fi" | "nb" | "da" | "ro" => {
            Order::DayMonthYearDots
        }
        "ja" | "zh" | "ko" | "hu" | "lt" | "sv" => Order::YearMonthDay,
        _ => Order::DayMonthYearSlashes,
    }
}

fn uses_12_hour_clock(lang: &str) -> bool {
    matches!(lang, "en" | "hi" | "bn" | "ar")
}

fn render(value: &DateTime<FixedOffset>, pattern: &str) -> Result<String, LocaleError> {
    let mut out = String::new();
    write!(out, "{}", value.format(pattern))
        .map_err(|_| LocaleError::DateTime(format!("invalid pattern '{pattern}'")))?;
    Ok(out)
}

fn date_pattern(order: Order, style: DateTimeStyle) -> &'static str {
    match (style, order) {
        (DateTimeStyle::Full, Order::MonthDayYear) => "%A, %B %-d, %Y",
        (DateTimeStyle::Full, Order::YearMonthDay) => "%Y %B %-d, %A",
        (DateTimeStyle::Full, _) => "%A, %-d %B %Y",
        (DateTimeStyle::Long, Order::MonthDayYear) => "%B %-d, %Y",
        (DateTimeStyle::Long, Order::YearMonthDay) => "%Y %B %-d",
        (DateTimeStyle::Long, _) => "%-d %B %Y",
        (DateTimeStyle::Medium, Order::MonthDayYear) => "%b %-d, %Y",
        (DateTimeStyle::Medium, Order::YearMonthDay) => "%Y %b %-d",
        (DateTimeStyle::Medium, _) => "%-d %b %Y",
        (DateTimeStyle::Short, Order::MonthDayYear) => "%-m/%-d/%y",
        (DateTimeStyle::Short, Order::DayMonthYearDots) => "%d.%m.%y",
        (DateTimeStyle::Short, Order::DayMonthYearSlashes) => "%d/%m/%Y",
        (DateTimeStyle::Short, Order::YearMonthDay) => "%Y/%m/%d",
    }
}

fn time_pattern(value: &DateTime<FixedOffset>, hour12: bool, style: DateTimeStyle) -> String {
    let zone = if value.offset().local_minus_utc() == 0 {
        "UTC"
    } else {
        "%:z"
    };
    let (clock, suffix) = if hour12 {
        ("%-I", " %p")
    } else {
        ("%H", "")
    };
    match style {
        DateTimeStyle::Full | DateTimeStyle::Long => format!("{clock}:%M:%S{suffix} {zone}"),
        DateTimeStyle::Medium => format!("{clock}:%M:%S{suffix}"),
        DateTimeStyle::Short => format!("{clock}:%M{suffix}"),
    }
}

fn first_char(text: &str) -> String {
    text.chars().take(1).collect()
}

fn render_fields(
    lang: &str,
    value: &DateTime<FixedOffset>,
    fields: &DateTimeFields,
) -> Result<String, LocaleError> {
    let order = order(lang);
    let mut pieces = Vec::new();

    if let Some(width) = fields.weekday {
        pieces.push(match width {
            TextWidth::Long => render(value, "%A")?,
            TextWidth::Short => render(value, "%a")?,
            TextWidth::Narrow => first_char(&render(value, "%A")?),
        });
    }

    let year = fields
        .year
        .map(|w| match w {
            NumericWidth::Numeric => render(value, "%Y"),
            NumericWidth::TwoDigit => render(value, "%y"),
        })
        .transpose()?;
    let day = fields
        .day
        .map(|w| match w {
            NumericWidth::Numeric => render(value, "%-d"),
            NumericWidth::TwoDigit => render(value, "%d"),
        })
        .transpose()?;
    let (month, named_month) = match fields.month {
        None => (None, false),
        Some(MonthWidth::Numeric) => (Some(render(value, "%-m")?), false),
        Some(MonthWidth::TwoDigit) => (Some(render(value, "%m")?), false),
        Some(MonthWidth::Long) => (Some(render(value, "%B")?), true),
        Some(MonthWidth::Short) => (Some(render(value, "%b")?), true),
        Some(MonthWidth::Narrow) => (Some(first_char(&render(value, "%B")?)), true),
    };

    let date = if named_month {
        match order {
            Order::MonthDayYear => {
                let month_day = join([month, day], " ");
                match year {
                    Some(year) if !month_day.is_empty() => format!("{month_day}, {year}"),
                    Some(year) => year,
                    None => month_day,
                }
            }
            Order::YearMonthDay => join([year, month, day], " "),
            _ => join([day, month, year], " "),
        }
    } else {
        match order {
            Order::MonthDayYear => join([month, day, year], "/"),
            Order::DayMonthYearDots => join([day, month, year], "."),
            Order::DayMonthYearSlashes => join([day, month, year], "/"),
            Order::YearMonthDay => join([year, month, day], "/"),
        }
    };
    if !date.is_empty() {
        pieces.push(date);
    }

    let hour12 = fields.hour12.unwrap_or_else(|| uses_12_hour_clock(lang));
    let mut clock = Vec::new();
    if let Some(width) = fields.hour {
        clock.push(match (width, hour12) {
            (NumericWidth::Numeric, true) => "%-I",
            (NumericWidth::TwoDigit, true) => "%I",
            (NumericWidth::Numeric, false) => "%-H",
            (NumericWidth::TwoDigit, false) => "%H",
        });
    }
    if let Some(width) = fields.minute {
        clock.push(if clock.is_empty() && width == NumericWidth::Numeric {
            "%-M"
        } else {
            "%M"
        });
    }
    if let Some(width) = fields.second {
        clock.push(if clock.is_empty() && width == NumericWidth::Numeric {
            "%-S"
        } else {
            "%S"
        });
    }
    if !clock.is_empty() {
        let mut pattern = clock.join(":");
        if hour12 && fields.hour.is_some() {
            pattern.push_str(" %p");
        }
        pieces.push(render(value, &pattern)?);
    }

    Ok(pieces.join(", "))
}

fn join<const N: usize>(parts: [Option<String>; N], separator: &str) -> String {
    parts.into_iter().flatten().collect::<Vec<_>>().join(separator)
}

/// Render a date for a language.
pub(super) fn format(
    lang: &str,
    value: &DateTime<FixedOffset>,
    format: &DateTimeFormat,
) -> Result<String, LocaleError> {
    match format {
        DateTimeFormat::Styles { date, time } => {
            let mut pieces = Vec::new();
            if let Some(style) = date {
                pieces.push(render(value, date_pattern(order(lang), *style))?);
            }
            if let Some(style) = time {
                let pattern = time_pattern(value, uses_12_hour_clock(lang), *style);
                pieces.push(render(value, &pattern)?);
            }
            Ok(pieces.join(", "))
        }
        DateTimeFormat::Fields(fields) => render_fields(lang, value, fields),
    }
}
