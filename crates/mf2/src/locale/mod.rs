//! Locale handling: the language tag a template formats for and the
//! provider that renders numbers, dates and plural categories.

mod datetime_format;
mod number_format;
mod plural;

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use mf2_syntax::PluralCategory;
use thiserror::Error;

pub use datetime_format::{
    DateTimeFields, DateTimeFormat, DateTimeStyle, MonthWidth, NumericWidth, TextWidth,
};
pub use number_format::{DecimalNumber, Grouping, NumberFormat, NumberStyle};
pub use plural::PluralKind;

/// An error from the locale provider.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocaleError {
    /// Plural rules could not be loaded for the locale.
    #[error("no plural rules for locale '{locale}': {message}")]
    PluralRules { locale: String, message: String },

    /// The number has no finite rendering.
    #[error("cannot format non-finite number {0}")]
    NonFinite(f64),

    /// The digit bounds contradict each other.
    #[error("invalid digit bounds: {0}")]
    DigitBounds(String),

    /// The date pattern could not be rendered.
    #[error("cannot format date: {0}")]
    DateTime(String),
}

/// Locale-aware rendering used by the built-in functions.
///
/// Implement this to plug in a full locale database. Implementations are
/// shared across threads.
pub trait LocaleProvider: Send + Sync {
    /// Render a number. `tag` is the locale's language tag.
    ///
    /// # Errors
    ///
    /// Returns a [`LocaleError`] when the number cannot be rendered.
    fn format_number(
        &self,
        tag: &str,
        value: &DecimalNumber,
        format: &NumberFormat,
    ) -> Result<String, LocaleError>;

    /// Render a date and time already shifted to the target offset.
    ///
    /// # Errors
    ///
    /// Returns a [`LocaleError`] when the value cannot be rendered.
    fn format_datetime(
        &self,
        tag: &str,
        value: &DateTime<FixedOffset>,
        format: &DateTimeFormat,
    ) -> Result<String, LocaleError>;

    /// Classify a number, given as its visible decimal digits (e.g. `1.0`).
    ///
    /// # Errors
    ///
    /// Returns a [`LocaleError`] when no rules exist for the locale.
    fn plural_category(
        &self,
        tag: &str,
        number: &str,
        kind: PluralKind,
    ) -> Result<PluralCategory, LocaleError>;
}

/// The provider used when none is configured.
///
/// Separators and grouping come from a small built-in table, plural rules
/// from CLDR data, and dates use English month and weekday names with a
/// per-language field order.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLocaleProvider;

impl LocaleProvider for DefaultLocaleProvider {
    fn format_number(
        &self,
        tag: &str,
        value: &DecimalNumber,
        format: &NumberFormat,
    ) -> Result<String, LocaleError> {
        number_format::format(&primary_language(tag), value, format)
    }

    fn format_datetime(
        &self,
        tag: &str,
        value: &DateTime<FixedOffset>,
        format: &DateTimeFormat,
    ) -> Result<String, LocaleError> {
        datetime_format::format(&primary_language(tag), value, format)
    }

    fn plural_category(
        &self,
        tag: &str,
        number: &str,
        kind: PluralKind,
    ) -> Result<PluralCategory, LocaleError> {
        plural::category(&primary_language(tag), number, kind)
    }
}

/// The locale a template formats for.
///
/// # Example
///
/// ```
/// use mf2::Locale;
///
/// let locale = Locale::from("pt-BR");
/// assert_eq!(locale.tag(), "pt-BR");
/// assert_eq!(locale.language(), "pt");
/// ```
#[derive(Clone)]
pub struct Locale {
    tag: String,
    provider: Arc<dyn LocaleProvider>,
}

impl Locale {
    /// A locale using the [`DefaultLocaleProvider`].
    pub fn new(tag: impl Into<String>) -> Self {
        Self::with_provider(tag, Arc::new(DefaultLocaleProvider))
    }

    /// A locale using a custom provider.
    pub fn with_provider(tag: impl Into<String>, provider: Arc<dyn LocaleProvider>) -> Self {
        Self {
            tag: tag.into(),
            provider,
        }
    }

    /// The full language tag, e.g. `en-US`.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The lowercase primary language subtag, e.g. `en`.
    pub fn language(&self) -> String {
        primary_language(&self.tag)
    }

    /// The rendering provider.
    pub fn provider(&self) -> &dyn LocaleProvider {
        self.provider.as_ref()
    }

    /// Render a number with this locale's provider.
    ///
    /// # Errors
    ///
    /// See [`LocaleProvider::format_number`].
    pub fn format_number(
        &self,
        value: &DecimalNumber,
        format: &NumberFormat,
    ) -> Result<String, LocaleError> {
        self.provider.format_number(&self.tag, value, format)
    }

    /// Render a date with this locale's provider.
    ///
    /// # Errors
    ///
    /// See [`LocaleProvider::format_datetime`].
    pub fn format_datetime(
        &self,
        value: &DateTime<FixedOffset>,
        format: &DateTimeFormat,
    ) -> Result<String, LocaleError> {
        self.provider.format_datetime(&self.tag, value, format)
    }

    /// Classify a number with this locale's plural rules.
    ///
    /// # Errors
    ///
    /// See [`LocaleProvider::plural_category`].
    pub fn plural_category(
        &self,
        number: &str,
        kind: PluralKind,
    ) -> Result<PluralCategory, LocaleError> {
        self.provider.plural_category(&self.tag, number, kind)
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale::new("en")
    }
}

impl From<&str> for Locale {
    fn from(tag: &str) -> Self {
        Locale::new(tag)
    }
}

impl From<String> for Locale {
    fn from(tag: String) -> Self {
        Locale::new(tag)
    }
}

impl Debug for Locale {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Locale")
            .field("tag", &self.tag)
            .finish_non_exhaustive()
    }
}

fn primary_language(tag: &str) -> String {
    tag.split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}
