//! Tests for locales and locale providers.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use mf2::{
    DateTimeFormat, DecimalNumber, Locale, LocaleError, LocaleProvider, NumberFormat,
    PluralCategory, PluralKind, Template, bindings,
};

// =============================================================================
// Plural categories
// =============================================================================

#[test]
fn english_cardinal_categories() {
    let en = Locale::from("en-US");
    assert_eq!(en.plural_category("1", PluralKind::Cardinal).unwrap(), PluralCategory::One);
    assert_eq!(en.plural_category("0", PluralKind::Cardinal).unwrap(), PluralCategory::Other);
    assert_eq!(en.plural_category("1.0", PluralKind::Cardinal).unwrap(), PluralCategory::Other);
}

#[test]
fn english_ordinal_categories() {
    let en = Locale::default();
    assert_eq!(en.plural_category("2", PluralKind::Ordinal).unwrap(), PluralCategory::Two);
    assert_eq!(en.plural_category("13", PluralKind::Ordinal).unwrap(), PluralCategory::Other);
    assert_eq!(en.plural_category("103", PluralKind::Ordinal).unwrap(), PluralCategory::Few);
}

#[test]
fn arabic_has_all_six_categories() {
    let ar = Locale::from("ar");
    let category = |n: &str| ar.plural_category(n, PluralKind::Cardinal).unwrap();
    assert_eq!(category("0"), PluralCategory::Zero);
    assert_eq!(category("1"), PluralCategory::One);
    assert_eq!(category("2"), PluralCategory::Two);
    assert_eq!(category("3"), PluralCategory::Few);
    assert_eq!(category("11"), PluralCategory::Many);
    assert_eq!(category("100"), PluralCategory::Other);
}

#[test]
fn plural_operands_follow_visible_digits() {
    let en = Locale::default();
    assert_eq!(en.plural_category("1.00", PluralKind::Cardinal).unwrap(), PluralCategory::Other);
    assert_eq!(en.plural_category("-1", PluralKind::Cardinal).unwrap(), PluralCategory::One);
    assert_eq!(en.plural_category("1e0", PluralKind::Cardinal).unwrap(), PluralCategory::One);
    let pl = Locale::from("pl");
    assert_eq!(pl.plural_category("2", PluralKind::Cardinal).unwrap(), PluralCategory::Few);
    assert_eq!(pl.plural_category("2.5", PluralKind::Cardinal).unwrap(), PluralCategory::Other);
}

#[test]
fn non_finite_floats_are_rejected() {
    assert_eq!(
        DecimalNumber::from_f64(f64::INFINITY),
        Err(LocaleError::NonFinite(f64::INFINITY))
    );
}

#[test]
fn unknown_language_falls_back_to_english_rules() {
    let xx = Locale::from("xx");
    assert_eq!(xx.plural_category("1", PluralKind::Cardinal).unwrap(), PluralCategory::One);
}

#[test]
fn language_is_lowercased_primary_subtag() {
    assert_eq!(Locale::from("DE_ch").language(), "de");
    assert_eq!(Locale::from("en").tag(), "en");
}

// =============================================================================
// Number formats
// =============================================================================

#[test]
fn plain_rendering_ignores_locale_symbols() {
    let format = NumberFormat::builder().minimum_fraction_digits(1).build();
    let value = DecimalNumber::from(-1234);
    assert_eq!(format.render_plain(&value).unwrap(), "-1234.0");
    assert_eq!(
        Locale::from("de").format_number(&value, &format).unwrap(),
        "-1.234,0"
    );
}

#[test]
fn contradictory_bounds_are_reported() {
    let format = NumberFormat::builder()
        .minimum_significant_digits(4)
        .maximum_significant_digits(2)
        .build();
    assert!(matches!(
        format.render_plain(&DecimalNumber::from(1)),
        Err(LocaleError::DigitBounds(_))
    ));
}

// =============================================================================
// Custom providers
// =============================================================================

/// Renders everything in a bracketed debug form.
struct Bracketed;

impl LocaleProvider for Bracketed {
    fn format_number(
        &self,
        tag: &str,
        value: &DecimalNumber,
        _format: &NumberFormat,
    ) -> Result<String, LocaleError> {
        Ok(format!("[{tag}:{value}]"))
    }

    fn format_datetime(
        &self,
        tag: &str,
        value: &DateTime<FixedOffset>,
        _format: &DateTimeFormat,
    ) -> Result<String, LocaleError> {
        Ok(format!("[{tag}:{}]", value.format("%Y-%m-%d")))
    }

    fn plural_category(
        &self,
        _tag: &str,
        _number: &str,
        _kind: PluralKind,
    ) -> Result<PluralCategory, LocaleError> {
        Ok(PluralCategory::Few)
    }
}

#[test]
fn custom_provider_renders_builtins() {
    let template = Template::builder()
        .locale(Locale::with_provider("xx", Arc::new(Bracketed)))
        .build()
        .parse("{$n :number} {$d :date}")
        .unwrap();
    let text = template
        .format(&bindings! { "n" => 2.5, "d" => "2024-03-15" })
        .unwrap();
    assert_eq!(text, "[xx:2.5] [xx:2024-03-15]");
}

#[test]
fn custom_provider_drives_plural_selection() {
    let template = Template::builder()
        .locale(Locale::with_provider("xx", Arc::new(Bracketed)))
        .build()
        .parse(".match {$n :number}\nfew {{few}}\n* {{other}}")
        .unwrap();
    assert_eq!(template.format(&bindings! { "n" => 1 }).unwrap(), "few");
}
