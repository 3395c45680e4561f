//! CLDR plural category resolution.
//!
//! Plural rules are cached per thread per language and rule type, so
//! `PluralRules` instances are built once per thread on first use.

use std::cell::RefCell;

use fixed_decimal::Decimal;
use icu_locale_core::{Locale as IcuLocale, locale};
use icu_plurals::{PluralCategory as IcuCategory, PluralOperands, PluralRuleType, PluralRules};
use mf2_syntax::PluralCategory;

use super::LocaleError;

/// Which CLDR rule set to classify with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralKind {
    /// Counting: "1 file", "2 files".
    Cardinal,
    /// Ranking: "1st", "2nd".
    Ordinal,
}

/// Supported language codes for plural rule resolution.
const SUPPORTED_LANGUAGES: &[&str] = &[
    "ar", "bn", "cs", "cy", "da", "de", "el", "en", "es", "fa", "fi", "fr", "ga", "he", "hi", "hu",
    "id", "it", "ja", "ko", "lt", "lv", "nb", "nl", "pl", "pt", "ro", "ru", "sk", "sl", "sv", "th",
    "tr", "uk", "vi", "zh",
];

thread_local! {
    /// Per-thread cache of `PluralRules` keyed by language code and rule type.
    static PLURAL_RULES_CACHE: RefCell<Vec<(&'static str, PluralKind, PluralRules)>> =
        const { RefCell::new(Vec::new()) };
}

/// Normalize a language code to a supported static string reference.
///
/// Returns `"en"` for unrecognized codes.
fn normalize_lang(lang: &str) -> &'static str {
    SUPPORTED_LANGUAGES
        .iter()
        .find(|&&code| code == lang)
        .copied()
        .unwrap_or("en")
}

fn icu_locale(lang: &'static str) -> IcuLocale {
    match lang {
        "ar" => locale!("ar"),
        "bn" => locale!("bn"),
        "cs" => locale!("cs"),
        "cy" => locale!("cy"),
        "da" => locale!("da"),
        "de" => locale!("de"),
        "el" => locale!("el"),
        "es" => locale!("es"),
        "fa" => locale!("fa"),
        "fi" => locale!("fi"),
        "fr" => locale!("fr"),
        "ga" => locale!("ga"),
        "he" => locale!("he"),
        "hi" => locale!("hi"),
        "hu" => locale!("hu"),
        "id" => locale!("id"),
        "it" => locale!("it"),
        "ja" => locale!("ja"),
        "ko" => locale!("ko"),
        "lt" => locale!("lt"),
        "lv" => locale!("lv"),
        "nb" => locale!("nb"),
        "nl" => locale!("nl"),
        "pl" => locale!("pl"),
        "pt" => locale!("pt"),
        "ro" => locale!("ro"),
        "ru" => locale!("ru"),
        "sk" => locale!("sk"),
        "sl" => locale!("sl"),
        "sv" => locale!("sv"),
        "th" => locale!("th"),
        "tr" => locale!("tr"),
        "uk" => locale!("uk"),
        "vi" => locale!("vi"),
        "zh" => locale!("zh"),
        _ => locale!("en"),
    }
}

fn build_rules(lang: &'static str, kind: PluralKind) -> Result<PluralRules, LocaleError> {
    let rule_type = match kind {
        PluralKind::Cardinal => PluralRuleType::Cardinal,
        PluralKind::Ordinal => PluralRuleType::Ordinal,
    };
    PluralRules::try_new(icu_locale(lang).into(), rule_type.into()).map_err(|e| {
        LocaleError::PluralRules {
            locale: lang.to_string(),
            message: e.to_string(),
        }
    })
}

fn from_icu(category: IcuCategory) -> PluralCategory {
    match category {
        IcuCategory::Zero => PluralCategory::Zero,
        IcuCategory::One => PluralCategory::One,
        IcuCategory::Two => PluralCategory::Two,
        IcuCategory::Few => PluralCategory::Few,
        IcuCategory::Many => PluralCategory::Many,
        IcuCategory::Other => PluralCategory::Other,
    }
}

/// Read the plural operands of a plain decimal string.
///
/// Visible fraction digits are kept, so `1.0` and `1` classify differently
/// in languages that distinguish them. Strings in exponent form are
/// expanded through `f64` first; anything else unparsable counts as `0`.
fn operands(number: &str) -> PluralOperands {
    let unsigned = number.trim_start_matches('-');
    let decimal = Decimal::try_from_str(unsigned).or_else(|_| {
        let expanded = unsigned
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map_or_else(|| "0".to_string(), |f| f.to_string());
        Decimal::try_from_str(&expanded)
    });
    decimal.map_or_else(|_| PluralOperands::from(0_u64), |d| PluralOperands::from(&d))
}

/// Get the CLDR plural category of a number in a given language.
///
/// In English, `1` is `one` but `1.0` is `other`; ordinal `2` is `two`.
pub(super) fn category(
    lang: &str,
    number: &str,
    kind: PluralKind,
) -> Result<PluralCategory, LocaleError> {
    let lang = normalize_lang(lang);
    let operands = operands(number);
    PLURAL_RULES_CACHE.with_borrow_mut(|cache| {
        if let Some((_, _, rules)) = cache.iter().find(|(l, k, _)| *l == lang && *k == kind) {
            return Ok(from_icu(rules.category_for(operands)));
        }
        let rules = build_rules(lang, kind)?;
        let category = from_icu(rules.category_for(operands));
        cache.push((lang, kind, rules));
        Ok(category)
    })
}
