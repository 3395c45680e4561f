use mf2_syntax::{
    PluralCategory, escape_quoted, escape_text, is_keyword, is_name, is_number_literal,
    is_plural_category, is_private_use_sigil, is_reserved_sigil, is_unquoted_literal,
};

// =============================================================================
// Names and unquoted literals
// =============================================================================

#[test]
fn names_accept_letters_underscore_and_continuation_chars() {
    assert!(is_name("count"));
    assert!(is_name("_private"));
    assert!(is_name("first-name"));
    assert!(is_name("a.b.c"));
    assert!(is_name("名前"));
    assert!(is_name("x1"));
}

#[test]
fn names_reject_bad_starts() {
    assert!(!is_name(""));
    assert!(!is_name("1abc"));
    assert!(!is_name("-abc"));
    assert!(!is_name(".abc"));
    assert!(!is_name("a b"));
}

#[test]
fn unquoted_literals_are_runs_of_name_chars() {
    assert!(is_unquoted_literal("2-digit"));
    assert!(is_unquoted_literal("other"));
    assert!(is_unquoted_literal("-1.5"));
    assert!(is_unquoted_literal("01"));
    assert!(!is_unquoted_literal(""));
    assert!(!is_unquoted_literal("a b"));
    assert!(is_unquoted_literal("1e+3"));
    assert!(!is_unquoted_literal("1e+"));
    assert!(!is_unquoted_literal("-bold"));
    assert!(!is_unquoted_literal("x|y"));
}

#[test]
fn statement_keywords() {
    assert!(is_keyword("input"));
    assert!(is_keyword("local"));
    assert!(is_keyword("match"));
    assert!(!is_keyword("when"));
}

// =============================================================================
// Number literals
// =============================================================================

#[test]
fn number_literals() {
    for ok in ["0", "-0", "42", "-17", "3.14", "0.5", "1e3", "1E-3", "2.5e+10"] {
        assert!(is_number_literal(ok), "{ok} should be a number literal");
    }
    for bad in ["", "-", "01", "1.", ".5", "1e", "1e+", "+1", "1_000", "0x10", "1.2.3"] {
        assert!(!is_number_literal(bad), "{bad} should not be a number literal");
    }
}

// =============================================================================
// Escaping
// =============================================================================

#[test]
fn text_escaping() {
    assert_eq!(escape_text("plain"), "plain");
    assert_eq!(escape_text("a {b} c"), "a \\{b\\} c");
    assert_eq!(escape_text("back\\slash"), "back\\\\slash");
    assert_eq!(escape_text("pipe | stays"), "pipe | stays");
}

#[test]
fn quoted_escaping() {
    assert_eq!(escape_quoted("a|b"), "a\\|b");
    assert_eq!(escape_quoted("{x}"), "{x}");
    assert_eq!(escape_quoted("\\"), "\\\\");
}

#[test]
fn annotation_sigils() {
    assert!(is_private_use_sigil('^'));
    assert!(is_private_use_sigil('&'));
    assert!(!is_private_use_sigil(':'));
    for sigil in ['!', '@', '#', '%', '*', '<', '>', '/', '?', '~'] {
        assert!(is_reserved_sigil(sigil));
    }
    assert!(!is_reserved_sigil('+'));
    assert!(!is_reserved_sigil('-'));
}

// =============================================================================
// Plural categories
// =============================================================================

#[test]
fn plural_categories_round_trip_through_names() {
    for category in PluralCategory::ALL {
        assert_eq!(category.as_str().parse::<PluralCategory>(), Ok(category));
        assert_eq!(category.to_string(), category.as_str());
    }
    assert!(is_plural_category("few"));
    assert!(!is_plural_category("1"));
    assert!("several".parse::<PluralCategory>().is_err());
}
