//! Integration tests for message execution.

use std::collections::HashMap;
use std::fmt::{self, Write};

use mf2::{Error, ErrorKind, Template, Value, bindings};

fn format(source: &str, bindings: &HashMap<String, Value>) -> Result<String, Error> {
    Template::new().parse(source)?.format(bindings)
}

// =============================================================================
// Simple messages
// =============================================================================

#[test]
fn plain_text_is_written_verbatim() {
    assert_eq!(format("Hello World!", &bindings! {}).unwrap(), "Hello World!");
}

#[test]
fn empty_message_writes_nothing() {
    assert_eq!(format("", &bindings! {}).unwrap(), "");
}

#[test]
fn placeholder_with_sign_display() {
    let text = format(
        "Today is { $degrees :number signDisplay=always } degrees outside.",
        &bindings! { "degrees" => 15 },
    )
    .unwrap();
    assert_eq!(text, "Today is +15 degrees outside.");
}

#[test]
fn variable_without_annotation_uses_default_stringification() {
    let text = format(
        "{$name} has {$count} items, flag {$flag}",
        &bindings! { "name" => "Ana", "count" => 3, "flag" => true },
    )
    .unwrap();
    assert_eq!(text, "Ana has 3 items, flag true");
}

#[test]
fn literal_operands() {
    let text = format("{|quoted text|} {name} {42}", &bindings! {}).unwrap();
    assert_eq!(text, "quoted text name 42");
}

#[test]
fn text_escapes_are_unescaped() {
    let text = format(r"Braces \{ and \} and \\", &bindings! {}).unwrap();
    assert_eq!(text, r"Braces { and } and \");
}

#[test]
fn markup_renders_as_nothing() {
    let text = format("Click {+link}here{-link}.", &bindings! {}).unwrap();
    assert_eq!(text, "Click here.");
}

// =============================================================================
// Declarations
// =============================================================================

#[test]
fn local_declaration_binds_literal() {
    let text = format(".local $age = { 42 } {{Age: {$age}}}", &bindings! {}).unwrap();
    assert_eq!(text, "Age: 42");
}

#[test]
fn local_declaration_shadows_input() {
    let text = format(
        ".local $name = {|Bob|} {{Hi {$name}}}",
        &bindings! { "name" => "Ana" },
    )
    .unwrap();
    assert_eq!(text, "Hi Bob");
}

#[test]
fn input_declaration_formats_with_annotation() {
    let text = format(
        ".input {$n :number minimumFractionDigits=2} {{Total: {$n}}}",
        &bindings! { "n" => 3 },
    )
    .unwrap();
    assert_eq!(text, "Total: 3.00");
}

#[test]
fn input_declaration_without_annotation() {
    let text = format(".input {$who} {{Hi {$who}}}", &bindings! { "who" => "you" }).unwrap();
    assert_eq!(text, "Hi you");
}

#[test]
fn local_declaration_refers_to_earlier_declaration() {
    let source = "\
.input {$n :number}
.local $precise = {$n :number minimumFractionDigits=1}
{{{$precise}}}";
    let text = format(source, &bindings! { "n" => 4 }).unwrap();
    assert_eq!(text, "4.0");
}

#[test]
fn placeholder_inherits_options_of_declaration() {
    let text = format(
        ".input {$n :number minimumFractionDigits=2} {{{$n :number signDisplay=always}}}",
        &bindings! { "n" => 3 },
    )
    .unwrap();
    assert_eq!(text, "+3.00");
}

#[test]
fn quoted_pattern_without_declarations() {
    let text = format("{{.starts with a dot}}", &bindings! {}).unwrap();
    assert_eq!(text, ".starts with a dot");
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn unresolved_variable() {
    let err = format("Hello, { $name }!", &bindings! {}).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnresolvedVariable);
    assert_eq!(
        err,
        Error::UnresolvedVariable {
            name: "name".to_string()
        }
    );
}

#[test]
fn partial_output_stays_in_sink() {
    let template = Template::new().parse("Hello, { $name }!").unwrap();
    let mut out = String::new();
    let err = template.execute(&mut out, &bindings! {}).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnresolvedVariable);
    assert_eq!(out, "Hello, ");
}

#[test]
fn duplicate_option_name() {
    let err = format("Hello, { :number style=decimal style=percent }!", &bindings! {}).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateOptionName);
    assert!(matches!(
        err,
        Error::DuplicateOptionName { ref function, ref option }
            if function == "number" && option == "style"
    ));
}

#[test]
fn duplicate_option_wins_over_unresolved_values() {
    for source in [
        "{:number style=$s style=percent}",
        "{$x :number style=decimal style=percent}",
        "{:number style=decimal signDisplay=$s style=$t}",
        ".local $y = {$x :string select=$a select=$b} {{{$y}}}",
    ] {
        let err = format(source, &bindings! {}).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateOptionName, "{source}");
    }
}

#[test]
fn duplicate_option_in_markup() {
    let err = format("{+bold a=1 a=2}", &bindings! {}).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateOptionName);
}

#[test]
fn duplicate_declaration() {
    let err = format(".input {$v} .input {$v} {{x}}", &bindings! { "v" => "22" }).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateDeclaration);
}

#[test]
fn local_after_input_of_same_name_is_duplicate() {
    let err = format(
        ".input {$v} .local $v = {1} {{x}}",
        &bindings! { "v" => "22" },
    )
    .unwrap_err();
    assert_eq!(
        err,
        Error::DuplicateDeclaration {
            name: "v".to_string()
        }
    );
}

#[test]
fn input_declaration_of_missing_variable() {
    let err = format(".input {$missing} {{x}}", &bindings! {}).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnresolvedVariable);
}

#[test]
fn unknown_function_suggests_close_names() {
    let err = format("{$n :nubmer}", &bindings! { "n" => 1 }).unwrap_err();
    assert_eq!(
        err,
        Error::UnknownFunction {
            name: "nubmer".to_string(),
            suggestions: vec!["number".to_string()],
        }
    );
    assert!(err.to_string().contains("did you mean: number?"));
}

#[test]
fn unknown_function_without_suggestions() {
    let err = format("{$n :frobnicate}", &bindings! { "n" => 1 }).unwrap_err();
    assert!(matches!(
        err,
        Error::UnknownFunction { ref suggestions, .. } if suggestions.is_empty()
    ));
}

#[test]
fn private_use_annotation_is_unsupported() {
    let err = format("{^private}", &bindings! {}).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedExpression);
}

#[test]
fn reserved_annotation_is_unsupported() {
    let err = format("{$x !reserved}", &bindings! { "x" => 1 }).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedExpression);
}

#[test]
fn reserved_statement_is_unsupported() {
    let err = format(".when {$x} {{hi}}", &bindings! { "x" => 1 }).unwrap_err();
    assert_eq!(
        err,
        Error::UnsupportedStatement {
            keyword: "when".to_string()
        }
    );
}

#[test]
fn syntax_error_from_parse() {
    let err = Template::new().parse("Hello {$").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
}

#[test]
fn structurally_invalid_message_is_syntax_error() {
    let err = Template::new()
        .parse(".match {$n :number} 1 {{one}}")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
    assert!(err.to_string().contains("body.variants"));
}

#[test]
fn error_kinds_serialize_kebab_case() {
    assert_eq!(
        serde_json::to_string(&ErrorKind::UnresolvedVariable).unwrap(),
        "\"unresolved-variable\""
    );
    assert_eq!(
        serde_json::to_string(&ErrorKind::NoVariantMatched).unwrap(),
        "\"no-variant-matched\""
    );
}

// =============================================================================
// Sinks and sharing
// =============================================================================

struct FailingSink;

impl Write for FailingSink {
    fn write_str(&mut self, _s: &str) -> fmt::Result {
        Err(fmt::Error)
    }
}

#[test]
fn sink_failure_is_reported() {
    let template = Template::new().parse("anything").unwrap();
    let err = template.execute(&mut FailingSink, &bindings! {}).unwrap_err();
    assert_eq!(err, Error::Write);
}

#[test]
fn template_executes_repeatedly_with_different_bindings() {
    let template = Template::new().parse("{$n :integer} left").unwrap();
    assert_eq!(template.format(&bindings! { "n" => 3 }).unwrap(), "3 left");
    assert_eq!(template.format(&bindings! { "n" => 2.6 }).unwrap(), "3 left");
    assert_eq!(template.format(&bindings! { "n" => -1 }).unwrap(), "-1 left");
}

#[test]
fn template_is_shared_across_threads() {
    let template = Template::new()
        .parse("Item {$i :number minimumIntegerDigits=2}")
        .unwrap();
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let template = &template;
                scope.spawn(move || template.format(&bindings! { "i" => i }).unwrap())
            })
            .collect();
        let results: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results, vec!["Item 00", "Item 01", "Item 02", "Item 03"]);
    });
}

#[test]
fn locale_changes_number_rendering() {
    let template = Template::builder()
        .locale("de")
        .build()
        .parse("{$n :number}")
        .unwrap();
    assert_eq!(
        template.format(&bindings! { "n" => 1234.5 }).unwrap(),
        "1.234,5"
    );
}
