//! Property-based tests for execution invariants.

use std::iter;

use mf2::parser::{
    Annotation, ComplexBody, ComplexMessage, Declaration, Expression, Function, InputDeclaration,
    Literal, LocalDeclaration, Matcher, Operand, Pattern, Variable, Variant, VariantKey,
};
use mf2::{ErrorKind, Message, Template, bindings, parse_message};
use proptest::collection::vec;
use proptest::option;
use proptest::prelude::*;

// =============================================================================
// Message generators
// =============================================================================

fn name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,5}"
}

fn literal() -> impl Strategy<Value = Literal> {
    prop_oneof![
        "[a-z][a-z0-9.-]{0,5}".prop_map(Literal::name),
        "[0-9][a-z0-9-]{0,4}".prop_map(Literal::name),
        any::<i32>().prop_map(|n| Literal::number(n.to_string())),
        "[a-z |{}\\\\]{0,6}".prop_map(Literal::quoted),
    ]
}

fn operand() -> impl Strategy<Value = Operand> {
    prop_oneof![
        name().prop_map(|n| Operand::Variable(Variable::new(n))),
        literal().prop_map(Operand::Literal),
    ]
}

fn function() -> impl Strategy<Value = Function> {
    (name(), vec((name(), operand()), 0..3)).prop_map(|(function, options)| {
        options
            .into_iter()
            .fold(Function::new(function), |f, (option, value)| f.option(option, value))
    })
}

fn expression() -> impl Strategy<Value = Expression> {
    prop_oneof![
        (operand(), option::of(function())).prop_map(|(operand, function)| Expression {
            operand: Some(operand),
            annotation: function.map(Annotation::Function),
        }),
        function().prop_map(|function| Expression {
            operand: None,
            annotation: Some(Annotation::Function(function)),
        }),
    ]
}

fn pattern() -> impl Strategy<Value = Vec<Pattern>> {
    vec(
        prop_oneof![
            "[a-z .{}\\\\|]{0,8}".prop_map(Pattern::Text),
            expression().prop_map(Pattern::Placeholder),
        ],
        0..5,
    )
}

fn declaration() -> impl Strategy<Value = Declaration> {
    prop_oneof![
        (name(), option::of(function())).prop_map(|(variable, function)| {
            Declaration::Input(InputDeclaration {
                variable: Variable::new(variable),
                annotation: function.map(Annotation::Function),
            })
        }),
        (name(), expression()).prop_map(|(variable, expression)| {
            Declaration::Local(LocalDeclaration {
                variable: Variable::new(variable),
                expression,
            })
        }),
    ]
}

fn key() -> impl Strategy<Value = VariantKey> {
    prop_oneof![Just(VariantKey::Wildcard), literal().prop_map(VariantKey::Literal)]
}

fn matcher() -> impl Strategy<Value = Matcher> {
    (1..=2usize).prop_flat_map(|count| {
        (
            vec(expression(), count),
            vec((vec(key(), count), pattern()), 0..3),
            pattern(),
        )
            .prop_map(move |(selectors, variants, fallback)| Matcher {
                selectors,
                variants: variants
                    .into_iter()
                    .map(|(keys, pattern)| Variant { keys, pattern })
                    .chain(iter::once(Variant {
                        keys: vec![VariantKey::Wildcard; count],
                        pattern: fallback,
                    }))
                    .collect(),
            })
    })
}

fn message() -> impl Strategy<Value = Message> {
    prop_oneof![
        pattern().prop_map(Message::Simple),
        (
            vec(declaration(), 0..3),
            prop_oneof![
                pattern().prop_map(ComplexBody::QuotedPattern),
                matcher().prop_map(ComplexBody::Matcher),
            ],
        )
            .prop_map(|(declarations, body)| Message::Complex(ComplexMessage {
                declarations,
                body,
            })),
    ]
}

proptest! {
    #[test]
    fn plain_text_is_identity(text in "[a-zA-Z0-9 ,!?'\"-]{0,40}") {
        let out = Template::new().parse(&text).unwrap().format(&bindings! {}).unwrap();
        prop_assert_eq!(out, text);
    }

    #[test]
    fn serialized_text_executes_to_itself(text in ".*") {
        let source = Message::Simple(vec![Pattern::Text(text.clone())]).serialize();
        let template = Template::new().parse(&source).unwrap();
        prop_assert_eq!(template.format(&bindings! {}).unwrap(), text);
    }

    #[test]
    fn serialize_is_stable_after_one_pass(message in message()) {
        let once = message.serialize();
        let reparsed = parse_message(&once);
        prop_assert!(reparsed.is_ok(), "{once:?} failed to parse: {reparsed:?}");
        let reparsed = reparsed.unwrap();
        prop_assert_eq!(reparsed.validate(), Ok(()));
        prop_assert_eq!(reparsed.serialize(), once);
    }

    #[test]
    fn integer_without_grouping_matches_display(n in any::<i32>()) {
        let out = Template::new()
            .parse("{$n :integer useGrouping=never}")
            .unwrap()
            .format(&bindings! { "n" => n })
            .unwrap();
        prop_assert_eq!(out, n.to_string());
    }

    #[test]
    fn sign_always_marks_non_negative_numbers(n in -100_000i64..100_000) {
        let out = Template::new()
            .parse("{$n :number signDisplay=always}")
            .unwrap()
            .format(&bindings! { "n" => n })
            .unwrap();
        prop_assert_eq!(out.starts_with('+'), n >= 0);
        prop_assert_eq!(out.starts_with('-'), n < 0);
        let digits: String = out.chars().filter(char::is_ascii_digit).collect();
        prop_assert_eq!(digits, n.unsigned_abs().to_string());
    }

    #[test]
    fn repeated_option_is_always_rejected(
        name in "[a-z][a-zA-Z]{0,8}",
        first in "[a-z]{1,5}",
        second in "[a-z]{1,5}",
    ) {
        let source = format!("{{:number {name}={first} {name}={second}}}");
        let err = Template::new().parse(&source).unwrap().format(&bindings! {}).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::DuplicateOptionName);
    }

    #[test]
    fn string_selector_falls_back_for_unmatched_values(value in "[b-z]{1,6}") {
        let template = Template::new()
            .parse(".match {$v :string}\na {{matched}}\n* {{fallback}}")
            .unwrap();
        prop_assert_eq!(template.format(&bindings! { "v" => value }).unwrap(), "fallback");
    }
}
