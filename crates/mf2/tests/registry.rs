//! Integration tests for the function registry, contracts and options.

use std::collections::BTreeMap;

use mf2::{
    Constraint, Context, Contract, Error, ErrorKind, Func, FuncError, Locale, OperandError,
    OptionError, OptionSpec, Options, Registry, Requirement, ResolvedValue, Template, Value,
    ValueKind, bindings,
};

fn explicit(pairs: &[(&str, Value)]) -> BTreeMap<String, Value> {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

/// Uppercases its operand; `suffix` is appended when given.
fn shout() -> Func {
    Func::new(|operand, options, _locale| {
        let text = operand
            .map(|v| v.value().to_string())
            .unwrap_or_default()
            .to_uppercase();
        let suffix = options.get_string("suffix", "", &[])?;
        Ok(ResolvedValue::new(format!("{text}{suffix}")))
    })
    .format_contract(
        Contract::new()
            .operand(Requirement::Required)
            .option("suffix", OptionSpec::any()),
    )
}

// =============================================================================
// Contracts
// =============================================================================

#[test]
fn contract_applies_defaults_without_marking_them_explicit() {
    let contract = Contract::new().option(
        "style",
        OptionSpec::builder()
            .default_value("short")
            .constraint(Constraint::one_of(["short", "long"]))
            .build(),
    );
    let options = contract.check(None, BTreeMap::new()).unwrap();
    assert_eq!(options.get("style"), Some(&Value::from("short")));
    assert!(options.contains("style"));
    assert!(!options.is_explicit("style"));
    assert!(options.explicit().is_empty());
}

#[test]
fn contract_rejects_unknown_option_first() {
    let contract = Contract::new()
        .operand(Requirement::Required)
        .option("style", OptionSpec::one_of(["a", "b"]));
    let err = contract
        .check(None, explicit(&[("zzz", Value::from(1)), ("style", Value::from("c"))]))
        .unwrap_err();
    assert_eq!(
        err,
        FuncError::BadOption(OptionError::Unknown {
            option: "zzz".to_string()
        })
    );
}

#[test]
fn contract_checks_allow_list() {
    let contract = Contract::new().option("style", OptionSpec::one_of(["a", "b"]));
    let err = contract
        .check(None, explicit(&[("style", Value::from("c"))]))
        .unwrap_err();
    assert!(matches!(
        err,
        FuncError::BadOption(OptionError::NotAllowed { ref allowed, .. })
            if allowed == &["a", "b"]
    ));
}

#[test]
fn contract_runs_custom_validators() {
    let contract = Contract::new().option(
        "even",
        OptionSpec::builder()
            .constraint(Constraint::custom(|value| match value {
                Value::Int(n) if n % 2 == 0 => Ok(()),
                _ => Err("must be even".to_string()),
            }))
            .build(),
    );
    assert!(contract.check(None, explicit(&[("even", Value::from(4))])).is_ok());
    let err = contract
        .check(None, explicit(&[("even", Value::from(3))]))
        .unwrap_err();
    assert_eq!(
        err,
        FuncError::BadOption(OptionError::Invalid {
            option: "even".to_string(),
            reason: "must be even".to_string(),
        })
    );
}

#[test]
fn contract_operand_requirements() {
    let value = Value::from("x");
    let required = Contract::new().operand(Requirement::Required);
    assert_eq!(
        required.check(None, BTreeMap::new()).unwrap_err(),
        FuncError::BadOperand(OperandError::Missing)
    );
    assert!(required.check(Some(&value), BTreeMap::new()).is_ok());

    let forbidden = Contract::new().operand(Requirement::Forbidden);
    assert_eq!(
        forbidden.check(Some(&value), BTreeMap::new()).unwrap_err(),
        FuncError::BadOperand(OperandError::Unexpected)
    );
    assert!(forbidden.check(None, BTreeMap::new()).is_ok());

    let optional = Contract::new();
    assert_eq!(optional.requirement(), Requirement::Optional);
    assert!(optional.check(None, BTreeMap::new()).is_ok());
    assert!(optional.check(Some(&value), BTreeMap::new()).is_ok());
}

#[test]
fn contract_operand_validator() {
    let contract = Contract::new().operand_validator(|value| match value {
        Value::Int(_) => Ok(()),
        other => Err(OperandError::WrongType {
            expected: "integer".to_string(),
            received: other.kind(),
        }),
    });
    assert!(contract.check(Some(&Value::from(1)), BTreeMap::new()).is_ok());
    assert_eq!(
        contract
            .check(Some(&Value::from("1")), BTreeMap::new())
            .unwrap_err(),
        FuncError::BadOperand(OperandError::WrongType {
            expected: "integer".to_string(),
            received: ValueKind::String,
        })
    );
}

#[test]
fn contract_lists_option_names_sorted() {
    let contract = Contract::new()
        .option("zeta", OptionSpec::any())
        .option("alpha", OptionSpec::any());
    assert_eq!(contract.option_names().collect::<Vec<_>>(), vec!["alpha", "zeta"]);
}

// =============================================================================
// Options accessors
// =============================================================================

#[test]
fn typed_option_accessors() {
    let options = Options::new()
        .with("style", "percent")
        .with("digits", 3)
        .with("digitsText", "4")
        .with("flag", "true");
    assert_eq!(
        options.get_string("style", "decimal", &["decimal", "percent"]).unwrap(),
        "percent"
    );
    assert_eq!(options.get_string("missing", "decimal", &[]).unwrap(), "decimal");
    assert_eq!(options.get_int("digits", 0, 0..=20).unwrap(), 3);
    assert_eq!(options.get_int("digitsText", 0, 0..=20).unwrap(), 4);
    assert_eq!(options.get_opt_int("missing", 0..=20).unwrap(), None);
    assert!(options.get_bool("flag", false).unwrap());
    assert!(!options.get_bool("missing", false).unwrap());
}

#[test]
fn typed_option_accessor_errors() {
    let options = Options::new().with("style", 5).with("digits", 99);
    assert_eq!(
        options.get_string("style", "", &[]).unwrap_err(),
        OptionError::TypeMismatch {
            option: "style".to_string(),
            expected: ValueKind::String,
            received: ValueKind::Int,
        }
    );
    assert!(matches!(
        options.get_int("digits", 0, 0..=20).unwrap_err(),
        OptionError::Invalid { ref option, .. } if option == "digits"
    ));
    assert_eq!(
        Options::new()
            .with("style", "fancy")
            .get_string("style", "", &["plain"])
            .unwrap_err()
            .option(),
        Some("style")
    );
}

#[test]
fn inherited_options_are_overridden_by_explicit_ones() {
    let base = Options::new().with("a", 1).with("b", 2);
    let layered = Options::new().with("b", 3).inherit(&base);
    assert_eq!(layered.get("a"), Some(&Value::from(1)));
    assert_eq!(layered.get("b"), Some(&Value::from(3)));
    assert!(layered.is_explicit("a"));
}

// =============================================================================
// Registry calls
// =============================================================================

#[test]
fn builtins_are_registered() {
    let registry = Registry::with_builtins();
    assert_eq!(
        registry.names(),
        vec!["date", "datetime", "integer", "number", "string", "time"]
    );
    assert!(Registry::new().names().is_empty());
}

#[test]
fn builtin_capabilities() {
    let registry = Registry::with_builtins();
    let supports = |name: &str, context| registry.get(name).unwrap().supports(context);
    assert!(supports("number", Context::Select));
    assert!(supports("integer", Context::Select));
    assert!(supports("string", Context::Select));
    assert!(!supports("datetime", Context::Select));
    assert!(!supports("date", Context::Select));
    assert!(supports("time", Context::Format));
}

#[test]
fn unknown_function() {
    let registry = Registry::new();
    let err = registry
        .format("nope", None, BTreeMap::new(), &Locale::default())
        .unwrap_err();
    assert_eq!(
        err,
        FuncError::Unknown {
            name: "nope".to_string()
        }
    );
}

#[test]
fn format_only_function_rejects_select() {
    let registry = Registry::new().with("shout", shout());
    let operand = ResolvedValue::new("hi");
    let err = registry
        .select("shout", Some(&operand), BTreeMap::new(), &Locale::default())
        .unwrap_err();
    assert_eq!(err, FuncError::UnsupportedContext(Context::Select));
}

#[test]
fn results_carry_provenance() {
    let registry = Registry::with_builtins();
    let operand = ResolvedValue::new(5);
    let resolved = registry
        .format(
            "number",
            Some(&operand),
            explicit(&[("minimumFractionDigits", Value::from(2))]),
            &Locale::default(),
        )
        .unwrap();
    let provenance = resolved.provenance().unwrap();
    assert_eq!(provenance.function, "number");
    assert!(provenance.options.is_explicit("minimumFractionDigits"));
    assert!(!provenance.options.is_explicit("style"));
    assert_eq!(resolved.format().unwrap(), "5.00");
}

#[test]
fn options_inherited_across_calls() {
    let registry = Registry::with_builtins();
    let locale = Locale::default();
    let first = registry
        .format(
            "number",
            Some(&ResolvedValue::new(7)),
            explicit(&[("minimumIntegerDigits", Value::from(3))]),
            &locale,
        )
        .unwrap();
    let second = registry
        .format(
            "integer",
            Some(&first),
            explicit(&[("signDisplay", Value::from("always"))]),
            &locale,
        )
        .unwrap();
    assert_eq!(second.format().unwrap(), "+007");
}

#[test]
fn string_function_formats_and_selects() {
    let registry = Registry::with_builtins();
    let locale = Locale::default();
    let empty = registry.format("string", None, BTreeMap::new(), &locale).unwrap();
    assert_eq!(empty.format().unwrap(), "");

    let operand = ResolvedValue::new(42);
    let selected = registry
        .select("string", Some(&operand), BTreeMap::new(), &locale)
        .unwrap();
    let keys = vec!["41".to_string(), "42".to_string()];
    assert_eq!(selected.select_key(&keys).unwrap().as_deref(), Some("42"));

    let err = registry
        .format(
            "string",
            Some(&operand),
            explicit(&[("x", Value::from(1))]),
            &locale,
        )
        .unwrap_err();
    assert!(matches!(err, FuncError::BadOption(OptionError::Unknown { .. })));
}

// =============================================================================
// Custom functions in templates
// =============================================================================

#[test]
fn custom_function_on_template() {
    let mut template = Template::new();
    template.add_func("shout", shout());
    let template = template.parse("{$name :shout suffix=|!|}").unwrap();
    assert_eq!(
        template.format(&bindings! { "name" => "ana" }).unwrap(),
        "ANA!"
    );
}

#[test]
fn custom_function_contract_is_enforced() {
    let mut template = Template::new();
    template.add_func("shout", shout());
    let template = template.parse("{:shout}").unwrap();
    let err = template.format(&bindings! {}).unwrap_err();
    assert_eq!(
        err,
        Error::BadOperand {
            function: "shout".to_string(),
            source: OperandError::Missing,
        }
    );
}

#[test]
fn functions_do_not_leak_between_templates() {
    let mut with_shout = Template::new();
    with_shout.add_func("shout", shout());
    assert!(with_shout.registry().contains("shout"));

    let plain = Template::new().parse("{$x :shout}").unwrap();
    let err = plain.format(&bindings! { "x" => "a" }).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownFunction);
}

#[test]
fn custom_function_can_override_builtin() {
    let mut template = Template::new();
    template.add_func("number", shout());
    let template = template.parse("{$x :number}").unwrap();
    assert_eq!(template.format(&bindings! { "x" => "abc" }).unwrap(), "ABC");
}

#[test]
fn template_with_custom_registry() {
    let template = Template::builder()
        .registry(Registry::new().with("shout", shout()))
        .build()
        .parse("{$x :shout} {$x :number}")
        .unwrap();
    let err = template.format(&bindings! { "x" => "a" }).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownFunction);
}

#[test]
fn custom_selector_function() {
    let parity = Func::new(|operand, _options, _locale| {
        let operand = operand.ok_or(OperandError::Missing)?;
        Ok(operand.clone().with_selector(|value, keys| {
            let key = match value.as_int() {
                Some(n) if n % 2 == 0 => "even",
                Some(_) => "odd",
                None => return Err(FuncError::Failed("not an integer".to_string())),
            };
            Ok(keys.iter().find(|k| *k == key).cloned())
        }))
    })
    .select_contract(Contract::new().operand(Requirement::Required));

    let mut template = Template::new();
    template.add_func("parity", parity);
    let template = template
        .parse(".match {$n :parity}\neven {{even}}\nodd {{odd}}\n* {{?}}")
        .unwrap();
    assert_eq!(template.format(&bindings! { "n" => 4 }).unwrap(), "even");
    assert_eq!(template.format(&bindings! { "n" => 7 }).unwrap(), "odd");

    let err = template.format(&bindings! { "n" => "x" }).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Formatting);
}

#[test]
fn custom_function_failure_is_formatting_error() {
    let failing = Func::new(|_operand, _options, _locale| Err(FuncError::Failed("boom".to_string())))
        .format_contract(Contract::new());
    let mut template = Template::new();
    template.add_func("fail", failing);
    let err = template.parse("{:fail}").unwrap().format(&bindings! {}).unwrap_err();
    assert_eq!(
        err,
        Error::Formatting {
            function: "fail".to_string(),
            message: "boom".to_string(),
        }
    );
}
