//! Property-based tests for the Kythera compiler
//!
//! These tests use proptest to verify invariants across many randomly
//! generated inputs, catching edge cases that hand-written tests might miss.

use kythera::{CompileOptions, Session};
use kythera_core::lang::keywords;
use proptest::prelude::*;

fn quiet_session() -> Session {
    Session::with_options(CompileOptions {
        emit_header: false,
        allow_lints: false,
    })
}

// =============================================================================
// Strategies
// =============================================================================

/// Kythera identifiers that are not keywords.
fn ident_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_]{0,7}".prop_filter("Not a keyword", |s| keywords::from_str(s).is_none())
}

/// Integer expressions over literals and the variable `x`.
fn int_expr_strategy() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![(0i64..1000).prop_map(|v| v.to_string()), Just("x".to_string())];
    leaf.prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            (inner.clone(), prop_oneof![Just("+"), Just("-"), Just("*"), Just("/"), Just("%")], inner.clone())
                .prop_map(|(l, op, r)| format!("{l} {op} {r}")),
            inner.prop_map(|e| format!("({e})")),
        ]
    })
}

/// Boolean expressions mixing comparisons and logical operators.
fn bool_expr_strategy() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        Just("true".to_string()),
        Just("false".to_string()),
        (0i64..10).prop_map(|v| format!("x < {v}")),
        (0i64..10).prop_map(|v| format!("x == {v}")),
    ];
    leaf.prop_recursive(3, 16, 2, |inner| {
        prop_oneof![
            (inner.clone(), prop_oneof![Just("&&"), Just("||"), Just("=="), Just("!=")], inner.clone())
                .prop_map(|(l, op, r)| format!("({l}) {op} ({r})")),
            inner.prop_map(|e| format!("!({e})")),
        ]
    })
}

proptest! {
    /// Property: every well-typed integer expression compiles to a valid Rust file and stays `int`.
    #[test]
    fn int_expressions_compile(expr in int_expr_strategy()) {
        let source = format!("let x = 7\nlet y = {expr}\n");
        let unit = quiet_session().compile(&source).unwrap_or_else(|e| panic!("{source}: {e}"));
        prop_assert!(syn::parse_file(&unit.code).is_ok());
        prop_assert_eq!(unit.symbols[1].ty.as_str(), "int");
    }

    /// Property: boolean expressions compile and are usable as conditions.
    #[test]
    fn bool_expressions_compile_as_conditions(expr in bool_expr_strategy()) {
        let source = format!("let x = 3\nwhile {expr} {{\n  x += 1\n}}\n");
        let unit = quiet_session().compile(&source).unwrap_or_else(|e| panic!("{source}: {e}"));
        prop_assert!(syn::parse_file(&unit.code).is_ok());
    }

    /// Property: any non-keyword identifier can be bound, read and assigned.
    #[test]
    fn identifiers_survive_code_generation(name in ident_strategy()) {
        let source = format!("let {name} = 1\n{name} += {name}\nlet reader_fn = <> int {{\n  return {name}\n}}\n");
        let unit = quiet_session().compile(&source).unwrap_or_else(|e| panic!("{source}: {e}"));
        prop_assert!(syn::parse_file(&unit.code).is_ok(), "{}", unit.code);
        prop_assert_eq!(&unit.symbols[0].name, &name);
    }

    /// Property: a rejected unit leaves the session as it was.
    #[test]
    fn rejected_units_declare_nothing(name in ident_strategy()) {
        let mut session = quiet_session();
        let bad = format!("let {name} = 1\nlet {name}_s = {name} + \"s\"\n");
        prop_assert!(session.compile(&bad).is_err());
        prop_assert!(session.declarations().is_empty());
        let good = format!("let {name} = \"ok\"\n");
        prop_assert!(session.compile(&good).is_ok());
    }
}

// =============================================================================
// Fixed cases
// =============================================================================

#[test]
fn test_empty_and_blank_units_compile() {
    for source in ["", "\n\n", "   \n\t\n", "// only a comment\n"] {
        let unit = quiet_session().compile(source).unwrap();
        assert!(unit.symbols.is_empty());
        assert!(syn::parse_file(&unit.code).is_ok());
    }
}
