//! End-to-end tests: Kythera source in, formatted Rust out.
//!
//! Emitted code is checked with `syn` (it must be a valid Rust file) and by looking for short, whitespace-free
//! fragments, so the assertions do not depend on how `prettyplease` wraps long lines.

use kythera::{CompileOptions, CompiledUnit, EmitError, Session};

fn quiet_session() -> Session {
    Session::with_options(CompileOptions {
        emit_header: false,
        allow_lints: false,
    })
}

fn compile(source: &str) -> CompiledUnit {
    let unit = match quiet_session().compile(source) {
        Ok(unit) => unit,
        Err(EmitError::Compile(e)) => panic!("compile failed: {e}"),
        Err(EmitError::SynParse(msg)) => panic!("emitted code did not parse: {msg}"),
    };
    if let Err(e) = syn::parse_file(&unit.code) {
        panic!("emitted code is not a Rust file: {e}\n{}", unit.code);
    }
    unit
}

/// Emitted code with all whitespace removed.
fn squashed(source: &str) -> String {
    compile(source).code.chars().filter(|c| !c.is_whitespace()).collect()
}

fn assert_emits(source: &str, fragments: &[&str]) {
    let code = squashed(source);
    for fragment in fragments {
        assert!(code.contains(fragment), "missing `{fragment}` in:\n{code}");
    }
}

fn symbol_types(source: &str) -> Vec<(String, String)> {
    compile(source).symbols.into_iter().map(|s| (s.name, s.ty)).collect()
}

// =============================================================================
// Units
// =============================================================================

#[test]
fn test_unit_defines_run_over_environment() {
    assert_emits(
        "let x = 1\n",
        &[
            "usekythera_runtime::prelude::*;",
            "pubfnrun(__env:&mutEnvironment)",
            "letx=Var::new(Value::Int(1));",
            "__env.define(\"x\",&x);",
        ],
    );
}

#[test]
fn test_header_and_lint_allowance_are_optional() {
    let unit = Session::new().compile("let x = 1\n").unwrap();
    assert!(unit.code.starts_with("// Generated by the Kythera compiler v"));
    assert!(unit.code.contains("#![allow("));

    let quiet = compile("let x = 1\n");
    assert!(!quiet.code.contains("Generated by"));
    assert!(!quiet.code.contains("#![allow("));
}

#[test]
fn test_later_units_import_earlier_bindings() {
    let mut session = quiet_session();
    session.compile("let a = 1\n").unwrap();
    let unit = session.compile("let b = a * 2\n").unwrap();
    let code: String = unit.code.chars().filter(|c| !c.is_whitespace()).collect();
    assert!(code.contains("leta=__env.var(\"a\");"), "{code}");
    assert!(code.contains("ops::mul(&a.get(),&Value::Int(2))"), "{code}");
    assert_eq!(unit.symbols.len(), 1);
    assert_eq!(unit.symbols[0].name, "b");
}

// =============================================================================
// Literals
// =============================================================================

#[test]
fn test_primitive_literals() {
    assert_emits(
        "let f = 1.5\nlet s = \"hi\"\nlet b = true\nlet n = null\nlet t = int\n",
        &[
            "Value::Float(1.5)",
            "Value::str(\"hi\")",
            "Value::Bool(true)",
            "Value::Null",
            "Value::Type(Type::Int)",
        ],
    );
}

#[test]
fn test_list_literal_carries_element_type() {
    assert_emits(
        "let xs = [1, 2]\n",
        &["Value::list(Type::Int,vec![Value::Int(1),Value::Int(2)", "letxs=Var::new("],
    );
    assert_eq!(symbol_types("let xs = [1, 2]\n"), vec![("xs".to_string(), "int[]".to_string())]);
}

#[test]
fn test_function_literal_binds_arguments() {
    let source = "let f = <int a> int {\n  return a + 1\n}\n";
    assert_emits(
        source,
        &[
            "Value::function(Type::function(vec![Type::Int],Type::Int)",
            "move|__args:Vec<Value>|->Value{",
            "leta=Var::new(__args[0].clone());",
            "returnops::add(&a.get(),&Value::Int(1));",
        ],
    );
    assert_eq!(symbol_types(source), vec![("f".to_string(), "fn<int> int".to_string())]);
}

#[test]
fn test_function_literal_captures_outer_bindings() {
    assert_emits(
        "let n = 10\nlet f = <> int {\n  return n\n}\n",
        &["letn=n.clone();", "move|_:Vec<Value>|->Value{returnn.get();}"],
    );
}

#[test]
fn test_function_without_return_falls_through_to_zero() {
    assert_emits("let f = <> int {\n  let x = 1\n}\n", &["convert::zero(&Type::Int)"]);
}

#[test]
fn test_object_literal_with_this() {
    let source = "let o = {\n  a = 5,\n  c = <> int {\n    return this.a + 10\n  },\n}\n";
    assert_emits(
        source,
        &[
            "let__object_0=Object::new();",
            "let__this_1=Value::Object(__object_0.clone());",
            "__object_0.define(\"a\",Value::Int(5));",
            "let__this_1=__this_1.clone();",
            "access::get_member(&__this_1.clone(),\"a\")",
        ],
    );
    assert_eq!(
        symbol_types(source),
        vec![("o".to_string(), "obj{int a, fn<> int c}".to_string())]
    );
}

// =============================================================================
// Operators and assignment
// =============================================================================

#[test]
fn test_binary_operators_call_runtime() {
    assert_emits(
        "let a = 1\nlet b = a + 2\nlet c = a / 2\nlet d = a == b\n",
        &[
            "ops::add(&a.get(),&Value::Int(2))",
            "ops::div(&a.get(),&Value::Int(2))",
            "ops::eq(&a.get(),&b.get())",
        ],
    );
}

#[test]
fn test_logical_operators_short_circuit() {
    assert_emits(
        "let t = true && false\nlet u = !t\n",
        &["ops::and(&Value::Bool(true),||Value::Bool(false))", "ops::not(&t.get())"],
    );
}

#[test]
fn test_compound_assignment_reads_then_writes() {
    assert_emits("let x = 1\nx += 2\n", &["let_=x.set(ops::add(&x.get(),&Value::Int(2)));"]);
}

#[test]
fn test_index_assignment_binds_target_and_index_once() {
    assert_emits(
        "let xs = [1, 2]\nxs[2] = 3\n",
        &[
            "let__this_0=xs.get();",
            "let__index_1=Value::Int(2);",
            "access::set_index(&__this_0,&__index_1,Value::Int(3))",
        ],
    );
}

#[test]
fn test_member_assignment() {
    assert_emits(
        "let o = {\n  a = 1,\n}\no.a = 2\n",
        &["access::set_member(&__this_2,\"a\",Value::Int(2))"],
    );
}

// =============================================================================
// Control flow
// =============================================================================

#[test]
fn test_if_else_chain_stays_flat() {
    let source = "let x = 1\nif x > 0 {\n  x = 2\n} else if x < 0 {\n  x = 3\n} else {\n  x = 4\n}\n";
    assert_emits(
        source,
        &[
            "ifconvert::as_bool(&ops::gt(&x.get(),&Value::Int(0))){let_=x.set(Value::Int(2));}",
            "}elseifconvert::as_bool(&ops::lt(&x.get(),&Value::Int(0))){",
            "}else{let_=x.set(Value::Int(4));}",
        ],
    );
}

#[test]
fn test_while_loop() {
    assert_emits(
        "let i = 0\nwhile i < 3 {\n  i += 1\n}\n",
        &["whileconvert::as_bool(&ops::lt(&i.get(),&Value::Int(3))){let_=i.set(ops::add(&i.get(),&Value::Int(1)));}"],
    );
}

// =============================================================================
// Types as values
// =============================================================================

#[test]
fn test_typeof_folds_statically_known_types() {
    let source = "let a = 1\nlet t = typeof a\n";
    let code = squashed(source);
    assert!(code.contains("lett=Var::new(Value::Type(Type::Int));"), "{code}");
    assert!(!code.contains("convert::type_of"), "{code}");
}

#[test]
fn test_new_through_type_binding() {
    let source = "let T = int\nlet z = new T\n";
    assert_emits(source, &["convert::zero(&Type::Int)"]);
    assert_eq!(symbol_types(source)[1], ("z".to_string(), "int".to_string()));
}

#[test]
fn test_reassigned_type_binding_is_resolved_at_run_time() {
    let source = "let T = int\nT = str\nlet z = new T\n";
    assert_emits(source, &["convert::zero(&convert::as_type(&T.get()))"]);
    assert_eq!(symbol_types(source)[1], ("z".to_string(), "any".to_string()));
}

#[test]
fn test_type_binding_reassigned_in_later_loop_is_resolved_at_run_time() {
    let mut session = quiet_session();
    session.compile("let T = int\n").unwrap();
    // `new T` runs again after `T = str` on the second iteration.
    let unit = session
        .compile("let i = 0\nwhile i < 2 {\n  let z = new T\n  T = str\n  i += 1\n}\n")
        .unwrap();
    let code: String = unit.code.chars().filter(|c| !c.is_whitespace()).collect();
    assert!(code.contains("convert::zero(&convert::as_type(&T.get()))"), "{code}");
    assert!(!code.contains("convert::zero(&Type::Int)"), "{code}");

    // A unit that leaves `T` alone still sees the value tracked before the loop unit.
    let mut untouched = quiet_session();
    untouched.compile("let T = int\n").unwrap();
    let unit = untouched.compile("let z = new T\n").unwrap();
    assert!(unit.code.contains("convert::zero(&Type::Int)"), "{}", unit.code);
}

#[test]
fn test_cast_calls_runtime() {
    assert_emits("let s = 1 as str\n", &["convert::cast(&Value::Int(1),&Type::Str)"]);
}

#[test]
fn test_call_passes_arguments_as_vec() {
    assert_emits(
        "let f = <int a> int {\n  return a\n}\nlet r = f(1)\n",
        &["access::call(&f.get(),vec![Value::Int(1)])"],
    );
}

// =============================================================================
// Names
// =============================================================================

#[test]
fn test_rust_keywords_and_prelude_names_are_escaped() {
    assert_emits(
        "let match = 1\nlet self = 2\nlet Var = 3\n",
        &[
            "letr#match=Var::new(Value::Int(1));",
            "__env.define(\"match\",&r#match);",
            "let__k_self=Var::new(Value::Int(2));",
            "let__k_Var=Var::new(Value::Int(3));",
        ],
    );
}
