//! Integration tests for the panics raised by `kythera_runtime`.
//!
//! These lock in the **canonical, user-facing error strings** (`Kind: message`) that compiled programs surface.

use kythera_runtime::access::{get_index, get_member};
use kythera_runtime::convert::cast;
use kythera_runtime::ops::{add, div};
use kythera_runtime::prelude::*;
use std::panic::{self, AssertUnwindSafe};

/// Run `f`, expecting a panic, and return its message.
fn panic_message(f: impl FnOnce()) -> String {
    let payload = panic::catch_unwind(AssertUnwindSafe(f)).expect_err("expected a panic");
    payload
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| payload.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_default()
}

#[test]
fn zero_division_messages_distinguish_int_and_float() {
    assert_eq!(
        panic_message(|| {
            div(&Value::Int(1), &Value::Int(0));
        }),
        "ZeroDivisionError: integer division by zero"
    );
    assert_eq!(
        panic_message(|| {
            div(&Value::Float(1.0), &Value::Float(0.0));
        }),
        "ZeroDivisionError: float division by zero"
    );
}

#[test]
fn index_error_names_index_and_length() {
    let list = Value::list(Type::Str, vec![Value::str("a")]);
    assert_eq!(
        panic_message(|| {
            get_index(&list, &Value::Int(4));
        }),
        "IndexError: list index 4 out of range for length 1"
    );
}

#[test]
fn key_error_names_member() {
    let object = Value::object([("a", Value::Int(1))]);
    assert_eq!(
        panic_message(|| {
            get_member(&object, "b");
        }),
        "KeyError: object has no member 'b'"
    );
}

#[test]
fn cast_error_names_both_types() {
    assert_eq!(
        panic_message(|| {
            cast(&Value::list(Type::Int, vec![]), &Type::Int);
        }),
        "CastError: cannot cast 'int[]' to 'int'"
    );
}

#[test]
fn unbound_environment_name_is_a_key_error() {
    let env = Environment::new();
    assert_eq!(
        panic_message(|| {
            env.var("missing");
        }),
        "KeyError: 'missing' is not defined"
    );
}

#[test]
fn environment_carries_values_between_units() {
    let mut env = Environment::new();
    let counter = Var::new(Value::Int(1));
    env.define("counter", &counter);

    // A later unit imports the binding and writes through it.
    let imported = env.var("counter");
    imported.set(add(&imported.get(), &Value::Int(1)));
    assert_eq!(counter.get(), Value::Int(2));
    assert_eq!(env.get("counter"), Some(Value::Int(2)));
}
