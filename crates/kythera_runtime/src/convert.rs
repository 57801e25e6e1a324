//! Type inspection, casts and zero values.
//!
//! `cast` implements the cast matrix from `kythera_core::lang::types`:
//! - `bool` to `int`/`float` maps `true`/`false` to `1`/`0`
//! - `int` to `float` preserves the value, `float` to `int` truncates toward zero
//! - numbers to `bool` test for non-zero
//! - anything to `str` renders the value ([`Value`]'s `Display`)
//! - object to object keeps the destination's members, which must exist in the source with equal types
//!
//! `zero` implements `new T`.

use kythera_core::lang::types as tags;
use kythera_core::num::truncate_f64;

use crate::errors::{raise_cast_error, raise_type_error};
use crate::types::{Type, type_eq};
use crate::value::{Object, Value};

/// Dynamic type of a value.
///
/// Objects report the types of their current members; lists and functions report their declared types.
pub fn type_of(value: &Value) -> Type {
    match value {
        Value::Int(_) => Type::Int,
        Value::Float(_) => Type::Float,
        Value::Bool(_) => Type::Bool,
        Value::Str(_) => Type::Str,
        Value::Null => Type::Null,
        Value::Type(_) => Type::Type,
        Value::Function(f) => f.ty().clone(),
        Value::Object(o) => Type::Object(o.members().iter().map(|(n, v)| (n.clone(), type_of(v))).collect()),
        Value::List(l) => Type::list(l.contains()),
    }
}

/// `value as to`.
///
/// A value whose dynamic type already equals `to` is returned unchanged; the compiler rejects such identity casts
/// statically, so this only matters for values typed `any`.
///
/// ## Panics
/// - `CastError` when the cast matrix forbids the conversion, or an object lacks a destination member.
#[track_caller]
pub fn cast(value: &Value, to: &Type) -> Value {
    if matches!(to, Type::Any) {
        return value.clone();
    }
    let from = type_of(value);
    // Only reachable for values typed `any` at compile time: a value already of the destination type passes.
    if type_eq(&from, to) && !matches!(to, Type::Object(_)) {
        return value.clone();
    }
    if !tags::can_cast(from.tag(), to.tag()) {
        raise_cast_error(&from.to_string(), &to.to_string());
    }

    match (value, to) {
        (_, Type::Str) => Value::Str(value.to_string()),
        (Value::Bool(b), Type::Int) => Value::Int(i64::from(*b)),
        (Value::Bool(b), Type::Float) => Value::Float(if *b { 1.0 } else { 0.0 }),
        (Value::Int(v), Type::Float) => Value::Float(*v as f64),
        (Value::Int(v), Type::Bool) => Value::Bool(*v != 0),
        (Value::Float(v), Type::Int) => Value::Int(truncate_f64(*v)),
        (Value::Float(v), Type::Bool) => Value::Bool(*v != 0.0),
        (Value::Object(source), Type::Object(members)) => {
            let result = Object::new();
            for (name, ty) in members {
                match source.get(name) {
                    Some(member) if type_eq(&type_of(&member), ty) => result.define(name.clone(), member),
                    _ => raise_cast_error(&from.to_string(), &to.to_string()),
                }
            }
            Value::Object(result)
        }
        _ => value.clone(),
    }
}

/// `new ty`: the zero value of a type.
///
/// ## Panics
/// - `TypeError` for `any`, which has no zero value.
#[track_caller]
pub fn zero(ty: &Type) -> Value {
    match ty {
        Type::Int => Value::Int(0),
        Type::Float => Value::Float(0.0),
        Type::Bool => Value::Bool(false),
        Type::Str => Value::Str(String::new()),
        Type::Null => Value::Null,
        Type::Type => Value::Type(Type::Type),
        Type::Object(members) => Value::object(members.iter().map(|(n, t)| (n.clone(), zero(t)))),
        Type::Function { returns, .. } => {
            let returns = (**returns).clone();
            Value::function(ty.clone(), move |_| zero(&returns))
        }
        Type::List(c) => Value::list((**c).clone(), Vec::new()),
        Type::Any => raise_type_error("cannot construct a value of unconstrained type 'any'"),
    }
}

/// Check a value whose static type was `any` against the type its destination requires.
///
/// ## Panics
/// - `TypeError` when the dynamic type differs.
#[track_caller]
pub fn expect_type(value: Value, ty: &Type) -> Value {
    let actual = type_of(&value);
    if !type_eq(&actual, ty) {
        raise_type_error(&format!("expected a value of type '{ty}', got '{actual}'"));
    }
    value
}

/// Use a value as a type (a type expression that could only be evaluated at run time).
///
/// ## Panics
/// - `TypeError` if the value is not a type.
#[track_caller]
pub fn as_type(value: &Value) -> Type {
    match value {
        Value::Type(t) => t.clone(),
        other => raise_type_error(&format!("'{}' is not a type", type_of(other))),
    }
}

/// Use a value as a condition.
///
/// ## Panics
/// - `TypeError` if the value is not a `bool`.
#[track_caller]
pub fn as_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        other => raise_type_error(&format!("condition must be 'bool', got '{}'", type_of(other))),
    }
}
