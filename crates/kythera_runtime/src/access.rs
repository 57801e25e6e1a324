//! Member access, indexing and calls.
//!
//! Objects and lists are shared: writes through `set_member`/`set_index` are visible to every holder of the value.
//! Writes keep containers well-typed, so a member can only be replaced by a value of the same type and a list only
//! accepts elements of its declared element type.

use crate::convert::type_of;
use crate::errors::{raise_index_error, raise_key_error, raise_type_error};
use crate::types::{Type, type_eq};
use crate::value::Value;

fn checked_index(index: &Value) -> (i64, Option<usize>) {
    match index {
        Value::Int(i) => (*i, usize::try_from(*i).ok()),
        other => raise_type_error(&format!("list indices must be 'int', got '{}'", type_of(other))),
    }
}

/// `target.name`
///
/// ## Panics
/// - `KeyError` if the object has no such member; `TypeError` if `target` is not an object.
#[track_caller]
pub fn get_member(target: &Value, name: &str) -> Value {
    match target {
        Value::Object(o) => o.get(name).unwrap_or_else(|| raise_key_error(name)),
        other => raise_type_error(&format!("'{}' has no members", type_of(other))),
    }
}

/// `target.name = value`, returning the assigned value.
///
/// ## Panics
/// - `KeyError` if the member does not exist (objects never grow).
/// - `TypeError` if the new value's type differs from the member's current type.
#[track_caller]
pub fn set_member(target: &Value, name: &str, value: Value) -> Value {
    let Value::Object(o) = target else {
        raise_type_error(&format!("'{}' has no members", type_of(target)));
    };
    let Some(current) = o.get(name) else {
        raise_key_error(name);
    };
    let (expected, actual) = (type_of(&current), type_of(&value));
    if !type_eq(&expected, &actual) {
        raise_type_error(&format!("member '{name}' has type '{expected}', cannot assign '{actual}'"));
    }
    o.replace(name, value.clone());
    value
}

/// `target[index]`: list element by `int` or object member by `str`.
///
/// ## Panics
/// - `IndexError` for a list index outside `0..len`; `KeyError` for a missing member.
#[track_caller]
pub fn get_index(target: &Value, index: &Value) -> Value {
    match target {
        Value::List(list) => {
            let (raw, idx) = checked_index(index);
            idx.and_then(|i| list.get(i))
                .unwrap_or_else(|| raise_index_error(raw, list.len()))
        }
        Value::Object(_) => match index {
            Value::Str(name) => get_member(target, name),
            other => raise_type_error(&format!("object keys must be 'str', got '{}'", type_of(other))),
        },
        other => raise_type_error(&format!("'{}' is not indexable", type_of(other))),
    }
}

/// `target[index] = value`, returning the assigned value.
///
/// Writing one past the end of a list appends.
///
/// ## Panics
/// - `IndexError` for an index outside `0..=len`; `TypeError` for an element of the wrong type.
#[track_caller]
pub fn set_index(target: &Value, index: &Value, value: Value) -> Value {
    match target {
        Value::List(list) => {
            let (raw, idx) = checked_index(index);
            let contains = list.contains();
            let actual = type_of(&value);
            if !type_eq(&contains, &actual) {
                raise_type_error(&format!("list of '{contains}' cannot hold '{actual}'"));
            }
            match idx {
                Some(i) if list.put(i, value.clone()) => value,
                _ => raise_index_error(raw, list.len()),
            }
        }
        Value::Object(_) => match index {
            Value::Str(name) => set_member(target, name, value),
            other => raise_type_error(&format!("object keys must be 'str', got '{}'", type_of(other))),
        },
        other => raise_type_error(&format!("'{}' is not indexable", type_of(other))),
    }
}

/// `target(args...)`
///
/// ## Panics
/// - `TypeError` if `target` is not a function, the argument count differs from its arity, or an argument's
///   dynamic type differs from the declared parameter type.
#[track_caller]
pub fn call(target: &Value, args: Vec<Value>) -> Value {
    let Value::Function(f) = target else {
        raise_type_error(&format!("'{}' is not callable", type_of(target)));
    };
    let Type::Function { parameters, .. } = f.ty() else {
        raise_type_error(&format!("'{}' is not callable", f.ty()));
    };
    if parameters.len() != args.len() {
        raise_type_error(&format!(
            "function of type '{}' takes {} argument(s), got {}",
            f.ty(),
            parameters.len(),
            args.len()
        ));
    }
    for (position, (param, arg)) in parameters.iter().zip(&args).enumerate() {
        let actual = type_of(arg);
        if !type_eq(param, &actual) {
            raise_type_error(&format!(
                "argument {} expected '{param}', got '{actual}'",
                position + 1
            ));
        }
    }
    f.invoke(args)
}
