//! Operator functions called by generated code.
//!
//! One function per operator in the `kythera_core` operator registry (`runtime_fn`). The compiler has already
//! checked operand types wherever they were known statically; these functions re-check dynamically and panic with
//! a `TypeError` for operands that reached them through `any`.
//!
//! ## Notes
//! - Integer arithmetic wraps on overflow.
//! - Integer `/` and `%` round toward negative infinity; float `/` is IEEE division. Both panic on a zero divisor.
//! - `and`/`or` take the right operand as a thunk so it is only evaluated when needed.

use kythera_core::num::{floor_div_i64, floor_mod_i64, floor_mod_f64};

use crate::convert::{as_bool, type_of};
use crate::errors::{raise_float_zero_division, raise_int_zero_division, raise_unsupported_operand};
use crate::types::type_eq;
use crate::value::Value;

#[cold]
#[track_caller]
fn unsupported(op: &str, left: &Value, right: &Value) -> ! {
    raise_unsupported_operand(op, &type_of(left).to_string(), &type_of(right).to_string())
}

/// Structural value equality: scalars by value, lists and objects element-wise, functions by identity.
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Float(a), Value::Float(b)) => a == b,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Null, Value::Null) => true,
        (Value::Type(a), Value::Type(b)) => type_eq(a, b),
        (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
        (Value::List(a), Value::List(b)) => {
            a.ptr_eq(b) || {
                let (xs, ys) = (a.items(), b.items());
                xs.len() == ys.len() && xs.iter().zip(ys.iter()).all(|(x, y)| values_equal(x, y))
            }
        }
        (Value::Object(a), Value::Object(b)) => {
            a.ptr_eq(b) || {
                let (ma, mb) = (a.members(), b.members());
                ma.len() == mb.len()
                    && ma.iter().all(|(name, x)| {
                        mb.iter().find(|(n, _)| n == name).is_some_and(|(_, y)| values_equal(x, y))
                    })
            }
        }
        _ => false,
    }
}

pub fn eq(left: &Value, right: &Value) -> Value {
    Value::Bool(values_equal(left, right))
}

pub fn ne(left: &Value, right: &Value) -> Value {
    Value::Bool(!values_equal(left, right))
}

fn compare(op: &str, left: &Value, right: &Value) -> std::cmp::Ordering {
    let ordering = match (left, right) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        _ => unsupported(op, left, right),
    };
    // NaN compares as neither less nor greater.
    ordering.unwrap_or(std::cmp::Ordering::Equal)
}

#[track_caller]
pub fn lt(left: &Value, right: &Value) -> Value {
    Value::Bool(compare("<", left, right).is_lt())
}

#[track_caller]
pub fn gt(left: &Value, right: &Value) -> Value {
    Value::Bool(compare(">", left, right).is_gt())
}

#[track_caller]
pub fn le(left: &Value, right: &Value) -> Value {
    Value::Bool(compare("<=", left, right).is_le())
}

#[track_caller]
pub fn ge(left: &Value, right: &Value) -> Value {
    Value::Bool(compare(">=", left, right).is_ge())
}

/// `+`: numeric addition or string concatenation.
#[track_caller]
pub fn add(left: &Value, right: &Value) -> Value {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Value::Int(a.wrapping_add(*b)),
        (Value::Float(a), Value::Float(b)) => Value::Float(a + b),
        (Value::Str(a), Value::Str(b)) => Value::Str(format!("{a}{b}")),
        _ => unsupported("+", left, right),
    }
}

#[track_caller]
pub fn sub(left: &Value, right: &Value) -> Value {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Value::Int(a.wrapping_sub(*b)),
        (Value::Float(a), Value::Float(b)) => Value::Float(a - b),
        _ => unsupported("-", left, right),
    }
}

#[track_caller]
pub fn mul(left: &Value, right: &Value) -> Value {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Value::Int(a.wrapping_mul(*b)),
        (Value::Float(a), Value::Float(b)) => Value::Float(a * b),
        _ => unsupported("*", left, right),
    }
}

/// `/`: floor division for ints, IEEE division for floats.
#[track_caller]
pub fn div(left: &Value, right: &Value) -> Value {
    match (left, right) {
        (Value::Int(_), Value::Int(0)) => raise_int_zero_division(),
        (Value::Int(a), Value::Int(b)) => Value::Int(floor_div_i64(*a, *b)),
        (Value::Float(_), Value::Float(b)) if *b == 0.0 => raise_float_zero_division(),
        (Value::Float(a), Value::Float(b)) => Value::Float(a / b),
        _ => unsupported("/", left, right),
    }
}

/// `%`: remainder with the sign of the divisor.
#[track_caller]
pub fn modulo(left: &Value, right: &Value) -> Value {
    match (left, right) {
        (Value::Int(_), Value::Int(0)) => raise_int_zero_division(),
        (Value::Int(a), Value::Int(b)) => Value::Int(floor_mod_i64(*a, *b)),
        (Value::Float(_), Value::Float(b)) if *b == 0.0 => raise_float_zero_division(),
        (Value::Float(a), Value::Float(b)) => Value::Float(floor_mod_f64(*a, *b)),
        _ => unsupported("%", left, right),
    }
}

/// `&&`; `right` runs only when `left` is `true`.
#[track_caller]
pub fn and(left: &Value, right: impl FnOnce() -> Value) -> Value {
    if !as_bool(left) {
        return Value::Bool(false);
    }
    Value::Bool(as_bool(&right()))
}

/// `||`; `right` runs only when `left` is `false`.
#[track_caller]
pub fn or(left: &Value, right: impl FnOnce() -> Value) -> Value {
    if as_bool(left) {
        return Value::Bool(true);
    }
    Value::Bool(as_bool(&right()))
}

/// `!`
#[track_caller]
pub fn not(target: &Value) -> Value {
    Value::Bool(!as_bool(target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Type;
    use proptest::prelude::*;
    use std::cell::Cell;

    #[test]
    fn test_division_floors_ints_only() {
        assert_eq!(div(&Value::Int(6), &Value::Int(4)), Value::Int(1));
        assert_eq!(div(&Value::Int(-6), &Value::Int(4)), Value::Int(-2));
        assert_eq!(div(&Value::Float(6.0), &Value::Float(4.0)), Value::Float(1.5));
        assert_eq!(modulo(&Value::Int(-7), &Value::Int(3)), Value::Int(2));
    }

    #[test]
    #[should_panic(expected = "ZeroDivisionError: integer division by zero")]
    fn test_int_division_by_zero_panics() {
        let _ = div(&Value::Int(1), &Value::Int(0));
    }

    #[test]
    #[should_panic(expected = "ZeroDivisionError: float division by zero")]
    fn test_float_modulo_by_zero_panics() {
        let _ = modulo(&Value::Float(1.0), &Value::Float(0.0));
    }

    #[test]
    fn test_string_concatenation() {
        assert_eq!(add(&Value::str("ab"), &Value::str("c")), Value::str("abc"));
    }

    #[test]
    #[should_panic(expected = "TypeError: unsupported operand types for -: 'str' and 'str'")]
    fn test_sub_rejects_strings() {
        let _ = sub(&Value::str("a"), &Value::str("b"));
    }

    #[test]
    fn test_and_or_short_circuit() {
        let calls = Cell::new(0);
        let right = || {
            calls.set(calls.get() + 1);
            Value::Bool(true)
        };
        assert_eq!(and(&Value::Bool(false), right), Value::Bool(false));
        assert_eq!(or(&Value::Bool(true), right), Value::Bool(true));
        assert_eq!(calls.get(), 0);
        assert_eq!(and(&Value::Bool(true), right), Value::Bool(true));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_equality_is_structural_for_containers() {
        let a = Value::list(Type::Int, vec![Value::Int(1), Value::Int(2)]);
        let b = Value::list(Type::Int, vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(eq(&a, &b), Value::Bool(true));
        let x = Value::object([("k", Value::str("v"))]);
        let y = Value::object([("k", Value::str("w"))]);
        assert_eq!(ne(&x, &y), Value::Bool(true));
    }

    #[test]
    fn test_functions_compare_by_identity() {
        let f = Value::function(Type::function(vec![], Type::Int), |_| Value::Int(1));
        let g = Value::function(Type::function(vec![], Type::Int), |_| Value::Int(1));
        assert_eq!(eq(&f, &f.clone()), Value::Bool(true));
        assert_eq!(eq(&f, &g), Value::Bool(false));
    }

    proptest! {
        #[test]
        fn prop_int_division_identity(a in any::<i32>(), b in any::<i32>().prop_filter("non-zero", |b| *b != 0)) {
            let (a, b) = (i64::from(a), i64::from(b));
            let Value::Int(q) = div(&Value::Int(a), &Value::Int(b)) else { unreachable!() };
            let Value::Int(r) = modulo(&Value::Int(a), &Value::Int(b)) else { unreachable!() };
            prop_assert_eq!(q * b + r, a);
            prop_assert!(r == 0 || (r < 0) == (b < 0));
        }
    }
}
