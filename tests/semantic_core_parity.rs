//! Parity tests: the compiler's type model and the runtime's must agree.
//!
//! Generated code defers to `kythera_runtime` whenever a type is only known at run time, so the two
//! implementations of rendering, structural equality, the cast matrix and zero values have to give the same answers.

use std::panic::{self, AssertUnwindSafe};

use kythera::types::{self, Primitive, Structure, TypeNode, ZeroValue};
use kythera_runtime::types as rt_types;
use kythera_runtime::{Type, Value, access, convert};

/// The runtime type generated code builds for a resolved compile-time type.
fn lower(ty: &TypeNode) -> Type {
    match ty {
        TypeNode::Primitive(p) => match p {
            Primitive::Int => Type::Int,
            Primitive::Float => Type::Float,
            Primitive::Bool => Type::Bool,
            Primitive::Str => Type::Str,
            Primitive::Null => Type::Null,
            Primitive::Type => Type::Type,
        },
        TypeNode::Function { parameters, returns } => Type::function(parameters.iter().map(lower).collect(), lower(returns)),
        TypeNode::Object(s) => Type::Object(s.iter().map(|(n, t)| (n.to_string(), lower(t))).collect()),
        TypeNode::List(c) => Type::list(lower(c)),
        TypeNode::Any => Type::Any,
        other => panic!("'{other}' never reaches generated code"),
    }
}

fn object(members: &[(&str, TypeNode)]) -> TypeNode {
    TypeNode::Object(members.iter().map(|(n, t)| (n.to_string(), t.clone())).collect::<Structure>())
}

fn sample_types() -> Vec<TypeNode> {
    vec![
        TypeNode::int(),
        TypeNode::float(),
        TypeNode::bool(),
        TypeNode::str(),
        TypeNode::null(),
        TypeNode::type_(),
        TypeNode::Any,
        TypeNode::function(vec![], TypeNode::null()),
        TypeNode::function(vec![TypeNode::int(), TypeNode::str()], TypeNode::bool()),
        object(&[]),
        object(&[("a", TypeNode::int()), ("b", TypeNode::list(TypeNode::str()))]),
        object(&[("b", TypeNode::list(TypeNode::str())), ("a", TypeNode::int())]),
        object(&[("a", TypeNode::float())]),
        TypeNode::list(TypeNode::int()),
        TypeNode::list(TypeNode::list(TypeNode::int())),
        TypeNode::list(TypeNode::Any),
    ]
}

#[test]
fn test_rendering_matches() {
    for ty in sample_types() {
        assert_eq!(ty.to_string(), lower(&ty).to_string());
    }
}

#[test]
fn test_structural_equality_matches() {
    let all = sample_types();
    for a in &all {
        for b in &all {
            assert_eq!(
                types::type_eq(a, b),
                rt_types::type_eq(&lower(a), &lower(b)),
                "type_eq disagrees on '{a}' and '{b}'"
            );
        }
    }
}

// =============================================================================
// Casts
// =============================================================================

fn sample_value(ty: &TypeNode) -> Value {
    match ty {
        TypeNode::Primitive(Primitive::Int) => Value::Int(3),
        TypeNode::Primitive(Primitive::Float) => Value::Float(2.5),
        TypeNode::Primitive(Primitive::Bool) => Value::Bool(true),
        TypeNode::Primitive(Primitive::Str) => Value::str("3"),
        TypeNode::Primitive(Primitive::Null) => Value::Null,
        TypeNode::Primitive(Primitive::Type) => Value::Type(Type::Int),
        other => convert::zero(&lower(other)),
    }
}

fn runtime_cast_succeeds(value: &Value, to: &Type) -> bool {
    panic::catch_unwind(AssertUnwindSafe(|| convert::cast(value, to))).is_ok()
}

#[test]
fn test_cast_matrix_matches() {
    let all: Vec<TypeNode> = sample_types().into_iter().filter(|t| !matches!(t, TypeNode::Any)).collect();
    for from in &all {
        let value = sample_value(from);
        for to in &all {
            // The runtime lets identity casts through for values typed `any`; the compiler rejects them statically.
            if types::type_eq(from, to) {
                continue;
            }
            assert_eq!(
                types::check_cast(from, to).is_ok(),
                runtime_cast_succeeds(&value, &lower(to)),
                "cast matrix disagrees on '{from}' as '{to}'"
            );
        }
    }
}

#[test]
fn test_object_casts_project_members() {
    let wide = object(&[("a", TypeNode::int()), ("b", TypeNode::str())]);
    let narrow = object(&[("a", TypeNode::int())]);
    assert!(types::check_cast(&wide, &narrow).is_ok());
    assert!(types::check_cast(&narrow, &wide).is_err());

    let value = Value::object([("a", Value::Int(1)), ("b", Value::str("x"))]);
    let cast = convert::cast(&value, &lower(&narrow));
    assert_eq!(convert::type_of(&cast).to_string(), "obj{int a}");
    assert!(!runtime_cast_succeeds(&cast, &lower(&wide)));
}

// =============================================================================
// Zero values
// =============================================================================

fn matches_zero(expected: &ZeroValue, actual: &Value) -> bool {
    match (expected, actual) {
        (ZeroValue::Int(a), Value::Int(b)) => a == b,
        (ZeroValue::Float(a), Value::Float(b)) => a == b,
        (ZeroValue::Bool(a), Value::Bool(b)) => a == b,
        (ZeroValue::Str(a), Value::Str(b)) => a == b,
        (ZeroValue::Null, Value::Null) => true,
        (ZeroValue::Type(t), Value::Type(u)) => rt_types::type_eq(&lower(t), u),
        (ZeroValue::Object(members), Value::Object(o)) => {
            o.members().len() == members.len()
                && members
                    .iter()
                    .all(|(name, z)| o.get(name).is_some_and(|v| matches_zero(z, &v)))
        }
        (ZeroValue::Function(ret), Value::Function(_)) => matches_zero(ret, &access::call(actual, Vec::new())),
        (ZeroValue::List(c), Value::List(l)) => l.is_empty() && rt_types::type_eq(&lower(c), &l.contains()),
        _ => false,
    }
}

#[test]
fn test_zero_values_match() {
    for ty in sample_types() {
        if matches!(ty, TypeNode::Any) {
            continue;
        }
        let expected = types::make_new(&ty).unwrap_or_else(|e| panic!("no zero value for '{ty}': {e}"));
        let actual = convert::zero(&lower(&ty));
        assert!(matches_zero(&expected, &actual), "zero of '{ty}' differs: {expected:?} vs {actual}");
    }
}

#[test]
fn test_any_has_no_zero_value() {
    assert!(types::make_new(&TypeNode::Any).is_err());
    assert!(panic::catch_unwind(|| convert::zero(&Type::Any)).is_err());
}
