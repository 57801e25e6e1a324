//! Runtime type values.
//!
//! A [`Type`] is what `typeof` produces and what `as`/`new` consume at run time. It has the same shape and the
//! same canonical rendering as the compiler's type model, minus the parse-time-only forms (named, derived and
//! deferred types never reach generated code).

use std::fmt;

use kythera_core::lang::types::{self as tags, TypeTag};

/// A runtime type.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Int,
    Float,
    Bool,
    Str,
    Null,
    Type,
    /// Unconstrained; compatible with every type.
    Any,
    Function {
        parameters: Vec<Type>,
        returns: Box<Type>,
    },
    /// Members in declaration order.
    Object(Vec<(String, Type)>),
    List(Box<Type>),
}

impl Type {
    pub fn function(parameters: Vec<Type>, returns: Type) -> Type {
        Type::Function {
            parameters,
            returns: Box::new(returns),
        }
    }

    pub fn list(contains: Type) -> Type {
        Type::List(Box::new(contains))
    }

    /// Build an object type from `(name, type)` pairs.
    pub fn object<S: Into<String>>(members: impl IntoIterator<Item = (S, Type)>) -> Type {
        Type::Object(members.into_iter().map(|(n, t)| (n.into(), t)).collect())
    }

    pub fn tag(&self) -> TypeTag {
        match self {
            Type::Int => TypeTag::Int,
            Type::Float => TypeTag::Float,
            Type::Bool => TypeTag::Bool,
            Type::Str => TypeTag::Str,
            Type::Null => TypeTag::Null,
            Type::Type => TypeTag::Type,
            Type::Any => TypeTag::Any,
            Type::Function { .. } => TypeTag::Fn,
            Type::Object(_) => TypeTag::Obj,
            Type::List(_) => TypeTag::List,
        }
    }

    /// Type of member `name`, if this is an object type that has it.
    pub fn member(&self, name: &str) -> Option<&Type> {
        match self {
            Type::Object(members) => members.iter().find(|(n, _)| n == name).map(|(_, t)| t),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Function { parameters, returns } => {
                f.write_str("fn<")?;
                for (i, p) in parameters.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{p}")?;
                }
                write!(f, "> {returns}")
            }
            Type::Object(members) => {
                f.write_str("obj{")?;
                for (i, (name, ty)) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{ty} {name}")?;
                }
                f.write_str("}")
            }
            Type::List(c) => write!(f, "{c}[]"),
            other => f.write_str(tags::as_str(other.tag())),
        }
    }
}

/// Structural type equality, identical to the compiler's rule.
///
/// Member order of objects is irrelevant and `any` matches every type.
pub fn type_eq(a: &Type, b: &Type) -> bool {
    match (a, b) {
        (Type::Any, _) | (_, Type::Any) => true,
        (
            Type::Function {
                parameters: pa,
                returns: ra,
            },
            Type::Function {
                parameters: pb,
                returns: rb,
            },
        ) => pa.len() == pb.len() && pa.iter().zip(pb).all(|(x, y)| type_eq(x, y)) && type_eq(ra, rb),
        (Type::Object(ma), Type::Object(mb)) => {
            ma.len() == mb.len() && ma.iter().all(|(name, ta)| b.member(name).is_some_and(|tb| type_eq(ta, tb)))
        }
        (Type::List(ca), Type::List(cb)) => type_eq(ca, cb),
        (Type::Function { .. } | Type::Object(_) | Type::List(_), _)
        | (_, Type::Function { .. } | Type::Object(_) | Type::List(_)) => false,
        _ => a.tag() == b.tag(),
    }
}
