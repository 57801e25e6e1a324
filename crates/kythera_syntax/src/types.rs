//! Compile-time structural type system.
//!
//! [`TypeNode`] is the compile-time type value. Two types are equal when their shapes match ([`type_eq`]),
//! independent of names or of the order object members were declared in. The same module owns the cast
//! eligibility check (on top of the `kythera_core` cast matrix) and the zero-value rule ([`make_new`]).
//!
//! ## Notes
//! - `Named` and `Derived` types are only resolvable by the code generator, which knows the compile-time value of
//!   `type` bindings. The parser annotates what it cannot know with [`TypeNode::Any`].
//! - `Deferred` is a transient placeholder for a member of an object literal that has not been parsed yet. It is a
//!   key path into the literal's member skeleton and is resolved when the literal closes.
//!
//! ## Examples
//! ```rust
//! use kythera_syntax::types::{type_eq, Primitive, Structure, TypeNode};
//!
//! let mut a = Structure::default();
//! a.insert("x", TypeNode::Primitive(Primitive::Int)).unwrap();
//! a.insert("y", TypeNode::Primitive(Primitive::Str)).unwrap();
//! let mut b = Structure::default();
//! b.insert("y", TypeNode::Primitive(Primitive::Str)).unwrap();
//! b.insert("x", TypeNode::Primitive(Primitive::Int)).unwrap();
//! assert!(type_eq(&TypeNode::Object(a), &TypeNode::Object(b)));
//! ```

use std::fmt;

use kythera_core::lang::types::{self as tags, TypeTag};

use crate::ast::Node;
use crate::diagnostics::CompileError;

/// Singleton primitive types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Int,
    Float,
    Bool,
    Str,
    Null,
    Type,
}

impl Primitive {
    pub fn tag(self) -> TypeTag {
        match self {
            Primitive::Int => TypeTag::Int,
            Primitive::Float => TypeTag::Float,
            Primitive::Bool => TypeTag::Bool,
            Primitive::Str => TypeTag::Str,
            Primitive::Null => TypeTag::Null,
            Primitive::Type => TypeTag::Type,
        }
    }

    /// Inverse of [`Primitive::tag`] for singleton tags.
    pub fn from_tag(tag: TypeTag) -> Option<Primitive> {
        match tag {
            TypeTag::Int => Some(Primitive::Int),
            TypeTag::Float => Some(Primitive::Float),
            TypeTag::Bool => Some(Primitive::Bool),
            TypeTag::Str => Some(Primitive::Str),
            TypeTag::Null => Some(Primitive::Null),
            TypeTag::Type => Some(Primitive::Type),
            TypeTag::Fn | TypeTag::Obj | TypeTag::List | TypeTag::Any => None,
        }
    }
}

/// Ordered member map of an object type. Names are unique.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Structure {
    members: Vec<(String, TypeNode)>,
}

impl Structure {
    /// Append a member.
    ///
    /// ## Errors
    /// - Returns the rejected name if a member with that name already exists.
    pub fn insert(&mut self, name: impl Into<String>, ty: TypeNode) -> Result<(), String> {
        let name = name.into();
        if self.contains(&name) {
            return Err(name);
        }
        self.members.push((name, ty));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TypeNode> {
        self.members.iter().find(|(n, _)| n == name).map(|(_, t)| t)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.iter().any(|(n, _)| n == name)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeNode)> {
        self.members.iter().map(|(n, t)| (n.as_str(), t))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut TypeNode)> {
        self.members.iter_mut().map(|(n, t)| (n.as_str(), t))
    }
}

impl FromIterator<(String, TypeNode)> for Structure {
    /// Later duplicates are dropped.
    fn from_iter<I: IntoIterator<Item = (String, TypeNode)>>(iter: I) -> Self {
        let mut s = Structure::default();
        for (name, ty) in iter {
            let _ = s.insert(name, ty);
        }
        s
    }
}

/// One step of a deferred key path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Projection {
    /// `.name`
    Member(String),
    /// `[index]`
    Element,
    /// `(...)`
    Returns,
}

/// Key path into the member skeleton of an object literal that is still being parsed.
///
/// An empty path stands for the whole object (the type of `this`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeferredRef {
    pub object: usize,
    pub path: Vec<Projection>,
}

impl DeferredRef {
    pub fn project(&self, step: Projection) -> DeferredRef {
        let mut path = self.path.clone();
        path.push(step);
        DeferredRef {
            object: self.object,
            path,
        }
    }
}

/// The compile-time type value.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeNode {
    Primitive(Primitive),
    Function {
        parameters: Vec<TypeNode>,
        returns: Box<TypeNode>,
    },
    /// Rigid structural record.
    Object(Structure),
    List(Box<TypeNode>),
    /// A bare identifier bound to a `type` value.
    Named(String),
    /// A type computed from an expression.
    Derived(Box<Node>),
    /// Placeholder for a not-yet-parsed object member.
    Deferred(DeferredRef),
    /// Unconstrained: string-indexed object access, the empty list literal, and anything the parser cannot know.
    Any,
}

impl TypeNode {
    pub fn int() -> Self {
        TypeNode::Primitive(Primitive::Int)
    }

    pub fn float() -> Self {
        TypeNode::Primitive(Primitive::Float)
    }

    pub fn bool() -> Self {
        TypeNode::Primitive(Primitive::Bool)
    }

    pub fn str() -> Self {
        TypeNode::Primitive(Primitive::Str)
    }

    pub fn null() -> Self {
        TypeNode::Primitive(Primitive::Null)
    }

    pub fn type_() -> Self {
        TypeNode::Primitive(Primitive::Type)
    }

    pub fn function(parameters: Vec<TypeNode>, returns: TypeNode) -> Self {
        TypeNode::Function {
            parameters,
            returns: Box::new(returns),
        }
    }

    pub fn list(contains: TypeNode) -> Self {
        TypeNode::List(Box::new(contains))
    }

    /// Builtin tag, or `None` for `Named`, `Derived` and `Deferred`.
    pub fn tag(&self) -> Option<TypeTag> {
        match self {
            TypeNode::Primitive(p) => Some(p.tag()),
            TypeNode::Function { .. } => Some(TypeTag::Fn),
            TypeNode::Object(_) => Some(TypeTag::Obj),
            TypeNode::List(_) => Some(TypeTag::List),
            TypeNode::Any => Some(TypeTag::Any),
            TypeNode::Named(_) | TypeNode::Derived(_) | TypeNode::Deferred(_) => None,
        }
    }

    pub fn is_primitive(&self, p: Primitive) -> bool {
        matches!(self, TypeNode::Primitive(q) if *q == p)
    }

    pub fn is_numeric(&self) -> bool {
        self.tag().is_some_and(tags::is_numeric)
    }

    /// Return `true` when no `Named`, `Derived` or `Deferred` appears anywhere in the type.
    pub fn is_concrete(&self) -> bool {
        match self {
            TypeNode::Primitive(_) | TypeNode::Any => true,
            TypeNode::Function { parameters, returns } => {
                parameters.iter().all(TypeNode::is_concrete) && returns.is_concrete()
            }
            TypeNode::Object(s) => s.iter().all(|(_, t)| t.is_concrete()),
            TypeNode::List(c) => c.is_concrete(),
            TypeNode::Named(_) | TypeNode::Derived(_) | TypeNode::Deferred(_) => false,
        }
    }

    /// Return `true` when a `Deferred` placeholder appears anywhere in the type, including inside derived
    /// expressions.
    pub fn contains_deferred(&self) -> bool {
        match self {
            TypeNode::Deferred(_) => true,
            TypeNode::Primitive(_) | TypeNode::Any | TypeNode::Named(_) => false,
            TypeNode::Function { parameters, returns } => {
                parameters.iter().any(TypeNode::contains_deferred) || returns.contains_deferred()
            }
            TypeNode::Object(s) => s.iter().any(|(_, t)| t.contains_deferred()),
            TypeNode::List(c) => c.contains_deferred(),
            TypeNode::Derived(expr) => {
                let mut found = false;
                expr.walk(&mut |n| {
                    found |= n.ty.as_ref().is_some_and(TypeNode::contains_deferred);
                });
                found
            }
        }
    }

    /// Visit every expression node embedded in this type (through `Derived`).
    pub fn walk_nodes(&self, f: &mut dyn FnMut(&Node)) {
        match self {
            TypeNode::Derived(expr) => expr.walk(f),
            TypeNode::Function { parameters, returns } => {
                for p in parameters {
                    p.walk_nodes(f);
                }
                returns.walk_nodes(f);
            }
            TypeNode::Object(s) => {
                for (_, t) in s.iter() {
                    t.walk_nodes(f);
                }
            }
            TypeNode::List(c) => c.walk_nodes(f),
            TypeNode::Primitive(_) | TypeNode::Named(_) | TypeNode::Deferred(_) | TypeNode::Any => {}
        }
    }

    /// Visit every expression node embedded in this type (through `Derived`), mutably.
    pub fn walk_nodes_mut(
        &mut self,
        f: &mut dyn FnMut(&mut Node) -> Result<(), CompileError>,
    ) -> Result<(), CompileError> {
        match self {
            TypeNode::Derived(expr) => expr.walk_mut(f),
            TypeNode::Function { parameters, returns } => {
                for p in parameters {
                    p.walk_nodes_mut(f)?;
                }
                returns.walk_nodes_mut(f)
            }
            TypeNode::Object(s) => {
                for (_, t) in s.iter_mut() {
                    t.walk_nodes_mut(f)?;
                }
                Ok(())
            }
            TypeNode::List(c) => c.walk_nodes_mut(f),
            TypeNode::Primitive(_) | TypeNode::Named(_) | TypeNode::Deferred(_) | TypeNode::Any => Ok(()),
        }
    }
}

impl fmt::Display for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeNode::Primitive(p) => f.write_str(tags::as_str(p.tag())),
            TypeNode::Function { parameters, returns } => {
                f.write_str("fn<")?;
                for (i, p) in parameters.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{p}")?;
                }
                write!(f, "> {returns}")
            }
            TypeNode::Object(s) => {
                f.write_str("obj{")?;
                for (i, (name, ty)) in s.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{ty} {name}")?;
                }
                f.write_str("}")
            }
            TypeNode::List(c) => write!(f, "{c}[]"),
            TypeNode::Named(name) => f.write_str(name),
            TypeNode::Derived(_) => f.write_str("<derived>"),
            TypeNode::Deferred(_) => f.write_str("<deferred>"),
            TypeNode::Any => f.write_str("any"),
        }
    }
}

// ============================================================================
// Structural equality
// ============================================================================

/// Structural type equality.
///
/// ## Returns
/// - `true` when the shapes match: same primitive tag; functions with pairwise-equal parameters and equal returns;
///   objects with the same member names and pairwise-equal member types (member order is irrelevant); lists with
///   equal element types. `Any` is compatible with every type. Named types compare by name, deferred placeholders
///   by key path. Derived types are never equal to anything: they must be resolved first.
///
/// ## Notes
/// - The relation is symmetric and independent of object member insertion order.
pub fn type_eq(a: &TypeNode, b: &TypeNode) -> bool {
    match (a, b) {
        (TypeNode::Any, _) | (_, TypeNode::Any) => true,
        (TypeNode::Primitive(x), TypeNode::Primitive(y)) => x == y,
        (
            TypeNode::Function {
                parameters: pa,
                returns: ra,
            },
            TypeNode::Function {
                parameters: pb,
                returns: rb,
            },
        ) => pa.len() == pb.len() && pa.iter().zip(pb).all(|(x, y)| type_eq(x, y)) && type_eq(ra, rb),
        (TypeNode::Object(sa), TypeNode::Object(sb)) => {
            sa.len() == sb.len()
                && sa
                    .iter()
                    .all(|(name, ta)| sb.get(name).is_some_and(|tb| type_eq(ta, tb)))
        }
        (TypeNode::List(ca), TypeNode::List(cb)) => type_eq(ca, cb),
        (TypeNode::Named(x), TypeNode::Named(y)) => x == y,
        (TypeNode::Deferred(x), TypeNode::Deferred(y)) => x == y,
        _ => false,
    }
}

// ============================================================================
// Casting
// ============================================================================

/// Check whether a value of type `from` may be cast to `to`.
///
/// ## Errors
/// - A message naming both types when the cast matrix forbids the conversion, when an object-to-object cast asks
///   for a member the source lacks (or has with a different type), or when either side is unresolved.
pub fn check_cast(from: &TypeNode, to: &TypeNode) -> Result<(), String> {
    let (Some(from_tag), Some(to_tag)) = (from.tag(), to.tag()) else {
        return Err(format!("cannot cast '{from}' to unresolved type '{to}'"));
    };
    if !tags::can_cast(from_tag, to_tag) {
        return Err(format!("cannot cast '{from}' to '{to}'"));
    }
    if let (TypeNode::Object(src), TypeNode::Object(dst)) = (from, to) {
        for (name, ty) in dst.iter() {
            match src.get(name) {
                Some(have) if type_eq(have, ty) => {}
                Some(have) => {
                    return Err(format!(
                        "cannot cast '{from}' to '{to}': member '{name}' has type '{have}', expected '{ty}'"
                    ));
                }
                None => return Err(format!("cannot cast '{from}' to '{to}': missing member '{name}'")),
            }
        }
    }
    Ok(())
}

// ============================================================================
// Zero values
// ============================================================================

/// Compile-time description of a type's zero value.
#[derive(Debug, Clone, PartialEq)]
pub enum ZeroValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Null,
    /// The zero value of `type` is the `type` primitive itself.
    Type(TypeNode),
    /// Every member zero-valued, in declaration order.
    Object(Vec<(String, ZeroValue)>),
    /// A function that immediately returns this value.
    Function(Box<ZeroValue>),
    /// An empty list of the given element type.
    List(TypeNode),
}

/// The zero-value rule (`new T`).
///
/// ## Errors
/// - A message when `ty` is unresolved (`Named`, `Derived`, `Deferred`) or unconstrained (`Any`).
pub fn make_new(ty: &TypeNode) -> Result<ZeroValue, String> {
    Ok(match ty {
        TypeNode::Primitive(Primitive::Int) => ZeroValue::Int(0),
        TypeNode::Primitive(Primitive::Float) => ZeroValue::Float(0.0),
        TypeNode::Primitive(Primitive::Bool) => ZeroValue::Bool(false),
        TypeNode::Primitive(Primitive::Str) => ZeroValue::Str(String::new()),
        TypeNode::Primitive(Primitive::Null) => ZeroValue::Null,
        TypeNode::Primitive(Primitive::Type) => ZeroValue::Type(TypeNode::type_()),
        TypeNode::Object(s) => ZeroValue::Object(
            s.iter()
                .map(|(name, t)| make_new(t).map(|z| (name.to_string(), z)))
                .collect::<Result<_, _>>()?,
        ),
        TypeNode::Function { returns, .. } => ZeroValue::Function(Box::new(make_new(returns)?)),
        TypeNode::List(c) => ZeroValue::List((**c).clone()),
        TypeNode::Any => return Err("cannot construct a value of unconstrained type 'any'".to_string()),
        TypeNode::Named(_) | TypeNode::Derived(_) | TypeNode::Deferred(_) => {
            return Err(format!("cannot construct a value of unresolved type '{ty}'"));
        }
    })
}
