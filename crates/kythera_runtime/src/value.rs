//! Runtime data values.
//!
//! Scalars are stored inline. Objects and lists are shared, interior-mutable handles: copying a [`Value`] copies
//! the handle, so mutation through one binding is visible through every other. Functions carry their declared
//! [`Type`] next to the closure that implements them.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::types::Type;

/// A runtime value.
#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Null,
    Type(Type),
    Function(Function),
    Object(Object),
    List(List),
}

impl Value {
    pub fn str(s: impl Into<String>) -> Value {
        Value::Str(s.into())
    }

    /// Wrap a closure as a function value of type `ty`.
    pub fn function(ty: Type, body: impl Fn(Vec<Value>) -> Value + 'static) -> Value {
        Value::Function(Function::new(ty, body))
    }

    pub fn list(contains: Type, items: Vec<Value>) -> Value {
        Value::List(List::new(contains, items))
    }

    pub fn object<S: Into<String>>(members: impl IntoIterator<Item = (S, Value)>) -> Value {
        let object = Object::new();
        for (name, value) in members {
            object.define(name, value);
        }
        Value::Object(object)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        crate::ops::values_equal(self, other)
    }
}

/// Renders the value the way `as str` does.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(self, f, false)
    }
}

fn render(value: &Value, f: &mut fmt::Formatter<'_>, nested: bool) -> fmt::Result {
    match value {
        Value::Int(v) => write!(f, "{v}"),
        Value::Float(v) => write!(f, "{v}"),
        Value::Bool(v) => write!(f, "{v}"),
        Value::Str(s) if nested => write!(f, "{s:?}"),
        Value::Str(s) => f.write_str(s),
        Value::Null => f.write_str("null"),
        Value::Type(t) => write!(f, "{t}"),
        Value::Function(func) => write!(f, "{}", func.ty()),
        Value::Object(object) => {
            f.write_str("{")?;
            for (i, (name, member)) in object.members().iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{name} = ")?;
                render(member, f, true)?;
            }
            f.write_str("}")
        }
        Value::List(list) => {
            f.write_str("[")?;
            for (i, item) in list.items().iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                render(item, f, true)?;
            }
            f.write_str("]")
        }
    }
}

// ============================================================================
// Functions
// ============================================================================

struct FunctionInner {
    ty: Type,
    body: Box<dyn Fn(Vec<Value>) -> Value>,
}

/// A callable value. Equality is identity.
#[derive(Clone)]
pub struct Function(Rc<FunctionInner>);

impl Function {
    pub fn new(ty: Type, body: impl Fn(Vec<Value>) -> Value + 'static) -> Self {
        Function(Rc::new(FunctionInner {
            ty,
            body: Box::new(body),
        }))
    }

    /// Declared `fn<...> R` type.
    pub fn ty(&self) -> &Type {
        &self.0.ty
    }

    /// Invoke without checking arguments; see [`crate::access::call`] for the checked entry point.
    pub fn invoke(&self, args: Vec<Value>) -> Value {
        (self.0.body)(args)
    }

    pub fn ptr_eq(&self, other: &Function) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function").field("ty", &self.0.ty).finish_non_exhaustive()
    }
}

// ============================================================================
// Objects
// ============================================================================

/// A shared, rigid record. Members keep their definition order.
#[derive(Debug, Clone, Default)]
pub struct Object(Rc<RefCell<Vec<(String, Value)>>>);

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a member. Used while an object literal is being built.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        let name = name.into();
        let mut members = self.0.borrow_mut();
        match members.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => members.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.0.borrow().iter().find(|(n, _)| n == name).map(|(_, v)| v.clone())
    }

    /// Replace an existing member; returns `false` if the object has no such member.
    pub fn replace(&self, name: &str, value: Value) -> bool {
        match self.0.borrow_mut().iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn members(&self) -> Ref<'_, Vec<(String, Value)>> {
        self.0.borrow()
    }

    pub fn ptr_eq(&self, other: &Object) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

// ============================================================================
// Lists
// ============================================================================

#[derive(Debug)]
struct ListInner {
    contains: Type,
    items: Vec<Value>,
}

/// A shared, growable list with a fixed element type.
#[derive(Debug, Clone)]
pub struct List(Rc<RefCell<ListInner>>);

impl List {
    pub fn new(contains: Type, items: Vec<Value>) -> Self {
        List(Rc::new(RefCell::new(ListInner { contains, items })))
    }

    pub fn contains(&self) -> Type {
        self.0.borrow().contains.clone()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.borrow().items.get(index).cloned()
    }

    /// Replace the element at `index`, or append when `index == len`. Returns `false` when out of range.
    pub fn put(&self, index: usize, value: Value) -> bool {
        let mut inner = self.0.borrow_mut();
        if index < inner.items.len() {
            inner.items[index] = value;
            true
        } else if index == inner.items.len() {
            inner.items.push(value);
            true
        } else {
            false
        }
    }

    pub fn items(&self) -> Ref<'_, Vec<Value>> {
        Ref::map(self.0.borrow(), |inner| &inner.items)
    }

    pub fn ptr_eq(&self, other: &List) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
