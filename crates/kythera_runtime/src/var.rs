//! Variable bindings.
//!
//! Every Kythera variable is a shared mutable cell so closures can capture it by cloning the handle and still
//! observe (and make) later assignments.

use std::cell::RefCell;
use std::rc::Rc;

use crate::value::Value;

/// A shared mutable binding.
#[derive(Debug, Clone)]
pub struct Var(Rc<RefCell<Value>>);

impl Var {
    pub fn new(value: Value) -> Self {
        Var(Rc::new(RefCell::new(value)))
    }

    /// Current value (objects and lists are returned as shared handles).
    pub fn get(&self) -> Value {
        self.0.borrow().clone()
    }

    /// Store `value` and return it, so an assignment can be used as an expression.
    pub fn set(&self, value: Value) -> Value {
        *self.0.borrow_mut() = value.clone();
        value
    }
}
