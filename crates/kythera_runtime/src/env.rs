//! Top-level bindings shared between compiled units.
//!
//! A compiled unit reads the bindings declared by earlier units from the [`Environment`] and registers its own
//! top-level declarations as they are executed. Callers enumerate the bindings afterwards to retrieve results.

use kythera_core::errors::ErrorKind;

use crate::errors::raise_kind_fmt;
use crate::value::Value;
use crate::var::Var;

/// Top-level bindings in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    bindings: Vec<(String, Var)>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a top-level binding. Re-registering a name replaces its cell in place.
    pub fn define(&mut self, name: &str, var: &Var) {
        match self.bindings.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = var.clone(),
            None => self.bindings.push((name.to_string(), var.clone())),
        }
    }

    /// The shared cell of a binding declared by an earlier unit.
    ///
    /// ## Panics
    /// - `KeyError` if no such binding exists (the unit was compiled against a different session).
    #[track_caller]
    pub fn var(&self, name: &str) -> Var {
        match self.bindings.iter().find(|(n, _)| n == name) {
            Some((_, var)) => var.clone(),
            None => raise_kind_fmt(ErrorKind::KeyError, format_args!("'{name}' is not defined")),
        }
    }

    /// Current value of a binding.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.bindings.iter().find(|(n, _)| n == name).map(|(_, v)| v.get())
    }

    /// Every binding with its current value, in declaration order.
    pub fn bindings(&self) -> impl Iterator<Item = (&str, Value)> + '_ {
        self.bindings.iter().map(|(n, v)| (n.as_str(), v.get()))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bindings_keep_declaration_order_and_share_cells() {
        let mut env = Environment::new();
        let a = Var::new(Value::Int(1));
        let b = Var::new(Value::str("x"));
        env.define("a", &a);
        env.define("b", &b);
        a.set(Value::Int(7));

        let names: Vec<_> = env.bindings().map(|(n, _)| n.to_string()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(env.get("a"), Some(Value::Int(7)));
        assert_eq!(env.var("b").get(), Value::str("x"));
    }

    #[test]
    #[should_panic(expected = "KeyError: 'missing' is not defined")]
    fn test_missing_binding_panics() {
        let _ = Environment::new().var("missing");
    }
}
