//! Map Kythera identifiers onto Rust identifiers.
//!
//! Kythera identifiers are ASCII `[A-Za-z_][A-Za-z0-9_]*`, so most pass through unchanged. Rust keywords are
//! escaped as raw identifiers (`r#match`). Names Rust cannot bind at all (`self`, `_`, prelude variants such as
//! `None`) and every name starting with `__` are prefixed with `__k_`. Synthetic names emitted by the compiler
//! (`__this_0`, `__args`, `__env`) start with `__` but never with `__k_`, so the two sets cannot collide.
//! Names exported by the runtime prelude are prefixed too: `let` cannot shadow a tuple struct such as `Var`.

use kythera_core::lang::rust_keywords;
use proc_macro2::{Ident, Span};
use quote::format_ident;

/// Items `use kythera_runtime::prelude::*` brings into generated code.
const RUNTIME_PRELUDE: &[&str] = &["Environment", "Type", "Function", "List", "Object", "Value", "Var"];

/// Rust identifier for a program variable.
pub(super) fn var_ident(name: &str) -> Ident {
    if name.starts_with("__")
        || rust_keywords::is_unrawable(name)
        || rust_keywords::is_prelude_variant(name)
        || RUNTIME_PRELUDE.contains(&name)
    {
        return format_ident!("__k_{}", name);
    }
    if rust_keywords::is_keyword(name) {
        return Ident::new_raw(name, Span::call_site());
    }
    format_ident!("{}", name)
}

/// Rust identifier for a synthetic binding (`this` handles, temporaries).
pub(super) fn synthetic_ident(name: &str) -> Ident {
    format_ident!("{}", name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_names_pass_through() {
        assert_eq!(var_ident("counter").to_string(), "counter");
        assert_eq!(var_ident("Values").to_string(), "Values");
    }

    #[test]
    fn test_rust_keywords_are_raw() {
        assert_eq!(var_ident("match").to_string(), "r#match");
        assert_eq!(var_ident("loop").to_string(), "r#loop");
    }

    #[test]
    fn test_unbindable_names_are_prefixed() {
        assert_eq!(var_ident("self").to_string(), "__k_self");
        assert_eq!(var_ident("_").to_string(), "__k__");
        assert_eq!(var_ident("None").to_string(), "__k_None");
        assert_eq!(var_ident("__this_0").to_string(), "__k___this_0");
        assert_eq!(var_ident("Var").to_string(), "__k_Var");
    }
}
