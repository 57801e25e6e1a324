//! Compile a typed Kythera [`Program`](kythera_syntax::ast::Program) into Rust source.
//!
//! The parser has already annotated every expression with a type, but those annotations cannot see through
//! `type` bindings (`Named`/`Derived` types are `any` to the parser). The [`Compiler`] therefore drives a scope of
//! its own, re-derives every type from the bindings it knows, and checks each rule again before emitting code.
//!
//! Emitted code targets `kythera_runtime`: a unit becomes `pub fn run(env: &mut Environment)`, every variable a
//! shared `Var` cell, every expression a runtime `Value`.
//!
//! ## Notes
//! - Emission builds a `TokenStream` with `quote`, parses it with `syn` and formats it with `prettyplease`.
//! - Runtime functions are called through their modules (`ops::add`, `access::call`). Module paths cannot be
//!   shadowed by program variables, which are emitted under their own names.
//! - A failing unit leaves the compiler scope exactly as it was before the unit.
//!
//! ## See also
//! - [`program`]: unit-level emission and formatting
//! - [`statements`]: `let`, `if`, `while`, `return`
//! - [`expressions`]: operators, access, calls, casts, assignment
//! - [`literals`]: function, list and object literals
//! - [`types`]: type resolution and runtime type construction

mod errors;
mod expressions;
mod literals;
mod names;
mod program;
mod statements;
mod types;

pub use errors::EmitError;

use std::collections::HashSet;

use kythera_syntax::scope::Scope;
use kythera_syntax::types::TypeNode;
use proc_macro2::TokenStream;

/// Knobs for the generated file prelude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Start the file with a `// Generated by the Kythera compiler` comment.
    pub emit_header: bool,
    /// Silence the lints generated code trips by construction (unused bindings, unreachable fallthrough).
    pub allow_lints: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            emit_header: true,
            allow_lints: true,
        }
    }
}

/// A top-level binding declared by a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedSymbol {
    pub name: String,
    /// Canonical rendering of the binding's type (`int`, `fn<int> str`, ...).
    pub ty: String,
}

/// Output of compiling one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledUnit {
    /// Formatted Rust source.
    pub code: String,
    /// New top-level bindings, in declaration order.
    pub symbols: Vec<ExportedSymbol>,
}

/// Stateful Kythera → Rust code generator.
///
/// Keep one instance alive to compile a sequence of units against each other's declarations (REPL-style use).
pub struct Compiler {
    scope: Scope,
    options: CompileOptions,
    /// Counter for synthetic identifiers (`__this_N`, `__object_N`, `__index_N`).
    next_temp: usize,
    /// Names assigned anywhere in the current unit. Their `type` values are not tracked statically.
    reassigned: HashSet<String>,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler {
    pub fn new() -> Self {
        Self::with_options(CompileOptions::default())
    }

    pub fn with_options(options: CompileOptions) -> Self {
        Self {
            scope: Scope::new(),
            options,
            next_temp: 0,
            reassigned: HashSet::new(),
        }
    }

    /// The compiler's scope, holding every top-level declaration compiled so far.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn options(&self) -> CompileOptions {
        self.options
    }
}

/// A compiled expression.
struct Compiled {
    /// Rust expression evaluating to a `Value`.
    code: TokenStream,
    /// Static type; `any` when only the runtime knows.
    ty: TypeNode,
    /// For expressions of type `type`: the type they evaluate to, when known at compile time.
    value: Option<TypeNode>,
}

impl Compiled {
    fn new(code: TokenStream, ty: TypeNode) -> Self {
        Self { code, ty, value: None }
    }

    fn with_value(mut self, value: Option<TypeNode>) -> Self {
        self.value = value;
        self
    }
}
