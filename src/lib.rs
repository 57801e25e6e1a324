#![forbid(unsafe_code)]
//! Kythera Programming Language Compiler
//!
//! Kythera is a small, statically and structurally typed expression language. This crate provides the code
//! generator that lowers a typed Kythera program to Rust source targeting `kythera_runtime`, the compile
//! [`Session`] that chains lexer, parser and compiler over one or more units, and the `kythera` CLI. The lexer,
//! parser, scope and type system live in `kythera_syntax` and are re-exported here.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]` and `#![deny(clippy::expect_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **Generated code**: Language-level failures (division by zero, index out of range, bad dynamic cast) panic
//!   inside `kythera_runtime` with a `"<Kind>: <message>"` payload. The compiler itself never panics on bad input.

pub mod backend;
pub mod cli;
pub mod session;
pub mod version;

pub use kythera_syntax::ast;
pub use kythera_syntax::diagnostics;
pub use kythera_syntax::lexer;
pub use kythera_syntax::parser;
pub use kythera_syntax::scope;
pub use kythera_syntax::types;

pub use backend::{CompileOptions, CompiledUnit, Compiler, EmitError, ExportedSymbol};
pub use session::Session;
