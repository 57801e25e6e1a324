//! Syntax frontend for the Kythera language: lexer, typed AST, scope, structural types, parser, diagnostics.
//!
//! Kythera performs semantic analysis *while* parsing: the parser resolves identifiers through a [`scope::Scope`]
//! and annotates every expression node with a [`types::TypeNode`] as it builds the tree. The code generator in the
//! `kythera` crate re-derives and verifies those types.
//!
//! ## Notes
//! - Vocabulary identity (keywords/operators/punctuation/type tags) comes from `kythera_core::lang` registries.
//! - Processing is fail-fast: every stage returns the first [`diagnostics::CompileError`] it hits.
//!
//! ## Examples
//! ```rust
//! use kythera_syntax::{lexer, parser};
//!
//! let tokens = lexer::lex("let a = 2 + 3 * 4\n").unwrap();
//! let program = parser::parse(&tokens).unwrap();
//! assert_eq!(program.statements.len(), 1);
//! ```

pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod scope;
pub mod types;
