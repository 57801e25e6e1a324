//! Kythera language vocabulary registries.
//!
//! This module is the "front door" for language-level vocabulary: reserved keywords, operators, punctuation,
//! builtin type tags and the cast matrix.
//!
//! The design goal is to avoid stringly-typed checks scattered across the compiler and runtime. Callers work with
//! **stable IDs** (e.g. `KeywordId`, `OperatorId`) and look up spellings/metadata via `const` registry tables that
//! are built once and shared by reference.
//!
//! ## Notes
//! - Registries are **pure**: no AST types, no IO, no side effects.
//! - The lexer/parser enforce syntax; registries provide spellings and metadata (precedence, runtime function
//!   names, cast targets).
//!
//! ## Examples
//! ```rust
//! use kythera_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("let"), Some(KeywordId::Let));
//! assert_eq!(keywords::as_str(KeywordId::Let), "let");
//! ```

pub mod keywords;
pub mod operators;
pub mod punctuation;
pub mod rust_keywords;
pub mod types;
