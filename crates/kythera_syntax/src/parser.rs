//! Parser for the Kythera programming language
//!
//! Converts a token stream into a typed AST. Semantic analysis happens while parsing: identifiers are resolved
//! through a [`Scope`], every expression node is annotated with its inferred [`TypeNode`], and self-references
//! inside object literals are resolved before the literal's node is returned.
//!
//! ## Examples
//!
//! ```rust
//! use kythera_syntax::{lexer, parser};
//!
//! let source = "let o = { c = <>int{ return this.a + 10 }, a = 5, }\n";
//! let tokens = lexer::lex(source).unwrap();
//! let program = parser::parse(&tokens).unwrap();
//! assert_eq!(program.statements.len(), 1);
//! ```

use kythera_core::lang::keywords::{self, KeywordCategory, KeywordId};
use kythera_core::lang::operators::{self, OperatorCategory, OperatorId};
use kythera_core::lang::punctuation::PunctuationId;

use crate::ast::*;
use crate::diagnostics::{CompileError, ErrorKind};
use crate::lexer::{Token, TokenKind};
use crate::scope::{FrameKind, Scope};
use crate::types::{self, DeferredRef, Primitive, Projection, Structure, TypeNode};

// NOTE: This module is split across multiple files using `include!` to keep all parser
// methods in the same Rust module (preserving privacy + call patterns) while avoiding
// a single large source file.

include!("parser/core.rs");
include!("parser/helpers.rs");
include!("parser/types.rs");
include!("parser/stmts.rs");
include!("parser/expr.rs");
include!("parser/literals.rs");
include!("parser/objects.rs");
include!("parser/api.rs");
include!("parser/tests.rs");
