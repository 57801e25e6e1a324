//! Token types for the Kythera lexer.
//!
//! The lexer uses **registry-backed IDs** for language vocabulary:
//! - `Keyword(KeywordId)` for reserved words
//! - `Operator(OperatorId)` for operators
//! - `Punctuation(PunctuationId)` for punctuation tokens
//!
//! ## Notes
//! - Automatic statement termination produces a *virtual* `;` token with an empty span; see [`Token::is_virtual`].
//!   Parsers should test for statement ends with [`TokenKind::is_terminator`], which covers both spellings.

use std::fmt;

use kythera_core::lang::keywords::{self, KeywordId};
use kythera_core::lang::operators::{self, OperatorId};
use kythera_core::lang::punctuation::{self, PunctuationId};

use crate::ast::{Position, Span};

// ============================================================================
// TOKEN TYPES
// ============================================================================

/// Kind of token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ========== Keyword / operator / punctuation (ID-based) ==========
    Keyword(KeywordId),
    Operator(OperatorId),
    Punctuation(PunctuationId),

    // ========== Identifiers and Literals ==========
    Ident(String),
    Int(i64),
    Float(f64),
    String(String),

    // ========== Special ==========
    Eof,
}

impl TokenKind {
    /// Coarse category name used in "expected X but got Y" messages.
    pub fn category(&self) -> &'static str {
        match self {
            TokenKind::Keyword(_) => "keyword",
            TokenKind::Operator(_) => "operator",
            TokenKind::Punctuation(_) => "symbol",
            TokenKind::Ident(_) => "identifier",
            TokenKind::Int(_) | TokenKind::Float(_) => "number",
            TokenKind::String(_) => "string",
            TokenKind::Eof => "end of input",
        }
    }

    pub fn keyword(&self) -> Option<KeywordId> {
        match self {
            TokenKind::Keyword(id) => Some(*id),
            _ => None,
        }
    }

    pub fn operator(&self) -> Option<OperatorId> {
        match self {
            TokenKind::Operator(id) => Some(*id),
            _ => None,
        }
    }

    pub fn punctuation(&self) -> Option<PunctuationId> {
        match self {
            TokenKind::Punctuation(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_keyword(&self, id: KeywordId) -> bool {
        self.keyword() == Some(id)
    }

    pub fn is_operator(&self, id: OperatorId) -> bool {
        self.operator() == Some(id)
    }

    pub fn is_punctuation(&self, id: PunctuationId) -> bool {
        self.punctuation() == Some(id)
    }

    /// `;`, written in the source or inserted at the end of a line.
    pub fn is_terminator(&self) -> bool {
        self.is_punctuation(PunctuationId::Semicolon)
    }

    /// A keyword the language sets aside but does not use yet (`each`, `break`, `import`, ...).
    pub fn reserved_keyword(&self) -> Option<KeywordId> {
        self.keyword()
            .filter(|id| keywords::category(*id) == keywords::KeywordCategory::Reserved)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Keyword(id) => write!(f, "keyword '{}'", keywords::as_str(*id)),
            TokenKind::Operator(id) => write!(f, "operator '{}'", operators::as_str(*id)),
            TokenKind::Punctuation(id) => write!(f, "symbol '{}'", punctuation::as_str(*id)),
            TokenKind::Ident(name) => write!(f, "identifier '{name}'"),
            TokenKind::Int(v) => write!(f, "number '{v}'"),
            TokenKind::Float(v) => write!(f, "number '{v:?}'"),
            TokenKind::String(s) => write!(f, "string {s:?}"),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}

/// A token with its kind, source span and start position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub position: Position,
}

impl Token {
    /// Construct a new token.
    pub fn new(kind: TokenKind, span: Span, position: Position) -> Self {
        Self { kind, span, position }
    }

    /// A statement terminator spliced in by automatic statement termination.
    pub fn terminator(offset: usize, position: Position) -> Self {
        Self::new(
            TokenKind::Punctuation(PunctuationId::Semicolon),
            Span::new(offset, offset),
            position,
        )
    }

    /// Return `true` for a terminator that was not written in the source.
    pub fn is_virtual(&self) -> bool {
        self.kind.is_terminator() && self.span.is_empty()
    }
}

/// Resolve an identifier spelling to a keyword id, if reserved.
pub fn keyword_id(name: &str) -> Option<KeywordId> {
    keywords::from_str(name)
}
