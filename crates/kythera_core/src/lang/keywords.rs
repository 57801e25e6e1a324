//! Define the reserved keyword vocabulary for the Kythera language.
//!
//! This module is the single source of truth for reserved words: a stable identifier ([`KeywordId`]) plus a const
//! metadata table ([`KEYWORDS`]) recording canonical spellings and how the parser treats each word.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - The keyword set is closed; the lexer classifies an identifier as a keyword by table membership.
//! - Some keywords are reserved for future syntax and rejected by the parser ([`KeywordCategory::Reserved`]).
//!
//! ## Examples
//! ```rust
//! use kythera_core::lang::keywords::{self, KeywordCategory, KeywordId};
//!
//! assert_eq!(keywords::from_str("typeof"), Some(KeywordId::Typeof));
//! assert_eq!(keywords::category(KeywordId::Int), KeywordCategory::BuiltinType);
//! assert_eq!(keywords::category(KeywordId::Each), KeywordCategory::Reserved);
//! ```

/// Stable identifier for every reserved keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordId {
    // Statements
    Let,
    If,
    Else,
    While,
    Return,

    // Expressions
    New,
    Typeof,
    As,
    This,
    True,
    False,
    Null,

    // Builtin types
    Bool,
    Int,
    Float,
    Str,
    Fn,
    Obj,
    Type,

    // Reserved
    Each,
    Break,
    Continue,
    List,
    Import,
    Export,
    Include,
}

/// Broad grouping used by the parser to dispatch keyword-led constructs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    /// Statement-introducing keywords (`let`, `if`, `else`, `while`, `return`).
    Statement,
    /// Keywords valid inside expressions (`new`, `typeof`, `as`, `this`, literals).
    Expression,
    /// Builtin type names that can start a type (`int`, `fn`, `obj`, ...).
    BuiltinType,
    /// Words reserved for future syntax; the parser rejects them.
    Reserved,
}

/// Metadata for a keyword.
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub id: KeywordId,
    pub canonical: &'static str,
    pub category: KeywordCategory,
}

/// Registry of all keywords.
pub const KEYWORDS: &[KeywordInfo] = &[
    info(KeywordId::Let, "let", KeywordCategory::Statement),
    info(KeywordId::If, "if", KeywordCategory::Statement),
    info(KeywordId::Else, "else", KeywordCategory::Statement),
    info(KeywordId::While, "while", KeywordCategory::Statement),
    info(KeywordId::Return, "return", KeywordCategory::Statement),
    info(KeywordId::New, "new", KeywordCategory::Expression),
    info(KeywordId::Typeof, "typeof", KeywordCategory::Expression),
    info(KeywordId::As, "as", KeywordCategory::Expression),
    info(KeywordId::This, "this", KeywordCategory::Expression),
    info(KeywordId::True, "true", KeywordCategory::Expression),
    info(KeywordId::False, "false", KeywordCategory::Expression),
    info(KeywordId::Null, "null", KeywordCategory::Expression),
    info(KeywordId::Bool, "bool", KeywordCategory::BuiltinType),
    info(KeywordId::Int, "int", KeywordCategory::BuiltinType),
    info(KeywordId::Float, "float", KeywordCategory::BuiltinType),
    info(KeywordId::Str, "str", KeywordCategory::BuiltinType),
    info(KeywordId::Fn, "fn", KeywordCategory::BuiltinType),
    info(KeywordId::Obj, "obj", KeywordCategory::BuiltinType),
    info(KeywordId::Type, "type", KeywordCategory::BuiltinType),
    info(KeywordId::Each, "each", KeywordCategory::Reserved),
    info(KeywordId::Break, "break", KeywordCategory::Reserved),
    info(KeywordId::Continue, "continue", KeywordCategory::Reserved),
    info(KeywordId::List, "list", KeywordCategory::Reserved),
    info(KeywordId::Import, "import", KeywordCategory::Reserved),
    info(KeywordId::Export, "export", KeywordCategory::Reserved),
    info(KeywordId::Include, "include", KeywordCategory::Reserved),
];

/// Canonical spelling.
///
/// ## Parameters
/// - `id`: Keyword identifier.
///
/// ## Returns
/// - The canonical spelling for `id`.
pub fn as_str(id: KeywordId) -> &'static str {
    info_for(id).canonical
}

/// Category.
pub fn category(id: KeywordId) -> KeywordCategory {
    info_for(id).category
}

/// Full metadata.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: KeywordId) -> &'static KeywordInfo {
    KEYWORDS.iter().find(|k| k.id == id).expect("keyword info missing")
}

/// Lookup by spelling.
///
/// ## Returns
/// - `Some(KeywordId)` if `s` is a reserved word, `None` otherwise.
pub fn from_str(s: &str) -> Option<KeywordId> {
    KEYWORDS.iter().find(|k| k.canonical == s).map(|k| k.id)
}

// --- helpers -----------------------------------------------------------------

const fn info(id: KeywordId, canonical: &'static str, category: KeywordCategory) -> KeywordInfo {
    KeywordInfo { id, canonical, category }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_keyword_round_trips_through_its_spelling() {
        for k in KEYWORDS {
            assert_eq!(from_str(k.canonical), Some(k.id), "{}", k.canonical);
        }
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(from_str("Let"), None);
        assert_eq!(from_str("letter"), None);
    }
}
