//! Punctuation vocabulary.
//!
//! Kythera punctuation is always a single character: delimiters, separators, the statement terminator and the
//! member-access dot.
//!
//! ## Examples
//! ```rust
//! use kythera_core::lang::punctuation::{self, PunctuationId};
//!
//! assert_eq!(punctuation::from_char(';'), Some(PunctuationId::Semicolon));
//! assert_eq!(punctuation::as_str(PunctuationId::LBrace), "{");
//! ```

/// Stable identifier for punctuation tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunctuationId {
    Comma,
    Semicolon,
    Colon,
    Dot,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
}

/// Metadata for a punctuation token.
#[derive(Debug, Clone, Copy)]
pub struct PunctuationInfo {
    pub id: PunctuationId,
    pub spelling: char,
    /// Whether the token closes a group. Closing tokens trigger automatic statement termination.
    pub closes_group: bool,
}

/// Registry of all punctuation.
pub const PUNCTUATION: &[PunctuationInfo] = &[
    info(PunctuationId::Comma, ',', false),
    info(PunctuationId::Semicolon, ';', false),
    info(PunctuationId::Colon, ':', false),
    info(PunctuationId::Dot, '.', false),
    info(PunctuationId::LParen, '(', false),
    info(PunctuationId::RParen, ')', true),
    info(PunctuationId::LBrace, '{', false),
    info(PunctuationId::RBrace, '}', true),
    info(PunctuationId::LBracket, '[', false),
    info(PunctuationId::RBracket, ']', true),
];

/// Canonical spelling.
pub fn as_str(id: PunctuationId) -> &'static str {
    match id {
        PunctuationId::Comma => ",",
        PunctuationId::Semicolon => ";",
        PunctuationId::Colon => ":",
        PunctuationId::Dot => ".",
        PunctuationId::LParen => "(",
        PunctuationId::RParen => ")",
        PunctuationId::LBrace => "{",
        PunctuationId::RBrace => "}",
        PunctuationId::LBracket => "[",
        PunctuationId::RBracket => "]",
    }
}

/// Full metadata.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: PunctuationId) -> &'static PunctuationInfo {
    PUNCTUATION.iter().find(|p| p.id == id).expect("punctuation info missing")
}

/// Lookup by character.
pub fn from_char(c: char) -> Option<PunctuationId> {
    PUNCTUATION.iter().find(|p| p.spelling == c).map(|p| p.id)
}

/// Return `true` if `id` closes a group (`)`, `]`, `}`).
pub fn closes_group(id: PunctuationId) -> bool {
    info_for(id).closes_group
}

const fn info(id: PunctuationId, spelling: char, closes_group: bool) -> PunctuationInfo {
    PunctuationInfo {
        id,
        spelling,
        closes_group,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spellings_agree_with_registry() {
        for p in PUNCTUATION {
            assert_eq!(as_str(p.id), p.spelling.to_string());
            assert_eq!(from_char(p.spelling), Some(p.id));
        }
    }
}
