//! Operator vocabulary.
//!
//! This module defines the canonical operator set along with the metadata the parser and code generator share:
//! binding precedence, fixity, and the name of the runtime function that implements the operator.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive** and exact: the lexer munches the longest run of operator
//!   characters and a run that is not listed here is rejected.
//! - Precedence is a relative ordering where higher binds tighter. Binary climbing only consumes an operator
//!   whose precedence strictly exceeds the caller's threshold, so infix operators associate to the left. The
//!   assignment family is the exception: its right-hand side is climbed one level lower.
//! - `<>` is not an operator in the arithmetic sense; it is the empty parameter list of a function literal or
//!   function type, and it appears here because maximal munch produces it from operator characters.
//!
//! ## Examples
//! ```rust
//! use kythera_core::lang::operators::{self, OperatorId};
//!
//! assert_eq!(operators::from_str("+"), Some(OperatorId::Plus));
//! assert_eq!(operators::info_for(OperatorId::Star).precedence, 20);
//! assert_eq!(operators::runtime_fn(OperatorId::Percent), Some("modulo"));
//! ```

/// Define whether an operator is infix (binary), prefix (unary), or a structural marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fixity {
    Infix,
    Prefix,
    Marker,
}

/// Semantic grouping of operators; the type checker dispatches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorCategory {
    /// `=` and the compound assignments.
    Assignment,
    /// `&&`, `||`: both operands must be `bool`.
    Logical,
    /// `<`, `>`, `<=`, `>=`: both operands must be numeric.
    Ordering,
    /// `==`, `!=`: any pair of equal types.
    Equality,
    /// `+`: numeric addition or string concatenation.
    Additive,
    /// `-`, `*`, `/`, `%`: numeric only.
    Arithmetic,
    /// `!`
    Not,
    /// `<>`
    EmptyParams,
}

/// Stable identifier for every operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorId {
    // Assignment
    Eq,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,

    // Logical
    OrOr,
    AndAnd,

    // Comparison
    EqEq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,

    // Arithmetic
    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    // Prefix
    Bang,

    // Structural
    LtGt,
}

/// Metadata for an operator.
#[derive(Debug, Clone, Copy)]
pub struct OperatorInfo {
    pub id: OperatorId,
    pub spelling: &'static str,
    /// Binding strength for infix operators (0 for prefix operators and markers).
    pub precedence: u8,
    pub fixity: Fixity,
    pub category: OperatorCategory,
    /// Runtime function implementing the operator (`None` for `=` and markers).
    pub runtime_fn: Option<&'static str>,
    /// For compound assignments, the binary operator applied before the write.
    pub compound_of: Option<OperatorId>,
}

/// Registry of all operators.
pub const OPERATORS: &[OperatorInfo] = &[
    // Assignment
    assign(OperatorId::Eq, "=", None),
    assign(OperatorId::PlusEq, "+=", Some(OperatorId::Plus)),
    assign(OperatorId::MinusEq, "-=", Some(OperatorId::Minus)),
    assign(OperatorId::StarEq, "*=", Some(OperatorId::Star)),
    assign(OperatorId::SlashEq, "/=", Some(OperatorId::Slash)),
    assign(OperatorId::PercentEq, "%=", Some(OperatorId::Percent)),
    // Logical
    infix(OperatorId::OrOr, "||", 2, OperatorCategory::Logical, "or"),
    infix(OperatorId::AndAnd, "&&", 3, OperatorCategory::Logical, "and"),
    // Comparison
    infix(OperatorId::EqEq, "==", 7, OperatorCategory::Equality, "eq"),
    infix(OperatorId::NotEq, "!=", 7, OperatorCategory::Equality, "ne"),
    infix(OperatorId::Lt, "<", 7, OperatorCategory::Ordering, "lt"),
    infix(OperatorId::Gt, ">", 7, OperatorCategory::Ordering, "gt"),
    infix(OperatorId::LtEq, "<=", 7, OperatorCategory::Ordering, "le"),
    infix(OperatorId::GtEq, ">=", 7, OperatorCategory::Ordering, "ge"),
    // Arithmetic
    infix(OperatorId::Plus, "+", 10, OperatorCategory::Additive, "add"),
    infix(OperatorId::Minus, "-", 10, OperatorCategory::Arithmetic, "sub"),
    infix(OperatorId::Star, "*", 20, OperatorCategory::Arithmetic, "mul"),
    infix(OperatorId::Slash, "/", 20, OperatorCategory::Arithmetic, "div"),
    infix(OperatorId::Percent, "%", 20, OperatorCategory::Arithmetic, "modulo"),
    // Prefix
    OperatorInfo {
        id: OperatorId::Bang,
        spelling: "!",
        precedence: 0,
        fixity: Fixity::Prefix,
        category: OperatorCategory::Not,
        runtime_fn: Some("not"),
        compound_of: None,
    },
    // Structural
    OperatorInfo {
        id: OperatorId::LtGt,
        spelling: "<>",
        precedence: 0,
        fixity: Fixity::Marker,
        category: OperatorCategory::EmptyParams,
        runtime_fn: None,
        compound_of: None,
    },
];

/// Characters that may form an operator token.
pub const OPERATOR_CHARS: &[char] = &['+', '-', '*', '/', '%', '=', '&', '|', '<', '>', '!', '~'];

/// Return `true` if `c` belongs to the operator character class.
pub fn is_operator_char(c: char) -> bool {
    OPERATOR_CHARS.contains(&c)
}

/// Return the full metadata entry for an operator.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: OperatorId) -> &'static OperatorInfo {
    OPERATORS.iter().find(|o| o.id == id).expect("operator info missing")
}

/// Resolve an operator spelling to its identifier.
///
/// ## Returns
/// - `Some(OperatorId)` if the spelling exists in [`OPERATORS`], `None` otherwise.
pub fn from_str(spelling: &str) -> Option<OperatorId> {
    OPERATORS.iter().find(|o| o.spelling == spelling).map(|o| o.id)
}

/// Canonical spelling.
pub fn as_str(id: OperatorId) -> &'static str {
    info_for(id).spelling
}

/// Binding precedence of an infix operator, or `None` for prefix operators and markers.
pub fn infix_precedence(id: OperatorId) -> Option<u8> {
    let info = info_for(id);
    match info.fixity {
        Fixity::Infix => Some(info.precedence),
        Fixity::Prefix | Fixity::Marker => None,
    }
}

/// Semantic category.
pub fn category(id: OperatorId) -> OperatorCategory {
    info_for(id).category
}

/// Name of the runtime function implementing `id`.
pub fn runtime_fn(id: OperatorId) -> Option<&'static str> {
    info_for(id).runtime_fn
}

/// Return `true` for `=` and the compound assignments.
pub fn is_assignment(id: OperatorId) -> bool {
    info_for(id).category == OperatorCategory::Assignment
}

/// For a compound assignment (`+=`), the binary operator it applies (`+`).
pub fn compound_of(id: OperatorId) -> Option<OperatorId> {
    info_for(id).compound_of
}

// --- helpers -----------------------------------------------------------------

const fn infix(
    id: OperatorId,
    spelling: &'static str,
    precedence: u8,
    category: OperatorCategory,
    runtime_fn: &'static str,
) -> OperatorInfo {
    OperatorInfo {
        id,
        spelling,
        precedence,
        fixity: Fixity::Infix,
        category,
        runtime_fn: Some(runtime_fn),
        compound_of: None,
    }
}

const fn assign(id: OperatorId, spelling: &'static str, compound_of: Option<OperatorId>) -> OperatorInfo {
    OperatorInfo {
        id,
        spelling,
        precedence: 1,
        fixity: Fixity::Infix,
        category: OperatorCategory::Assignment,
        runtime_fn: None,
        compound_of,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_table() {
        assert_eq!(infix_precedence(OperatorId::Eq), Some(1));
        assert_eq!(infix_precedence(OperatorId::PercentEq), Some(1));
        assert_eq!(infix_precedence(OperatorId::OrOr), Some(2));
        assert_eq!(infix_precedence(OperatorId::AndAnd), Some(3));
        assert_eq!(infix_precedence(OperatorId::GtEq), Some(7));
        assert_eq!(infix_precedence(OperatorId::Minus), Some(10));
        assert_eq!(infix_precedence(OperatorId::Percent), Some(20));
        assert_eq!(infix_precedence(OperatorId::Bang), None);
        assert_eq!(infix_precedence(OperatorId::LtGt), None);
    }

    #[test]
    fn test_spellings_are_unique_and_use_operator_chars() {
        for (i, a) in OPERATORS.iter().enumerate() {
            assert!(a.spelling.chars().all(is_operator_char), "{}", a.spelling);
            for b in &OPERATORS[i + 1..] {
                assert_ne!(a.spelling, b.spelling);
            }
        }
    }

    #[test]
    fn test_compound_assignments_map_to_binary_operators() {
        for o in OPERATORS {
            if let Some(base) = o.compound_of {
                assert_eq!(o.category, OperatorCategory::Assignment);
                assert!(runtime_fn(base).is_some());
            }
        }
        assert_eq!(compound_of(OperatorId::Eq), None);
        assert_eq!(compound_of(OperatorId::SlashEq), Some(OperatorId::Slash));
    }
}
