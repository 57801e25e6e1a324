//! Builtin type tags and the cast-compatibility matrix.
//!
//! Both the compile-time `TypeNode` (in `kythera_syntax`) and the runtime `Type` (in `kythera_runtime`) reduce to
//! a [`TypeTag`]; cast eligibility is decided on tags here so the two models cannot drift apart.
//!
//! ## Notes
//! - The matrix is fixed: `bool`, `int` and `float` convert among each other and to `str`; `str` only to `str`;
//!   `null`, `fn`, `list` and `type` only to `str`; `obj` to `obj` (structurally checked by the caller) and `str`.
//! - `any` is the unconstrained tag and may be cast to anything; the runtime checks the dynamic value.
//!
//! ## Examples
//! ```rust
//! use kythera_core::lang::types::{self, TypeTag};
//!
//! assert!(types::can_cast(TypeTag::Bool, TypeTag::Int));
//! assert!(!types::can_cast(TypeTag::Str, TypeTag::Int));
//! assert_eq!(types::as_str(TypeTag::Fn), "fn");
//! ```

use super::keywords::KeywordId;

/// Tag of a builtin type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Int,
    Float,
    Bool,
    Str,
    Null,
    Type,
    Fn,
    Obj,
    List,
    Any,
}

/// Metadata for a builtin type tag.
#[derive(Debug, Clone, Copy)]
pub struct TypeTagInfo {
    pub tag: TypeTag,
    pub spelling: &'static str,
    /// Whether the tag is a singleton primitive (no structure).
    pub primitive: bool,
    /// Destinations allowed by `as`.
    pub casts_to: &'static [TypeTag],
}

/// Registry of all type tags.
pub const TYPE_TAGS: &[TypeTagInfo] = &[
    info(TypeTag::Int, "int", true, &[TypeTag::Bool, TypeTag::Float, TypeTag::Str]),
    info(TypeTag::Float, "float", true, &[TypeTag::Bool, TypeTag::Int, TypeTag::Str]),
    info(TypeTag::Bool, "bool", true, &[TypeTag::Int, TypeTag::Float, TypeTag::Str]),
    info(TypeTag::Str, "str", true, &[TypeTag::Str]),
    info(TypeTag::Null, "null", true, &[TypeTag::Str]),
    info(TypeTag::Type, "type", true, &[TypeTag::Str]),
    info(TypeTag::Fn, "fn", false, &[TypeTag::Str]),
    info(TypeTag::Obj, "obj", false, &[TypeTag::Obj, TypeTag::Str]),
    info(TypeTag::List, "list", false, &[TypeTag::Str]),
    info(
        TypeTag::Any,
        "any",
        true,
        &[
            TypeTag::Int,
            TypeTag::Float,
            TypeTag::Bool,
            TypeTag::Str,
            TypeTag::Null,
            TypeTag::Type,
            TypeTag::Fn,
            TypeTag::Obj,
            TypeTag::List,
            TypeTag::Any,
        ],
    ),
];

/// Full metadata.
///
/// ## Panics
/// - If the registry is missing an entry for `tag` (this indicates a programming error).
pub fn info_for(tag: TypeTag) -> &'static TypeTagInfo {
    TYPE_TAGS.iter().find(|t| t.tag == tag).expect("type tag info missing")
}

/// Canonical spelling.
pub fn as_str(tag: TypeTag) -> &'static str {
    info_for(tag).spelling
}

/// Destinations allowed by `as` for a source tag.
pub fn cast_targets(from: TypeTag) -> &'static [TypeTag] {
    info_for(from).casts_to
}

/// Check the cast matrix.
///
/// ## Parameters
/// - `from`: tag of the value being cast.
/// - `to`: destination tag.
///
/// ## Returns
/// - `true` if the matrix permits the conversion. Object-to-object casts additionally need a structural check.
pub fn can_cast(from: TypeTag, to: TypeTag) -> bool {
    cast_targets(from).contains(&to)
}

/// Map a builtin-type keyword to its singleton primitive tag.
///
/// ## Returns
/// - `Some(tag)` for `int`, `float`, `bool`, `str`, `null` and `type`; `None` for structured (`fn`, `obj`) and
///   non-type keywords.
pub fn primitive_for_keyword(id: KeywordId) -> Option<TypeTag> {
    match id {
        KeywordId::Int => Some(TypeTag::Int),
        KeywordId::Float => Some(TypeTag::Float),
        KeywordId::Bool => Some(TypeTag::Bool),
        KeywordId::Str => Some(TypeTag::Str),
        KeywordId::Null => Some(TypeTag::Null),
        KeywordId::Type => Some(TypeTag::Type),
        _ => None,
    }
}

/// Return `true` for `int` and `float`.
pub fn is_numeric(tag: TypeTag) -> bool {
    matches!(tag, TypeTag::Int | TypeTag::Float)
}

const fn info(tag: TypeTag, spelling: &'static str, primitive: bool, casts_to: &'static [TypeTag]) -> TypeTagInfo {
    TypeTagInfo {
        tag,
        spelling,
        primitive,
        casts_to,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_everything_casts_to_str() {
        for t in TYPE_TAGS {
            assert!(can_cast(t.tag, TypeTag::Str), "{} as str", t.spelling);
        }
    }

    #[test]
    fn test_scalar_matrix() {
        assert!(can_cast(TypeTag::Bool, TypeTag::Float));
        assert!(can_cast(TypeTag::Int, TypeTag::Bool));
        assert!(can_cast(TypeTag::Float, TypeTag::Int));
        assert!(!can_cast(TypeTag::Int, TypeTag::Int));
        assert!(!can_cast(TypeTag::Null, TypeTag::Bool));
        assert!(!can_cast(TypeTag::List, TypeTag::List));
        assert!(can_cast(TypeTag::Obj, TypeTag::Obj));
        assert!(!can_cast(TypeTag::Fn, TypeTag::Obj));
    }
}
