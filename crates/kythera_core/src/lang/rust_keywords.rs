//! Rust keyword vocabulary (for escaping Kythera identifiers in generated Rust).

/// Reserved + strict keywords in Rust that can be written as raw identifiers (`r#type`).
pub const RUST_KEYWORDS: &[&str] = &[
    "as", "break", "const", "continue", "else", "enum", "extern", "false", "fn", "for", "if", "impl", "in", "let",
    "loop", "match", "mod", "move", "mut", "pub", "ref", "return", "static", "struct", "trait", "true", "type",
    "unsafe", "use", "where", "while", "async", "await", "dyn", "abstract", "become", "box", "do", "final", "macro",
    "override", "priv", "typeof", "unsized", "virtual", "yield", "try", "gen",
];

/// Keywords that cannot be raw identifiers and must be renamed instead.
pub const UNRAWABLE_KEYWORDS: &[&str] = &["self", "Self", "super", "crate", "_"];

/// Prelude enum variants that a `let` pattern would match instead of binding.
pub const PRELUDE_VARIANTS: &[&str] = &["None", "Some", "Ok", "Err"];

/// Check whether an identifier is a Rust keyword that can be escaped with `r#`.
pub fn is_keyword(name: &str) -> bool {
    RUST_KEYWORDS.contains(&name)
}

/// Check whether an identifier must be renamed because `r#` is not allowed for it.
pub fn is_unrawable(name: &str) -> bool {
    UNRAWABLE_KEYWORDS.contains(&name)
}

/// Check whether an identifier names a prelude variant and so cannot be bound by `let`.
pub fn is_prelude_variant(name: &str) -> bool {
    PRELUDE_VARIANTS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_classes_are_disjoint() {
        for name in UNRAWABLE_KEYWORDS.iter().chain(PRELUDE_VARIANTS) {
            assert!(!is_keyword(name), "{name}");
        }
        assert!(is_keyword("match"));
        assert!(is_unrawable("self"));
        assert!(is_prelude_variant("None"));
    }
}
