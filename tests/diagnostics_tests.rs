//! Error reporting through the whole pipeline.
//!
//! Each stage reports the first error it meets with a kind, a span into the unit's source and a message. These
//! tests pin the kind and the position for representative failures of every stage.

use kythera::diagnostics::{self, CompileError, ErrorKind};
use kythera::{CompileOptions, Session};

fn compile_error(source: &str) -> CompileError {
    let mut session = Session::with_options(CompileOptions::default());
    match session.compile(source) {
        Ok(unit) => panic!("expected an error, got:\n{}", unit.code),
        Err(err) => err
            .as_compile_error()
            .cloned()
            .unwrap_or_else(|| panic!("code generator produced invalid Rust: {err}")),
    }
}

fn assert_kind(source: &str, kind: ErrorKind) -> CompileError {
    let err = compile_error(source);
    assert_eq!(err.kind, kind, "{}: {}", err.kind, err.message);
    err
}

// =============================================================================
// Lexer and parser
// =============================================================================

#[test]
fn test_unrecognized_character_is_a_lex_error() {
    let err = assert_kind("let a = 1 ~ 2\n", ErrorKind::Lex);
    assert_eq!(err.position.map(|p| (p.line, p.col)), Some((1, 11)));
}

#[test]
fn test_unterminated_string_is_a_lex_error() {
    let err = assert_kind("let s = \"open\n", ErrorKind::Lex);
    assert!(err.message.starts_with("Unterminated string literal"), "{}", err.message);
}

#[test]
fn test_missing_binding_name_is_a_syntax_error() {
    assert_kind("let = 1\n", ErrorKind::Syntax);
}

#[test]
fn test_unclosed_block_is_a_syntax_error() {
    assert_kind("let f = <> int {\n  return 1\n", ErrorKind::Syntax);
}

// =============================================================================
// Scope
// =============================================================================

#[test]
fn test_scope_errors() {
    assert_kind("let a = b\n", ErrorKind::Scope);
    assert_kind("let a = 1\nlet a = 2\n", ErrorKind::Scope);
    assert_kind("return 1\n", ErrorKind::Scope);
    assert_kind("let a = this\n", ErrorKind::Scope);
}

#[test]
fn test_undeclared_name_points_at_its_use() {
    let source = "let a = 1\nlet b = a + c\n";
    let err = assert_kind(source, ErrorKind::Scope);
    assert_eq!(&source[err.span.start..err.span.end], "c");
    assert_eq!(err.position.map(|p| p.line), Some(2));
}

// =============================================================================
// Types
// =============================================================================

#[test]
fn test_type_errors() {
    assert_kind("let a = 1 + \"x\"\n", ErrorKind::Type);
    assert_kind("let a = 1\na = \"x\"\n", ErrorKind::Type);
    assert_kind("if 1 {\n}\n", ErrorKind::Type);
    assert_kind("let a = [1] as int\n", ErrorKind::Type);
    assert_kind("let f = <int a> int {\n  return a\n}\nlet r = f()\n", ErrorKind::Type);
    assert_kind("let f = <int a> int {\n  return a\n}\nlet r = f(\"x\")\n", ErrorKind::Type);
}

#[test]
fn test_compiler_checks_types_the_parser_could_not_resolve() {
    // The parser only knows `s` as the named type `T`; the compiler knows `T` is `str`.
    let err = assert_kind(
        "let T = str\nlet f = <T s> int {\n  return s\n}\n",
        ErrorKind::Type,
    );
    assert!(err.message.contains("returns 'int'"), "{}", err.message);
}

#[test]
fn test_function_signatures_must_be_static() {
    let err = assert_kind(
        "let o = { a = 1, }\nlet T = typeof o[\"a\"]\nlet f = <T v> int {\n  return 1\n}\n",
        ErrorKind::Type,
    );
    assert!(err.message.contains("only known at run time"), "{}", err.message);
}

// =============================================================================
// Rendering
// =============================================================================

#[test]
fn test_plain_format_has_location_and_caret() {
    let source = "let a = 1\nlet b = a + missing\n";
    let err = compile_error(source);
    let text = diagnostics::format_error("unit.ky", source, &err);
    assert!(text.starts_with(&format!("{}: ", err.kind)), "{text}");
    assert!(text.contains("--> unit.ky:2:13"), "{text}");
    assert!(text.contains("^^^^^^^"), "{text}");
}
