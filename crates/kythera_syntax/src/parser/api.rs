/// Parse a token stream into a typed [`Program`].
///
/// This is the main public entrypoint for parsing.
///
/// ## Parameters
/// - `tokens`: Token stream produced by `kythera_syntax::lexer`.
///
/// ## Errors
/// Returns the first [`CompileError`] (syntax, type, scope or validation).
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn parse(tokens: &[Token]) -> Result<Program, CompileError> {
    Parser::new(tokens).parse()
}

/// Parse a token stream against a scope that outlives it.
///
/// Used by the REPL: top-level declarations of each unit stay visible to later units.
///
/// ## Notes
/// - On error the scope is rolled back to its state before the call, so a failed unit declares nothing.
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn parse_with_scope(tokens: &[Token], scope: &mut Scope) -> Result<Program, CompileError> {
    let snapshot = scope.snapshot();
    let mut parser = Parser::with_scope(tokens, std::mem::take(scope));
    let result = parser.parse();
    *scope = parser.into_scope();
    if result.is_err() {
        scope.restore(snapshot);
    }
    result
}
