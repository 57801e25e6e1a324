/// Parser core types and entrypoint.
///
/// This chunk defines the [`Parser`] type and its top-level `parse()` entrypoint.
/// It also contains a few small internal helper types shared across the other
/// parser chunks.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser` to keep all parser methods in a
///   single module while avoiding a single “god file”.

/// Which postfix continuations an expression may take.
///
/// Binary operands and derived types restrict the postfix loop so that, for example, the `>` closing a
/// `fn<...>` parameter list is not mistaken for a comparison.
#[derive(Debug, Clone, Copy)]
struct Postfix {
    binary: bool,
    index: bool,
    cast: bool,
}

impl Postfix {
    /// Full expression.
    const FULL: Postfix = Postfix {
        binary: true,
        index: true,
        cast: true,
    };
    /// Right operand of a binary operator, or the operand of `!`.
    const OPERAND: Postfix = Postfix {
        binary: false,
        index: true,
        cast: true,
    };
    /// Expression used as a type.
    const TYPE: Postfix = Postfix {
        binary: false,
        index: false,
        cast: false,
    };
}

/// An object literal whose closing brace has not been reached yet.
#[derive(Debug, Clone)]
struct OpenObject {
    id: usize,
    /// Top-level member names found by the pre-scan, in source order.
    members: Vec<String>,
}

/// Parser state.
///
/// ## Notes
/// - The parser is fail-fast: the first error aborts parsing.
/// - Most parsing helpers are implemented on `Parser` but split across multiple files.
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    scope: Scope,
    open_objects: Vec<OpenObject>,
    next_object: usize,
    eof: Token,
}

impl<'a> Parser<'a> {
    /// Create a new parser for a token stream with a fresh global scope.
    ///
    /// ## Parameters
    /// - `tokens`: Token stream produced by `kythera_syntax::lexer`.
    pub fn new(tokens: &'a [Token]) -> Self {
        Self::with_scope(tokens, Scope::new())
    }

    /// Create a parser that resolves names against an existing scope (e.g. declarations from earlier units).
    pub fn with_scope(tokens: &'a [Token], scope: Scope) -> Self {
        let end = tokens.last().map(|t| t.span.end).unwrap_or(0);
        let position = tokens.last().map(|t| t.position).unwrap_or_default();
        Self {
            tokens,
            pos: 0,
            scope,
            open_objects: Vec::new(),
            next_object: 0,
            eof: Token::new(TokenKind::Eof, Span::new(end, end), position),
        }
    }

    /// Give back the scope, including every top-level declaration parsed so far.
    pub fn into_scope(self) -> Scope {
        self.scope
    }

    /// Parse the entire token stream into a [`Program`].
    ///
    /// ## Errors
    /// Returns the first [`CompileError`] encountered.
    pub fn parse(&mut self) -> Result<Program, CompileError> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            let mut stmt = self.statement()?;
            self.expect_terminator()?;
            ensure_resolved(&mut stmt)?;
            statements.push(stmt);
        }

        Ok(Program { statements })
    }
}

/// Every node must have left the deferred state once its statement is complete.
fn ensure_resolved(stmt: &mut Node) -> Result<(), CompileError> {
    stmt.walk_mut(&mut |node| {
        if node.ty.as_ref().is_some_and(TypeNode::contains_deferred) {
            return Err(CompileError::validation(
                format!("{} still has an unresolved self-referencing type", node.kind.describe()),
                node.span,
            ));
        }
        Ok(())
    })
}
