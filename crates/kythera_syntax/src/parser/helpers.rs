/// Token-stream helpers and diagnostics.
///
/// This chunk contains the low-level primitives used throughout parsing:
/// - Peeking/consuming tokens (`peek`, `advance`)
/// - Matching / expecting keywords, operators, and punctuation
/// - Span bookkeeping and error construction
///
/// Most functions in this file are internal (`fn`) and are documented primarily
/// to aid maintenance and onboarding.
impl<'a> Parser<'a> {
    // ========================================================================
    // Helpers
    // ========================================================================

    /// Return `true` if the current token is [`TokenKind::Eof`].
    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    /// Return the current token without consuming it.
    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    /// Return the token after the current token without consuming it.
    fn peek_next(&self) -> &Token {
        self.tokens.get(self.pos + 1).unwrap_or(&self.eof)
    }

    /// Advance to the next token and return the token we just consumed.
    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !self.is_at_end() {
            self.pos += 1;
        }
        token
    }

    /// Return `true` if the current token is the given keyword.
    fn check_keyword(&self, id: KeywordId) -> bool {
        self.peek().kind.is_keyword(id)
    }

    /// Return `true` if the current token is the given punctuation.
    fn check_punct(&self, id: PunctuationId) -> bool {
        self.peek().kind.is_punctuation(id)
    }

    /// Return `true` if the current token is the given operator.
    fn check_op(&self, id: OperatorId) -> bool {
        self.peek().kind.is_operator(id)
    }

    fn match_keyword(&mut self, id: KeywordId) -> bool {
        if self.check_keyword(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_punct(&mut self, id: PunctuationId) -> bool {
        if self.check_punct(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_op(&mut self, id: OperatorId) -> bool {
        if self.check_op(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_punct(&mut self, id: PunctuationId) -> Result<Token, CompileError> {
        if self.check_punct(id) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&format!("symbol '{}'", kythera_core::lang::punctuation::as_str(id))))
        }
    }

    fn expect_op(&mut self, id: OperatorId) -> Result<Token, CompileError> {
        if self.check_op(id) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&format!("operator '{}'", operators::as_str(id))))
        }
    }

    /// Consume an identifier and return its spelling.
    fn expect_ident(&mut self) -> Result<String, CompileError> {
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            kind => match kind.reserved_keyword() {
                Some(id) => Err(self.error_at(
                    ErrorKind::Syntax,
                    format!("'{}' is a reserved keyword and cannot be used as a name", keywords::as_str(id)),
                    self.mark(),
                )),
                None => Err(self.unexpected("identifier")),
            },
        }
    }

    /// Consume a statement terminator, written or inserted at end of line.
    fn match_terminator(&mut self) -> bool {
        if self.peek().kind.is_terminator() {
            self.advance();
            true
        } else {
            false
        }
    }

    /// A statement must be followed by `;`, written or inserted at end of line.
    fn expect_terminator(&mut self) -> Result<(), CompileError> {
        if self.match_terminator() {
            Ok(())
        } else {
            Err(self.unexpected("end of statement"))
        }
    }

    /// Parse `open item (, item)* ,? close` and return the items.
    fn delimited<T>(
        &mut self,
        open: PunctuationId,
        close: PunctuationId,
        mut item: impl FnMut(&mut Self) -> Result<T, CompileError>,
    ) -> Result<Vec<T>, CompileError> {
        self.expect_punct(open)?;
        let mut items = Vec::new();
        while !self.check_punct(close) {
            items.push(item(self)?);
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        self.expect_punct(close)?;
        Ok(items)
    }

    // ========================================================================
    // Spans and errors
    // ========================================================================

    /// Token index used as the start of a node.
    fn mark(&self) -> usize {
        self.pos
    }

    /// Span from the token at `mark` to the last consumed token.
    fn span_from(&self, mark: usize) -> Span {
        let start = self.tokens.get(mark).unwrap_or(&self.eof).span.start;
        let end = if self.pos > mark {
            self.tokens[self.pos - 1].span.end
        } else {
            start
        };
        Span::new(start, end.max(start))
    }

    fn position_at(&self, mark: usize) -> Position {
        self.tokens.get(mark).unwrap_or(&self.eof).position
    }

    /// Error of `kind` located at the node starting at `mark`.
    fn error_at(&self, kind: ErrorKind, message: impl Into<String>, mark: usize) -> CompileError {
        CompileError::new(kind, message, self.span_from(mark)).with_position(self.position_at(mark))
    }

    /// SyntaxError at the current token: `expected X but got Y`.
    fn unexpected(&self, expected: &str) -> CompileError {
        let token = self.peek();
        let found = if token.is_virtual() {
            "end of line".to_string()
        } else {
            token.kind.to_string()
        };
        CompileError::syntax(format!("Expected {expected} but got {found}"), token.span).with_position(token.position)
    }

    /// Build a node, locating validation failures at `mark`.
    fn node(&self, kind: NodeKind, ty: Option<TypeNode>, mark: usize) -> Result<Node, CompileError> {
        Node::new(kind, ty, self.span_from(mark)).map_err(|e| e.with_position(self.position_at(mark)))
    }
}

impl<'a> Parser<'a> {
    /// Lift a scope failure into a `ScopeError` located at `mark`.
    fn scope_error(&self, error: crate::scope::ScopeError, mark: usize) -> CompileError {
        self.error_at(ErrorKind::Scope, error.to_string(), mark)
    }
}
