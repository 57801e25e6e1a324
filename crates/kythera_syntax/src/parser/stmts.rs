/// Statement parsing methods.
///
/// This chunk parses statement forms (`let`, `if`/`else`, `while`, `return`) and brace-delimited blocks.
///
/// ## Notes
/// - Statements inside a block are separated by `;`, usually inserted by automatic statement termination.
/// - Every block runs in a frame of its own, so declarations do not outlive the closing brace.
impl<'a> Parser<'a> {
    // ========================================================================
    // Statements
    // ========================================================================

    fn statement(&mut self) -> Result<Node, CompileError> {
        match self.peek().kind.keyword() {
            Some(KeywordId::Let) => self.let_stmt(),
            Some(KeywordId::If) => self.if_stmt(),
            Some(KeywordId::While) => self.while_stmt(),
            Some(KeywordId::Return) => self.return_stmt(),
            _ => self.parse_expression(Postfix::FULL),
        }
    }

    /// `{ statement; ... }` in a new frame of `kind`.
    fn block(&mut self, kind: FrameKind) -> Result<Vec<Node>, CompileError> {
        self.expect_punct(PunctuationId::LBrace)?;
        self.scope.push(kind);
        let body = self.block_body();
        self.scope.pop();
        body
    }

    /// Statements up to and including the closing brace. The caller has consumed `{` and pushed the frame.
    fn block_body(&mut self) -> Result<Vec<Node>, CompileError> {
        let mut body = Vec::new();
        while !self.check_punct(PunctuationId::RBrace) {
            body.push(self.statement()?);
            if !self.match_terminator() {
                break;
            }
        }
        self.expect_punct(PunctuationId::RBrace)?;
        Ok(body)
    }

    fn let_stmt(&mut self) -> Result<Node, CompileError> {
        let mark = self.mark();
        self.advance(); // let
        let name_mark = self.mark();
        let identifier = self.expect_ident()?;
        self.expect_op(OperatorId::Eq)?;
        let value = self.parse_expression(Postfix::FULL)?;

        // Registered after the initializer: a binding is not visible in its own initializer.
        let ty = value.expr_type()?.clone();
        self.scope
            .create(&identifier, ty)
            .map_err(|e| self.scope_error(e, name_mark))?;

        self.node(
            NodeKind::Let {
                identifier,
                value: Box::new(value),
            },
            None,
            mark,
        )
    }

    fn if_stmt(&mut self) -> Result<Node, CompileError> {
        let mark = self.mark();
        self.advance(); // if
        let condition = self.parse_expression(Postfix::FULL)?;
        self.check_condition(&condition)?;
        let body = self.block(FrameKind::ControlFlow)?;

        let else_body = if self.match_keyword(KeywordId::Else) {
            if self.check_keyword(KeywordId::If) {
                Some(vec![self.if_stmt()?])
            } else if self.check_punct(PunctuationId::LBrace) {
                Some(self.block(FrameKind::ControlFlow)?)
            } else {
                return Err(self.unexpected("'{' or 'if' after 'else'"));
            }
        } else {
            None
        };

        self.node(
            NodeKind::If {
                condition: Box::new(condition),
                body,
                else_body,
            },
            None,
            mark,
        )
    }

    fn while_stmt(&mut self) -> Result<Node, CompileError> {
        let mark = self.mark();
        self.advance(); // while
        let condition = self.parse_expression(Postfix::FULL)?;
        self.check_condition(&condition)?;
        let body = self.block(FrameKind::ControlFlow)?;
        self.node(
            NodeKind::While {
                condition: Box::new(condition),
                body,
            },
            None,
            mark,
        )
    }

    fn return_stmt(&mut self) -> Result<Node, CompileError> {
        let mark = self.mark();
        self.advance(); // return
        let declared = self
            .scope
            .return_type()
            .map_err(|e| self.scope_error(e, mark))?
            .clone();
        let value = self.parse_expression(Postfix::FULL)?;

        let actual = value.expr_type()?;
        if declared.is_concrete() && actual.is_concrete() && !types::type_eq(&declared, actual) {
            return Err(self.error_at(
                ErrorKind::Type,
                format!("function returns '{declared}' but this returns '{actual}'"),
                mark,
            ));
        }

        self.node(NodeKind::Return(Box::new(value)), None, mark)
    }

    fn check_condition(&self, condition: &Node) -> Result<(), CompileError> {
        let ty = condition.expr_type()?;
        if ty.is_concrete() && !types::type_eq(ty, &TypeNode::bool()) {
            return Err(CompileError::type_error(format!("condition must be 'bool', got '{ty}'"), condition.span));
        }
        Ok(())
    }
}
