/// Type-expression parsing methods.
///
/// This chunk parses the type grammar, returning a [`TypeNode`]:
/// - Builtin keywords (`int`, `float`, `bool`, `str`, `null`, `type`)
/// - Function types (`fn<int, str> bool`, `fn<> null`)
/// - Object types (`obj{int a, str b,}`)
/// - List suffixes (`int[]`, `int[][]`)
/// - Named and derived types (`T`, `typeof x`, `this.kind`)
///
/// ## Notes
/// - A derived type is parsed as an expression with every continuation disabled so the `>` of an enclosing
///   `fn<...>` and the `[]` list suffix keep their type meaning.
impl<'a> Parser<'a> {
    // ========================================================================
    // Types
    // ========================================================================

    fn parse_type(&mut self) -> Result<TypeNode, CompileError> {
        let mut ty = self.type_atom()?;
        while self.check_punct(PunctuationId::LBracket) && self.peek_next().kind.is_punctuation(PunctuationId::RBracket)
        {
            self.advance();
            self.advance();
            ty = TypeNode::list(ty);
        }
        Ok(ty)
    }

    fn type_atom(&mut self) -> Result<TypeNode, CompileError> {
        if let Some(id) = self.peek().kind.keyword() {
            if let Some(p) = kythera_core::lang::types::primitive_for_keyword(id).and_then(Primitive::from_tag) {
                self.advance();
                return Ok(TypeNode::Primitive(p));
            }
            match id {
                KeywordId::Fn => {
                    self.advance();
                    return self.function_type();
                }
                KeywordId::Obj => {
                    self.advance();
                    return self.object_type();
                }
                KeywordId::Typeof | KeywordId::This => return self.derived_type(),
                _ => {}
            }
        }
        if matches!(self.peek().kind, TokenKind::Ident(_) | TokenKind::Punctuation(PunctuationId::LParen)) {
            return self.derived_type();
        }
        Err(self.unexpected("type"))
    }

    /// `fn<T, ...> R` after the `fn` keyword.
    fn function_type(&mut self) -> Result<TypeNode, CompileError> {
        let parameters = if self.match_op(OperatorId::LtGt) {
            Vec::new()
        } else {
            self.expect_op(OperatorId::Lt)?;
            let mut parameters = Vec::new();
            while !self.check_op(OperatorId::Gt) {
                parameters.push(self.parse_type()?);
                if !self.match_punct(PunctuationId::Comma) {
                    break;
                }
            }
            self.expect_op(OperatorId::Gt)?;
            parameters
        };
        let returns = self.parse_type()?;
        Ok(TypeNode::function(parameters, returns))
    }

    /// `obj{T name, ...}` after the `obj` keyword.
    fn object_type(&mut self) -> Result<TypeNode, CompileError> {
        let entries = self.delimited(PunctuationId::LBrace, PunctuationId::RBrace, |p| {
            let ty = p.parse_type()?;
            let name_mark = p.mark();
            let name = p.expect_ident()?;
            Ok((name, ty, name_mark))
        })?;

        let mut structure = Structure::default();
        for (name, ty, name_mark) in entries {
            structure.insert(name, ty).map_err(|name| {
                self.error_at(
                    ErrorKind::Scope,
                    format!("member '{name}' is declared twice in object type"),
                    name_mark,
                )
            })?;
        }
        Ok(TypeNode::Object(structure))
    }

    /// A type given by an expression. A bare identifier is a named type; anything longer is derived.
    fn derived_type(&mut self) -> Result<TypeNode, CompileError> {
        let mark = self.mark();
        let expr = self.parse_expression(Postfix::TYPE)?;

        if let NodeKind::Identifier(name) = &expr.kind {
            let declared = self.scope.get(name).map_err(|e| self.scope_error(e, mark))?;
            if !types::type_eq(declared, &TypeNode::type_()) {
                return Err(self.error_at(
                    ErrorKind::Type,
                    format!("'{name}' has type '{declared}' and cannot be used as a type"),
                    mark,
                ));
            }
            return Ok(TypeNode::Named(name.clone()));
        }

        let ty = expr.expr_type()?;
        if ty.is_concrete() && !types::type_eq(ty, &TypeNode::type_()) {
            return Err(self.error_at(
                ErrorKind::Type,
                format!("expression of type '{ty}' cannot be used as a type"),
                mark,
            ));
        }
        Ok(TypeNode::Derived(Box::new(expr)))
    }
}
