/// Function and list literal parsing.
///
/// ## Notes
/// - Parameter types and the return type are parsed in the enclosing scope; the function frame (holding the
///   declared return type and the parameters) only covers the body.
/// - A list literal takes its element type from its first element; the code generator checks the rest.
impl<'a> Parser<'a> {
    /// `<T a, U b> R { body }` or `<> R { body }`.
    fn function_literal(&mut self) -> Result<Node, CompileError> {
        let mark = self.mark();

        let mut params: Vec<(Param, usize)> = Vec::new();
        if !self.match_op(OperatorId::LtGt) {
            self.expect_op(OperatorId::Lt)?;
            while !self.check_op(OperatorId::Gt) {
                let ty = self.parse_type()?;
                let name_mark = self.mark();
                let name = self.expect_ident()?;
                params.push((Param { name, ty }, name_mark));
                if !self.match_punct(PunctuationId::Comma) {
                    break;
                }
            }
            self.expect_op(OperatorId::Gt)?;
        }
        let returns = self.parse_type()?;

        self.expect_punct(PunctuationId::LBrace)?;
        self.scope.push(FrameKind::Function {
            returns: returns.clone(),
        });
        let body = self.function_body(&params);
        self.scope.pop();
        let body = body?;

        let parameters: Vec<Param> = params.into_iter().map(|(p, _)| p).collect();
        let ty = TypeNode::function(parameters.iter().map(|p| p.ty.clone()).collect(), returns.clone());
        self.node(
            NodeKind::Literal(Literal::Function(FunctionLiteral {
                parameters,
                returns,
                body,
            })),
            Some(ty),
            mark,
        )
    }

    fn function_body(&mut self, params: &[(Param, usize)]) -> Result<Vec<Node>, CompileError> {
        for (param, name_mark) in params {
            self.scope
                .create(&param.name, param.ty.clone())
                .map_err(|e| self.scope_error(e, *name_mark))?;
        }
        self.block_body()
    }

    /// `[a, b, c]`
    fn list_literal(&mut self) -> Result<Node, CompileError> {
        let mark = self.mark();
        let elements = self.delimited(PunctuationId::LBracket, PunctuationId::RBracket, |p| {
            p.parse_expression(Postfix::FULL)
        })?;
        let contains = match elements.first() {
            Some(first) => first.expr_type()?.clone(),
            None => TypeNode::Any,
        };
        self.node(
            NodeKind::Literal(Literal::List(elements)),
            Some(TypeNode::list(contains)),
            mark,
        )
    }
}
