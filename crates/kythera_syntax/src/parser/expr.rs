/// Expression parsing methods.
///
/// This chunk implements the expression grammar: an atom parser followed by a postfix loop that applies,
/// in any order until none match, binary-operator continuation (precedence climbing), casts (`as T`),
/// calls (`(...)`), dot access (`.name`) and bracket access (`[index]`).
///
/// ## Notes
/// - Operator identities are carried by [`TokenKind::Operator`] / [`OperatorId`] rather than string spellings.
/// - Types are inferred as nodes are built. Checks only fire when both sides are concrete; anything the parser
///   cannot know (named, derived or `any` types) is left to the code generator.
impl<'a> Parser<'a> {
    // ========================================================================
    // Expressions
    // ========================================================================

    fn parse_expression(&mut self, ctx: Postfix) -> Result<Node, CompileError> {
        let mark = self.mark();
        let mut expr = self.atom(ctx)?;

        loop {
            if ctx.binary && self.peek_infix().is_some() {
                expr = self.climb(expr, 0, mark)?;
                break;
            } else if ctx.cast && self.check_keyword(KeywordId::As) {
                expr = self.cast(expr, mark)?;
            } else if self.check_punct(PunctuationId::LParen) {
                expr = self.call(expr, mark)?;
            } else if self.check_punct(PunctuationId::Dot) {
                expr = self.dot_access(expr, mark)?;
            } else if ctx.index && self.check_punct(PunctuationId::LBracket) {
                expr = self.bracket_access(expr, mark)?;
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// Current token as an infix operator with its precedence.
    fn peek_infix(&self) -> Option<(OperatorId, u8)> {
        let op = self.peek().kind.operator()?;
        operators::infix_precedence(op).map(|prec| (op, prec))
    }

    /// Precedence climbing: consume operators binding tighter than `min_prec`.
    fn climb(&mut self, left: Node, min_prec: u8, mark: usize) -> Result<Node, CompileError> {
        let Some((op, prec)) = self.peek_infix() else {
            return Ok(left);
        };
        if prec <= min_prec {
            return Ok(left);
        }
        self.advance();

        let node = if operators::is_assignment(op) {
            let right = self.assignment_value(&left, prec)?;
            self.assign(op, left, right, mark)?
        } else {
            let right_mark = self.mark();
            let operand = self.parse_expression(Postfix::OPERAND)?;
            let right = self.climb(operand, prec, right_mark)?;
            self.binary(op, left, right, mark)?
        };

        self.climb(node, min_prec, mark)
    }

    /// Right-hand side of an assignment. Assigning into an access binds `this` to the access target meanwhile.
    fn assignment_value(&mut self, left: &Node, prec: u8) -> Result<Node, CompileError> {
        let this_type = match &left.kind {
            NodeKind::Access { target, .. } => Some(target.expr_type()?.clone()),
            _ => None,
        };
        let pushed = this_type.is_some();
        if let Some(this_type) = this_type {
            self.scope.push(FrameKind::Object {
                this_id: "this".to_string(),
                this_type,
            });
        }

        let right_mark = self.mark();
        let right = match self.parse_expression(Postfix::OPERAND) {
            // Right-associative: `a = b = c` assigns `c` to `b` first.
            Ok(operand) => self.climb(operand, prec.saturating_sub(1), right_mark),
            Err(e) => Err(e),
        };

        if pushed {
            self.scope.pop();
        }
        right
    }

    fn binary(&self, op: OperatorId, left: Node, right: Node, mark: usize) -> Result<Node, CompileError> {
        let lt = left.expr_type()?;
        let rt = right.expr_type()?;
        let spelling = operators::as_str(op);

        if lt.is_concrete() && rt.is_concrete() && !types::type_eq(lt, rt) {
            return Err(self.error_at(
                ErrorKind::Type,
                format!("operands of '{spelling}' have different types: '{lt}' and '{rt}'"),
                mark,
            ));
        }

        let ty = match operators::category(op) {
            OperatorCategory::Logical => {
                if is_known(lt) && !lt.is_primitive(Primitive::Bool) {
                    return Err(self.error_at(
                        ErrorKind::Type,
                        format!("'{spelling}' requires 'bool' operands, got '{lt}'"),
                        mark,
                    ));
                }
                TypeNode::bool()
            }
            OperatorCategory::Equality => TypeNode::bool(),
            OperatorCategory::Ordering => {
                if is_known(lt) && !lt.is_numeric() {
                    return Err(self.error_at(
                        ErrorKind::Type,
                        format!("'{spelling}' requires numeric operands, got '{lt}'"),
                        mark,
                    ));
                }
                TypeNode::bool()
            }
            OperatorCategory::Additive | OperatorCategory::Arithmetic => {
                self.check_arithmetic(op, lt, mark)?;
                if *lt == TypeNode::Any { rt.clone() } else { lt.clone() }
            }
            OperatorCategory::Assignment | OperatorCategory::Not | OperatorCategory::EmptyParams => {
                return Err(self.error_at(
                    ErrorKind::Validation,
                    format!("'{spelling}' is not a binary operator"),
                    mark,
                ));
            }
        };

        self.node(
            NodeKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            Some(ty),
            mark,
        )
    }

    /// Arithmetic requires numeric operands; `+` also concatenates strings.
    fn check_arithmetic(&self, op: OperatorId, operand: &TypeNode, mark: usize) -> Result<(), CompileError> {
        let allowed = operand.is_numeric() || (op == OperatorId::Plus && operand.is_primitive(Primitive::Str));
        if is_known(operand) && !allowed {
            return Err(self.error_at(
                ErrorKind::Type,
                format!("'{}' is not defined for '{operand}'", operators::as_str(op)),
                mark,
            ));
        }
        Ok(())
    }

    fn assign(&self, op: OperatorId, left: Node, right: Node, mark: usize) -> Result<Node, CompileError> {
        if !matches!(left.kind, NodeKind::Identifier(_) | NodeKind::Access { .. }) {
            return Err(self.error_at(
                ErrorKind::Syntax,
                format!("cannot assign to {}", left.kind.describe()),
                mark,
            ));
        }

        let lt = left.expr_type()?.clone();
        let rt = right.expr_type()?;
        if lt.is_concrete() && rt.is_concrete() && !types::type_eq(&lt, rt) {
            return Err(self.error_at(
                ErrorKind::Type,
                format!("cannot assign a value of type '{rt}' to a target of type '{lt}'"),
                mark,
            ));
        }
        if let Some(base) = operators::compound_of(op) {
            self.check_arithmetic(base, &lt, mark)?;
        }

        self.node(
            NodeKind::Assign {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            Some(lt),
            mark,
        )
    }

    fn cast(&mut self, from: Node, mark: usize) -> Result<Node, CompileError> {
        self.advance(); // as
        let to = self.parse_type()?;
        let from_ty = from.expr_type()?;
        if from_ty.is_concrete() && to.is_concrete() {
            types::check_cast(from_ty, &to).map_err(|msg| self.error_at(ErrorKind::Type, msg, mark))?;
        }
        self.node(
            NodeKind::As {
                from: Box::new(from),
                to: to.clone(),
            },
            Some(to),
            mark,
        )
    }

    fn call(&mut self, target: Node, mark: usize) -> Result<Node, CompileError> {
        let arguments = self.delimited(PunctuationId::LParen, PunctuationId::RParen, |p| {
            p.parse_expression(Postfix::FULL)
        })?;

        let ty = match target.expr_type()? {
            TypeNode::Function { parameters, returns } => {
                if parameters.len() != arguments.len() {
                    return Err(self.error_at(
                        ErrorKind::Type,
                        format!(
                            "function expects {} argument(s) but got {}",
                            parameters.len(),
                            arguments.len()
                        ),
                        mark,
                    ));
                }
                for (i, (param, arg)) in parameters.iter().zip(&arguments).enumerate() {
                    let arg_ty = arg.expr_type()?;
                    if param.is_concrete() && arg_ty.is_concrete() && !types::type_eq(param, arg_ty) {
                        return Err(self.error_at(
                            ErrorKind::Type,
                            format!("argument {} expects '{param}' but got '{arg_ty}'", i + 1),
                            mark,
                        ));
                    }
                }
                (**returns).clone()
            }
            TypeNode::Deferred(r) => TypeNode::Deferred(r.project(Projection::Returns)),
            TypeNode::Any | TypeNode::Named(_) | TypeNode::Derived(_) => TypeNode::Any,
            other => {
                return Err(self.error_at(
                    ErrorKind::Type,
                    format!("cannot call a value of type '{other}'"),
                    mark,
                ));
            }
        };

        self.node(
            NodeKind::Call {
                target: Box::new(target),
                arguments,
            },
            Some(ty),
            mark,
        )
    }

    fn dot_access(&mut self, target: Node, mark: usize) -> Result<Node, CompileError> {
        self.advance(); // .
        let name = self.expect_ident()?;

        let ty = match target.expr_type()? {
            TypeNode::Object(structure) => structure.get(&name).cloned().ok_or_else(|| {
                self.error_at(
                    ErrorKind::Type,
                    format!("'{name}' is not a member of '{}'", TypeNode::Object(structure.clone())),
                    mark,
                )
            })?,
            TypeNode::Deferred(r) => {
                if r.path.is_empty() && !self.skeleton_has(r.object, &name) {
                    return Err(self.error_at(
                        ErrorKind::Type,
                        format!("'{name}' is not a member of this object"),
                        mark,
                    ));
                }
                TypeNode::Deferred(r.project(Projection::Member(name.clone())))
            }
            TypeNode::Any | TypeNode::Named(_) | TypeNode::Derived(_) => TypeNode::Any,
            other => {
                return Err(self.error_at(
                    ErrorKind::Type,
                    format!("cannot access member '{name}' of non-object type '{other}'"),
                    mark,
                ));
            }
        };

        self.node(
            NodeKind::Access {
                target: Box::new(target),
                index: AccessIndex::Dot(name),
            },
            Some(ty),
            mark,
        )
    }

    fn bracket_access(&mut self, target: Node, mark: usize) -> Result<Node, CompileError> {
        self.advance(); // [
        let index = self.parse_expression(Postfix::FULL)?;
        self.expect_punct(PunctuationId::RBracket)?;

        let index_ty = index.expr_type()?;
        let ty = match target.expr_type()? {
            TypeNode::List(contains) => {
                if is_known(index_ty) && !index_ty.is_primitive(Primitive::Int) {
                    return Err(self.error_at(
                        ErrorKind::Type,
                        format!("list index must be 'int', got '{index_ty}'"),
                        mark,
                    ));
                }
                (**contains).clone()
            }
            TypeNode::Object(_) => {
                if is_known(index_ty) && !index_ty.is_primitive(Primitive::Str) {
                    return Err(self.error_at(
                        ErrorKind::Type,
                        format!("object index must be 'str', got '{index_ty}'"),
                        mark,
                    ));
                }
                TypeNode::Any
            }
            TypeNode::Deferred(r) => TypeNode::Deferred(r.project(Projection::Element)),
            TypeNode::Any | TypeNode::Named(_) | TypeNode::Derived(_) => TypeNode::Any,
            other => {
                return Err(self.error_at(
                    ErrorKind::Type,
                    format!("cannot index a value of type '{other}'"),
                    mark,
                ));
            }
        };

        self.node(
            NodeKind::Access {
                target: Box::new(target),
                index: AccessIndex::Bracket(Box::new(index)),
            },
            Some(ty),
            mark,
        )
    }

    // ========================================================================
    // Atoms
    // ========================================================================

    fn atom(&mut self, ctx: Postfix) -> Result<Node, CompileError> {
        let mark = self.mark();
        let kind = self.peek().kind.clone();

        match kind {
            TokenKind::Punctuation(PunctuationId::LParen) => {
                self.advance();
                let inner = self.parse_expression(Postfix::FULL)?;
                self.expect_punct(PunctuationId::RParen)?;
                Ok(inner)
            }
            TokenKind::Punctuation(PunctuationId::LBrace) => self.object_literal(),
            TokenKind::Punctuation(PunctuationId::LBracket) => self.list_literal(),
            TokenKind::Operator(OperatorId::Lt | OperatorId::LtGt) => self.function_literal(),
            TokenKind::Operator(OperatorId::Bang) => {
                self.advance();
                let target = self.parse_expression(Postfix {
                    binary: false,
                    index: ctx.index,
                    cast: true,
                })?;
                let target_ty = target.expr_type()?;
                if is_known(target_ty) && !target_ty.is_primitive(Primitive::Bool) {
                    return Err(self.error_at(
                        ErrorKind::Type,
                        format!("'!' requires a 'bool' operand, got '{target_ty}'"),
                        mark,
                    ));
                }
                self.node(
                    NodeKind::Unary {
                        op: OperatorId::Bang,
                        target: Box::new(target),
                    },
                    Some(TypeNode::bool()),
                    mark,
                )
            }
            TokenKind::Keyword(id) => self.keyword_atom(id, ctx),
            TokenKind::Int(v) => {
                self.advance();
                self.node(NodeKind::Literal(Literal::Int(v)), Some(TypeNode::int()), mark)
            }
            TokenKind::Float(v) => {
                self.advance();
                self.node(NodeKind::Literal(Literal::Float(v)), Some(TypeNode::float()), mark)
            }
            TokenKind::String(s) => {
                self.advance();
                self.node(NodeKind::Literal(Literal::Str(s)), Some(TypeNode::str()), mark)
            }
            TokenKind::Ident(name) => {
                self.advance();
                let ty = self.scope.get(&name).map_err(|e| self.scope_error(e, mark))?.clone();
                self.node(NodeKind::Identifier(name), Some(ty), mark)
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    fn keyword_atom(&mut self, id: KeywordId, ctx: Postfix) -> Result<Node, CompileError> {
        let mark = self.mark();
        match id {
            KeywordId::True | KeywordId::False => {
                self.advance();
                self.node(
                    NodeKind::Literal(Literal::Bool(id == KeywordId::True)),
                    Some(TypeNode::bool()),
                    mark,
                )
            }
            // `null` in expression position is always the value, never the type.
            KeywordId::Null => {
                self.advance();
                self.node(NodeKind::Literal(Literal::Null), Some(TypeNode::null()), mark)
            }
            KeywordId::This => {
                self.advance();
                let ty = self.scope.this_type().map_err(|e| self.scope_error(e, mark))?.clone();
                self.node(NodeKind::This, Some(ty), mark)
            }
            KeywordId::Typeof => {
                self.advance();
                let target = self.parse_expression(Postfix {
                    binary: false,
                    index: ctx.index,
                    cast: false,
                })?;
                self.node(NodeKind::Typeof(Box::new(target)), Some(TypeNode::type_()), mark)
            }
            KeywordId::New => {
                self.advance();
                let ty = self.parse_type()?;
                if ty.is_concrete() {
                    types::make_new(&ty).map_err(|msg| self.error_at(ErrorKind::Type, msg, mark))?;
                }
                self.node(NodeKind::New(ty.clone()), Some(ty), mark)
            }
            KeywordId::Int
            | KeywordId::Float
            | KeywordId::Bool
            | KeywordId::Str
            | KeywordId::Type
            | KeywordId::Fn
            | KeywordId::Obj => {
                let ty = self.parse_type()?;
                self.node(NodeKind::Literal(Literal::Type(ty)), Some(TypeNode::type_()), mark)
            }
            KeywordId::Let | KeywordId::If | KeywordId::While | KeywordId::Return => Err(self.error_at(
                ErrorKind::Syntax,
                format!("'{}' cannot be used as an expression", keywords::as_str(id)),
                mark,
            )),
            _ if keywords::category(id) == KeywordCategory::Reserved => Err(self.error_at(
                ErrorKind::Syntax,
                format!("'{}' is a reserved keyword", keywords::as_str(id)),
                mark,
            )),
            _ => Err(self.unexpected("expression")),
        }
    }
}

/// A concrete type other than `any`: checks against it are meaningful at parse time.
fn is_known(ty: &TypeNode) -> bool {
    ty.is_concrete() && *ty != TypeNode::Any
}
