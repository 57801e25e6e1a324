/// Object literal parsing and self-reference resolution.
///
/// Self-references are resolved in two phases:
/// 1. Before the entries are parsed, the literal's top-level member names are collected into a skeleton and
///    `this` is bound to `Deferred { object, path: [] }`. Member access, calls and indexing on a deferred type
///    extend its key path instead of failing.
/// 2. When the closing brace is reached the member types are known. Every node in the literal's subtree is
///    revisited and each deferred key path is looked up in the finished structure.
///
/// ## Notes
/// - Unknown members and members whose type would depend on itself are `TypeError`s.
impl<'a> Parser<'a> {
    /// `{ name = value, ... }` with a mandatory trailing comma after every entry.
    fn object_literal(&mut self) -> Result<Node, CompileError> {
        let mark = self.mark();
        let id = self.next_object;
        self.next_object += 1;
        let members = self.prescan_members();

        self.open_objects.push(OpenObject { id, members });
        self.scope.push(FrameKind::Object {
            this_id: format!("this#{id}"),
            this_type: TypeNode::Deferred(DeferredRef {
                object: id,
                path: Vec::new(),
            }),
        });
        let fields = self.object_fields();
        self.scope.pop();
        self.open_objects.pop();
        let mut fields = fields?;

        let mut structure = Structure::default();
        for field in &fields {
            // Duplicates were rejected while parsing the entries.
            let _ = structure.insert(field.name.clone(), field.value.expr_type()?.clone());
        }

        for field in &mut fields {
            resolve_in_node(&mut field.value, id, &structure)?;
        }

        let mut resolved = Structure::default();
        for field in &fields {
            let _ = resolved.insert(field.name.clone(), field.value.expr_type()?.clone());
        }
        tracing::debug!(object = id, members = resolved.len(), "object literal resolved");

        self.node(
            NodeKind::Literal(Literal::Object(fields)),
            Some(TypeNode::Object(resolved)),
            mark,
        )
    }

    fn object_fields(&mut self) -> Result<Vec<Field>, CompileError> {
        self.expect_punct(PunctuationId::LBrace)?;
        let mut fields: Vec<Field> = Vec::new();
        while !self.check_punct(PunctuationId::RBrace) {
            let name_mark = self.mark();
            let name = self.expect_ident()?;
            if fields.iter().any(|f| f.name == name) {
                return Err(self.error_at(
                    ErrorKind::Scope,
                    format!("member '{name}' is defined twice in object literal"),
                    name_mark,
                ));
            }
            self.expect_op(OperatorId::Eq)?;
            let value = self.parse_expression(Postfix::FULL)?;
            self.expect_punct(PunctuationId::Comma)?;
            fields.push(Field { name, value });
        }
        self.expect_punct(PunctuationId::RBrace)?;
        Ok(fields)
    }

    /// Collect `name =` entries at nesting depth 0 of the literal starting at the current `{`.
    fn prescan_members(&self) -> Vec<String> {
        let mut members = Vec::new();
        let mut depth = 0usize;
        let mut entry_start = true;
        let mut i = self.pos + 1;

        while let Some(token) = self.tokens.get(i) {
            match &token.kind {
                TokenKind::Punctuation(PunctuationId::LParen | PunctuationId::LBracket | PunctuationId::LBrace) => {
                    depth += 1;
                    entry_start = false;
                }
                TokenKind::Punctuation(PunctuationId::RParen | PunctuationId::RBracket | PunctuationId::RBrace) => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                    entry_start = false;
                }
                TokenKind::Punctuation(PunctuationId::Comma) if depth == 0 => entry_start = true,
                TokenKind::Ident(name)
                    if depth == 0
                        && entry_start
                        && self.tokens.get(i + 1).is_some_and(|t| t.kind.is_operator(OperatorId::Eq)) =>
                {
                    members.push(name.clone());
                    entry_start = false;
                }
                TokenKind::Eof => break,
                _ => entry_start = false,
            }
            i += 1;
        }
        members
    }

    /// Return `true` if the open object `object` declares `name`.
    fn skeleton_has(&self, object: usize, name: &str) -> bool {
        self.open_objects
            .iter()
            .find(|o| o.id == object)
            .is_some_and(|o| o.members.iter().any(|m| m == name))
    }
}

/// Replace every deferred reference to `object` in the subtree rooted at `node`.
fn resolve_in_node(node: &mut Node, object: usize, structure: &Structure) -> Result<(), CompileError> {
    node.walk_mut(&mut |n| {
        let span = n.span;
        match n.ty.as_mut() {
            Some(ty) => resolve_in_type(ty, object, structure, span, &mut Vec::new()),
            None => Ok(()),
        }
    })
}

/// `visiting` holds the key paths currently being projected; meeting one of them again is a cycle.
fn resolve_in_type(
    ty: &mut TypeNode,
    object: usize,
    structure: &Structure,
    span: Span,
    visiting: &mut Vec<Vec<Projection>>,
) -> Result<(), CompileError> {
    match ty {
        TypeNode::Deferred(r) if r.object == object => {
            *ty = project(structure, object, &r.path, span, visiting)?;
            Ok(())
        }
        TypeNode::Function { parameters, returns } => {
            for p in parameters {
                resolve_in_type(p, object, structure, span, visiting)?;
            }
            resolve_in_type(returns, object, structure, span, visiting)
        }
        TypeNode::Object(s) => {
            for (_, t) in s.iter_mut() {
                resolve_in_type(t, object, structure, span, visiting)?;
            }
            Ok(())
        }
        TypeNode::List(c) => resolve_in_type(c, object, structure, span, visiting),
        TypeNode::Derived(expr) => resolve_in_node(expr, object, structure),
        TypeNode::Primitive(_) | TypeNode::Named(_) | TypeNode::Deferred(_) | TypeNode::Any => Ok(()),
    }
}

/// Follow a key path through the finished structure of `object`.
///
/// Members whose own type is still deferred (`b = this.a`) are resolved on the way.
fn project(
    structure: &Structure,
    object: usize,
    path: &[Projection],
    span: Span,
    visiting: &mut Vec<Vec<Projection>>,
) -> Result<TypeNode, CompileError> {
    if visiting.iter().any(|p| p == path) {
        return Err(CompileError::type_error(
            "self-reference depends on its own type".to_string(),
            span,
        ));
    }
    visiting.push(path.to_vec());

    let mut current = TypeNode::Object(structure.clone());
    for step in path {
        resolve_in_type(&mut current, object, structure, span, visiting)?;
        current = match (step, current) {
            (Projection::Member(name), TypeNode::Object(s)) => s
                .get(name)
                .cloned()
                .ok_or_else(|| CompileError::type_error(format!("'{name}' is not a member of this object"), span))?,
            (Projection::Element, TypeNode::List(c)) => *c,
            (Projection::Element, TypeNode::Object(_)) => TypeNode::Any,
            (Projection::Returns, TypeNode::Function { returns, .. }) => *returns,
            (_, TypeNode::Any | TypeNode::Named(_) | TypeNode::Derived(_)) => TypeNode::Any,
            (step, TypeNode::Deferred(d)) => TypeNode::Deferred(d.project(step.clone())),
            (step, other) => {
                let what = match step {
                    Projection::Member(name) => format!("access member '{name}' of"),
                    Projection::Element => "index".to_string(),
                    Projection::Returns => "call".to_string(),
                };
                return Err(CompileError::type_error(format!("cannot {what} a value of type '{other}'"), span));
            }
        };
    }
    resolve_in_type(&mut current, object, structure, span, visiting)?;

    visiting.pop();
    Ok(current)
}
