//! Expression emission.
//!
//! Every expression compiles to a Rust expression of type `Value`. The static checks mirror the parser's, but run
//! against types resolved through the compiler scope, so they also catch errors hidden behind `type` bindings.

use kythera_core::lang::operators::{self, OperatorCategory, OperatorId};
use kythera_syntax::ast::{AccessIndex, Literal, Node, NodeKind, Span};
use kythera_syntax::diagnostics::CompileError;
use kythera_syntax::scope::FrameKind;
use kythera_syntax::types::{self, Primitive, TypeNode};
use proc_macro2::{Ident, Literal as RustLiteral};
use quote::{format_ident, quote};

use super::names::{synthetic_ident, var_ident};
use super::types::{Resolved, coerce, is_exact, is_known, type_tokens};
use super::{Compiled, Compiler};

impl Compiler {
    /// Compile an expression node.
    ///
    /// ## Errors
    /// - `TypeError` / `ScopeError` when a rule fails against the resolved types.
    /// - `ValidationError` when handed a statement.
    pub(super) fn expression(&mut self, node: &Node) -> Result<Compiled, CompileError> {
        let span = node.span;
        match &node.kind {
            NodeKind::Literal(lit) => self.literal(lit, node),
            NodeKind::Identifier(name) => self.identifier(name, span),
            NodeKind::This => self.this(span),
            NodeKind::Unary { op, target } => self.unary(*op, target, span),
            NodeKind::Binary { op, left, right } => self.binary(*op, left, right, span),
            NodeKind::Assign { op, left, right } => self.assign(*op, left, right, span),
            NodeKind::Typeof(target) => self.type_of(target),
            NodeKind::New(ty) => self.new_value(ty, span),
            NodeKind::As { from, to } => self.cast(from, to, span),
            NodeKind::Call { target, arguments } => self.call(target, arguments, span),
            NodeKind::Access { target, index } => self.access(target, index, span),
            NodeKind::Let { .. } | NodeKind::If { .. } | NodeKind::While { .. } | NodeKind::Return(_) => {
                Err(CompileError::validation(
                    format!("{} cannot be used as a value", node.kind.describe()),
                    span,
                ))
            }
        }
    }

    fn literal(&mut self, lit: &Literal, node: &Node) -> Result<Compiled, CompileError> {
        let (code, ty) = match lit {
            Literal::Int(v) => {
                let v = RustLiteral::i64_unsuffixed(*v);
                (quote!(Value::Int(#v)), TypeNode::int())
            }
            Literal::Float(v) => {
                let code = if v.is_finite() {
                    let v = RustLiteral::f64_unsuffixed(*v);
                    quote!(Value::Float(#v))
                } else {
                    // Only overflowing literals get here; the lexer never yields NaN.
                    quote!(Value::Float(f64::INFINITY))
                };
                (code, TypeNode::float())
            }
            Literal::Bool(b) => (quote!(Value::Bool(#b)), TypeNode::bool()),
            Literal::Str(s) => (quote!(Value::str(#s)), TypeNode::str()),
            Literal::Null => (quote!(Value::Null), TypeNode::null()),
            Literal::Type(ty) => {
                let resolved = self.resolve_type(ty, node.span)?;
                let tokens = resolved.tokens();
                let value = resolved.static_type().cloned();
                return Ok(Compiled::new(quote!(Value::Type(#tokens)), TypeNode::type_()).with_value(value));
            }
            Literal::Function(func) => return self.function_literal(func, node.span),
            Literal::List(elements) => return self.list_literal(elements, node.span),
            Literal::Object(fields) => return self.object_literal(fields, node),
        };
        Ok(Compiled::new(code, ty))
    }

    fn identifier(&mut self, name: &str, span: Span) -> Result<Compiled, CompileError> {
        let symbol = self.scope.lookup(name).map_err(|e| e.at(span))?;
        let (ty, value) = (symbol.ty.clone(), symbol.type_value.clone());
        let id = var_ident(name);
        Ok(Compiled::new(quote!(#id.get()), ty).with_value(value))
    }

    fn this(&mut self, span: Span) -> Result<Compiled, CompileError> {
        let id = self.scope.this_id().map_err(|e| e.at(span))?;
        let handle = synthetic_ident(id);
        let ty = self.scope.this_type().map_err(|e| e.at(span))?.clone();
        Ok(Compiled::new(quote!(#handle.clone()), ty))
    }

    fn unary(&mut self, op: OperatorId, target: &Node, span: Span) -> Result<Compiled, CompileError> {
        let target = self.expression(target)?;
        if is_known(&target.ty) && !target.ty.is_primitive(Primitive::Bool) {
            return Err(CompileError::type_error(
                format!("'!' requires a 'bool' operand, got '{}'", target.ty),
                span,
            ));
        }
        let f = runtime_fn(op, span)?;
        let code = target.code;
        Ok(Compiled::new(quote!(ops::#f(&#code)), TypeNode::bool()))
    }

    fn binary(&mut self, op: OperatorId, left: &Node, right: &Node, span: Span) -> Result<Compiled, CompileError> {
        let left = self.expression(left)?;
        let right = self.expression(right)?;
        let spelling = operators::as_str(op);

        if is_known(&left.ty) && is_known(&right.ty) && !types::type_eq(&left.ty, &right.ty) {
            return Err(CompileError::type_error(
                format!(
                    "operands of '{spelling}' have different types: '{}' and '{}'",
                    left.ty, right.ty
                ),
                span,
            ));
        }
        let operand = if left.ty == TypeNode::Any { &right.ty } else { &left.ty };

        let category = operators::category(op);
        let ty = match category {
            OperatorCategory::Logical => {
                if is_known(operand) && !operand.is_primitive(Primitive::Bool) {
                    return Err(CompileError::type_error(
                        format!("'{spelling}' requires 'bool' operands, got '{operand}'"),
                        span,
                    ));
                }
                TypeNode::bool()
            }
            OperatorCategory::Equality => TypeNode::bool(),
            OperatorCategory::Ordering => {
                if is_known(operand) && !operand.is_numeric() {
                    return Err(CompileError::type_error(
                        format!("'{spelling}' requires numeric operands, got '{operand}'"),
                        span,
                    ));
                }
                TypeNode::bool()
            }
            OperatorCategory::Additive | OperatorCategory::Arithmetic => {
                check_arithmetic(op, operand, span)?;
                operand.clone()
            }
            OperatorCategory::Assignment | OperatorCategory::Not | OperatorCategory::EmptyParams => {
                return Err(CompileError::validation(
                    format!("'{spelling}' is not a binary operator"),
                    span,
                ));
            }
        };

        let f = runtime_fn(op, span)?;
        let (l, r) = (left.code, right.code);
        let code = match category {
            // The right operand is a thunk so it is only evaluated when needed.
            OperatorCategory::Logical => quote!(ops::#f(&#l, || #r)),
            _ => quote!(ops::#f(&#l, &#r)),
        };
        Ok(Compiled::new(code, ty))
    }

    fn assign(&mut self, op: OperatorId, left: &Node, right: &Node, span: Span) -> Result<Compiled, CompileError> {
        match &left.kind {
            NodeKind::Identifier(name) => {
                let target_ty = self.scope.get(name).map_err(|e| e.at(left.span))?.clone();
                let value = self.expression(right)?;
                check_assignment(op, &target_ty, &value.ty, span)?;

                let id = var_ident(name);
                let rhs = coerce(value.code, &value.ty, &target_ty);
                let rhs = match operators::compound_of(op) {
                    Some(base) => {
                        let f = runtime_fn(base, span)?;
                        quote!(ops::#f(&#id.get(), &#rhs))
                    }
                    None => rhs,
                };
                if target_ty == TypeNode::type_() {
                    // The binding now holds whatever the program computed.
                    self.scope.set_type_value(name, None).map_err(|e| e.at(left.span))?;
                }
                Ok(Compiled::new(quote!(#id.set(#rhs)), target_ty))
            }
            NodeKind::Access { target, index } => self.assign_member(op, target, index, right, span),
            _ => Err(CompileError::syntax(
                format!("cannot assign to {}", left.kind.describe()),
                left.span,
            )),
        }
    }

    /// `target.m = v` and `target[i] = v`.
    ///
    /// The target is evaluated once into a handle; `this` on the right-hand side refers to that handle.
    fn assign_member(
        &mut self,
        op: OperatorId,
        target: &Node,
        index: &AccessIndex,
        right: &Node,
        span: Span,
    ) -> Result<Compiled, CompileError> {
        let target = self.expression(target)?;
        let handle = self.temp("this");

        let (member_ty, slot, index_binding) = match index {
            AccessIndex::Dot(name) => (member_type(&target.ty, name, span)?, Slot::Member(name), quote!()),
            AccessIndex::Bracket(index) => {
                let index = self.expression(index)?;
                let ty = element_type(&target.ty, &index.ty, span)?;
                let ident = self.temp("index");
                let code = index.code;
                let binding = quote!(let #ident = #code;);
                (ty, Slot::Index(ident), binding)
            }
        };

        self.scope.push(FrameKind::Object {
            this_id: handle.to_string(),
            this_type: target.ty.clone(),
        });
        let value = self.expression(right);
        self.scope.pop();
        let value = value?;
        check_assignment(op, &member_ty, &value.ty, span)?;

        let rhs = coerce(value.code, &value.ty, &member_ty);
        let rhs = match operators::compound_of(op) {
            Some(base) => {
                let f = runtime_fn(base, span)?;
                let read = match &slot {
                    Slot::Member(name) => quote!(access::get_member(&#handle, #name)),
                    Slot::Index(ident) => quote!(access::get_index(&#handle, &#ident)),
                };
                quote!(ops::#f(&#read, &#rhs))
            }
            None => rhs,
        };
        let write = match &slot {
            Slot::Member(name) => quote!(access::set_member(&#handle, #name, #rhs)),
            Slot::Index(ident) => quote!(access::set_index(&#handle, &#ident, #rhs)),
        };

        let target = target.code;
        Ok(Compiled::new(
            quote!({
                let #handle = #target;
                #index_binding
                #write
            }),
            member_ty,
        ))
    }

    /// `typeof x`: folded to a constant when the operand's type is exact, in which case the operand is not
    /// evaluated.
    fn type_of(&mut self, target: &Node) -> Result<Compiled, CompileError> {
        let target = self.expression(target)?;
        if is_exact(&target.ty) {
            let tokens = type_tokens(&target.ty);
            return Ok(Compiled::new(quote!(Value::Type(#tokens)), TypeNode::type_()).with_value(Some(target.ty)));
        }
        let code = target.code;
        Ok(Compiled::new(
            quote!(Value::Type(convert::type_of(&#code))),
            TypeNode::type_(),
        ))
    }

    fn new_value(&mut self, ty: &TypeNode, span: Span) -> Result<Compiled, CompileError> {
        let resolved = self.resolve_type(ty, span)?;
        let tokens = resolved.tokens();
        let code = quote!(convert::zero(&#tokens));
        Ok(match resolved {
            Resolved::Static(ty) => {
                types::make_new(&ty).map_err(|msg| CompileError::type_error(msg, span))?;
                // The zero value of `type` is `type` itself.
                let value = (ty == TypeNode::type_()).then(TypeNode::type_);
                Compiled::new(code, ty).with_value(value)
            }
            Resolved::Dynamic(_) => Compiled::new(code, TypeNode::Any),
        })
    }

    fn cast(&mut self, from: &Node, to: &TypeNode, span: Span) -> Result<Compiled, CompileError> {
        let from = self.expression(from)?;
        let resolved = self.resolve_type(to, span)?;
        let ty = match resolved.static_type() {
            Some(to) => {
                if is_known(&from.ty) {
                    types::check_cast(&from.ty, to).map_err(|msg| CompileError::type_error(msg, span))?;
                }
                to.clone()
            }
            None => TypeNode::Any,
        };
        let (code, to) = (from.code, resolved.tokens());
        Ok(Compiled::new(quote!(convert::cast(&#code, &#to)), ty))
    }

    fn call(&mut self, target: &Node, arguments: &[Node], span: Span) -> Result<Compiled, CompileError> {
        let target = self.expression(target)?;
        let arguments = arguments
            .iter()
            .map(|a| self.expression(a))
            .collect::<Result<Vec<_>, _>>()?;

        let ty = match &target.ty {
            TypeNode::Function { parameters, returns } => {
                if parameters.len() != arguments.len() {
                    return Err(CompileError::type_error(
                        format!(
                            "function expects {} argument(s) but got {}",
                            parameters.len(),
                            arguments.len()
                        ),
                        span,
                    ));
                }
                for (i, (param, arg)) in parameters.iter().zip(&arguments).enumerate() {
                    if is_known(param) && is_known(&arg.ty) && !types::type_eq(param, &arg.ty) {
                        return Err(CompileError::type_error(
                            format!("argument {} expects '{param}' but got '{}'", i + 1, arg.ty),
                            span,
                        ));
                    }
                }
                (**returns).clone()
            }
            TypeNode::Any => TypeNode::Any,
            other => {
                return Err(CompileError::type_error(
                    format!("cannot call a value of type '{other}'"),
                    span,
                ));
            }
        };

        let code = target.code;
        let arguments = arguments.into_iter().map(|a| a.code);
        Ok(Compiled::new(quote!(access::call(&#code, vec![#(#arguments),*])), ty))
    }

    fn access(&mut self, target: &Node, index: &AccessIndex, span: Span) -> Result<Compiled, CompileError> {
        let target = self.expression(target)?;
        let code = target.code;
        match index {
            AccessIndex::Dot(name) => {
                let ty = member_type(&target.ty, name, span)?;
                Ok(Compiled::new(quote!(access::get_member(&#code, #name)), ty))
            }
            AccessIndex::Bracket(index) => {
                let index = self.expression(index)?;
                let ty = element_type(&target.ty, &index.ty, span)?;
                let index = index.code;
                Ok(Compiled::new(quote!(access::get_index(&#code, &#index)), ty))
            }
        }
    }

    /// Fresh synthetic identifier `__{prefix}_{n}`.
    pub(super) fn temp(&mut self, prefix: &str) -> Ident {
        let n = self.next_temp;
        self.next_temp += 1;
        format_ident!("__{}_{}", prefix, n)
    }
}

/// Where an access assignment writes.
enum Slot<'a> {
    Member(&'a str),
    Index(Ident),
}

// ============================================================================
// Rules shared by reads and writes
// ============================================================================

fn runtime_fn(op: OperatorId, span: Span) -> Result<Ident, CompileError> {
    operators::runtime_fn(op)
        .map(|name| format_ident!("{}", name))
        .ok_or_else(|| {
            CompileError::validation(
                format!("'{}' has no runtime implementation", operators::as_str(op)),
                span,
            )
        })
}

/// Arithmetic requires numeric operands; `+` also concatenates strings.
fn check_arithmetic(op: OperatorId, operand: &TypeNode, span: Span) -> Result<(), CompileError> {
    let allowed = operand.is_numeric() || (op == OperatorId::Plus && operand.is_primitive(Primitive::Str));
    if is_known(operand) && !allowed {
        return Err(CompileError::type_error(
            format!("'{}' is not defined for '{operand}'", operators::as_str(op)),
            span,
        ));
    }
    Ok(())
}

fn check_assignment(op: OperatorId, target: &TypeNode, value: &TypeNode, span: Span) -> Result<(), CompileError> {
    if is_known(target) && is_known(value) && !types::type_eq(target, value) {
        return Err(CompileError::type_error(
            format!("cannot assign a value of type '{value}' to a target of type '{target}'"),
            span,
        ));
    }
    if let Some(base) = operators::compound_of(op) {
        let operand = if *target == TypeNode::Any { value } else { target };
        check_arithmetic(base, operand, span)?;
    }
    Ok(())
}

fn member_type(ty: &TypeNode, name: &str, span: Span) -> Result<TypeNode, CompileError> {
    match ty {
        TypeNode::Object(structure) => structure.get(name).cloned().ok_or_else(|| {
            CompileError::type_error(format!("'{name}' is not a member of '{ty}'"), span)
        }),
        TypeNode::Any => Ok(TypeNode::Any),
        other => Err(CompileError::type_error(
            format!("cannot access member '{name}' of non-object type '{other}'"),
            span,
        )),
    }
}

/// Lists take `int` indices; objects take `str` keys and yield `any`.
fn element_type(ty: &TypeNode, index: &TypeNode, span: Span) -> Result<TypeNode, CompileError> {
    match ty {
        TypeNode::List(contains) => {
            if is_known(index) && !index.is_primitive(Primitive::Int) {
                return Err(CompileError::type_error(
                    format!("list index must be 'int', got '{index}'"),
                    span,
                ));
            }
            Ok((**contains).clone())
        }
        TypeNode::Object(_) => {
            if is_known(index) && !index.is_primitive(Primitive::Str) {
                return Err(CompileError::type_error(
                    format!("object index must be 'str', got '{index}'"),
                    span,
                ));
            }
            Ok(TypeNode::Any)
        }
        TypeNode::Any => Ok(TypeNode::Any),
        other => Err(CompileError::type_error(
            format!("cannot index a value of type '{other}'"),
            span,
        )),
    }
}
