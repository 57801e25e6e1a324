//! Function, list and object literals.

use std::collections::HashSet;

use kythera_syntax::ast::{Field, FunctionLiteral, Literal, Node, NodeKind, Span, walk_all};
use kythera_syntax::diagnostics::CompileError;
use kythera_syntax::scope::FrameKind;
use kythera_syntax::types::{self, Structure, TypeNode};
use proc_macro2::{Ident, Literal as RustLiteral, TokenStream};
use quote::quote;

use super::names::{synthetic_ident, var_ident};
use super::types::{Resolved, coerce, is_known, type_tokens};
use super::{Compiled, Compiler};

const SIGNATURE_HINT: &str = "bind the type with a `let` that is never reassigned, or spell it out";

impl Compiler {
    /// `<T a, U b> R { body }` becomes a `Value::function` over a `move` closure.
    ///
    /// The closure captures clones of the `Var` cells it references, so writes inside the function are visible
    /// outside and the reverse. Falling off the end of the body returns the zero value of the return type.
    ///
    /// ## Errors
    /// - `TypeError` if a parameter or return type can only be computed at run time: signatures must be static.
    /// - `ScopeError` for duplicate parameter names.
    pub(super) fn function_literal(&mut self, func: &FunctionLiteral, span: Span) -> Result<Compiled, CompileError> {
        let mut parameters = Vec::with_capacity(func.parameters.len());
        for param in &func.parameters {
            match self.resolve_type(&param.ty, span)? {
                Resolved::Static(ty) => parameters.push(ty),
                Resolved::Dynamic(_) => {
                    return Err(CompileError::type_error(
                        format!(
                            "type of parameter '{}' is only known at run time; function signatures must be static",
                            param.name
                        ),
                        span,
                    )
                    .with_hint(SIGNATURE_HINT));
                }
            }
        }
        let returns = match self.resolve_type(&func.returns, span)? {
            Resolved::Static(ty) => ty,
            Resolved::Dynamic(_) => {
                return Err(CompileError::type_error(
                    "return type is only known at run time; function signatures must be static",
                    span,
                )
                .with_hint(SIGNATURE_HINT));
            }
        };
        let fn_type = TypeNode::function(parameters.clone(), returns.clone());

        let (names, uses_this) = referenced_names(func);
        let captures: Vec<_> = self
            .scope
            .visible_symbols()
            .into_iter()
            .filter(|s| names.contains(&s.name))
            .map(|s| var_ident(&s.name))
            .collect();
        let this_captures: Vec<_> = if uses_this {
            self.scope.visible_this_ids().into_iter().map(synthetic_ident).collect()
        } else {
            Vec::new()
        };

        self.scope.push(FrameKind::Function {
            returns: returns.clone(),
        });
        let body = self.function_body(func, &parameters, span);
        self.scope.pop();
        let (bindings, body) = body?;

        let args = if parameters.is_empty() { quote!(_) } else { quote!(__args) };
        let fallthrough = match func.body.last().map(|n| &n.kind) {
            Some(NodeKind::Return(_)) => quote!(),
            _ => {
                let returns = type_tokens(&returns);
                quote!(convert::zero(&#returns))
            }
        };
        let ty_tokens = type_tokens(&fn_type);

        let code = quote! {
            Value::function(#ty_tokens, {
                #(let #captures = #captures.clone();)*
                #(let #this_captures = #this_captures.clone();)*
                move |#args: Vec<Value>| -> Value {
                    #(#bindings)*
                    #(#body)*
                    #fallthrough
                }
            })
        };
        Ok(Compiled::new(code, fn_type))
    }

    fn function_body(
        &mut self,
        func: &FunctionLiteral,
        parameters: &[TypeNode],
        span: Span,
    ) -> Result<(Vec<TokenStream>, Vec<TokenStream>), CompileError> {
        let mut bindings = Vec::with_capacity(parameters.len());
        for (i, (param, ty)) in func.parameters.iter().zip(parameters).enumerate() {
            self.scope.create(&param.name, ty.clone()).map_err(|e| e.at(span))?;
            let id = var_ident(&param.name);
            let i = RustLiteral::usize_unsuffixed(i);
            bindings.push(quote!(let #id = Var::new(__args[#i].clone());));
        }
        let body = func
            .body
            .iter()
            .map(|stmt| self.statement(stmt))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((bindings, body))
    }

    /// `[a, b, c]`: every element must share the first element's type.
    pub(super) fn list_literal(&mut self, elements: &[Node], span: Span) -> Result<Compiled, CompileError> {
        let elements = elements
            .iter()
            .map(|e| self.expression(e))
            .collect::<Result<Vec<_>, _>>()?;
        let contains = elements.first().map_or(TypeNode::Any, |e| e.ty.clone());
        for (i, element) in elements.iter().enumerate().skip(1) {
            if is_known(&contains) && is_known(&element.ty) && !types::type_eq(&contains, &element.ty) {
                return Err(CompileError::type_error(
                    format!(
                        "list elements must all have type '{contains}', element {} has type '{}'",
                        i + 1,
                        element.ty
                    ),
                    span,
                ));
            }
        }

        let contains_tokens = type_tokens(&contains);
        let items = elements.into_iter().map(|e| coerce(e.code, &e.ty, &contains));
        Ok(Compiled::new(
            quote!(Value::list(#contains_tokens, vec![#(#items),*])),
            TypeNode::list(contains),
        ))
    }

    /// `{ a = 5, c = <>int { return this.a } }`: members are defined in order on one shared handle.
    ///
    /// Functions in the entries capture the handle and see every member once the literal is built. A nested literal
    /// that reads a member of the enclosing object before that member's entry raises a `KeyError` at run time.
    pub(super) fn object_literal(&mut self, fields: &[Field], node: &Node) -> Result<Compiled, CompileError> {
        let this_type = node
            .ty
            .as_ref()
            .map_or(TypeNode::Any, |ty| self.static_view(ty));
        let object = self.temp("object");
        let handle = self.temp("this");

        self.scope.push(FrameKind::Object {
            this_id: handle.to_string(),
            this_type,
        });
        let members = self.object_members(fields, &object);
        self.scope.pop();
        let (structure, defines) = members?;

        let code = quote!({
            let #object = Object::new();
            let #handle = Value::Object(#object.clone());
            #(#defines)*
            #handle
        });
        Ok(Compiled::new(code, TypeNode::Object(structure)))
    }

    fn object_members(
        &mut self,
        fields: &[Field],
        object: &Ident,
    ) -> Result<(Structure, Vec<TokenStream>), CompileError> {
        let mut structure = Structure::default();
        let mut defines = Vec::with_capacity(fields.len());
        for field in fields {
            let value = self.expression(&field.value)?;
            structure.insert(field.name.as_str(), value.ty).map_err(|name| {
                CompileError::scope(
                    format!("member '{name}' is defined twice in object literal"),
                    field.value.span,
                )
            })?;
            let (name, code) = (&field.name, value.code);
            defines.push(quote!(#object.define(#name, #code);));
        }
        Ok((structure, defines))
    }
}

/// Names a function literal may read from its environment: every identifier and named type in it, and whether it
/// mentions `this`.
fn referenced_names(func: &FunctionLiteral) -> (HashSet<String>, bool) {
    let mut names = HashSet::new();
    let mut uses_this = false;
    walk_all(&func.body, &mut |node| match &node.kind {
        NodeKind::Identifier(name) => {
            names.insert(name.clone());
        }
        NodeKind::This => uses_this = true,
        NodeKind::New(ty) | NodeKind::As { to: ty, .. } | NodeKind::Literal(Literal::Type(ty)) => {
            collect_named(ty, &mut names)
        }
        NodeKind::Literal(Literal::Function(inner)) => {
            for param in &inner.parameters {
                collect_named(&param.ty, &mut names);
            }
            collect_named(&inner.returns, &mut names);
        }
        _ => {}
    });
    (names, uses_this)
}

fn collect_named(ty: &TypeNode, names: &mut HashSet<String>) {
    match ty {
        TypeNode::Named(name) => {
            names.insert(name.clone());
        }
        TypeNode::Function { parameters, returns } => {
            for p in parameters {
                collect_named(p, names);
            }
            collect_named(returns, names);
        }
        TypeNode::Object(structure) => {
            for (_, t) in structure.iter() {
                collect_named(t, names);
            }
        }
        TypeNode::List(contains) => collect_named(contains, names),
        TypeNode::Primitive(_) | TypeNode::Derived(_) | TypeNode::Deferred(_) | TypeNode::Any => {}
    }
}
