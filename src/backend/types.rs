//! Type resolution for code generation.
//!
//! The compiler's own types are always concrete: `Named` types are looked up in the compiler scope and `Derived`
//! types are evaluated, so what the parser annotated as `any` often becomes a precise type here. A type that can
//! only be known by running the program resolves to [`Resolved::Dynamic`], an expression that builds the runtime
//! `Type`; values typed by it are `any` to the compiler and checked by the runtime.

use kythera_syntax::ast::Span;
use kythera_syntax::diagnostics::CompileError;
use kythera_syntax::types::{self, Primitive, TypeNode};
use proc_macro2::TokenStream;
use quote::quote;

use super::Compiler;
use super::names::var_ident;

/// A type as the compiler knows it.
pub(super) enum Resolved {
    /// Known at compile time.
    Static(TypeNode),
    /// Built at run time by this expression (of Rust type `Type`).
    Dynamic(TokenStream),
}

impl Resolved {
    /// Rust expression building the runtime `Type`.
    pub(super) fn tokens(&self) -> TokenStream {
        match self {
            Resolved::Static(ty) => type_tokens(ty),
            Resolved::Dynamic(tokens) => tokens.clone(),
        }
    }

    pub(super) fn static_type(&self) -> Option<&TypeNode> {
        match self {
            Resolved::Static(ty) => Some(ty),
            Resolved::Dynamic(_) => None,
        }
    }

    fn is_static(&self) -> bool {
        matches!(self, Resolved::Static(_))
    }

    fn or_any(&self) -> TypeNode {
        self.static_type().cloned().unwrap_or(TypeNode::Any)
    }
}

/// A type other than `any` at the top level: checks against it are meaningful.
pub(super) fn is_known(ty: &TypeNode) -> bool {
    ty.is_concrete() && *ty != TypeNode::Any
}

/// A type with no `any` anywhere: the runtime type of every value of it renders identically.
pub(super) fn is_exact(ty: &TypeNode) -> bool {
    match ty {
        TypeNode::Primitive(_) => true,
        TypeNode::Function { parameters, returns } => parameters.iter().all(is_exact) && is_exact(returns),
        TypeNode::Object(structure) => structure.iter().all(|(_, t)| is_exact(t)),
        TypeNode::List(contains) => is_exact(contains),
        TypeNode::Any | TypeNode::Named(_) | TypeNode::Derived(_) | TypeNode::Deferred(_) => false,
    }
}

/// Wrap a value typed `any` in a runtime check when its destination has a known type.
pub(super) fn coerce(code: TokenStream, from: &TypeNode, to: &TypeNode) -> TokenStream {
    if *from == TypeNode::Any && is_known(to) {
        let ty = type_tokens(to);
        quote!(convert::expect_type(#code, &#ty))
    } else {
        code
    }
}

/// Rust expression building the runtime `Type` for a concrete compile-time type.
pub(super) fn type_tokens(ty: &TypeNode) -> TokenStream {
    match ty {
        TypeNode::Primitive(p) => match p {
            Primitive::Int => quote!(Type::Int),
            Primitive::Float => quote!(Type::Float),
            Primitive::Bool => quote!(Type::Bool),
            Primitive::Str => quote!(Type::Str),
            Primitive::Null => quote!(Type::Null),
            Primitive::Type => quote!(Type::Type),
        },
        TypeNode::Function { parameters, returns } => {
            let parameters = parameters.iter().map(type_tokens);
            let returns = type_tokens(returns);
            quote!(Type::function(vec![#(#parameters),*], #returns))
        }
        TypeNode::Object(structure) => {
            let members = structure.iter().map(|(name, t)| {
                let t = type_tokens(t);
                quote!((#name.to_string(), #t))
            });
            quote!(Type::Object(vec![#(#members),*]))
        }
        TypeNode::List(contains) => {
            let contains = type_tokens(contains);
            quote!(Type::list(#contains))
        }
        // Resolution never produces the parse-time forms.
        TypeNode::Any | TypeNode::Named(_) | TypeNode::Derived(_) | TypeNode::Deferred(_) => quote!(Type::Any),
    }
}

impl Compiler {
    /// Resolve a type written in the program.
    ///
    /// ## Errors
    /// - `ScopeError` for a named type that is not declared.
    /// - `TypeError` for a named type or type expression whose value is not a `type`.
    /// - `ValidationError` if a self-reference placeholder survived parsing.
    pub(super) fn resolve_type(&mut self, ty: &TypeNode, span: Span) -> Result<Resolved, CompileError> {
        Ok(match ty {
            TypeNode::Primitive(_) | TypeNode::Any => Resolved::Static(ty.clone()),
            TypeNode::Function { parameters, returns } => {
                let parameters = parameters
                    .iter()
                    .map(|p| self.resolve_type(p, span))
                    .collect::<Result<Vec<_>, _>>()?;
                let returns = self.resolve_type(returns, span)?;
                if parameters.iter().all(Resolved::is_static) && returns.is_static() {
                    Resolved::Static(TypeNode::function(
                        parameters.iter().map(Resolved::or_any).collect(),
                        returns.or_any(),
                    ))
                } else {
                    let parameters = parameters.iter().map(Resolved::tokens);
                    let returns = returns.tokens();
                    Resolved::Dynamic(quote!(Type::function(vec![#(#parameters),*], #returns)))
                }
            }
            TypeNode::Object(structure) => {
                let mut members = Vec::with_capacity(structure.len());
                for (name, t) in structure.iter() {
                    members.push((name.to_string(), self.resolve_type(t, span)?));
                }
                if members.iter().all(|(_, r)| r.is_static()) {
                    Resolved::Static(TypeNode::Object(
                        members.iter().map(|(n, r)| (n.clone(), r.or_any())).collect(),
                    ))
                } else {
                    let members = members.iter().map(|(name, r)| {
                        let t = r.tokens();
                        quote!((#name.to_string(), #t))
                    });
                    Resolved::Dynamic(quote!(Type::Object(vec![#(#members),*])))
                }
            }
            TypeNode::List(contains) => match self.resolve_type(contains, span)? {
                Resolved::Static(c) => Resolved::Static(TypeNode::list(c)),
                Resolved::Dynamic(c) => Resolved::Dynamic(quote!(Type::list(#c))),
            },
            TypeNode::Named(name) => {
                let symbol = self.scope.lookup(name).map_err(|e| e.at(span))?;
                if !types::type_eq(&symbol.ty, &TypeNode::type_()) {
                    return Err(CompileError::type_error(
                        format!("'{name}' has type '{}' and cannot be used as a type", symbol.ty),
                        span,
                    )
                    .with_note("only names of type 'type' can appear where a type is expected"));
                }
                match &symbol.type_value {
                    Some(value) => Resolved::Static(value.clone()),
                    None => {
                        let id = var_ident(name);
                        Resolved::Dynamic(quote!(convert::as_type(&#id.get())))
                    }
                }
            }
            TypeNode::Derived(expr) => {
                let compiled = self.expression(expr)?;
                if let Some(value) = compiled.value {
                    return Ok(Resolved::Static(value));
                }
                if is_known(&compiled.ty) && !types::type_eq(&compiled.ty, &TypeNode::type_()) {
                    return Err(CompileError::type_error(
                        format!("expression of type '{}' cannot be used as a type", compiled.ty),
                        expr.span,
                    ));
                }
                let code = compiled.code;
                Resolved::Dynamic(quote!(convert::as_type(&#code)))
            }
            TypeNode::Deferred(_) => {
                return Err(CompileError::validation(
                    "unresolved self-referencing type reached the code generator",
                    span,
                ));
            }
        })
    }

    /// What the compiler can tell about a parser-annotated type without evaluating anything.
    ///
    /// Named types with a known value are substituted; everything else that needs evaluation becomes `any`.
    pub(super) fn static_view(&self, ty: &TypeNode) -> TypeNode {
        match ty {
            TypeNode::Primitive(_) | TypeNode::Any => ty.clone(),
            TypeNode::Function { parameters, returns } => TypeNode::function(
                parameters.iter().map(|p| self.static_view(p)).collect(),
                self.static_view(returns),
            ),
            TypeNode::Object(structure) => TypeNode::Object(
                structure
                    .iter()
                    .map(|(n, t)| (n.to_string(), self.static_view(t)))
                    .collect(),
            ),
            TypeNode::List(contains) => TypeNode::list(self.static_view(contains)),
            TypeNode::Named(name) => self
                .scope
                .lookup(name)
                .ok()
                .and_then(|s| s.type_value.clone())
                .unwrap_or(TypeNode::Any),
            TypeNode::Derived(_) | TypeNode::Deferred(_) => TypeNode::Any,
        }
    }
}
