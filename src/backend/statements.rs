//! Statement emission.

use kythera_syntax::ast::{Node, NodeKind, Span};
use kythera_syntax::diagnostics::CompileError;
use kythera_syntax::scope::FrameKind;
use kythera_syntax::types::{self, Primitive};
use proc_macro2::TokenStream;
use quote::quote;

use super::Compiler;
use super::names::var_ident;
use super::types::{coerce, is_known};

impl Compiler {
    /// Compile one statement. Expressions in statement position are evaluated and discarded.
    pub(super) fn statement(&mut self, node: &Node) -> Result<TokenStream, CompileError> {
        match &node.kind {
            NodeKind::Let { identifier, value } => self.let_statement(identifier, value, node.span),
            NodeKind::If {
                condition,
                body,
                else_body,
            } => self.if_statement(condition, body, else_body.as_deref()),
            NodeKind::While { condition, body } => {
                let condition = self.condition(condition)?;
                let body = self.block(body)?;
                Ok(quote!(while #condition { #(#body)* }))
            }
            NodeKind::Return(value) => self.return_statement(value, node.span),
            _ => {
                let code = self.expression(node)?.code;
                Ok(quote!(let _ = #code;))
            }
        }
    }

    /// `let x = value`. At global level the binding is also registered with the unit's environment.
    fn let_statement(&mut self, name: &str, value: &Node, span: Span) -> Result<TokenStream, CompileError> {
        let value = self.expression(value)?;
        let type_value = if self.reassigned.contains(name) { None } else { value.value };
        self.scope
            .create_with_value(name, value.ty, type_value)
            .map_err(|e| e.at(span))?;

        let id = var_ident(name);
        let code = value.code;
        let export = if self.scope.depth() == 0 {
            quote!(__env.define(#name, &#id);)
        } else {
            quote!()
        };
        Ok(quote! {
            let #id = Var::new(#code);
            #export
        })
    }

    fn if_statement(
        &mut self,
        condition: &Node,
        body: &[Node],
        else_body: Option<&[Node]>,
    ) -> Result<TokenStream, CompileError> {
        let condition = self.condition(condition)?;
        let body = self.block(body)?;
        let otherwise = match else_body {
            None => quote!(),
            // `else if` chains stay flat.
            Some([nested]) if matches!(nested.kind, NodeKind::If { .. }) => {
                let nested = self.statement(nested)?;
                quote!(else #nested)
            }
            Some(stmts) => {
                let stmts = self.block(stmts)?;
                quote!(else { #(#stmts)* })
            }
        };
        Ok(quote!(if #condition { #(#body)* } #otherwise))
    }

    fn return_statement(&mut self, value: &Node, span: Span) -> Result<TokenStream, CompileError> {
        let declared = self.scope.return_type().map_err(|e| e.at(span))?.clone();
        let value = self.expression(value)?;
        if is_known(&declared) && is_known(&value.ty) && !types::type_eq(&declared, &value.ty) {
            return Err(CompileError::type_error(
                format!("function returns '{declared}' but this returns '{}'", value.ty),
                span,
            ));
        }
        let code = coerce(value.code, &value.ty, &declared);
        Ok(quote!(return #code;))
    }

    fn condition(&mut self, node: &Node) -> Result<TokenStream, CompileError> {
        let condition = self.expression(node)?;
        if is_known(&condition.ty) && !condition.ty.is_primitive(Primitive::Bool) {
            return Err(CompileError::type_error(
                format!("condition must be 'bool', got '{}'", condition.ty),
                node.span,
            ));
        }
        let code = condition.code;
        Ok(quote!(convert::as_bool(&#code)))
    }

    /// Statements of an `if`/`while` body, in their own frame.
    fn block(&mut self, body: &[Node]) -> Result<Vec<TokenStream>, CompileError> {
        self.scope.push(FrameKind::ControlFlow);
        let stmts = body.iter().map(|stmt| self.statement(stmt)).collect();
        self.scope.pop();
        stmts
    }
}
