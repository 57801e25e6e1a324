//! Unit-level emission: imports from earlier units, the `run` function, formatting.

use std::collections::HashSet;

use kythera_syntax::ast::{NodeKind, Program, Span, walk_all};
use kythera_syntax::diagnostics::CompileError;
use proc_macro2::TokenStream;
use quote::quote;

use super::names::var_ident;
use super::{CompiledUnit, Compiler, EmitError, ExportedSymbol};
use crate::version::KYTHERA_VERSION;

impl Compiler {
    /// Compile one unit into a formatted Rust source file.
    ///
    /// The file defines `pub fn run(__env: &mut Environment)`. It starts by importing every top-level binding of
    /// earlier units from `__env` and registers its own top-level `let`s there, so units run in order against one
    /// environment behave like a single program.
    ///
    /// ## Parameters
    /// - `program`: a unit parsed against a scope holding the same earlier declarations as this compiler.
    ///
    /// ## Returns
    /// - The formatted source and the unit's new top-level bindings.
    ///
    /// ## Errors
    /// - `EmitError::Compile` for type and scope errors found against the resolved types. The compiler scope is
    ///   left as it was before the call.
    /// - `EmitError::SynParse` if the generated tokens are not a valid Rust file (a code generator defect).
    #[tracing::instrument(skip_all, fields(statement_count = program.statements.len()))]
    pub fn compile_program(&mut self, program: &Program) -> Result<CompiledUnit, EmitError> {
        let snapshot = self.scope.snapshot();
        let declared_before = self.scope.globals().len();
        let result = self.emit_unit(program, declared_before);
        if let Err(err) = &result {
            tracing::debug!(error = %err, "unit rejected; compiler scope rolled back");
            self.scope.restore(snapshot);
        }
        result
    }

    fn emit_unit(&mut self, program: &Program, declared_before: usize) -> Result<CompiledUnit, EmitError> {
        self.reassigned = assigned_names(program);
        self.forget_reassigned_type_values()?;

        let imports: Vec<TokenStream> = self
            .scope
            .globals()
            .iter()
            .map(|symbol| {
                let id = var_ident(&symbol.name);
                let name = &symbol.name;
                quote!(let #id = __env.var(#name);)
            })
            .collect();
        let body = program
            .statements
            .iter()
            .map(|stmt| self.statement(stmt))
            .collect::<Result<Vec<_>, _>>()?;

        let tokens = self.unit_tokens(&imports, &body);
        let file: syn::File = syn::parse2(tokens).map_err(|e| EmitError::SynParse(e.to_string()))?;
        let formatted = prettyplease::unparse(&file);
        let code = if self.options.emit_header {
            format!("// Generated by the Kythera compiler v{KYTHERA_VERSION}\n\n{formatted}")
        } else {
            formatted
        };

        let symbols: Vec<ExportedSymbol> = self.scope.globals()[declared_before..]
            .iter()
            .map(|symbol| ExportedSymbol {
                name: symbol.name.clone(),
                ty: symbol.ty.to_string(),
            })
            .collect();
        tracing::debug!(symbols = symbols.len(), bytes = code.len(), "unit emitted");
        Ok(CompiledUnit { code, symbols })
    }

    /// Drop the tracked values of earlier units' `type` bindings that this unit assigns to.
    ///
    /// A use that precedes the assignment in source order can still run after it (inside a loop), so the binding
    /// has to be resolved at run time for the whole unit.
    fn forget_reassigned_type_values(&mut self) -> Result<(), CompileError> {
        let stale: Vec<String> = self
            .scope
            .globals()
            .iter()
            .filter(|symbol| symbol.type_value.is_some() && self.reassigned.contains(&symbol.name))
            .map(|symbol| symbol.name.clone())
            .collect();
        for name in &stale {
            self.scope.set_type_value(name, None).map_err(|e| e.at(Span::default()))?;
        }
        Ok(())
    }

    fn unit_tokens(&self, imports: &[TokenStream], body: &[TokenStream]) -> TokenStream {
        let lints = if self.options.allow_lints {
            quote!(#![allow(unused_variables, unreachable_code, clippy::all)])
        } else {
            quote!()
        };
        quote! {
            #lints
            use kythera_runtime::prelude::*;

            /// Run this unit against the bindings of earlier units and register its own.
            pub fn run(__env: &mut Environment) {
                #(#imports)*
                #(#body)*
            }
        }
    }
}

/// Names the unit assigns to with a plain identifier target. Their `type` values are not tracked statically.
fn assigned_names(program: &Program) -> HashSet<String> {
    let mut names = HashSet::new();
    walk_all(&program.statements, &mut |node| {
        if let NodeKind::Assign { left, .. } = &node.kind {
            if let NodeKind::Identifier(name) = &left.kind {
                names.insert(name.clone());
            }
        }
    });
    names
}
