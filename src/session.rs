//! Compile sessions: the lexer → parser → compiler pipeline over one or more units.
//!
//! A [`Session`] owns the parser scope and the [`Compiler`] (which owns its own scope). Feeding it units one at a
//! time is how the REPL works: each unit sees the top-level declarations of every unit accepted before it. Both
//! scopes move together: a unit that fails at any stage declares nothing in either.

use kythera_syntax::ast::Program;
use kythera_syntax::diagnostics::CompileError;
use kythera_syntax::scope::Scope;
use kythera_syntax::{lexer, parser};

use crate::backend::{CompileOptions, CompiledUnit, Compiler, EmitError, ExportedSymbol};

/// A compile pipeline that keeps declarations alive across units.
pub struct Session {
    scope: Scope,
    compiler: Compiler,
    units: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_options(CompileOptions::default())
    }

    pub fn with_options(options: CompileOptions) -> Self {
        Self {
            scope: Scope::new(),
            compiler: Compiler::with_options(options),
            units: 0,
        }
    }

    /// Lex, parse and compile one unit.
    ///
    /// ## Errors
    /// - `EmitError::Compile` with the first lex, syntax, validation, type or scope error.
    /// - `EmitError::SynParse` if the emitted Rust does not parse.
    #[tracing::instrument(skip_all, fields(source_len = source.len(), unit = self.units))]
    pub fn compile(&mut self, source: &str) -> Result<CompiledUnit, EmitError> {
        let snapshot = self.scope.snapshot();
        let program = self.parse(source)?;
        match self.compiler.compile_program(&program) {
            Ok(unit) => {
                self.units += 1;
                Ok(unit)
            }
            Err(err) => {
                self.scope.restore(snapshot);
                Err(err)
            }
        }
    }

    /// Lex and parse one unit against the session's declarations without compiling it.
    ///
    /// A successful check declares the unit's bindings in the parser scope only; use it on a throwaway session, or
    /// follow it with nothing but further checks.
    pub fn check(&mut self, source: &str) -> Result<Program, CompileError> {
        self.parse(source)
    }

    fn parse(&mut self, source: &str) -> Result<Program, CompileError> {
        let tokens = lexer::lex(source)?;
        parser::parse_with_scope(&tokens, &mut self.scope)
    }

    /// Every top-level binding declared by accepted units, in declaration order.
    pub fn declarations(&self) -> Vec<ExportedSymbol> {
        self.compiler
            .scope()
            .globals()
            .iter()
            .map(|symbol| ExportedSymbol {
                name: symbol.name.clone(),
                ty: symbol.ty.to_string(),
            })
            .collect()
    }

    /// Number of units compiled successfully.
    pub fn units(&self) -> usize {
        self.units
    }
}
