//! Define error types for Kythera → Rust emission.
//!
//! Type and scope failures found while generating code are ordinary [`CompileError`]s; formatting the generated
//! tokens can additionally fail inside `syn`, which indicates a code generator defect.

use kythera_syntax::diagnostics::CompileError;

/// Error during code generation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EmitError {
    /// The program is ill-typed or misuses a name.
    #[error(transparent)]
    Compile(#[from] CompileError),
    /// The generated tokens did not form a valid Rust file.
    #[error("syn parse error: {0}")]
    SynParse(String),
}

impl EmitError {
    /// The underlying compile error, if this is not an internal formatting failure.
    pub fn as_compile_error(&self) -> Option<&CompileError> {
        match self {
            EmitError::Compile(e) => Some(e),
            EmitError::SynParse(_) => None,
        }
    }
}
