//! Lexical scope and symbol table.
//!
//! A [`Scope`] is an arena of frames linked by parent indices. The current frame is always the last one pushed,
//! so popping truncates the arena; lookups walk the parent chain upward. Both the parser and the code generator
//! drive a scope of their own through the same push/pop discipline.
//!
//! ## Notes
//! - A name is unique per frame; shadowing across frames is allowed.
//! - `this` lookups start at the *parent* of the current frame and only read frame metadata: `this` always refers
//!   to the object whose literal encloses the function (or access-assignment) it is used in.
//! - [`Scope::snapshot`] / [`Scope::restore`] give callers transactional rollback of a failed statement.
//!
//! ## Examples
//! ```rust
//! use kythera_syntax::scope::{FrameKind, Scope};
//! use kythera_syntax::types::TypeNode;
//!
//! let mut scope = Scope::new();
//! scope.create("a", TypeNode::int()).unwrap();
//! scope.push(FrameKind::ControlFlow);
//! scope.create("b", TypeNode::str()).unwrap();
//! assert!(scope.has("a"));
//! scope.pop();
//! assert!(!scope.has("b"));
//! ```

use crate::ast::Span;
use crate::diagnostics::CompileError;
use crate::types::TypeNode;

/// Failure of a scope operation. Callers attach a span with [`ScopeError::at`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScopeError {
    #[error("'{0}' is not declared")]
    Undeclared(String),
    #[error("'{0}' is already declared in this scope")]
    Redeclared(String),
    #[error("return used outside of a function")]
    ReturnOutsideFunction,
    #[error("'this' used outside of an object")]
    ThisOutsideObject,
}

impl ScopeError {
    /// Lift into a `ScopeError`-kind [`CompileError`] located at `span`.
    pub fn at(self, span: Span) -> CompileError {
        CompileError::scope(self.to_string(), span)
    }
}

/// Frame metadata.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameKind {
    Global,
    /// A function body with its declared return type.
    Function { returns: TypeNode },
    /// `if`, `else` and `while` bodies.
    ControlFlow,
    /// An object literal (or access-assignment target) with its synthetic `this` binding.
    Object { this_id: String, this_type: TypeNode },
}

/// A declared name.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub ty: TypeNode,
    /// Compile-time value of a `type`-typed binding, when statically known.
    pub type_value: Option<TypeNode>,
}

#[derive(Debug, Clone, PartialEq)]
struct Frame {
    parent: Option<usize>,
    kind: FrameKind,
    symbols: Vec<Symbol>,
}

/// Tree of lexical frames, stored as an arena with parent indices.
#[derive(Debug, Clone, PartialEq)]
pub struct Scope {
    frames: Vec<Frame>,
}

/// Saved scope state for rollback.
#[derive(Debug, Clone)]
pub struct ScopeSnapshot(Scope);

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl Scope {
    /// A scope holding only the global frame.
    pub fn new() -> Self {
        Self {
            frames: vec![Frame {
                parent: None,
                kind: FrameKind::Global,
                symbols: Vec::new(),
            }],
        }
    }

    fn current(&self) -> usize {
        self.frames.len() - 1
    }

    /// Nesting depth of the current frame (0 at global level).
    pub fn depth(&self) -> usize {
        self.current()
    }

    /// Enter a new frame.
    pub fn push(&mut self, kind: FrameKind) {
        let parent = self.current();
        tracing::debug!(depth = parent + 1, kind = ?kind_name(&kind), "scope push");
        self.frames.push(Frame {
            parent: Some(parent),
            kind,
            symbols: Vec::new(),
        });
    }

    /// Leave the current frame. The global frame is never popped.
    pub fn pop(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
            tracing::debug!(depth = self.current(), "scope pop");
        }
    }

    /// Iterate frame indices from `start` up to the root.
    fn chain(&self, start: Option<usize>) -> impl Iterator<Item = &Frame> {
        std::iter::successors(start.map(|i| &self.frames[i]), |f| f.parent.map(|p| &self.frames[p]))
    }

    // ========================================================================
    // Symbols
    // ========================================================================

    /// Declare `name` in the current frame.
    ///
    /// ## Errors
    /// - [`ScopeError::Redeclared`] if the current frame already declares `name`.
    pub fn create(&mut self, name: &str, ty: TypeNode) -> Result<(), ScopeError> {
        self.create_with_value(name, ty, None)
    }

    /// Declare `name`, also recording the compile-time value of a `type` binding.
    pub fn create_with_value(
        &mut self,
        name: &str,
        ty: TypeNode,
        type_value: Option<TypeNode>,
    ) -> Result<(), ScopeError> {
        let current = self.current();
        let frame = &mut self.frames[current];
        if frame.symbols.iter().any(|s| s.name == name) {
            return Err(ScopeError::Redeclared(name.to_string()));
        }
        frame.symbols.push(Symbol {
            name: name.to_string(),
            ty,
            type_value,
        });
        Ok(())
    }

    /// Innermost declaration of `name`.
    ///
    /// ## Errors
    /// - [`ScopeError::Undeclared`] if no frame up the chain declares `name`.
    pub fn lookup(&self, name: &str) -> Result<&Symbol, ScopeError> {
        self.chain(Some(self.current()))
            .find_map(|f| f.symbols.iter().find(|s| s.name == name))
            .ok_or_else(|| ScopeError::Undeclared(name.to_string()))
    }

    /// Type of the innermost declaration of `name`.
    pub fn get(&self, name: &str) -> Result<&TypeNode, ScopeError> {
        self.lookup(name).map(|s| &s.ty)
    }

    /// Return `true` if `name` is declared anywhere up the chain.
    pub fn has(&self, name: &str) -> bool {
        self.lookup(name).is_ok()
    }

    /// Replace the known compile-time value of the `type` binding `name` (`None` forgets it).
    pub fn set_type_value(&mut self, name: &str, value: Option<TypeNode>) -> Result<(), ScopeError> {
        let mut index = Some(self.current());
        while let Some(i) = index {
            if let Some(symbol) = self.frames[i].symbols.iter_mut().find(|s| s.name == name) {
                symbol.type_value = value;
                return Ok(());
            }
            index = self.frames[i].parent;
        }
        Err(ScopeError::Undeclared(name.to_string()))
    }

    /// Names visible from the current frame, innermost declaration first, each name once.
    pub fn visible_symbols(&self) -> Vec<&Symbol> {
        let mut seen: Vec<&Symbol> = Vec::new();
        for frame in self.chain(Some(self.current())) {
            for symbol in &frame.symbols {
                if !seen.iter().any(|s| s.name == symbol.name) {
                    seen.push(symbol);
                }
            }
        }
        seen
    }

    /// Declarations of the global frame in declaration order.
    pub fn globals(&self) -> &[Symbol] {
        &self.frames[0].symbols
    }

    // ========================================================================
    // Frame metadata
    // ========================================================================

    /// Return `true` if any frame up the chain is a function body.
    pub fn is_in_function(&self) -> bool {
        self.chain(Some(self.current()))
            .any(|f| matches!(f.kind, FrameKind::Function { .. }))
    }

    /// Declared return type of the nearest enclosing function.
    ///
    /// ## Errors
    /// - [`ScopeError::ReturnOutsideFunction`] at global level.
    pub fn return_type(&self) -> Result<&TypeNode, ScopeError> {
        self.chain(Some(self.current()))
            .find_map(|f| match &f.kind {
                FrameKind::Function { returns } => Some(returns),
                _ => None,
            })
            .ok_or(ScopeError::ReturnOutsideFunction)
    }

    fn this_frame(&self) -> Result<(&str, &TypeNode), ScopeError> {
        let parent = self.frames[self.current()].parent;
        self.chain(parent)
            .find_map(|f| match &f.kind {
                FrameKind::Object { this_id, this_type } => Some((this_id.as_str(), this_type)),
                _ => None,
            })
            .ok_or(ScopeError::ThisOutsideObject)
    }

    /// Synthetic identifier of the `this` binding visible here.
    pub fn this_id(&self) -> Result<&str, ScopeError> {
        self.this_frame().map(|(id, _)| id)
    }

    /// Type of `this` visible here.
    pub fn this_type(&self) -> Result<&TypeNode, ScopeError> {
        self.this_frame().map(|(_, ty)| ty)
    }

    /// Synthetic `this` identifiers of every object frame up the chain, innermost first.
    pub fn visible_this_ids(&self) -> Vec<&str> {
        self.chain(Some(self.current()))
            .filter_map(|f| match &f.kind {
                FrameKind::Object { this_id, .. } => Some(this_id.as_str()),
                _ => None,
            })
            .collect()
    }

    // ========================================================================
    // Rollback
    // ========================================================================

    pub fn snapshot(&self) -> ScopeSnapshot {
        ScopeSnapshot(self.clone())
    }

    pub fn restore(&mut self, snapshot: ScopeSnapshot) {
        tracing::debug!(depth = snapshot.0.depth(), "scope restored from snapshot");
        *self = snapshot.0;
    }
}

fn kind_name(kind: &FrameKind) -> &'static str {
    match kind {
        FrameKind::Global => "global",
        FrameKind::Function { .. } => "function",
        FrameKind::ControlFlow => "control-flow",
        FrameKind::Object { .. } => "object",
    }
}
