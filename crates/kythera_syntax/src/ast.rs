//! Typed abstract syntax tree for Kythera.
//!
//! Every expression node carries the [`TypeNode`] the parser inferred for it; statement nodes (`let`, `if`,
//! `while`, `return`) carry none. Nodes are only built through [`Node::new`], which rejects internally
//! inconsistent payloads with a `ValidationError` instead of letting a malformed tree escape the parser.
//!
//! ## Notes
//! - Type syntax is not a node kind of its own: `new`, `as` and type literals embed a [`TypeNode`] directly.
//! - `Derived` types embed an expression node, so the AST and the type representation are mutually recursive.

use kythera_core::lang::operators::{self, Fixity, OperatorId};

use crate::diagnostics::CompileError;
use crate::types::{Primitive, TypeNode};

// ============================================================================
// Source locations
// ============================================================================

/// Byte range in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// 1-based line/column of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

// ============================================================================
// Program and nodes
// ============================================================================

/// A parsed compilation unit: top-level statements in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Node>,
}

/// A typed AST node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    /// Inferred type; `None` exactly for statement kinds.
    pub ty: Option<TypeNode>,
    pub span: Span,
}

/// The closed set of node kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Literal(Literal),
    Identifier(String),
    Unary {
        op: OperatorId,
        target: Box<Node>,
    },
    Binary {
        op: OperatorId,
        left: Box<Node>,
        right: Box<Node>,
    },
    Assign {
        op: OperatorId,
        left: Box<Node>,
        right: Box<Node>,
    },
    Typeof(Box<Node>),
    New(TypeNode),
    Let {
        identifier: String,
        value: Box<Node>,
    },
    If {
        condition: Box<Node>,
        body: Vec<Node>,
        else_body: Option<Vec<Node>>,
    },
    While {
        condition: Box<Node>,
        body: Vec<Node>,
    },
    Return(Box<Node>),
    As {
        from: Box<Node>,
        to: TypeNode,
    },
    Call {
        target: Box<Node>,
        arguments: Vec<Node>,
    },
    Access {
        target: Box<Node>,
        index: AccessIndex,
    },
    This,
}

/// Index of an access expression; the variant is the access method.
#[derive(Debug, Clone, PartialEq)]
pub enum AccessIndex {
    /// `target.name`
    Dot(String),
    /// `target[expr]`
    Bracket(Box<Node>),
}

/// Literal payloads.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Null,
    /// A type used as a value (`int`, `fn<int> str`, `obj{int a,}`).
    Type(TypeNode),
    Function(FunctionLiteral),
    List(Vec<Node>),
    Object(Vec<Field>),
}

/// `<type name, ...> returns { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionLiteral {
    pub parameters: Vec<Param>,
    pub returns: TypeNode,
    pub body: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: TypeNode,
}

/// `name = value,` inside an object literal.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub value: Node,
}

impl NodeKind {
    /// Return `true` for `let`, `if`, `while` and `return`.
    pub fn is_statement(&self) -> bool {
        matches!(
            self,
            NodeKind::Let { .. } | NodeKind::If { .. } | NodeKind::While { .. } | NodeKind::Return(_)
        )
    }

    /// Short human-readable name used in diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            NodeKind::Literal(_) => "literal",
            NodeKind::Identifier(_) => "identifier",
            NodeKind::Unary { .. } => "unary expression",
            NodeKind::Binary { .. } => "binary expression",
            NodeKind::Assign { .. } => "assignment",
            NodeKind::Typeof(_) => "typeof expression",
            NodeKind::New(_) => "new expression",
            NodeKind::Let { .. } => "let statement",
            NodeKind::If { .. } => "if statement",
            NodeKind::While { .. } => "while statement",
            NodeKind::Return(_) => "return statement",
            NodeKind::As { .. } => "cast",
            NodeKind::Call { .. } => "call",
            NodeKind::Access { .. } => "access",
            NodeKind::This => "this",
        }
    }
}

// ============================================================================
// Validating construction
// ============================================================================

impl Node {
    /// Build a node, checking that its payload and type annotation are consistent.
    ///
    /// ## Parameters
    /// - `kind`: the node payload.
    /// - `ty`: inferred type (`None` for statements, `Some` for expressions).
    /// - `span`: source range.
    ///
    /// ## Errors
    /// - `ValidationError` when the combination could only come from a parser defect: a statement with a type, an
    ///   expression without one, a non-prefix unary operator, an assignment operator in a binary node (or the
    ///   reverse), a literal whose payload disagrees with its type, or `typeof`/`new`/`as` nodes whose type is not
    ///   the one their payload implies.
    pub fn new(kind: NodeKind, ty: Option<TypeNode>, span: Span) -> Result<Node, CompileError> {
        validate(&kind, ty.as_ref(), span)?;
        Ok(Node { kind, ty, span })
    }

    /// Type annotation of an expression node.
    ///
    /// ## Errors
    /// - `ValidationError` if called on a statement node.
    pub fn expr_type(&self) -> Result<&TypeNode, CompileError> {
        self.ty.as_ref().ok_or_else(|| {
            CompileError::validation(
                format!("{} has no type and cannot be used as a value", self.kind.describe()),
                self.span,
            )
        })
    }

    /// Visit this node and every node nested in it (including expressions inside types), mutably.
    pub fn walk_mut(&mut self, f: &mut dyn FnMut(&mut Node) -> Result<(), CompileError>) -> Result<(), CompileError> {
        f(self)?;
        match &mut self.kind {
            NodeKind::Literal(lit) => match lit {
                Literal::Function(func) => {
                    for param in &mut func.parameters {
                        param.ty.walk_nodes_mut(f)?;
                    }
                    func.returns.walk_nodes_mut(f)?;
                    for stmt in &mut func.body {
                        stmt.walk_mut(f)?;
                    }
                }
                Literal::List(elements) => {
                    for e in elements {
                        e.walk_mut(f)?;
                    }
                }
                Literal::Object(fields) => {
                    for field in fields {
                        field.value.walk_mut(f)?;
                    }
                }
                Literal::Type(ty) => ty.walk_nodes_mut(f)?,
                Literal::Int(_) | Literal::Float(_) | Literal::Bool(_) | Literal::Str(_) | Literal::Null => {}
            },
            NodeKind::Unary { target, .. } | NodeKind::Typeof(target) | NodeKind::Return(target) => {
                target.walk_mut(f)?
            }
            NodeKind::Binary { left, right, .. } | NodeKind::Assign { left, right, .. } => {
                left.walk_mut(f)?;
                right.walk_mut(f)?;
            }
            NodeKind::New(ty) => ty.walk_nodes_mut(f)?,
            NodeKind::Let { value, .. } => value.walk_mut(f)?,
            NodeKind::If {
                condition,
                body,
                else_body,
            } => {
                condition.walk_mut(f)?;
                for stmt in body {
                    stmt.walk_mut(f)?;
                }
                if let Some(else_body) = else_body {
                    for stmt in else_body {
                        stmt.walk_mut(f)?;
                    }
                }
            }
            NodeKind::While { condition, body } => {
                condition.walk_mut(f)?;
                for stmt in body {
                    stmt.walk_mut(f)?;
                }
            }
            NodeKind::As { from, to } => {
                from.walk_mut(f)?;
                to.walk_nodes_mut(f)?;
            }
            NodeKind::Call { target, arguments } => {
                target.walk_mut(f)?;
                for arg in arguments {
                    arg.walk_mut(f)?;
                }
            }
            NodeKind::Access { target, index } => {
                target.walk_mut(f)?;
                if let AccessIndex::Bracket(index) = index {
                    index.walk_mut(f)?;
                }
            }
            NodeKind::Identifier(_) | NodeKind::This => {}
        }
        Ok(())
    }
}

impl Node {
    /// Visit this node and every node nested in it (including expressions inside types).
    pub fn walk(&self, f: &mut dyn FnMut(&Node)) {
        f(self);
        match &self.kind {
            NodeKind::Literal(lit) => match lit {
                Literal::Function(func) => {
                    for param in &func.parameters {
                        param.ty.walk_nodes(f);
                    }
                    func.returns.walk_nodes(f);
                    walk_all(&func.body, f);
                }
                Literal::List(elements) => walk_all(elements, f),
                Literal::Object(fields) => {
                    for field in fields {
                        field.value.walk(f);
                    }
                }
                Literal::Type(ty) => ty.walk_nodes(f),
                Literal::Int(_) | Literal::Float(_) | Literal::Bool(_) | Literal::Str(_) | Literal::Null => {}
            },
            NodeKind::Unary { target, .. } | NodeKind::Typeof(target) | NodeKind::Return(target) => target.walk(f),
            NodeKind::Binary { left, right, .. } | NodeKind::Assign { left, right, .. } => {
                left.walk(f);
                right.walk(f);
            }
            NodeKind::New(ty) => ty.walk_nodes(f),
            NodeKind::Let { value, .. } => value.walk(f),
            NodeKind::If {
                condition,
                body,
                else_body,
            } => {
                condition.walk(f);
                walk_all(body, f);
                if let Some(else_body) = else_body {
                    walk_all(else_body, f);
                }
            }
            NodeKind::While { condition, body } => {
                condition.walk(f);
                walk_all(body, f);
            }
            NodeKind::As { from, to } => {
                from.walk(f);
                to.walk_nodes(f);
            }
            NodeKind::Call { target, arguments } => {
                target.walk(f);
                walk_all(arguments, f);
            }
            NodeKind::Access { target, index } => {
                target.walk(f);
                if let AccessIndex::Bracket(index) = index {
                    index.walk(f);
                }
            }
            NodeKind::Identifier(_) | NodeKind::This => {}
        }
    }
}

/// [`Node::walk`] over a statement list.
pub fn walk_all(nodes: &[Node], f: &mut dyn FnMut(&Node)) {
    for node in nodes {
        node.walk(f);
    }
}

fn validate(kind: &NodeKind, ty: Option<&TypeNode>, span: Span) -> Result<(), CompileError> {
    let fail = |msg: String| Err(CompileError::validation(msg, span));

    if kind.is_statement() {
        if ty.is_some() {
            return fail(format!("{} must not carry a type", kind.describe()));
        }
        return Ok(());
    }
    let Some(ty) = ty else {
        return fail(format!("{} must carry a type", kind.describe()));
    };

    match kind {
        NodeKind::Unary { op, .. } => {
            if operators::info_for(*op).fixity != Fixity::Prefix {
                return fail(format!("'{}' is not a unary operator", operators::as_str(*op)));
            }
        }
        NodeKind::Binary { op, .. } => {
            if operators::infix_precedence(*op).is_none() || operators::is_assignment(*op) {
                return fail(format!("'{}' is not a binary operator", operators::as_str(*op)));
            }
        }
        NodeKind::Assign { op, left, .. } => {
            if !operators::is_assignment(*op) {
                return fail(format!("'{}' is not an assignment operator", operators::as_str(*op)));
            }
            if !matches!(left.kind, NodeKind::Identifier(_) | NodeKind::Access { .. }) {
                return fail(format!("{} is not an assignment target", left.kind.describe()));
            }
        }
        NodeKind::Typeof(_) => {
            if *ty != TypeNode::Primitive(Primitive::Type) {
                return fail("typeof must have type 'type'".to_string());
            }
        }
        NodeKind::New(target) => {
            if ty != target {
                return fail("new must have its target type".to_string());
            }
        }
        NodeKind::As { to, .. } => {
            if ty != to {
                return fail("cast must have its destination type".to_string());
            }
        }
        NodeKind::Literal(lit) => validate_literal(lit, ty, span)?,
        _ => {}
    }
    Ok(())
}

fn validate_literal(lit: &Literal, ty: &TypeNode, span: Span) -> Result<(), CompileError> {
    let consistent = match (lit, ty) {
        (Literal::Int(_), TypeNode::Primitive(Primitive::Int))
        | (Literal::Float(_), TypeNode::Primitive(Primitive::Float))
        | (Literal::Bool(_), TypeNode::Primitive(Primitive::Bool))
        | (Literal::Str(_), TypeNode::Primitive(Primitive::Str))
        | (Literal::Null, TypeNode::Primitive(Primitive::Null))
        | (Literal::Type(_), TypeNode::Primitive(Primitive::Type))
        | (Literal::List(_), TypeNode::List(_)) => true,
        (Literal::Function(func), TypeNode::Function { parameters, returns }) => {
            func.parameters.len() == parameters.len() && func.returns == **returns
        }
        (Literal::Object(fields), TypeNode::Object(structure)) => {
            fields.len() == structure.len() && fields.iter().all(|f| structure.contains(&f.name))
        }
        _ => false,
    };
    if consistent {
        Ok(())
    } else {
        Err(CompileError::validation(
            format!("literal payload does not match its type '{ty}'"),
            span,
        ))
    }
}
