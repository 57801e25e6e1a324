//! Diagnostics and error reporting for Kythera.
//!
//! Every failure in the frontend and the code generator is a [`CompileError`] tagged with one of the five
//! [`ErrorKind`]s. Processing is fail-fast, so a caller always sees exactly one error per failed attempt.
//!
//! ## Notes
//! - `CompileError` implements [`miette::Diagnostic`] so drivers can render it with source context via
//!   `miette::Report::new(err).with_source_code(...)`.
//! - [`format_error`] is a dependency-free plain-text renderer used by tests and non-terminal outputs.

use std::fmt;

use miette::{Diagnostic, LabeledSpan, SourceSpan};

use crate::ast::{Position, Span};

/// Category of a compile-time failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Unrecognized character or malformed literal.
    Lex,
    /// Unexpected or missing token.
    Syntax,
    /// A node would be built with an inconsistent payload (a parser defect, never a user error).
    Validation,
    /// Structural type mismatch.
    Type,
    /// Undefined or duplicate name, or `return`/`this` outside a valid enclosing frame.
    Scope,
}

impl ErrorKind {
    /// Stable diagnostic code.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::Lex => "kythera::lex",
            ErrorKind::Syntax => "kythera::syntax",
            ErrorKind::Validation => "kythera::validation",
            ErrorKind::Type => "kythera::type",
            ErrorKind::Scope => "kythera::scope",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Lex => write!(f, "LexError"),
            ErrorKind::Syntax => write!(f, "SyntaxError"),
            ErrorKind::Validation => write!(f, "ValidationError"),
            ErrorKind::Type => write!(f, "TypeError"),
            ErrorKind::Scope => write!(f, "ScopeError"),
        }
    }
}

/// A compile-time error with location information.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct CompileError {
    pub kind: ErrorKind,
    pub message: String,
    pub span: Span,
    /// Line/column of the offending token, when the producer knows it.
    pub position: Option<Position>,
    pub notes: Vec<String>,
    pub hints: Vec<String>,
}

impl CompileError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
            position: None,
            notes: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn lex(message: impl Into<String>, span: Span, position: Position) -> Self {
        Self::new(ErrorKind::Lex, message, span).with_position(position)
    }

    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::Syntax, message, span)
    }

    pub fn validation(message: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::Validation, message, span)
    }

    pub fn type_error(message: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::Type, message, span)
    }

    pub fn scope(message: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::Scope, message, span)
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }
}

impl Diagnostic for CompileError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.kind.code()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        if self.hints.is_empty() && self.notes.is_empty() {
            return None;
        }
        let mut lines: Vec<String> = self.notes.iter().map(|n| format!("note: {n}")).collect();
        lines.extend(self.hints.iter().cloned());
        Some(Box::new(lines.join("\n")))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let len = self.span.end.saturating_sub(self.span.start);
        let span = SourceSpan::from((self.span.start, len));
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            Some(self.kind.to_string()),
            span,
        ))))
    }
}

/// Render an error with source context as plain text.
///
/// ## Parameters
/// - `file_name`: name shown in the location line.
/// - `source`: full source text the error's span points into.
/// - `error`: the error to render.
///
/// ## Returns
/// - A multi-line string: header, `--> file:line:col`, the offending line, a caret underline, notes and hints.
pub fn format_error(file_name: &str, source: &str, error: &CompileError) -> String {
    let (line_num, col_num, line_text) = line_info(source, error.span.start);
    let gutter = line_num.to_string().len();

    let underline_len = if error.span.end > error.span.start {
        (error.span.end - error.span.start)
            .min(line_text.len().saturating_sub(col_num - 1))
            .max(1)
    } else {
        1
    };

    let mut out = String::new();
    out.push_str(&format!("{}: {}\n", error.kind, error.message));
    out.push_str(&format!("  --> {}:{}:{}\n", file_name, line_num, col_num));
    out.push_str(&format!("  {:>gutter$} |\n", ""));
    out.push_str(&format!("  {:>gutter$} | {}\n", line_num, line_text));
    out.push_str(&format!(
        "  {:>gutter$} | {}{}\n",
        "",
        " ".repeat(col_num - 1),
        "^".repeat(underline_len)
    ));
    for note in &error.notes {
        out.push_str(&format!("  = note: {}\n", note));
    }
    for hint in &error.hints {
        out.push_str(&format!("  = hint: {}\n", hint));
    }
    out
}

/// Get line number, column number, and line text for a byte offset (1-based line/column).
pub fn line_info(source: &str, offset: usize) -> (usize, usize, &str) {
    let offset = offset.min(source.len());
    let mut line_num = 1;
    let mut line_start = 0;

    for (i, c) in source.char_indices() {
        if i >= offset {
            break;
        }
        if c == '\n' {
            line_num += 1;
            line_start = i + 1;
        }
    }

    let line_end = source[line_start..]
        .find('\n')
        .map(|i| line_start + i)
        .unwrap_or(source.len());

    let line_text = &source[line_start..line_end];
    let col_num = source[line_start..offset].chars().count() + 1;

    (line_num, col_num, line_text)
}
