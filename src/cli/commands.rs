//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Component, Path, PathBuf};

use kythera_core::lang::punctuation::PunctuationId;
use kythera_syntax::diagnostics::{self, CompileError};
use kythera_syntax::lexer::{self, Token};
use miette::{NamedSource, Report};

use super::{CliError, CliResult, ExitCode};
use crate::backend::{CompileOptions, EmitError, ExportedSymbol};
use crate::session::Session;

/// Maximum source file size (100 MB)
///
/// Files larger than this are rejected to prevent out-of-memory conditions
/// during compilation.
const MAX_SOURCE_SIZE: u64 = 100 * 1024 * 1024;

/// How compile errors are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorStyle {
    /// `miette` report with source snippet and labels.
    Graphical,
    /// Plain text from [`diagnostics::format_error`].
    Plain,
}

/// Options of the `emit` command.
#[derive(Debug, Clone)]
pub struct EmitArgs {
    pub output: Option<PathBuf>,
    pub symbols: bool,
    pub header: bool,
}

// ============================================================================
// Input and error rendering
// ============================================================================

/// Read source file contents.
///
/// ## Errors
///
/// Returns an error if:
/// - The file cannot be read (I/O error)
/// - The file exceeds `MAX_SOURCE_SIZE` (100 MB)
pub fn read_source(path: &Path) -> CliResult<String> {
    let display = path.display();
    let metadata = fs::metadata(path).map_err(|e| CliError::failure(format!("Cannot access file '{display}': {e}")))?;

    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(CliError::failure(format!(
            "Source file '{display}' is too large ({} bytes, max {MAX_SOURCE_SIZE} bytes)",
            metadata.len()
        )));
    }

    fs::read_to_string(path).map_err(|e| CliError::failure(format!("Error reading file '{display}': {e}")))
}

/// Render a compile error against the source it points into.
pub fn render_error(style: ErrorStyle, file_name: &str, source: &str, error: &CompileError) -> String {
    match style {
        ErrorStyle::Plain => diagnostics::format_error(file_name, source, error).trim_end().to_string(),
        ErrorStyle::Graphical => {
            let report = Report::new(error.clone()).with_source_code(NamedSource::new(file_name, source.to_string()));
            format!("{report:?}")
        }
    }
}

fn compile_failure(style: ErrorStyle, file_name: &str, source: &str, error: &CompileError) -> CliError {
    CliError::failure(render_error(style, file_name, source, error))
}

fn emit_failure(style: ErrorStyle, file_name: &str, source: &str, error: &EmitError) -> CliError {
    match error {
        EmitError::Compile(e) => compile_failure(style, file_name, source, e),
        EmitError::SynParse(msg) => CliError::failure(format!("internal error: generated Rust did not parse: {msg}")),
    }
}

/// Reject output paths that climb out of the working tree.
fn validate_output_path(path: &Path) -> CliResult<()> {
    if path.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(CliError::failure(format!(
            "Output path '{}' contains path traversal (..)",
            path.display()
        )));
    }
    if path.is_absolute() {
        tracing::warn!("Using absolute output path: {}", path.display());
    }
    Ok(())
}

// ============================================================================
// Commands
// ============================================================================

/// Lex and display tokens, one per line as `line:col  token`.
pub fn lex_file(path: &Path, style: ErrorStyle) -> CliResult<ExitCode> {
    let source = read_source(path)?;
    let name = path.display().to_string();
    let tokens = lexer::lex(&source).map_err(|e| compile_failure(style, &name, &source, &e))?;

    for token in &tokens {
        println!("{}", describe_token(token));
    }
    Ok(ExitCode::SUCCESS)
}

fn describe_token(token: &Token) -> String {
    let position = format!("{}:{}", token.position.line, token.position.col);
    if token.is_virtual() {
        format!("{position:<8} {} (inserted)", token.kind)
    } else {
        format!("{position:<8} {}", token.kind)
    }
}

/// Parse and display the typed AST.
pub fn parse_file(path: &Path, style: ErrorStyle) -> CliResult<ExitCode> {
    let source = read_source(path)?;
    let name = path.display().to_string();
    let program = Session::new()
        .check(&source)
        .map_err(|e| compile_failure(style, &name, &source, &e))?;
    println!("{program:#?}");
    Ok(ExitCode::SUCCESS)
}

/// Parse and compile a file without writing output.
pub fn check_file(path: &Path, style: ErrorStyle) -> CliResult<ExitCode> {
    let source = read_source(path)?;
    let name = path.display().to_string();
    let unit = Session::new()
        .compile(&source)
        .map_err(|e| emit_failure(style, &name, &source, &e))?;
    println!("✓ {name}: {} top-level binding(s)", unit.symbols.len());
    Ok(ExitCode::SUCCESS)
}

/// Compile a file and emit the generated Rust source.
pub fn emit_file(path: &Path, args: &EmitArgs, style: ErrorStyle) -> CliResult<ExitCode> {
    let source = read_source(path)?;
    let name = path.display().to_string();
    let mut session = Session::with_options(CompileOptions {
        emit_header: args.header,
        ..CompileOptions::default()
    });
    let unit = session
        .compile(&source)
        .map_err(|e| emit_failure(style, &name, &source, &e))?;

    match &args.output {
        Some(output) => {
            validate_output_path(output)?;
            fs::write(output, &unit.code)
                .map_err(|e| CliError::failure(format!("Error writing '{}': {e}", output.display())))?;
            tracing::info!(output = %output.display(), bytes = unit.code.len(), "wrote generated source");
        }
        None => print!("{}", unit.code),
    }
    if args.symbols {
        for symbol in &unit.symbols {
            eprintln!("{}", format_symbol(symbol));
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn format_symbol(symbol: &ExportedSymbol) -> String {
    format!("{}: {}", symbol.name, symbol.ty)
}

// ============================================================================
// REPL
// ============================================================================

/// Read units from stdin and compile each against one session.
///
/// A unit ends at the first line where every bracket opened in it is closed. `:symbols` lists the bindings declared
/// so far and `:quit` (or end of input) leaves.
pub fn repl(show_code: bool, style: ErrorStyle) -> CliResult<ExitCode> {
    let mut session = Session::new();
    let stdin = io::stdin();
    let mut pending = String::new();

    prompt(&pending)?;
    for line in stdin.lock().lines() {
        let line = line.map_err(|e| CliError::failure(format!("Error reading stdin: {e}")))?;
        if pending.is_empty() {
            match line.trim() {
                ":quit" | ":q" => break,
                ":symbols" => {
                    for symbol in session.declarations() {
                        println!("{}", format_symbol(&symbol));
                    }
                    prompt(&pending)?;
                    continue;
                }
                "" => {
                    prompt(&pending)?;
                    continue;
                }
                _ => {}
            }
        }
        pending.push_str(&line);
        pending.push('\n');
        if !unit_is_complete(&pending) {
            prompt(&pending)?;
            continue;
        }

        let unit = std::mem::take(&mut pending);
        match session.compile(&unit) {
            Ok(compiled) => {
                if show_code {
                    println!("{}", compiled.code);
                }
                for symbol in &compiled.symbols {
                    println!("{}", format_symbol(symbol));
                }
            }
            Err(e) => eprintln!("{}", emit_failure(style, "<repl>", &unit, &e).message),
        }
        prompt(&pending)?;
    }
    Ok(ExitCode::SUCCESS)
}

fn prompt(pending: &str) -> CliResult<()> {
    let mut stdout = io::stdout();
    let marker = if pending.is_empty() { "ky> " } else { "... " };
    write!(stdout, "{marker}")
        .and_then(|()| stdout.flush())
        .map_err(|e| CliError::failure(format!("Error writing prompt: {e}")))
}

/// A unit is complete when its brackets balance, or when it cannot be lexed for a reason more input cannot fix.
fn unit_is_complete(source: &str) -> bool {
    let tokens = match lexer::lex(source) {
        Ok(tokens) => tokens,
        Err(e) => return !e.message.starts_with("Unterminated"),
    };
    let mut depth: i64 = 0;
    for token in &tokens {
        match token.kind.punctuation() {
            Some(PunctuationId::LParen | PunctuationId::LBracket | PunctuationId::LBrace) => depth += 1,
            Some(PunctuationId::RParen | PunctuationId::RBracket | PunctuationId::RBrace) => depth -= 1,
            _ => {}
        }
    }
    depth <= 0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_completion_tracks_brackets() {
        assert!(unit_is_complete("let a = 1\n"));
        assert!(!unit_is_complete("let f = <int a> int {\n"));
        assert!(unit_is_complete("let f = <int a> int {\n  return a\n}\n"));
        assert!(!unit_is_complete("let s = \"open\n"));
        // A bad character will not be fixed by reading more.
        assert!(unit_is_complete("let a = 1 ~ 2\n"));
    }

    #[test]
    fn test_output_path_rejects_traversal() {
        assert!(validate_output_path(Path::new("../out.rs")).is_err());
        assert!(validate_output_path(Path::new("target/out.rs")).is_ok());
    }

    #[test]
    fn test_plain_rendering_points_at_source() {
        let source = "let a = 1\nlet b = a + \"x\"\n";
        let err = Session::new().check(source).unwrap_err();
        let rendered = render_error(ErrorStyle::Plain, "main.ky", source, &err);
        assert!(rendered.starts_with("TypeError:"), "{rendered}");
        assert!(rendered.contains("--> main.ky:2:"), "{rendered}");
    }

    #[test]
    fn test_symbols_render_name_and_type() {
        let symbol = ExportedSymbol {
            name: "f".to_string(),
            ty: "fn<int> int".to_string(),
        };
        assert_eq!(format_symbol(&symbol), "f: fn<int> int");
    }
}
