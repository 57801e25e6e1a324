//! CLI module for the Kythera compiler
//!
//! This module provides the command-line interface for the compiler.
//!
//! ## Commands
//!
//! - `lex <file>` - Print the token stream (virtual statement terminators included)
//! - `parse <file>` - Print the typed AST
//! - `check <file>` - Parse and compile without writing output
//! - `emit <file>` - Emit the generated Rust source
//! - `repl` - Compile units read from stdin against one persistent session
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use crate::version::KYTHERA_VERSION;
use commands::ErrorStyle;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// The Kythera programming language compiler
#[derive(Parser, Debug)]
#[command(name = "kythera")]
#[command(version = KYTHERA_VERSION)]
#[command(about = "The Kythera programming language compiler", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Render errors as plain text instead of graphical diagnostics
    #[arg(long, global = true)]
    pub plain: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Tokenize a file and print the tokens
    Lex {
        /// Source file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Parse a file and print the typed AST
    Parse {
        /// Source file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Parse and compile a file, reporting the first error
    Check {
        /// Source file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Compile a file and emit the generated Rust source
    Emit {
        /// Source file
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Write the Rust source here instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
        /// Print the top-level bindings and their types to stderr
        #[arg(long)]
        symbols: bool,
        /// Omit the generated-file header comment
        #[arg(long)]
        no_header: bool,
    },

    /// Compile units read from stdin against one persistent session
    Repl {
        /// Print the Rust source generated for each unit
        #[arg(long)]
        show_code: bool,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    let style = if cli.plain { ErrorStyle::Plain } else { ErrorStyle::Graphical };
    tracing::debug!(command = ?cli.command, "executing");

    match cli.command {
        Command::Lex { file } => commands::lex_file(&file, style),
        Command::Parse { file } => commands::parse_file(&file, style),
        Command::Check { file } => commands::check_file(&file, style),
        Command::Emit {
            file,
            output,
            symbols,
            no_header,
        } => commands::emit_file(
            &file,
            &commands::EmitArgs {
                output,
                symbols,
                header: !no_header,
            },
            style,
        ),
        Command::Repl { show_code } => commands::repl(show_code, style),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_lex() {
        let cli = Cli::try_parse_from(["kythera", "lex", "main.ky"]).unwrap();
        assert!(matches!(cli.command, Command::Lex { .. }));
        assert!(!cli.plain);
    }

    #[test]
    fn test_cli_parse_emit_flags() {
        let cli = Cli::try_parse_from(["kythera", "emit", "main.ky", "-o", "out.rs", "--symbols", "--no-header"]).unwrap();
        if let Command::Emit {
            output,
            symbols,
            no_header,
            ..
        } = cli.command
        {
            assert_eq!(output, Some(PathBuf::from("out.rs")));
            assert!(symbols);
            assert!(no_header);
        } else {
            panic!("Expected Emit command");
        }
    }

    #[test]
    fn test_cli_plain_flag_is_global() {
        let cli = Cli::try_parse_from(["kythera", "check", "main.ky", "--plain"]).unwrap();
        assert!(cli.plain);
        assert!(matches!(cli.command, Command::Check { .. }));
    }

    #[test]
    fn test_cli_parse_repl() {
        let cli = Cli::try_parse_from(["kythera", "repl", "--show-code"]).unwrap();
        assert!(matches!(cli.command, Command::Repl { show_code: true }));
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["kythera"]).is_err());
        assert!(Cli::try_parse_from(["kythera", "build", "main.ky"]).is_err());
    }
}
