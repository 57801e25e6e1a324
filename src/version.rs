//! Kythera compiler version information.
//!
//! This module exposes the compiler version as a single constant so the CLI and the generated-code header agree
//! on the same value.
//!
//! ## Notes
//!
//! - The value is taken from Cargo metadata (`CARGO_PKG_VERSION`) at compile time.

/// The Kythera compiler version string (for example, `0.1.0-alpha.1`).
pub const KYTHERA_VERSION: &str = env!("CARGO_PKG_VERSION");
