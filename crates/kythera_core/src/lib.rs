//! Provide shared, pure semantic helpers and canonical language vocabulary for the Kythera compiler and runtime.
//!
//! This crate is intentionally small and dependency-free. It contains deterministic helpers that both:
//! - the compiler can use for parsing and type-checking decisions, and
//! - the runtime can use to enforce the same semantics when generated code executes.
//!
//! ## Notes
//!
//! - This is a "semantic core" crate: **no IO**, no global mutable state, and no compiler-specific types.
//! - Current scope: vocabulary registries (keywords, operators, punctuation, type tags), the cast-compatibility
//!   matrix, numeric kernels (floor division/modulo), and the runtime error taxonomy.

pub mod errors;
pub mod lang;
pub mod num;
