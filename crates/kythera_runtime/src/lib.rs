//! Runtime library for Kythera-generated Rust code.
//!
//! Generated programs are a `run(env: &mut Environment)` function that builds and manipulates [`Value`]s through
//! the functions in this crate: operators, casts, zero values, member and index access, and calls. The runtime
//! [`Type`] mirrors the compiler's structural type model so checks deferred to run time (values typed `any` at
//! compile time) follow the same rules.
//!
//! ## Notes
//! - Language-level failures panic with a canonical `"<Kind>: <message>"` string (see [`errors`]).
//! - Objects and lists have reference semantics; functions compare by identity.

#![deny(clippy::unwrap_used)]

pub mod access;
pub mod convert;
pub mod env;
pub mod errors;
pub mod ops;
pub mod prelude;
pub mod types;
pub mod value;
pub mod var;

pub use env::Environment;
pub use types::Type;
pub use value::{Function, List, Object, Value};
pub use var::Var;
