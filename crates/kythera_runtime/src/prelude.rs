//! Prelude module for generated code.
//!
//! ```ignore
//! use kythera_runtime::prelude::*;
//! ```
//!
//! Generated code calls runtime functions through their modules (`ops::add`, `access::call`, `convert::cast`).
//! Module and type paths live in the type namespace, so a program variable named `add` or `call` can never shadow
//! them.

pub use crate::env::Environment;
pub use crate::types::Type;
pub use crate::value::{Function, List, Object, Value};
pub use crate::var::Var;
pub use crate::{access, convert, ops};
