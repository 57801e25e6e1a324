//! Kythera programs compiled to Rust at build time.
//!
//! The build script compiles every `tests/fixtures/run/*.ky` program with the `kythera` compiler and includes the
//! generated source here, one module per program. A program split into several units by `// ---` lines is compiled
//! in a single session, the way the REPL compiles successive inputs, and its `run` executes the units in order.

include!(concat!(env!("OUT_DIR"), "/programs.rs"));

pub use kythera_runtime::prelude::{Environment, Type, Value};

/// Run a compiled program in a fresh environment and return the environment.
pub fn execute(run: fn(&mut Environment)) -> Environment {
    let mut env = Environment::new();
    run(&mut env);
    env
}
