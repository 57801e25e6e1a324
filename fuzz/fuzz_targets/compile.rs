#![no_main]

use kythera::{CompileOptions, EmitError, Session};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let mut session = Session::with_options(CompileOptions {
            emit_header: false,
            allow_lints: true,
        });
        // Source the parser accepts must always lower to a valid Rust file.
        if let Err(EmitError::SynParse(msg)) = session.compile(s) {
            panic!("generated Rust did not parse: {msg}");
        }
    }
});
