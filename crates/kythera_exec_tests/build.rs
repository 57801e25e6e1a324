//! Compile every program under `tests/fixtures/run` to Rust and collect the units in `$OUT_DIR/programs.rs`.

use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use kythera::{CompileOptions, Session};

/// A line of this form splits a program into units compiled one after another in the same session.
const UNIT_SEPARATOR: &str = "// ---";

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("cargo sets CARGO_MANIFEST_DIR"));
    let fixtures_dir = manifest_dir.join("tests").join("fixtures").join("run");
    println!("cargo:rerun-if-changed={}", fixtures_dir.display());

    let mut fixtures: Vec<PathBuf> = fs::read_dir(&fixtures_dir)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", fixtures_dir.display()))
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "ky"))
        .collect();
    fixtures.sort();

    let mut out = String::new();
    for path in &fixtures {
        println!("cargo:rerun-if-changed={}", path.display());
        out.push_str(&program_module(path));
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("cargo sets OUT_DIR"));
    fs::write(out_dir.join("programs.rs"), out).expect("failed to write programs.rs");
}

/// `pub mod <stem> { pub mod unit_N { .. } pub fn run(..) }` for one fixture.
fn program_module(path: &Path) -> String {
    let source = fs::read_to_string(path).unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()));
    let name = module_name(path);

    let mut session = Session::with_options(CompileOptions {
        emit_header: false,
        allow_lints: true,
    });
    let mut module = String::new();
    let mut calls = String::new();
    for (index, unit) in source.split(UNIT_SEPARATOR).enumerate() {
        let compiled = session
            .compile(unit)
            .unwrap_or_else(|e| panic!("{} (unit {index}) failed to compile: {e}", path.display()));
        let _ = writeln!(module, "pub mod unit_{index} {{\n{}\n}}", compiled.code);
        let _ = writeln!(calls, "    unit_{index}::run(env);");
    }

    let mut out = String::new();
    let _ = writeln!(out, "/// Compiled from `{}`.", path.file_name().and_then(|n| n.to_str()).unwrap_or(""));
    let _ = writeln!(out, "pub mod {name} {{");
    out.push_str(&module);
    let _ = writeln!(out, "/// Run every unit in order against `env`.");
    let _ = writeln!(out, "pub fn run(env: &mut kythera_runtime::Environment) {{\n{calls}}}");
    let _ = writeln!(out, "}}");
    out
}

fn module_name(path: &Path) -> String {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("program");
    stem.chars().map(|c| if c.is_ascii_alphanumeric() { c } else { '_' }).collect()
}
