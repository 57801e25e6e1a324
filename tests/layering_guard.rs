//! Layering guardrails to keep the compiler crate independent of the runtime library.
//!
//! The compiler (`kythera` crate) only emits source that *names* `kythera_runtime`; it may use the runtime as a
//! **dev-dependency** (for parity tests) but never link it. This test scans the root `Cargo.toml` and fails if
//! `kythera_runtime` appears in `[dependencies]`.

#[test]
fn compiler_does_not_depend_on_runtime_in_main_dependencies() {
    let manifest = include_str!("../Cargo.toml");
    let mut in_dependencies = false;

    for raw_line in manifest.lines() {
        let line = raw_line.trim();
        // Track when we enter/exit the `[dependencies]` table.
        if line.starts_with('[') {
            if line == "[dependencies]" {
                in_dependencies = true;
                continue;
            }
            if in_dependencies {
                break;
            }
        }

        if !in_dependencies || line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line_no_comment = line.split('#').next().unwrap_or("").trim();
        if line_no_comment.starts_with("kythera_runtime") {
            panic!("`kythera_runtime` must not appear in [dependencies]; use [dev-dependencies] instead");
        }
    }
}

#[test]
fn syntax_crate_does_not_depend_on_compiler_stack() {
    let manifest = include_str!("../crates/kythera_syntax/Cargo.toml");
    for forbidden in ["syn", "quote", "prettyplease", "kythera_runtime"] {
        let declared = manifest
            .lines()
            .map(str::trim)
            .any(|line| line.starts_with(&format!("{forbidden} ")) || line.starts_with(&format!("{forbidden}=")));
        assert!(!declared, "`{forbidden}` must not be a dependency of kythera_syntax");
    }
}
