//! Integration Test: Declared Dependencies Are Used
//!
//! **Policy**: every crate in the frontend's `[dependencies]` table is
//! referenced from its sources. Unused entries only slow the build.

use architectural_enforcement::{
    code_lines_containing, declared_dependencies, rust_sources, workspace_root,
};

#[test]
fn test_frontend_dependencies_are_used() {
    let root = workspace_root().join("tui");
    let manifest = std::fs::read_to_string(root.join("Cargo.toml")).expect("kiosk-tui manifest");
    let sources = rust_sources(&root.join("src"));

    let unused: Vec<String> = declared_dependencies(&manifest)
        .into_iter()
        .filter(|name| {
            let ident = name.replace('-', "_");
            let needles = [
                format!("{ident}::"),
                format!("use {ident}"),
                format!("{ident}!"),
            ];
            !sources.iter().any(|(_, content)| {
                needles
                    .iter()
                    .any(|needle| !code_lines_containing(content, needle).is_empty())
            })
        })
        .collect();

    if !unused.is_empty() {
        for name in &unused {
            eprintln!("  {name}");
        }
        panic!(
            "\nFound {} unused dependency(ies) in kiosk-tui.\nRemove them from tui/Cargo.toml.",
            unused.len()
        );
    }
}
