//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - The kiosk core stays headless (no terminal, decoder or runtime crates)
//! - Time in the core only flows through the `Clock` trait
//! - Every declared frontend dependency is used
//!
//! These tests are designed to catch violations early in the development cycle.

use std::fs;
use std::path::{Path, PathBuf};

/// Root of the workspace, two levels above this package
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

/// Every `.rs` file below `dir` with its content
pub fn rust_sources(dir: &Path) -> Vec<(PathBuf, String)> {
    walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .filter_map(|e| {
            let content = fs::read_to_string(e.path()).ok()?;
            Some((e.path().to_path_buf(), content))
        })
        .collect()
}

/// Lines of `content` that mention `needle` outside a `//` comment
pub fn code_lines_containing<'a>(content: &'a str, needle: &str) -> Vec<(usize, &'a str)> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let code = line.split("//").next().unwrap_or(line);
            code.contains(needle)
        })
        .map(|(idx, line)| (idx + 1, line.trim()))
        .collect()
}

/// Crate names under the `[dependencies]` table of a manifest
pub fn declared_dependencies(manifest: &str) -> Vec<String> {
    let mut in_dependencies = false;
    let mut names = Vec::new();
    for line in manifest.lines() {
        let line = line.trim();
        if line.starts_with('[') {
            in_dependencies = line == "[dependencies]";
            continue;
        }
        if !in_dependencies || line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((name, _)) = line.split_once('=') {
            names.push(name.trim().trim_end_matches(".workspace").to_string());
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comments_are_ignored() {
        let content = "use std::fmt;\n// crossterm is not used\nlet x = crossterm::foo();";
        assert_eq!(
            code_lines_containing(content, "crossterm"),
            vec![(3, "let x = crossterm::foo();")]
        );
    }

    #[test]
    fn test_declared_dependencies_skip_other_tables() {
        let manifest = "[package]\nname = \"x\"\n\n[dependencies]\n# Logging\ntracing = \"0.1\"\nwalkdir.workspace = true\n\n[dev-dependencies]\ntempfile = \"3\"\n";
        assert_eq!(declared_dependencies(manifest), vec!["tracing", "walkdir"]);
    }

    #[test]
    fn test_workspace_root_has_core() {
        assert!(workspace_root().join("kiosk/core/src/lib.rs").exists());
    }
}
