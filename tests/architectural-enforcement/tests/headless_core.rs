//! Integration Test: Headless Kiosk Core
//!
//! **Policy**: `kiosk-core` never touches a terminal, an image decoder or an
//! async runtime. Frontends implement `Surface`, `InputSource` and `Clock`.
//!
//! **Policy**: the core never reads the wall clock or sleeps directly, so
//! every animation can run on virtual time in tests.

use architectural_enforcement::{code_lines_containing, rust_sources, workspace_root};

/// Crates only frontends may use
const FRONTEND_CRATES: &[&str] = &["ratatui", "crossterm", "image::", "tokio"];

/// Direct time access the core must route through `Clock`
const WALL_CLOCK: &[&str] = &["Instant::now", "thread::sleep", "SystemTime"];

fn core_violations(needles: &[&str]) -> Vec<String> {
    let src = workspace_root().join("kiosk/core/src");
    let mut violations = Vec::new();
    for (path, content) in rust_sources(&src) {
        for needle in needles {
            for (line, code) in code_lines_containing(&content, needle) {
                violations.push(format!("{}:{} - {}", path.display(), line, code));
            }
        }
    }
    violations
}

#[test]
fn test_core_sources_use_no_frontend_crates() {
    let violations = core_violations(FRONTEND_CRATES);
    if !violations.is_empty() {
        for violation in &violations {
            eprintln!("  {violation}");
        }
        panic!(
            "\nFound {} frontend dependency use(s) in kiosk-core.\nMove them into a frontend crate.",
            violations.len()
        );
    }
}

#[test]
fn test_core_manifest_has_no_frontend_dependencies() {
    let manifest = std::fs::read_to_string(workspace_root().join("kiosk/core/Cargo.toml"))
        .expect("kiosk-core manifest");
    for name in ["ratatui", "crossterm", "image", "tokio"] {
        let declared = manifest.lines().any(|line| {
            let line = line.trim_start();
            line.starts_with(&format!("{name} ")) || line.starts_with(&format!("{name}="))
        });
        assert!(!declared, "kiosk-core must not depend on {name}");
    }
}

#[test]
fn test_core_time_goes_through_clock() {
    let violations = core_violations(WALL_CLOCK);
    if !violations.is_empty() {
        for violation in &violations {
            eprintln!("  {violation}");
        }
        panic!(
            "\nFound {} direct wall clock use(s) in kiosk-core.\nUse the Clock trait instead.",
            violations.len()
        );
    }
}
