//! Structural tests for architectural boundary enforcement.
//!
//! These tests scan source files to verify that the layer boundaries hold:
//! domain is pure, services see only ports, infra never renders output.

use std::path::{Path, PathBuf};

/// Collect all `.rs` files under a directory recursively.
fn collect_rs_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(collect_rs_files(&path));
            } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
                files.push(path);
            }
        }
    }
    files
}

/// Track brace depth and return whether a line is inside a `#[cfg(test)]` block.
struct CfgTestTracker {
    in_test_block: bool,
    brace_depth: i32,
    test_block_start_depth: i32,
}

impl CfgTestTracker {
    fn new() -> Self {
        Self {
            in_test_block: false,
            brace_depth: 0,
            test_block_start_depth: 0,
        }
    }

    /// Process a line and return `true` if it's inside a `#[cfg(test)]` block.
    fn process_line(&mut self, line: &str) -> bool {
        if line.trim().contains("#[cfg(test)]") {
            self.in_test_block = true;
            self.test_block_start_depth = self.brace_depth;
        }
        for ch in line.chars() {
            match ch {
                '{' => self.brace_depth += 1,
                '}' => {
                    self.brace_depth -= 1;
                    if self.in_test_block && self.brace_depth <= self.test_block_start_depth {
                        self.in_test_block = false;
                    }
                }
                _ => {}
            }
        }
        self.in_test_block
    }
}

/// Non-test, non-comment lines of every file under `src/<layer>` containing
/// any of `needles`, formatted for an assertion message.
fn violations(layer: &[&str], needles: &[&str]) -> Vec<String> {
    let mut dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("src");
    for part in layer {
        dir = dir.join(part);
    }

    let mut found = Vec::new();
    for file in collect_rs_files(&dir) {
        let Ok(content) = std::fs::read_to_string(&file) else {
            continue;
        };
        let rel = file
            .strip_prefix(env!("CARGO_MANIFEST_DIR"))
            .unwrap_or(&file)
            .display()
            .to_string();

        let mut tracker = CfgTestTracker::new();
        for (i, line) in content.lines().enumerate() {
            let in_test = tracker.process_line(line);
            let trimmed = line.trim();
            if in_test || trimmed.starts_with("//") {
                continue;
            }
            for needle in needles {
                if line.contains(needle) {
                    found.push(format!("{rel}:{}: `{needle}`: {trimmed}", i + 1));
                }
            }
        }
    }
    found
}

#[test]
fn domain_performs_no_io() {
    let found = violations(
        &["domain"],
        &[
            "crate::infra",
            "crate::application",
            "crate::commands",
            "crate::output",
            "tokio",
            "std::fs",
            "std::process",
            "std::net",
        ],
    );
    assert!(found.is_empty(), "domain/ must stay pure:\n{}", found.join("\n"));
}

#[test]
fn services_depend_only_on_domain_and_ports() {
    let found = violations(
        &["application", "services"],
        &["crate::infra", "crate::commands", "crate::output", "std::fs"],
    );
    assert!(
        found.is_empty(),
        "application/services must go through ports:\n{}",
        found.join("\n")
    );
}

#[test]
fn infra_has_no_imports_from_commands_or_output() {
    let found = violations(&["infra"], &["crate::commands", "crate::output"]);
    assert!(
        found.is_empty(),
        "infra/ must not import from commands/ or output/:\n{}",
        found.join("\n")
    );
}

#[test]
fn infra_has_no_print_macros_outside_tests() {
    let found = violations(&["infra"], &["println!", "eprintln!"]);
    assert!(
        found.is_empty(),
        "infra/ must not use println!/eprintln! outside #[cfg(test)]:\n{}",
        found.join("\n")
    );
}

#[test]
fn nothing_writes_to_stdout_outside_tests() {
    // stdout belongs to the launched program.
    let mut found = violations(&[], &["println!", "print!("]);
    found.retain(|l| {
        let source = l.split_once("`: ").map_or("", |(_, src)| src);
        source.replace("eprintln!", "").replace("eprint!(", "").contains("print")
    });
    assert!(
        found.is_empty(),
        "progress and diagnostics go to stderr:\n{}",
        found.join("\n")
    );
}
