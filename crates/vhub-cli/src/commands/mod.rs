pub mod completions;
pub mod doctor;
pub mod engines;
pub mod man_pages;
pub mod projects;
pub mod scan;
pub mod settings;

use indicatif::{ProgressBar, ProgressStyle};
use std::io::{stderr, IsTerminal};
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use vhub_core::InventoryLock;
use vhub_store::StoreLayout;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_NOT_FOUND: u8 = 2;
pub const EXIT_STORE_ERROR: u8 = 3;

/// Error message prefixes that map to [`EXIT_NOT_FOUND`].
pub const NOT_FOUND_PREFIXES: &[&str] = &[
    "not an engine:",
    "not a project:",
    "engine not found:",
    "executable missing:",
    "import source not found:",
];

pub fn exit_code_for(msg: &str) -> u8 {
    if NOT_FOUND_PREFIXES.iter().any(|p| msg.starts_with(p)) {
        EXIT_NOT_FOUND
    } else if msg.starts_with("store error:") || msg.starts_with("store lock:") {
        EXIT_STORE_ERROR
    } else {
        EXIT_FAILURE
    }
}

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

pub fn lock(layout: &StoreLayout) -> Result<InventoryLock, String> {
    InventoryLock::acquire(&layout.lock_file()).map_err(|e| match e {
        vhub_core::CoreError::Lock(inner) => format!("store lock: {inner}"),
        other => format!("store lock: {other}"),
    })
}

/// Make a user-supplied path absolute against the working directory, with
/// `.` and `..` resolved lexically so the same root always compares equal.
pub fn absolute(path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
    };
    normalize(&joined)
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() && !out.has_root() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .expect("valid template")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(msg.to_owned());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// A spinner for human output on a terminal; `None` otherwise.
pub fn maybe_spinner(json: bool, msg: &str) -> Option<ProgressBar> {
    (!json && stderr().is_terminal()).then(|| spinner(msg))
}

pub fn spin_ok(pb: &ProgressBar, msg: &str) {
    pb.set_style(ProgressStyle::with_template("{msg}").expect("valid template"));
    pb.finish_with_message(format!("✓ {msg}"));
}

pub fn spin_clear(pb: Option<ProgressBar>) {
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
}

pub fn colorize_version(version: &str) -> String {
    use console::Style;
    if version.is_empty() {
        Style::new().dim().apply_to("-").to_string()
    } else if version == vhub_schema::UNKNOWN_VERSION {
        Style::new().yellow().apply_to(version).to_string()
    } else {
        Style::new().green().apply_to(version).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_pretty_serializes_string() {
        let val = serde_json::json!({"key": "value"});
        let result = json_pretty(&val).unwrap();
        assert!(result.contains("\"key\""));
        assert!(result.contains("\"value\""));
    }

    #[test]
    fn exit_codes_are_distinct() {
        assert_ne!(EXIT_SUCCESS, EXIT_FAILURE);
        assert_ne!(EXIT_FAILURE, EXIT_NOT_FOUND);
        assert_ne!(EXIT_NOT_FOUND, EXIT_STORE_ERROR);
    }

    #[test]
    fn exit_code_mapping() {
        assert_eq!(exit_code_for("engine not found: 2023.1.0f1"), EXIT_NOT_FOUND);
        assert_eq!(exit_code_for("not an engine: /tmp/x"), EXIT_NOT_FOUND);
        assert_eq!(exit_code_for("store lock: busy"), EXIT_STORE_ERROR);
        assert_eq!(exit_code_for("store error: disk full"), EXIT_STORE_ERROR);
        assert_eq!(exit_code_for("already exists: /tmp/x"), EXIT_FAILURE);
    }

    #[test]
    fn core_error_messages_map_to_exit_codes() {
        let e = vhub_core::CoreError::NotAProject(PathBuf::from("/p"));
        assert_eq!(exit_code_for(&e.to_string()), EXIT_NOT_FOUND);
        let e = vhub_core::CoreError::ImportSourceNotFound(PathBuf::from("/r"));
        assert_eq!(exit_code_for(&e.to_string()), EXIT_NOT_FOUND);
    }

    #[test]
    fn absolute_keeps_absolute_paths() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(absolute(dir.path()), dir.path());
        assert!(absolute(Path::new("relative")).is_absolute());
    }

    #[test]
    fn absolute_resolves_dot_segments() {
        let dir = tempfile::tempdir().unwrap();
        let direct = dir.path().join("editors").join("2022.3.14f1");
        let indirect = dir
            .path()
            .join("editors")
            .join("other")
            .join("..")
            .join(".")
            .join("2022.3.14f1");
        assert_eq!(absolute(&indirect), absolute(&direct));
        assert_eq!(absolute(&direct), direct);
    }

    #[test]
    fn absolute_relative_parent_matches_absolute_form() {
        let cwd = std::env::current_dir().unwrap();
        let parent = cwd.parent().unwrap_or(&cwd);
        assert_eq!(absolute(Path::new("../x")), parent.join("x"));
    }

    #[test]
    fn colorize_version_keeps_text() {
        assert!(colorize_version("2022.3.14f1").contains("2022.3.14f1"));
        assert!(colorize_version("Unknown").contains("Unknown"));
        assert!(colorize_version("").contains('-'));
    }

    #[test]
    fn spinner_creates_progress_bar() {
        let pb = spinner("testing...");
        spin_ok(&pb, "done");
    }
}
