//! Inventory orchestration for VHub.
//!
//! This crate ties together probing and storage into the `Hub`, the central
//! API for discovering, adding, removing, and resolving editor installs and
//! projects. It also provides import from the official hub's project
//! registry, the platform default discovery locations, and an advisory
//! inventory lock for multi-process callers.

pub mod concurrency;
pub mod hub;
pub mod import;
pub mod roots;

pub use concurrency::InventoryLock;
pub use hub::{Hub, Resolution, ScanReport};
pub use import::{default_hub_registry_path, ImportReport, SkipReason, SkippedEntry};
pub use roots::DiscoveryRoots;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("not an engine: no editor executable under {}", .0.display())]
    NotAnEngine(PathBuf),
    #[error("not a project: no version file under {}", .0.display())]
    NotAProject(PathBuf),
    #[error("already exists: {}", .0.display())]
    AlreadyExists(PathBuf),
    #[error("engine not found: no installed editor matches {version}")]
    EngineNotFound { version: String },
    #[error("executable missing: editor under {} no longer resolves", .root.display())]
    ExecutableMissing { root: PathBuf },
    #[error("import source not found: {}", .0.display())]
    ImportSourceNotFound(PathBuf),
    #[error("import parse error: {0}")]
    ImportParse(#[source] vhub_schema::SchemaError),
    #[error("store error: {0}")]
    Store(#[from] vhub_store::StoreError),
    #[error("store lock: {0}")]
    Lock(std::io::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_category_prefix() {
        let e = CoreError::EngineNotFound {
            version: "2023.1.0f1".to_owned(),
        };
        assert!(e.to_string().starts_with("engine not found:"));
        assert!(e.to_string().contains("2023.1.0f1"));

        let e = CoreError::AlreadyExists(PathBuf::from("/opt/unity"));
        assert!(e.to_string().starts_with("already exists:"));
    }
}
