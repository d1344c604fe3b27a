//! Persistent inventory storage for VHub.
//!
//! This crate provides the storage layer: `StoreLayout` for the location of
//! the per-kind JSON documents, and `InventoryStore` for loading them with
//! load-time reconciliation (records whose backing directory is gone are
//! dropped) and saving them through atomic whole-file replacement.

pub mod inventory;
pub mod layout;

pub use inventory::{InventoryStore, Reconciled};
pub use layout::{default_root, StoreLayout, APP_DIR_NAME, DATA_DIR_ENV};

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fsync a directory so a preceding `rename()` is durable.
///
/// POSIX does not guarantee rename durability without it.
pub(crate) fn fsync_dir(dir: &Path) -> Result<(), std::io::Error> {
    #[cfg(unix)]
    {
        let f = std::fs::File::open(dir)?;
        f.sync_all()?;
    }
    #[cfg(not(unix))]
    let _ = dir;
    Ok(())
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("{} is corrupt; fix or remove it first", .0.display())]
    Corrupt(PathBuf),
}
