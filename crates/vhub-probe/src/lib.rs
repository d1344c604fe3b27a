//! Host filesystem probing for VHub.
//!
//! This crate inspects editor installs and project directories on disk:
//! locating the editor executable under an install root (`locate`), reading
//! the product version out of the executable and the declared version out of
//! a project's version file (`extract`), detecting installed platform support
//! modules (`platforms`), and assembling inventory records from all of these
//! (`install`). Probing never fails the caller: unreadable state degrades to
//! "not found", `"Unknown"`, or an empty list.

pub mod extract;
pub mod install;
pub mod locate;
pub mod platforms;
pub mod testing;

pub use extract::{extract_engine_version, extract_project_version, read_product_version};
pub use install::{inspect_engine, inspect_project, modified_time, project_name};
pub use locate::{
    resolve_executable, resolve_project_version_file, EDITOR_EXECUTABLE, SEARCH_MAX_DEPTH,
    SEARCH_MAX_ENTRIES,
};
pub use platforms::{playback_engines_dir, supported_platforms};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("probe I/O error: {0}")]
    Io(#[from] std::io::Error),
}
