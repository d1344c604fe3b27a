//! Turning a directory into an inventory record.

use crate::extract::{extract_engine_version, extract_project_version};
use crate::locate::{resolve_executable, resolve_project_version_file};
use crate::platforms::supported_platforms;
use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::debug;
use vhub_schema::{join_labels, EngineRecord, ProjectRecord};

/// Build an engine record for `root`, or `None` when no executable resolves.
///
/// The platforms label is probed eagerly.
pub fn inspect_engine(root: &Path) -> Option<EngineRecord> {
    let executable = resolve_executable(root)?;
    let version = extract_engine_version(&executable);
    let label = join_labels(&supported_platforms(root));
    debug!("engine {version} at {}", root.display());
    Some(EngineRecord::new(version, root).with_platforms_label(label))
}

/// Build a project record for `root`, or `None` without a version file.
///
/// The selected engine is left empty; assignment needs the engine inventory.
pub fn inspect_project(root: &Path) -> Option<ProjectRecord> {
    let version_file = resolve_project_version_file(root)?;
    let version = extract_project_version(&version_file);
    debug!("project {version} at {}", root.display());
    Some(ProjectRecord::new(
        project_name(root),
        root,
        version,
        modified_time(root),
    ))
}

/// The final path component, or the whole path when there is none.
pub fn project_name(root: &Path) -> String {
    root.file_name().map_or_else(
        || root.to_string_lossy().into_owned(),
        |name| name.to_string_lossy().into_owned(),
    )
}

/// Filesystem modification time of `path`, or now when unavailable.
pub fn modified_time(path: &Path) -> DateTime<Utc> {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map_or_else(|_| Utc::now(), DateTime::<Utc>::from)
}
