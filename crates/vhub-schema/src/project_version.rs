use crate::version::EditorVersion;
use std::path::{Path, PathBuf};

/// Directory under a project root holding editor metadata.
pub const PROJECT_SETTINGS_DIR: &str = "ProjectSettings";
/// File declaring the editor version a project was last saved with.
pub const PROJECT_VERSION_FILE: &str = "ProjectVersion.txt";
/// Line prefix carrying the declared version.
pub const EDITOR_VERSION_KEY: &str = "m_EditorVersion:";

/// Where a project's version file lives, whether or not it exists.
pub fn project_version_path(project_root: &Path) -> PathBuf {
    project_root
        .join(PROJECT_SETTINGS_DIR)
        .join(PROJECT_VERSION_FILE)
}

/// Extract the declared version from the contents of a version file.
///
/// Only the first line starting with [`EDITOR_VERSION_KEY`] counts; the value
/// is the trimmed text after its first colon, cut at any further colon.
/// Returns `None` when no such line exists.
pub fn parse_project_version(content: &str) -> Option<EditorVersion> {
    let line = content
        .lines()
        .find(|line| line.starts_with(EDITOR_VERSION_KEY))?;
    let value = line.split(':').nth(1).unwrap_or("").trim();
    Some(EditorVersion::new(value))
}
