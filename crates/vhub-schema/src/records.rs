use crate::modules::split_labels;
use crate::version::EditorVersion;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// An installed editor, identified by its installation root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineRecord {
    #[serde(alias = "Version")]
    pub version: EditorVersion,
    #[serde(alias = "Path")]
    pub path: PathBuf,
    /// Cached, comma-separated platform labels. Empty until probed; records
    /// written before this field existed deserialize with an empty label.
    #[serde(default, alias = "PlatformsLabel")]
    pub platforms_label: String,
}

impl EngineRecord {
    pub fn new(version: impl Into<EditorVersion>, path: impl Into<PathBuf>) -> Self {
        Self {
            version: version.into(),
            path: path.into(),
            platforms_label: String::new(),
        }
    }

    #[must_use]
    pub fn with_platforms_label(mut self, label: impl Into<String>) -> Self {
        self.platforms_label = label.into();
        self
    }

    pub fn has_platforms(&self) -> bool {
        !self.platforms_label.trim().is_empty()
    }

    pub fn platforms(&self) -> Vec<&str> {
        split_labels(&self.platforms_label)
    }

    /// Identity comparison: same installation root, exact path equality.
    pub fn is_rooted_at(&self, root: &Path) -> bool {
        self.path == root
    }
}

/// A project directory and the editor version it declares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(alias = "Path")]
    pub path: PathBuf,
    /// The version declared in the project's version file at creation time.
    #[serde(rename = "unityVersion", alias = "UnityVersion")]
    pub required_version: EditorVersion,
    #[serde(
        alias = "LastModified",
        deserialize_with = "crate::timestamp::deserialize"
    )]
    pub last_modified: DateTime<Utc>,
    /// User- or auto-assigned engine version; empty when unassigned.
    #[serde(default, alias = "SelectedEngineVersion")]
    pub selected_engine_version: EditorVersion,
}

impl ProjectRecord {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        required_version: impl Into<EditorVersion>,
        last_modified: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            required_version: required_version.into(),
            last_modified,
            selected_engine_version: EditorVersion::default(),
        }
    }

    /// The version used to pick an engine when opening the project: the
    /// selection if one is set, otherwise the declared version.
    pub fn target_version(&self) -> &EditorVersion {
        if self.selected_engine_version.is_empty() {
            &self.required_version
        } else {
            &self.selected_engine_version
        }
    }

    pub fn is_rooted_at(&self, root: &Path) -> bool {
        self.path == root
    }
}

/// Path equality ignoring ASCII case, as used when comparing against paths
/// recorded by external tools.
pub fn paths_equal_ignore_case(a: &Path, b: &Path) -> bool {
    a.to_string_lossy()
        .eq_ignore_ascii_case(&b.to_string_lossy())
}
