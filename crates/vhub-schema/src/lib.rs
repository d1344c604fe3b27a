//! Inventory records, editor versions, and on-disk formats for VHub.
//!
//! This crate defines the schema layer: the persisted `EngineRecord` and
//! `ProjectRecord`, the open `Settings` map, `EditorVersion` with the tolerant
//! version matching rule (`is_match`), the project version file parser, the
//! external hub registry format, and the table of known platform support
//! modules.

pub mod hub;
pub mod modules;
pub mod project_version;
pub mod records;
pub mod settings;
pub mod timestamp;
pub mod version;

pub use hub::{parse_hub_registry, parse_hub_registry_file, HubProject, HubRegistry};
pub use modules::{join_labels, split_labels, SupportModule, EDITOR_LABEL, SUPPORT_MODULES};
pub use project_version::{
    parse_project_version, project_version_path, EDITOR_VERSION_KEY, PROJECT_SETTINGS_DIR,
    PROJECT_VERSION_FILE,
};
pub use records::{paths_equal_ignore_case, EngineRecord, ProjectRecord};
pub use settings::{Settings, Theme, ENGINES_PATH_KEY, PROJECTS_PATH_KEY, THEME_KEY};
pub use version::{is_match, main_version, EditorVersion, UNKNOWN_VERSION};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown theme '{0}', expected Light, Dark or System")]
    UnknownTheme(String),
}
