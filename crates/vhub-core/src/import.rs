//! Import of projects from the official hub's `projects-v1.json` registry.

use crate::hub::Hub;
use crate::CoreError;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use vhub_probe::{inspect_project, resolve_project_version_file};
use vhub_schema::{parse_hub_registry_file, paths_equal_ignore_case, EditorVersion};

/// Where the official hub keeps its project registry on this machine.
pub fn default_hub_registry_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("UnityHub").join("projects-v1.json"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    EmptyPath,
    MissingDirectory,
    AlreadyPresent,
    NoVersionFile,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SkipReason::EmptyPath => "empty path",
            SkipReason::MissingDirectory => "missing directory",
            SkipReason::AlreadyPresent => "already present",
            SkipReason::NoVersionFile => "no version file",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    pub path: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub imported: Vec<PathBuf>,
    pub skipped: Vec<SkippedEntry>,
}

impl ImportReport {
    pub fn imported_count(&self) -> usize {
        self.imported.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    fn skip(&mut self, path: &str, reason: SkipReason) {
        debug!("skipping {path:?}: {reason}");
        self.skipped.push(SkippedEntry {
            path: path.to_owned(),
            reason,
        });
    }
}

impl Hub {
    /// Add every usable project listed in the registry at `registry`.
    ///
    /// Registry title and version take precedence over what the directory
    /// says; its millisecond timestamp becomes the modification time. The
    /// project inventory is saved once at the end, and only if something
    /// was imported.
    pub fn import_from(&mut self, registry: &Path) -> Result<ImportReport, CoreError> {
        if !registry.is_file() {
            return Err(CoreError::ImportSourceNotFound(registry.to_path_buf()));
        }
        let entries = parse_hub_registry_file(registry).map_err(CoreError::ImportParse)?;
        self.load_engines_if_needed();
        self.load_projects_if_needed();

        let mut report = ImportReport::default();
        for (key, entry) in &entries.data {
            if key.trim().is_empty() {
                report.skip(key, SkipReason::EmptyPath);
                continue;
            }
            let root = Path::new(key);
            if !root.is_dir() {
                report.skip(key, SkipReason::MissingDirectory);
                continue;
            }
            if self
                .projects()
                .iter()
                .any(|p| paths_equal_ignore_case(&p.path, root))
            {
                report.skip(key, SkipReason::AlreadyPresent);
                continue;
            }
            if resolve_project_version_file(root).is_none() {
                report.skip(key, SkipReason::NoVersionFile);
                continue;
            }
            let Some(mut project) = inspect_project(root) else {
                report.skip(key, SkipReason::NoVersionFile);
                continue;
            };
            if let Some(title) = entry.title() {
                title.clone_into(&mut project.name);
            }
            if let Some(version) = entry.version() {
                project.required_version = EditorVersion::new(version);
            }
            project.last_modified = entry.last_modified();

            self.push_project(project);
            report.imported.push(root.to_path_buf());
        }

        if !report.imported.is_empty() {
            self.persist_projects();
        }
        info!(
            "imported {} projects, skipped {}",
            report.imported_count(),
            report.skipped_count()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roots::DiscoveryRoots;
    use chrono::{TimeZone, Utc};
    use std::fs;
    use vhub_probe::testing::{fake_engine, fake_project};
    use vhub_store::{InventoryStore, StoreLayout};

    fn hub_in(dir: &Path) -> Hub {
        Hub::new(
            InventoryStore::new(StoreLayout::new(dir.join("data"))),
            DiscoveryRoots::default(),
        )
    }

    fn write_registry(dir: &Path, data: &serde_json::Value) -> PathBuf {
        let path = dir.join("projects-v1.json");
        let doc = serde_json::json!({ "schema_version": "v1", "data": data });
        fs::write(&path, doc.to_string()).unwrap();
        path
    }

    #[test]
    fn imports_existing_and_skips_missing() {
        let dir = tempfile::tempdir().unwrap();
        let game = dir.path().join("game");
        fake_project(&game, "2022.3.14f1").unwrap();
        let gone = dir.path().join("gone");
        let registry = write_registry(
            dir.path(),
            &serde_json::json!({
                game.to_string_lossy(): { "title": "Game", "lastModified": 1_700_000_000_000_i64, "version": "2022.3.14f1" },
                gone.to_string_lossy(): { "title": "Gone", "lastModified": 0, "version": "2021.3.1f1" },
            }),
        );

        let mut hub = hub_in(dir.path());
        let report = hub.import_from(&registry).unwrap();
        assert_eq!(report.imported_count(), 1);
        assert_eq!(report.skipped_count(), 1);
        assert_eq!(report.skipped[0].reason, SkipReason::MissingDirectory);

        let project = hub.project(&game).unwrap();
        assert_eq!(project.name, "Game");
        assert_eq!(
            project.last_modified,
            Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()
        );
    }

    #[test]
    fn registry_fields_override_directory() {
        let dir = tempfile::tempdir().unwrap();
        let engine = dir.path().join("editor");
        fake_engine(&engine, "2023.2.1f1_deadbeef").unwrap();
        let game = dir.path().join("folder-name");
        fake_project(&game, "2022.3.14f1").unwrap();
        let registry = write_registry(
            dir.path(),
            &serde_json::json!({
                game.to_string_lossy(): { "title": "Pretty Name", "lastModified": 5, "version": "2023.2.1f1" },
            }),
        );

        let mut hub = hub_in(dir.path());
        hub.add_engine(&engine).unwrap();
        hub.import_from(&registry).unwrap();

        let project = hub.project(&game).unwrap();
        assert_eq!(project.name, "Pretty Name");
        assert_eq!(project.required_version, "2023.2.1f1");
        assert_eq!(project.selected_engine_version, "2023.2.1f1_deadbeef");
    }

    #[test]
    fn missing_fields_fall_back_to_directory() {
        let dir = tempfile::tempdir().unwrap();
        let game = dir.path().join("from-disk");
        fake_project(&game, "2022.3.14f1").unwrap();
        let registry = write_registry(
            dir.path(),
            &serde_json::json!({ game.to_string_lossy(): { "title": "" } }),
        );

        let mut hub = hub_in(dir.path());
        hub.import_from(&registry).unwrap();
        let project = hub.project(&game).unwrap();
        assert_eq!(project.name, "from-disk");
        assert_eq!(project.required_version, "2022.3.14f1");
    }

    #[test]
    fn skip_reasons() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("present");
        fake_project(&present, "2022.3.14f1").unwrap();
        let bare = dir.path().join("bare");
        fs::create_dir_all(&bare).unwrap();
        let registry = write_registry(
            dir.path(),
            &serde_json::json!({
                "": {},
                bare.to_string_lossy(): {},
                present.to_string_lossy(): {},
            }),
        );

        let mut hub = hub_in(dir.path());
        hub.add_project(&present).unwrap();
        let report = hub.import_from(&registry).unwrap();

        assert_eq!(report.imported_count(), 0);
        let reasons: Vec<SkipReason> = report.skipped.iter().map(|s| s.reason).collect();
        assert!(reasons.contains(&SkipReason::EmptyPath));
        assert!(reasons.contains(&SkipReason::NoVersionFile));
        assert!(reasons.contains(&SkipReason::AlreadyPresent));
        assert_eq!(hub.projects().len(), 1);
    }

    #[cfg(windows)]
    #[test]
    fn already_present_ignores_case() {
        let dir = tempfile::tempdir().unwrap();
        let game = dir.path().join("Game");
        fake_project(&game, "2022.3.14f1").unwrap();
        let upper = game.to_string_lossy().to_uppercase();
        let registry = write_registry(dir.path(), &serde_json::json!({ upper: {} }));

        let mut hub = hub_in(dir.path());
        hub.add_project(&game).unwrap();
        let report = hub.import_from(&registry).unwrap();
        assert_eq!(report.skipped[0].reason, SkipReason::AlreadyPresent);
    }

    #[test]
    fn nothing_imported_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let registry = write_registry(dir.path(), &serde_json::json!({}));

        let mut hub = hub_in(dir.path());
        let report = hub.import_from(&registry).unwrap();
        assert_eq!((report.imported_count(), report.skipped_count()), (0, 0));
        assert!(!hub.store().layout().projects_file().exists());
    }

    #[test]
    fn import_persists_projects() {
        let dir = tempfile::tempdir().unwrap();
        let game = dir.path().join("game");
        fake_project(&game, "2022.3.14f1").unwrap();
        let registry = write_registry(
            dir.path(),
            &serde_json::json!({ game.to_string_lossy(): {} }),
        );

        hub_in(dir.path()).import_from(&registry).unwrap();
        assert_eq!(hub_in(dir.path()).ensure_projects_populated().len(), 1);
    }

    #[test]
    fn missing_or_invalid_registry() {
        let dir = tempfile::tempdir().unwrap();
        let mut hub = hub_in(dir.path());
        let missing = dir.path().join("nope.json");
        assert!(matches!(
            hub.import_from(&missing),
            Err(CoreError::ImportSourceNotFound(_))
        ));

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{ not json").unwrap();
        assert!(matches!(hub.import_from(&bad), Err(CoreError::ImportParse(_))));
    }

    #[test]
    fn default_registry_path_shape() {
        if let Some(path) = default_hub_registry_path() {
            assert!(path.ends_with("UnityHub/projects-v1.json"));
        }
    }
}
