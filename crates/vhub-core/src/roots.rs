use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use vhub_schema::Settings;

/// Folder name used for project parents under Documents and Desktop.
pub const PROJECTS_FOLDER: &str = "Unity Projects";

/// Parent directories whose immediate subdirectories are discovery candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiscoveryRoots {
    pub engine_roots: Vec<PathBuf>,
    pub project_roots: Vec<PathBuf>,
}

impl DiscoveryRoots {
    pub fn new(engine_roots: Vec<PathBuf>, project_roots: Vec<PathBuf>) -> Self {
        Self {
            engine_roots,
            project_roots,
        }
    }

    /// The standard hub install and project locations for this platform.
    pub fn platform_default() -> Self {
        Self::new(default_engine_roots(), default_project_roots())
    }

    /// Append the user's configured locations, skipping duplicates.
    #[must_use]
    pub fn with_settings(mut self, settings: &Settings) -> Self {
        if let Some(path) = settings.engines_path() {
            push_unique(&mut self.engine_roots, path);
        }
        if let Some(path) = settings.projects_path() {
            push_unique(&mut self.project_roots, path);
        }
        self
    }

    /// Immediate subdirectories of every engine root, root by root.
    pub fn engine_candidates(&self) -> Vec<PathBuf> {
        self.engine_roots.iter().flat_map(|r| subdirectories(r)).collect()
    }

    /// Immediate subdirectories of every project root, root by root.
    pub fn project_candidates(&self) -> Vec<PathBuf> {
        self.project_roots.iter().flat_map(|r| subdirectories(r)).collect()
    }
}

fn push_unique(list: &mut Vec<PathBuf>, path: PathBuf) {
    if !list.contains(&path) {
        list.push(path);
    }
}

/// Sorted subdirectories of `parent`; unreadable or missing parents yield none.
pub fn subdirectories(parent: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(parent) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("skipping discovery root {}: {e}", parent.display());
            return Vec::new();
        }
    };
    let mut dirs: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();
    dirs
}

#[cfg(windows)]
pub fn default_engine_roots() -> Vec<PathBuf> {
    vec![
        PathBuf::from(r"C:\Program Files\Unity\Hub\Editor"),
        PathBuf::from(r"C:\Program Files (x86)\Unity\Hub\Editor"),
    ]
}

#[cfg(target_os = "macos")]
pub fn default_engine_roots() -> Vec<PathBuf> {
    vec![PathBuf::from("/Applications/Unity/Hub/Editor")]
}

#[cfg(not(any(windows, target_os = "macos")))]
pub fn default_engine_roots() -> Vec<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join("Unity").join("Hub").join("Editor"))
        .into_iter()
        .collect()
}

pub fn default_project_roots() -> Vec<PathBuf> {
    [dirs::document_dir(), dirs::desktop_dir()]
        .into_iter()
        .flatten()
        .map(|dir| dir.join(PROJECTS_FOLDER))
        .collect()
}

/// `ProjectsPath` from settings, or the first default project root.
pub fn effective_projects_path(settings: &Settings) -> Option<PathBuf> {
    settings
        .projects_path()
        .or_else(|| default_project_roots().into_iter().next())
}

/// `EnginesPath` from settings, or the first default engine root.
pub fn effective_engines_path(settings: &Settings) -> Option<PathBuf> {
    settings
        .engines_path()
        .or_else(|| default_engine_roots().into_iter().next())
}
