use crate::StoreError;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the application-data directory under the platform data dir.
pub const APP_DIR_NAME: &str = "VHub";
/// Environment variable overriding the application-data directory.
pub const DATA_DIR_ENV: &str = "VHUB_DATA_DIR";

const ENGINES_FILE: &str = "engines.json";
const PROJECTS_FILE: &str = "projects.json";
const SETTINGS_FILE: &str = "settings.json";
const LOCK_FILE: &str = ".lock";

/// File layout of the VHub application-data directory.
///
/// One JSON document per inventory kind plus an advisory lock file, all
/// directly under the root. The directory is created lazily on
/// [`initialize`](Self::initialize) or on the first save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLayout {
    root: PathBuf,
}

impl StoreLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `$VHUB_DATA_DIR` if set, otherwise `<platform data dir>/VHub`.
    ///
    /// Falls back to a relative `VHub` directory on systems without a data dir.
    pub fn from_env() -> Self {
        match std::env::var_os(DATA_DIR_ENV) {
            Some(dir) if !dir.is_empty() => Self::new(dir),
            _ => Self::new(default_root()),
        }
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[inline]
    pub fn engines_file(&self) -> PathBuf {
        self.root.join(ENGINES_FILE)
    }

    #[inline]
    pub fn projects_file(&self) -> PathBuf {
        self.root.join(PROJECTS_FILE)
    }

    #[inline]
    pub fn settings_file(&self) -> PathBuf {
        self.root.join(SETTINGS_FILE)
    }

    #[inline]
    pub fn lock_file(&self) -> PathBuf {
        self.root.join(LOCK_FILE)
    }

    pub fn initialize(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.root.is_dir()
    }
}

/// `<platform data dir>/VHub`.
pub fn default_root() -> PathBuf {
    dirs::data_dir().map_or_else(
        || PathBuf::from(APP_DIR_NAME),
        |dir| dir.join(APP_DIR_NAME),
    )
}
