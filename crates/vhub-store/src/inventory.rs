use crate::layout::StoreLayout;
use crate::{fsync_dir, StoreError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};
use vhub_probe::{resolve_executable, resolve_project_version_file};
use vhub_schema::{EngineRecord, ProjectRecord, Settings};

/// Outcome of loading one inventory kind and validating it against disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reconciled<T> {
    /// Records that passed validation, in persisted order.
    pub kept: Vec<T>,
    /// Roots of records dropped because their directory or marker is gone.
    pub pruned: Vec<PathBuf>,
    /// The file existed but could not be parsed; `kept` is empty.
    pub corrupt: bool,
}

impl<T> Reconciled<T> {
    fn corrupt() -> Self {
        Self {
            kept: Vec::new(),
            pruned: Vec::new(),
            corrupt: true,
        }
    }
}

/// Load and save the engine, project, and settings documents.
///
/// Loads never fail: a missing file is an empty inventory, and an unparsable
/// one is treated the same way without being touched. Saves replace the
/// whole file through a temp file in the same directory.
pub struct InventoryStore {
    layout: StoreLayout,
}

impl InventoryStore {
    pub fn new(layout: StoreLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &StoreLayout {
        &self.layout
    }

    pub fn load_engines(&self) -> Vec<EngineRecord> {
        self.reconcile_engines().kept
    }

    pub fn load_projects(&self) -> Vec<ProjectRecord> {
        self.reconcile_projects().kept
    }

    /// Settings are not validated; corrupt or missing yields an empty map.
    pub fn load_settings(&self) -> Settings {
        match read_document(&self.layout.settings_file()) {
            Document::Parsed(settings) => settings,
            Document::Missing | Document::Corrupt => Settings::default(),
        }
    }

    /// Like [`load_settings`](Self::load_settings), but an unparsable file is
    /// an error. Callers that write settings back use this so a corrupt file
    /// is never replaced by a near-empty one.
    pub fn load_settings_strict(&self) -> Result<Settings, StoreError> {
        let path = self.layout.settings_file();
        match read_document(&path) {
            Document::Parsed(settings) => Ok(settings),
            Document::Missing => Ok(Settings::default()),
            Document::Corrupt => Err(StoreError::Corrupt(path)),
        }
    }

    /// Engines whose root exists and still resolves an executable.
    pub fn reconcile_engines(&self) -> Reconciled<EngineRecord> {
        reconcile(
            &self.layout.engines_file(),
            |e: &EngineRecord| e.path.is_dir() && resolve_executable(&e.path).is_some(),
            |e| e.path.as_path(),
        )
    }

    /// Projects whose root exists and still has a version file.
    pub fn reconcile_projects(&self) -> Reconciled<ProjectRecord> {
        reconcile(
            &self.layout.projects_file(),
            |p: &ProjectRecord| p.path.is_dir() && resolve_project_version_file(&p.path).is_some(),
            |p| p.path.as_path(),
        )
    }

    pub fn save_engines(&self, engines: &[EngineRecord]) -> Result<(), StoreError> {
        self.write_document(&self.layout.engines_file(), engines)
    }

    pub fn save_projects(&self, projects: &[ProjectRecord]) -> Result<(), StoreError> {
        self.write_document(&self.layout.projects_file(), projects)
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        self.write_document(&self.layout.settings_file(), settings)
    }

    fn write_document<T: Serialize + ?Sized>(
        &self,
        dest: &Path,
        value: &T,
    ) -> Result<(), StoreError> {
        self.layout.initialize()?;
        let content = serde_json::to_string_pretty(value)?;

        let dir = self.layout.root();
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(dest).map_err(|e| StoreError::Io(e.error))?;
        fsync_dir(dir)?;

        debug!("wrote {}", dest.display());
        Ok(())
    }
}

enum Document<T> {
    Missing,
    Corrupt,
    Parsed(T),
}

fn read_document<T: DeserializeOwned>(path: &Path) -> Document<T> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Document::Missing,
        Err(e) => {
            warn!("cannot read {}: {e}", path.display());
            return Document::Corrupt;
        }
    };
    // Tolerate a UTF-8 byte-order mark written by other tools.
    let bytes = bytes.strip_prefix(b"\xef\xbb\xbf").unwrap_or(&bytes);
    match serde_json::from_slice(bytes) {
        Ok(value) => Document::Parsed(value),
        Err(e) => {
            warn!("ignoring corrupt inventory file {}: {e}", path.display());
            Document::Corrupt
        }
    }
}

fn reconcile<T: DeserializeOwned>(
    path: &Path,
    is_valid: impl Fn(&T) -> bool,
    root_of: impl Fn(&T) -> &Path,
) -> Reconciled<T> {
    let records: Vec<T> = match read_document(path) {
        Document::Missing => Vec::new(),
        Document::Corrupt => return Reconciled::corrupt(),
        Document::Parsed(records) => records,
    };

    let mut kept = Vec::with_capacity(records.len());
    let mut pruned = Vec::new();
    for record in records {
        if is_valid(&record) {
            kept.push(record);
        } else {
            let root = root_of(&record).to_path_buf();
            debug!("pruning stale entry {}", root.display());
            pruned.push(root);
        }
    }
    Reconciled {
        kept,
        pruned,
        corrupt: false,
    }
}
