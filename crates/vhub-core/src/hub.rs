use crate::roots::DiscoveryRoots;
use crate::CoreError;
use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use vhub_probe::{
    inspect_engine, inspect_project, resolve_executable, resolve_project_version_file,
    supported_platforms,
};
use vhub_schema::{is_match, join_labels, EditorVersion, EngineRecord, ProjectRecord};
use vhub_store::{InventoryStore, StoreLayout};

/// Command-line flag the editor takes to open a project.
pub const PROJECT_PATH_ARG: &str = "-projectPath";

/// The engine chosen to open a project, with its resolved executable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub engine: EngineRecord,
    pub executable: PathBuf,
    /// The version that was matched: the selection if set, else the declared one.
    pub target_version: EditorVersion,
}

impl Resolution {
    /// Arguments to pass to [`executable`](Self::executable) to open `project`.
    pub fn launch_args(&self, project: &ProjectRecord) -> Vec<OsString> {
        vec![
            OsString::from(PROJECT_PATH_ARG),
            project.path.clone().into_os_string(),
        ]
    }
}

/// Roots added by an explicit rescan of the default locations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub engines_added: Vec<PathBuf>,
    pub projects_added: Vec<PathBuf>,
}

/// In-memory engine and project inventories backed by an [`InventoryStore`].
///
/// Every mutation persists the affected collection before returning. Save
/// failures are logged and otherwise ignored: the in-memory state stays
/// authoritative for the rest of the session.
pub struct Hub {
    store: InventoryStore,
    roots: DiscoveryRoots,
    engines: Vec<EngineRecord>,
    projects: Vec<ProjectRecord>,
    engines_loaded: bool,
    projects_loaded: bool,
}

impl Hub {
    pub fn new(store: InventoryStore, roots: DiscoveryRoots) -> Self {
        Self {
            store,
            roots,
            engines: Vec::new(),
            projects: Vec::new(),
            engines_loaded: false,
            projects_loaded: false,
        }
    }

    /// A hub over `layout` discovering in the platform defaults plus the
    /// locations configured in its settings.
    pub fn open(layout: StoreLayout) -> Self {
        let store = InventoryStore::new(layout);
        let roots = DiscoveryRoots::platform_default().with_settings(&store.load_settings());
        Self::new(store, roots)
    }

    pub fn store(&self) -> &InventoryStore {
        &self.store
    }

    pub fn roots(&self) -> &DiscoveryRoots {
        &self.roots
    }

    /// Engines currently in memory; empty until loaded.
    pub fn engines(&self) -> &[EngineRecord] {
        &self.engines
    }

    /// Projects currently in memory; empty until loaded.
    pub fn projects(&self) -> &[ProjectRecord] {
        &self.projects
    }

    pub fn engine(&self, root: &Path) -> Option<&EngineRecord> {
        self.engines.iter().find(|e| e.is_rooted_at(root))
    }

    pub fn project(&self, root: &Path) -> Option<&ProjectRecord> {
        self.projects.iter().find(|p| p.is_rooted_at(root))
    }

    // -- engines ---------------------------------------------------------

    /// Load engines once per hub, backfilling missing platform labels in
    /// memory. An empty inventory triggers a scan of the engine roots,
    /// persisted when it finds anything.
    pub fn ensure_engines_populated(&mut self) -> &[EngineRecord] {
        self.load_engines_if_needed();
        if self.engines.is_empty() {
            for candidate in self.roots.engine_candidates() {
                if let Some(engine) = inspect_engine(&candidate) {
                    info!("discovered engine {} at {}", engine.version, candidate.display());
                    self.engines.push(engine);
                }
            }
            if !self.engines.is_empty() {
                self.persist_engines();
            }
        }
        &self.engines
    }

    /// Register the install at `root`.
    pub fn add_engine(&mut self, root: &Path) -> Result<&EngineRecord, CoreError> {
        self.load_engines_if_needed();
        if resolve_executable(root).is_none() {
            return Err(CoreError::NotAnEngine(root.to_path_buf()));
        }
        if self.engine(root).is_some() {
            return Err(CoreError::AlreadyExists(root.to_path_buf()));
        }
        let engine =
            inspect_engine(root).ok_or_else(|| CoreError::NotAnEngine(root.to_path_buf()))?;
        info!("adding engine {} at {}", engine.version, root.display());
        self.engines.push(engine);
        self.persist_engines();
        Ok(&self.engines[self.engines.len() - 1])
    }

    /// Remove the engine rooted at `root`. Returns whether one was removed.
    pub fn remove_engine(&mut self, root: &Path) -> bool {
        self.load_engines_if_needed();
        let before = self.engines.len();
        self.engines.retain(|e| !e.is_rooted_at(root));
        let removed = self.engines.len() != before;
        if removed {
            info!("removed engine at {}", root.display());
            self.persist_engines();
        }
        removed
    }

    // -- projects --------------------------------------------------------

    /// Load projects once per hub, assigning a default engine to any project
    /// without a selection (in memory). An empty inventory triggers a scan of the
    /// project roots, persisted when it finds anything.
    pub fn ensure_projects_populated(&mut self) -> &[ProjectRecord] {
        self.load_engines_if_needed();
        self.load_projects_if_needed();

        let engines = &self.engines;
        for project in &mut self.projects {
            if project.selected_engine_version.is_empty() {
                assign_default_engine(engines, project);
            }
        }

        if self.projects.is_empty() {
            for candidate in self.roots.project_candidates() {
                if let Some(mut project) = inspect_project(&candidate) {
                    assign_default_engine(&self.engines, &mut project);
                    info!("discovered project {} at {}", project.name, candidate.display());
                    self.projects.push(project);
                }
            }
            if !self.projects.is_empty() {
                self.persist_projects();
            }
        }
        &self.projects
    }

    /// Register the project at `root`, auto-assigning an engine.
    pub fn add_project(&mut self, root: &Path) -> Result<&ProjectRecord, CoreError> {
        self.load_engines_if_needed();
        self.load_projects_if_needed();
        if resolve_project_version_file(root).is_none() {
            return Err(CoreError::NotAProject(root.to_path_buf()));
        }
        if self.project(root).is_some() {
            return Err(CoreError::AlreadyExists(root.to_path_buf()));
        }
        let mut project =
            inspect_project(root).ok_or_else(|| CoreError::NotAProject(root.to_path_buf()))?;
        assign_default_engine(&self.engines, &mut project);
        info!("adding project {} at {}", project.name, root.display());
        self.projects.push(project);
        self.persist_projects();
        Ok(&self.projects[self.projects.len() - 1])
    }

    /// Remove the project rooted at `root`. Returns whether one was removed.
    pub fn remove_project(&mut self, root: &Path) -> bool {
        self.load_projects_if_needed();
        let before = self.projects.len();
        self.projects.retain(|p| !p.is_rooted_at(root));
        let removed = self.projects.len() != before;
        if removed {
            info!("removed project at {}", root.display());
            self.persist_projects();
        }
        removed
    }

    /// Override a project's engine selection; an empty version clears it.
    pub fn set_selected_engine(
        &mut self,
        root: &Path,
        version: impl Into<EditorVersion>,
    ) -> Result<&ProjectRecord, CoreError> {
        self.load_projects_if_needed();
        let index = self
            .projects
            .iter()
            .position(|p| p.is_rooted_at(root))
            .ok_or_else(|| CoreError::NotAProject(root.to_path_buf()))?;
        self.projects[index].selected_engine_version = version.into();
        self.persist_projects();
        Ok(&self.projects[index])
    }

    /// Version of the first engine, in inventory order, matching `required`.
    pub fn default_engine_version(&self, required: &str) -> Option<EditorVersion> {
        first_match(&self.engines, required).map(|e| e.version.clone())
    }

    /// Pick the engine that opens `project` and resolve its executable.
    pub fn resolve_engine_for_project(
        &mut self,
        project: &ProjectRecord,
    ) -> Result<Resolution, CoreError> {
        self.load_engines_if_needed();
        let target = project.target_version();
        let engine = first_match(&self.engines, target).ok_or_else(|| {
            CoreError::EngineNotFound {
                version: target.to_string(),
            }
        })?;
        let executable =
            resolve_executable(&engine.path).ok_or_else(|| CoreError::ExecutableMissing {
                root: engine.path.clone(),
            })?;
        debug!(
            "resolved {} for {} -> {}",
            target,
            project.path.display(),
            executable.display()
        );
        Ok(Resolution {
            engine: engine.clone(),
            executable,
            target_version: target.clone(),
        })
    }

    /// [`resolve_engine_for_project`](Self::resolve_engine_for_project) by
    /// project root.
    pub fn resolve_project(&mut self, root: &Path) -> Result<Resolution, CoreError> {
        self.load_projects_if_needed();
        let project = self
            .project(root)
            .cloned()
            .ok_or_else(|| CoreError::NotAProject(root.to_path_buf()))?;
        self.resolve_engine_for_project(&project)
    }

    /// Scan the discovery roots regardless of inventory contents, adding
    /// any install or project not already present.
    pub fn rescan(&mut self) -> ScanReport {
        self.load_engines_if_needed();
        self.load_projects_if_needed();
        let mut report = ScanReport::default();

        for candidate in self.roots.engine_candidates() {
            if self.engine(&candidate).is_some() {
                continue;
            }
            if let Some(engine) = inspect_engine(&candidate) {
                self.engines.push(engine);
                report.engines_added.push(candidate);
            }
        }
        for candidate in self.roots.project_candidates() {
            if self.project(&candidate).is_some() {
                continue;
            }
            if let Some(mut project) = inspect_project(&candidate) {
                assign_default_engine(&self.engines, &mut project);
                self.projects.push(project);
                report.projects_added.push(candidate);
            }
        }

        if !report.engines_added.is_empty() {
            self.persist_engines();
        }
        if !report.projects_added.is_empty() {
            self.persist_projects();
        }
        report
    }

    // -- internals -------------------------------------------------------

    /// The store is read at most once per hub; afterwards the in-memory
    /// collection stays authoritative even when saves fail.
    pub(crate) fn load_engines_if_needed(&mut self) {
        if self.engines_loaded {
            return;
        }
        self.engines = self.store.load_engines();
        self.engines_loaded = true;
        for engine in &mut self.engines {
            if !engine.has_platforms() {
                engine.platforms_label = join_labels(&supported_platforms(&engine.path));
                debug!("backfilled platforms for {}", engine.path.display());
            }
        }
    }

    pub(crate) fn load_projects_if_needed(&mut self) {
        if !self.projects_loaded {
            self.projects = self.store.load_projects();
            self.projects_loaded = true;
        }
    }

    pub(crate) fn push_project(&mut self, mut project: ProjectRecord) {
        assign_default_engine(&self.engines, &mut project);
        self.projects.push(project);
    }

    fn persist_engines(&self) {
        if let Err(e) = self.store.save_engines(&self.engines) {
            warn!("failed to save engines: {e}");
        }
    }

    pub(crate) fn persist_projects(&self) {
        if let Err(e) = self.store.save_projects(&self.projects) {
            warn!("failed to save projects: {e}");
        }
    }
}

fn first_match<'a>(engines: &'a [EngineRecord], required: &str) -> Option<&'a EngineRecord> {
    engines.iter().find(|e| is_match(&e.version, required))
}

fn assign_default_engine(engines: &[EngineRecord], project: &mut ProjectRecord) {
    if let Some(engine) = first_match(engines, &project.required_version) {
        project.selected_engine_version = engine.version.clone();
    }
}
