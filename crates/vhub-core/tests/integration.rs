use std::fs;
use std::path::{Path, PathBuf};
use vhub_core::{CoreError, DiscoveryRoots, Hub, InventoryLock};
use vhub_probe::testing::{fake_engine, fake_project, fake_support_modules};
use vhub_schema::ProjectRecord;
use vhub_store::{InventoryStore, StoreLayout};

fn hub(data: &Path, roots: DiscoveryRoots) -> Hub {
    Hub::new(InventoryStore::new(StoreLayout::new(data)), roots)
}

fn engine(root: &Path, version: &str) -> PathBuf {
    fake_engine(root, version).unwrap();
    root.to_path_buf()
}

fn project(root: &Path, version: &str) -> PathBuf {
    fake_project(root, version).unwrap();
    root.to_path_buf()
}

#[test]
fn suffixed_requirement_resolves_to_plain_engine() {
    let dir = tempfile::tempdir().unwrap();
    let editor = engine(&dir.path().join("2022.3.14f1"), "2022.3.14f1");
    let game = project(&dir.path().join("game"), "2022.3.14f1_abcdef123456");

    let mut hub = hub(&dir.path().join("data"), DiscoveryRoots::default());
    hub.add_engine(&editor).unwrap();
    let record = hub.add_project(&game).unwrap().clone();

    let resolution = hub.resolve_engine_for_project(&record).unwrap();
    assert_eq!(resolution.engine.path, editor);
    assert_eq!(resolution.engine.version, "2022.3.14f1");
    assert!(resolution.executable.is_file());
}

#[test]
fn unmatched_requirement_is_engine_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let editor = engine(&dir.path().join("2022.3.14f1"), "2022.3.14f1");
    let game = project(&dir.path().join("game"), "2023.1.0f1");

    let mut hub = hub(&dir.path().join("data"), DiscoveryRoots::default());
    hub.add_engine(&editor).unwrap();
    let record = hub.add_project(&game).unwrap().clone();

    match hub.resolve_engine_for_project(&record) {
        Err(CoreError::EngineNotFound { version }) => assert_eq!(version, "2023.1.0f1"),
        other => panic!("expected EngineNotFound, got {other:?}"),
    }
}

#[test]
fn resolution_of_unregistered_record() {
    let dir = tempfile::tempdir().unwrap();
    let editor = engine(&dir.path().join("e"), "2021.3.1f1_xyz");
    let mut hub = hub(&dir.path().join("data"), DiscoveryRoots::default());
    hub.add_engine(&editor).unwrap();

    let record = ProjectRecord::new(
        "loose",
        dir.path().join("loose"),
        "2021.3.1F1",
        chrono::Utc::now(),
    );
    assert_eq!(
        hub.resolve_engine_for_project(&record).unwrap().engine.path,
        editor
    );
}

#[test]
fn cold_start_discovers_and_persists_everything() {
    let dir = tempfile::tempdir().unwrap();
    let editors = dir.path().join("Hub").join("Editor");
    let projects = dir.path().join("Unity Projects");
    let lts = engine(&editors.join("2022.3.14f1"), "2022.3.14f1");
    fake_support_modules(&lts, &["WindowsStandaloneSupport", "AndroidPlayer"]).unwrap();
    engine(&editors.join("6000.0.23f1"), "6000.0.23f1");
    project(&projects.join("racer"), "2022.3.14f1");
    project(&projects.join("puzzle"), "2019.4.40f1");

    let data = dir.path().join("data");
    let roots = DiscoveryRoots::new(vec![editors], vec![projects.clone()]);
    let mut first = hub(&data, roots);
    assert_eq!(first.ensure_engines_populated().len(), 2);
    assert_eq!(first.ensure_projects_populated().len(), 2);

    let mut second = hub(&data, DiscoveryRoots::default());
    let engines = second.ensure_engines_populated().to_vec();
    assert_eq!(engines[0].platforms_label, "Editor, Windows, Android");
    second.ensure_projects_populated();
    assert_eq!(
        second
            .project(&projects.join("racer"))
            .unwrap()
            .selected_engine_version,
        "2022.3.14f1"
    );
    assert!(second
        .project(&projects.join("puzzle"))
        .unwrap()
        .selected_engine_version
        .is_empty());
}

#[test]
fn uninstalled_engine_is_pruned_on_next_load() {
    let dir = tempfile::tempdir().unwrap();
    let keep = engine(&dir.path().join("keep"), "2022.3.14f1");
    let gone = engine(&dir.path().join("gone"), "2021.3.1f1");
    let data = dir.path().join("data");

    let mut hub1 = hub(&data, DiscoveryRoots::default());
    hub1.add_engine(&keep).unwrap();
    hub1.add_engine(&gone).unwrap();
    fs::remove_dir_all(&gone).unwrap();

    let mut hub2 = hub(&data, DiscoveryRoots::default());
    let roots: Vec<PathBuf> = hub2
        .ensure_engines_populated()
        .iter()
        .map(|e| e.path.clone())
        .collect();
    assert_eq!(roots, vec![keep]);
}

#[test]
fn import_two_entries_one_missing() {
    let dir = tempfile::tempdir().unwrap();
    let game = project(&dir.path().join("game"), "2022.3.14f1");
    let registry = dir.path().join("projects-v1.json");
    let doc = serde_json::json!({
        "schema_version": "v1",
        "data": {
            game.to_string_lossy(): {
                "title": "game",
                "lastModified": 1_700_000_000_000_i64,
                "version": "2022.3.14f1",
                "isCustomEditor": false
            },
            dir.path().join("deleted").to_string_lossy(): {
                "title": "deleted",
                "lastModified": 1_600_000_000_000_i64,
                "version": "2021.3.1f1"
            }
        }
    });
    fs::write(&registry, serde_json::to_string_pretty(&doc).unwrap()).unwrap();

    let mut hub = hub(&dir.path().join("data"), DiscoveryRoots::default());
    let report = hub.import_from(&registry).unwrap();
    assert_eq!(report.imported_count(), 1);
    assert_eq!(report.skipped_count(), 1);

    let again = hub.import_from(&registry).unwrap();
    assert_eq!(again.imported_count(), 0);
    assert_eq!(again.skipped_count(), 2);
}

#[test]
fn corrupt_inventory_is_left_for_inspection() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("engines.json"), "[ this is not json").unwrap();

    let mut hub = hub(&data, DiscoveryRoots::default());
    assert!(hub.ensure_engines_populated().is_empty());
    assert_eq!(
        fs::read_to_string(data.join("engines.json")).unwrap(),
        "[ this is not json"
    );
    assert!(hub.store().reconcile_engines().corrupt);
}

#[test]
fn lock_serializes_writers() {
    let dir = tempfile::tempdir().unwrap();
    let layout = StoreLayout::new(dir.path().join("data"));

    let held = InventoryLock::acquire(&layout.lock_file()).unwrap();
    assert!(InventoryLock::try_acquire(&layout.lock_file())
        .unwrap()
        .is_none());
    drop(held);
    assert!(InventoryLock::try_acquire(&layout.lock_file())
        .unwrap()
        .is_some());
}
