use crate::locate::resolve_executable;
use std::path::{Path, PathBuf};
use tracing::debug;
use vhub_schema::{EDITOR_LABEL, SUPPORT_MODULES};

/// How many directories, starting at the executable's own, are checked for a
/// `Data/PlaybackEngines` child.
pub const MAX_ANCESTOR_LEVELS: usize = 6;

fn playback_engines_under(dir: &Path) -> PathBuf {
    dir.join("Data").join("PlaybackEngines")
}

/// The directory holding support modules for an install.
///
/// Walks up from the executable's directory looking for `Data/PlaybackEngines`;
/// without a hit (or without an executable) the conventional
/// `<root>/Editor/Data/PlaybackEngines` is assumed, whether or not it exists.
pub fn playback_engines_dir(install_root: &Path, executable: Option<&Path>) -> PathBuf {
    executable
        .and_then(Path::parent)
        .and_then(|start| {
            start
                .ancestors()
                .take(MAX_ANCESTOR_LEVELS)
                .map(playback_engines_under)
                .find(|candidate| candidate.is_dir())
        })
        .unwrap_or_else(|| playback_engines_under(&install_root.join("Editor")))
}

/// Supported target platform labels for an install, in table order.
///
/// `"Editor"` comes first whenever an executable resolves; every other label
/// is present iff its module folder exists. Never fails: unreadable trees just
/// contribute nothing.
pub fn supported_platforms(install_root: &Path) -> Vec<String> {
    let executable = resolve_executable(install_root);
    let engines_dir = playback_engines_dir(install_root, executable.as_deref());
    debug!(
        "probing support modules in {} for {}",
        engines_dir.display(),
        install_root.display()
    );

    let mut labels = Vec::with_capacity(SUPPORT_MODULES.len() + 1);
    if executable.is_some() {
        labels.push(EDITOR_LABEL.to_owned());
    }
    labels.extend(
        SUPPORT_MODULES
            .iter()
            .filter(|module| engines_dir.join(module.folder).is_dir())
            .map(|module| module.label.to_owned()),
    );
    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fake_engine, fake_engine_at, fake_support_modules};
    use std::fs;

    #[test]
    fn editor_and_android_only() {
        let dir = tempfile::tempdir().unwrap();
        fake_engine(dir.path(), "2022.3.14f1").unwrap();
        fake_support_modules(dir.path(), &["AndroidPlayer"]).unwrap();

        assert_eq!(supported_platforms(dir.path()), vec!["Editor", "Android"]);
    }

    #[test]
    fn output_follows_table_order() {
        let dir = tempfile::tempdir().unwrap();
        fake_engine(dir.path(), "2022.3.14f1").unwrap();
        fake_support_modules(
            dir.path(),
            &["WebGLSupport", "PS5Player", "AndroidPlayer", "WindowsStandaloneSupport"],
        )
        .unwrap();

        assert_eq!(
            supported_platforms(dir.path()),
            vec!["Editor", "Windows", "Android", "PS5", "WebGL"]
        );
    }

    #[test]
    fn unknown_module_folders_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fake_engine(dir.path(), "2022.3.14f1").unwrap();
        fake_support_modules(dir.path(), &["SomethingNew", "iOSSupport"]).unwrap();

        assert_eq!(supported_platforms(dir.path()), vec!["Editor", "iOS"]);
    }

    #[test]
    fn module_files_do_not_count() {
        let dir = tempfile::tempdir().unwrap();
        fake_engine(dir.path(), "2022.3.14f1").unwrap();
        fake_support_modules(dir.path(), &[]).unwrap();
        fs::write(
            dir.path().join("Editor/Data/PlaybackEngines/AndroidPlayer"),
            b"",
        )
        .unwrap();

        assert_eq!(supported_platforms(dir.path()), vec!["Editor"]);
    }

    #[test]
    fn walks_up_from_nested_executable() {
        let dir = tempfile::tempdir().unwrap();
        let exe = fake_engine_at(dir.path(), &["Editor", "x64", "Release"], "2022.3.14f1").unwrap();
        fake_support_modules(dir.path(), &["LinuxStandaloneSupport"]).unwrap();

        assert_eq!(
            playback_engines_dir(dir.path(), Some(&exe)),
            dir.path().join("Editor/Data/PlaybackEngines")
        );
        assert_eq!(supported_platforms(dir.path()), vec!["Editor", "Linux"]);
    }

    #[test]
    fn prefers_data_dir_next_to_executable() {
        let dir = tempfile::tempdir().unwrap();
        let exe = fake_engine_at(dir.path(), &["Custom"], "2022.3.14f1").unwrap();
        fs::create_dir_all(dir.path().join("Custom/Data/PlaybackEngines/Switch")).unwrap();
        fake_support_modules(dir.path(), &["AndroidPlayer"]).unwrap();

        assert_eq!(
            playback_engines_dir(dir.path(), Some(&exe)),
            dir.path().join("Custom/Data/PlaybackEngines")
        );
        assert_eq!(supported_platforms(dir.path()), vec!["Editor", "Switch"]);
    }

    #[test]
    fn modules_without_executable_omit_editor_label() {
        let dir = tempfile::tempdir().unwrap();
        fake_support_modules(dir.path(), &["AndroidPlayer"]).unwrap();

        assert_eq!(supported_platforms(dir.path()), vec!["Android"]);
    }

    #[test]
    fn missing_root_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(supported_platforms(&dir.path().join("gone")).is_empty());
    }
}
