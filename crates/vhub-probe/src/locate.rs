use std::path::{Path, PathBuf};
use tracing::debug;
use vhub_schema::project_version_path;
use walkdir::WalkDir;

/// File name of the editor executable on this platform.
#[cfg(windows)]
pub const EDITOR_EXECUTABLE: &str = "Unity.exe";
/// File name of the editor executable on this platform.
#[cfg(not(windows))]
pub const EDITOR_EXECUTABLE: &str = "Unity";

/// Directories (relative to an install root) checked before falling back to a
/// recursive search, in priority order.
pub const KNOWN_EXECUTABLE_DIRS: &[&[&str]] = &[
    &[],
    &["Editor"],
    &["Editor", "x64"],
    &["Editor", "x64", "Release"],
    &["Editor", "x86"],
];

/// Deepest directory level below the root visited by the fallback search.
pub const SEARCH_MAX_DEPTH: usize = 8;
/// Upper bound on directory entries visited by the fallback search.
pub const SEARCH_MAX_ENTRIES: usize = 20_000;

/// Locate the editor executable under an install root.
///
/// Known layouts are checked first. Otherwise a bounded walk of the tree
/// returns the first file named [`EDITOR_EXECUTABLE`], visiting entries in
/// file-name order. Filesystem errors are treated as "not found".
pub fn resolve_executable(root: &Path) -> Option<PathBuf> {
    for dirs in KNOWN_EXECUTABLE_DIRS {
        let mut candidate = root.to_path_buf();
        candidate.extend(dirs.iter());
        candidate.push(EDITOR_EXECUTABLE);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    search_executable(root)
}

fn search_executable(root: &Path) -> Option<PathBuf> {
    if !root.is_dir() {
        return None;
    }
    let found = WalkDir::new(root)
        .min_depth(1)
        .max_depth(SEARCH_MAX_DEPTH)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .take(SEARCH_MAX_ENTRIES)
        .find(|entry| entry.file_name() == EDITOR_EXECUTABLE && entry.path().is_file())
        .map(walkdir::DirEntry::into_path);
    if let Some(ref path) = found {
        debug!("found editor executable by search: {}", path.display());
    }
    found
}

/// The project's version file, if it exists. No search fallback.
pub fn resolve_project_version_file(root: &Path) -> Option<PathBuf> {
    let path = project_version_path(root);
    path.is_file().then_some(path)
}
