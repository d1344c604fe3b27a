//! Fixture builders for fake editor installs and projects.
//!
//! Used by unit and integration tests across the workspace; nothing here is
//! called by production code paths.

use crate::locate::EDITOR_EXECUTABLE;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use vhub_schema::project_version_path;

/// Bytes of a minimal version-resource string entry for `ProductVersion`:
/// length/type header, NUL-terminated UTF-16LE key, one padding unit, and the
/// NUL-terminated UTF-16LE value.
pub fn version_resource(version: &str) -> Vec<u8> {
    let units: Vec<u16> = "ProductVersion"
        .encode_utf16()
        .chain([0, 0])
        .chain(version.encode_utf16())
        .chain([0])
        .collect();
    let value_units = version.encode_utf16().count() + 1;
    let length = 6 + units.len() * 2;

    let mut out = Vec::with_capacity(length);
    for word in [length as u16, value_units as u16, 1] {
        out.extend(word.to_le_bytes());
    }
    for unit in units {
        out.extend(unit.to_le_bytes());
    }
    out
}

/// Create `<root>/Editor/<exe>` carrying `version` in its version resource.
pub fn fake_engine(root: &Path, version: &str) -> io::Result<PathBuf> {
    fake_engine_at(root, &["Editor"], version)
}

/// Create the editor executable at `<root>/<dirs...>/<exe>`.
pub fn fake_engine_at(root: &Path, dirs: &[&str], version: &str) -> io::Result<PathBuf> {
    let mut dir = root.to_path_buf();
    dir.extend(dirs);
    fs::create_dir_all(&dir)?;
    let exe = dir.join(EDITOR_EXECUTABLE);
    let mut bytes = b"MZ\x90\x00".to_vec();
    bytes.extend(version_resource(version));
    fs::write(&exe, bytes)?;
    Ok(exe)
}

/// Create `<root>/Editor/Data/PlaybackEngines/<folder>` for each module folder.
pub fn fake_support_modules(root: &Path, folders: &[&str]) -> io::Result<()> {
    let engines = root.join("Editor").join("Data").join("PlaybackEngines");
    fs::create_dir_all(&engines)?;
    for folder in folders {
        fs::create_dir_all(engines.join(folder))?;
    }
    Ok(())
}

/// Create a project directory with a version file declaring `version`.
pub fn fake_project(root: &Path, version: &str) -> io::Result<PathBuf> {
    let file = project_version_path(root);
    if let Some(parent) = file.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(
        &file,
        format!("m_EditorVersion: {version}\nm_EditorVersionWithRevision: {version} (0000)\n"),
    )?;
    Ok(file)
}
