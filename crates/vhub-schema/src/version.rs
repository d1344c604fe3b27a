//! Editor version identifiers and the tolerant matching rule used to bind
//! projects to installed engines.
//!
//! Versions are opaque tokens such as `2022.3.14f1` or
//! `2022.3.14f1_eff2de9070d8`; the part after the first underscore is a build
//! (changeset) identifier that matching ignores. No ordering is defined.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

/// Sentinel returned when a version cannot be read from disk.
pub const UNKNOWN_VERSION: &str = "Unknown";

const BUILD_SEPARATOR: char = '_';

/// An editor version string as found in binaries, project files, and the
/// persisted inventory. May be empty (e.g. an unassigned engine selection).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditorVersion(String);

impl EditorVersion {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// The `"Unknown"` sentinel.
    pub fn unknown() -> Self {
        Self(UNKNOWN_VERSION.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_unknown(&self) -> bool {
        self.0 == UNKNOWN_VERSION
    }

    /// The version with its build identifier stripped. See [`main_version`].
    pub fn main_version(&self) -> &str {
        main_version(&self.0)
    }

    /// Whether this (engine) version satisfies `required`. See [`is_match`].
    pub fn matches(&self, required: &EditorVersion) -> bool {
        is_match(&self.0, &required.0)
    }
}

impl Deref for EditorVersion {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EditorVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EditorVersion {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for EditorVersion {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for EditorVersion {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl From<String> for EditorVersion {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EditorVersion {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Everything before the first underscore, or the whole string when there is
/// none. A leading underscore is not treated as a separator, so the result is
/// never empty for non-empty input.
pub fn main_version(version: &str) -> &str {
    match version.find(BUILD_SEPARATOR) {
        Some(idx) if idx > 0 => &version[..idx],
        _ => version,
    }
}

/// Two versions denote the same release when they are equal ignoring ASCII
/// case, or when their main versions are. Empty input never matches.
pub fn is_match(engine_version: &str, required_version: &str) -> bool {
    if engine_version.is_empty() || required_version.is_empty() {
        return false;
    }
    if engine_version.eq_ignore_ascii_case(required_version) {
        return true;
    }
    main_version(engine_version).eq_ignore_ascii_case(main_version(required_version))
}
