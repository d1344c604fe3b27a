use crate::SchemaError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const PROJECTS_PATH_KEY: &str = "ProjectsPath";
pub const ENGINES_PATH_KEY: &str = "EnginesPath";
pub const THEME_KEY: &str = "Theme";

/// Free-form string settings. Keys other than the recognized ones are kept
/// untouched so they survive a save/load cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings {
    entries: BTreeMap<String, String>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configured default projects directory, if set and non-empty.
    pub fn projects_path(&self) -> Option<PathBuf> {
        self.non_empty_path(PROJECTS_PATH_KEY)
    }

    /// Configured default engines directory, if set and non-empty.
    pub fn engines_path(&self) -> Option<PathBuf> {
        self.non_empty_path(ENGINES_PATH_KEY)
    }

    /// The configured theme; unset or unrecognized values read as the default.
    pub fn theme(&self) -> Theme {
        self.get(THEME_KEY)
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.set(THEME_KEY, theme.to_string());
    }

    fn non_empty_path(&self, key: &str) -> Option<PathBuf> {
        self.get(key)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }
}

impl FromIterator<(String, String)> for Settings {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    Light,
    #[default]
    Dark,
    System,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "Light"),
            Theme::Dark => write!(f, "Dark"),
            Theme::System => write!(f, "System"),
        }
    }
}

impl FromStr for Theme {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Light" => Ok(Theme::Light),
            "Dark" => Ok(Theme::Dark),
            "System" => Ok(Theme::System),
            other => Err(SchemaError::UnknownTheme(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_keys_survive_roundtrip() {
        let mut settings = Settings::new();
        settings.set(PROJECTS_PATH_KEY, "/work");
        settings.set("WindowWidth", "1280");
        settings.set_theme(Theme::Light);

        let json = serde_json::to_string_pretty(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
        assert_eq!(back.get("WindowWidth"), Some("1280"));
    }

    #[test]
    fn serializes_as_flat_object() {
        let mut settings = Settings::new();
        settings.set(THEME_KEY, "System");
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json, serde_json::json!({"Theme": "System"}));
    }

    #[test]
    fn theme_defaults_to_dark() {
        let mut settings = Settings::new();
        assert_eq!(settings.theme(), Theme::Dark);
        settings.set(THEME_KEY, "Neon");
        assert_eq!(settings.theme(), Theme::Dark);
        settings.set(THEME_KEY, "System");
        assert_eq!(settings.theme(), Theme::System);
    }

    #[test]
    fn theme_parse_rejects_unknown() {
        assert_eq!("Light".parse::<Theme>().unwrap(), Theme::Light);
        let err = "light".parse::<Theme>().unwrap_err();
        assert!(err.to_string().contains("light"));
    }

    #[test]
    fn empty_paths_read_as_unset() {
        let mut settings = Settings::new();
        settings.set(ENGINES_PATH_KEY, "   ");
        assert!(settings.engines_path().is_none());
        settings.set(ENGINES_PATH_KEY, "/opt/unity");
        assert_eq!(settings.engines_path(), Some(PathBuf::from("/opt/unity")));
        assert!(settings.projects_path().is_none());
    }
}
