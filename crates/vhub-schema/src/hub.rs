//! The project registry written by the official hub application
//! (`projects-v1.json`). Only the fields needed to build a
//! [`ProjectRecord`](crate::ProjectRecord) are modelled; everything else is
//! ignored.

use crate::timestamp::from_unix_millis;
use crate::SchemaError;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HubRegistry {
    #[serde(default)]
    pub schema_version: String,
    /// Project root path → project entry.
    #[serde(default)]
    pub data: BTreeMap<String, HubProject>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HubProject {
    #[serde(default)]
    pub title: Option<String>,
    /// Unix time in milliseconds.
    #[serde(default)]
    pub last_modified: Option<i64>,
    #[serde(default)]
    pub version: Option<String>,
}

impl HubProject {
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref().filter(|s| !s.is_empty())
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref().filter(|s| !s.is_empty())
    }

    pub fn last_modified(&self) -> DateTime<Utc> {
        from_unix_millis(self.last_modified.unwrap_or(0))
    }
}

pub fn parse_hub_registry(input: &str) -> Result<HubRegistry, SchemaError> {
    Ok(serde_json::from_str(input)?)
}

pub fn parse_hub_registry_file(path: impl AsRef<Path>) -> Result<HubRegistry, SchemaError> {
    let content = std::fs::read_to_string(path)?;
    parse_hub_registry(&content)
}
