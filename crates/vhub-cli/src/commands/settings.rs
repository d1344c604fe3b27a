use super::{json_pretty, lock, EXIT_FAILURE, EXIT_SUCCESS};
use std::collections::BTreeMap;
use vhub_core::roots::{effective_engines_path, effective_projects_path};
use vhub_schema::{Settings, Theme, ENGINES_PATH_KEY, PROJECTS_PATH_KEY, THEME_KEY};
use vhub_store::{InventoryStore, StoreLayout};

pub fn list(layout: &StoreLayout, json: bool) -> Result<u8, String> {
    let settings = InventoryStore::new(layout.clone()).load_settings();
    let mut view: BTreeMap<String, String> = settings
        .iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect();
    for key in [PROJECTS_PATH_KEY, ENGINES_PATH_KEY, THEME_KEY] {
        if !view.contains_key(key) {
            if let Some(value) = effective_value(&settings, key) {
                view.insert(key.to_owned(), value);
            }
        }
    }

    if json {
        println!("{}", json_pretty(&view)?);
    } else {
        for (key, value) in &view {
            let marker = if settings.get(key).is_some() { "" } else { " (default)" };
            println!("{key} = {value}{marker}");
        }
    }
    Ok(EXIT_SUCCESS)
}

pub fn get(layout: &StoreLayout, key: &str, json: bool) -> Result<u8, String> {
    let settings = InventoryStore::new(layout.clone()).load_settings();
    let value = settings
        .get(key)
        .map(str::to_owned)
        .or_else(|| effective_value(&settings, key));

    if json {
        let payload = serde_json::json!({ "key": key, "value": value });
        println!("{}", json_pretty(&payload)?);
        return Ok(EXIT_SUCCESS);
    }
    match value {
        Some(v) => {
            println!("{v}");
            Ok(EXIT_SUCCESS)
        }
        None => {
            eprintln!("{key} is not set");
            Ok(EXIT_FAILURE)
        }
    }
}

pub fn set(layout: &StoreLayout, key: &str, value: &str, json: bool) -> Result<u8, String> {
    if key == THEME_KEY {
        value.parse::<Theme>().map_err(|e| e.to_string())?;
    }
    let _lock = lock(layout)?;
    let store = InventoryStore::new(layout.clone());
    let mut settings = store
        .load_settings_strict()
        .map_err(|e| format!("store error: {e}"))?;
    settings.set(key, value);
    store
        .save_settings(&settings)
        .map_err(|e| format!("store error: {e}"))?;

    if json {
        let payload = serde_json::json!({ "key": key, "value": value });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!("{key} = {value}");
    }
    Ok(EXIT_SUCCESS)
}

/// The value a recognized key falls back to when unset.
fn effective_value(settings: &Settings, key: &str) -> Option<String> {
    match key {
        PROJECTS_PATH_KEY => {
            effective_projects_path(settings).map(|p| p.to_string_lossy().into_owned())
        }
        ENGINES_PATH_KEY => {
            effective_engines_path(settings).map(|p| p.to_string_lossy().into_owned())
        }
        THEME_KEY => Some(settings.theme().to_string()),
        _ => None,
    }
}
