use super::{absolute, colorize_version, json_pretty, lock, maybe_spinner, spin_clear, EXIT_SUCCESS};
use std::path::Path;
use vhub_core::Hub;
use vhub_probe::{resolve_executable, supported_platforms};
use vhub_store::StoreLayout;

pub fn list(layout: &StoreLayout, json: bool) -> Result<u8, String> {
    // A cold start may scan and persist.
    let _lock = lock(layout)?;
    let mut hub = Hub::open(layout.clone());
    let pb = maybe_spinner(json, "loading engines...");
    let engines = hub.ensure_engines_populated();
    spin_clear(pb);

    if json {
        println!("{}", json_pretty(&engines)?);
    } else if engines.is_empty() {
        println!("no engines found");
    } else {
        println!("{:<26} {:<40} PATH", "VERSION", "PLATFORMS");
        for engine in engines {
            println!(
                "{:<26} {:<40} {}",
                colorize_version(&engine.version),
                engine.platforms_label,
                engine.path.display()
            );
        }
    }
    Ok(EXIT_SUCCESS)
}

pub fn add(layout: &StoreLayout, root: &Path, json: bool) -> Result<u8, String> {
    let root = absolute(root);
    let _lock = lock(layout)?;
    let mut hub = Hub::open(layout.clone());
    let engine = hub.add_engine(&root).map_err(|e| e.to_string())?;

    if json {
        println!("{}", json_pretty(engine)?);
    } else {
        println!(
            "added engine {} at {}",
            colorize_version(&engine.version),
            engine.path.display()
        );
        if engine.has_platforms() {
            println!("platforms: {}", engine.platforms_label);
        }
    }
    Ok(EXIT_SUCCESS)
}

pub fn remove(layout: &StoreLayout, root: &Path, json: bool) -> Result<u8, String> {
    let root = absolute(root);
    let _lock = lock(layout)?;
    let mut hub = Hub::open(layout.clone());
    let removed = hub.remove_engine(&root);

    if json {
        let payload = serde_json::json!({ "path": root, "removed": removed });
        println!("{}", json_pretty(&payload)?);
    } else if removed {
        println!("removed engine at {}", root.display());
    } else {
        println!("no engine registered at {}", root.display());
    }
    Ok(EXIT_SUCCESS)
}

/// Probe an install directly, without touching the inventory.
pub fn platforms(root: &Path, json: bool) -> Result<u8, String> {
    let root = absolute(root);
    let executable = resolve_executable(&root);
    let labels = supported_platforms(&root);

    if json {
        let payload = serde_json::json!({
            "path": root,
            "executable": executable,
            "platforms": labels,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        match executable {
            Some(exe) => println!("executable: {}", exe.display()),
            None => println!("executable: (not found)"),
        }
        if labels.is_empty() {
            println!("platforms:  (none)");
        } else {
            println!("platforms:  {}", labels.join(", "));
        }
    }
    Ok(EXIT_SUCCESS)
}
