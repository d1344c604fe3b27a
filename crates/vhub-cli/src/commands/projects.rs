use super::{
    absolute, colorize_version, json_pretty, lock, maybe_spinner, spin_clear, spin_ok, EXIT_SUCCESS,
};
use std::path::Path;
use std::process::Command;
use tracing::info;
use vhub_core::{default_hub_registry_path, Hub};
use vhub_store::StoreLayout;

pub fn list(layout: &StoreLayout, json: bool) -> Result<u8, String> {
    let _lock = lock(layout)?;
    let mut hub = Hub::open(layout.clone());
    let pb = maybe_spinner(json, "loading projects...");
    hub.ensure_engines_populated();
    let projects = hub.ensure_projects_populated();
    spin_clear(pb);

    if json {
        println!("{}", json_pretty(&projects)?);
    } else if projects.is_empty() {
        println!("no projects found");
    } else {
        println!(
            "{:<24} {:<16} {:<26} {:<20} PATH",
            "NAME", "REQUIRED", "SELECTED", "MODIFIED"
        );
        for p in projects {
            println!(
                "{:<24} {:<16} {:<26} {:<20} {}",
                p.name,
                colorize_version(&p.required_version),
                colorize_version(&p.selected_engine_version),
                p.last_modified.format("%Y-%m-%d %H:%M").to_string(),
                p.path.display()
            );
        }
    }
    Ok(EXIT_SUCCESS)
}

pub fn add(layout: &StoreLayout, root: &Path, json: bool) -> Result<u8, String> {
    let root = absolute(root);
    let _lock = lock(layout)?;
    let mut hub = Hub::open(layout.clone());
    let project = hub.add_project(&root).map_err(|e| e.to_string())?;

    if json {
        println!("{}", json_pretty(project)?);
    } else {
        println!(
            "added project '{}' ({})",
            project.name,
            colorize_version(&project.required_version)
        );
        if project.selected_engine_version.is_empty() {
            println!("no installed engine matches; select one with `vhub projects select`");
        } else {
            println!("engine: {}", project.selected_engine_version);
        }
    }
    Ok(EXIT_SUCCESS)
}

pub fn remove(layout: &StoreLayout, root: &Path, json: bool) -> Result<u8, String> {
    let root = absolute(root);
    let _lock = lock(layout)?;
    let mut hub = Hub::open(layout.clone());
    let removed = hub.remove_project(&root);

    if json {
        let payload = serde_json::json!({ "path": root, "removed": removed });
        println!("{}", json_pretty(&payload)?);
    } else if removed {
        println!("removed project at {}", root.display());
    } else {
        println!("no project registered at {}", root.display());
    }
    Ok(EXIT_SUCCESS)
}

pub fn select(
    layout: &StoreLayout,
    root: &Path,
    version: Option<&str>,
    json: bool,
) -> Result<u8, String> {
    let root = absolute(root);
    let _lock = lock(layout)?;
    let mut hub = Hub::open(layout.clone());
    let project = hub
        .set_selected_engine(&root, version.unwrap_or_default())
        .map_err(|e| e.to_string())?;

    if json {
        println!("{}", json_pretty(project)?);
    } else if project.selected_engine_version.is_empty() {
        println!("cleared engine selection for '{}'", project.name);
    } else {
        println!(
            "'{}' now opens with {}",
            project.name, project.selected_engine_version
        );
    }
    Ok(EXIT_SUCCESS)
}

pub fn import(layout: &StoreLayout, file: Option<&Path>, json: bool) -> Result<u8, String> {
    let registry = match file {
        Some(path) => absolute(path),
        None => default_hub_registry_path()
            .ok_or("import source not found: no config directory on this system")?,
    };
    let _lock = lock(layout)?;
    let mut hub = Hub::open(layout.clone());

    let pb = maybe_spinner(json, "importing projects...");
    let report = match hub.import_from(&registry) {
        Ok(r) => r,
        Err(e) => {
            spin_clear(pb);
            return Err(e.to_string());
        }
    };
    if let Some(ref pb) = pb {
        spin_ok(pb, "import finished");
    }

    if json {
        println!("{}", json_pretty(&report)?);
    } else {
        println!(
            "imported {}, skipped {}",
            report.imported_count(),
            report.skipped_count()
        );
        for path in &report.imported {
            println!("  + {}", path.display());
        }
        for skipped in &report.skipped {
            println!("  - {} ({})", skipped.path, skipped.reason);
        }
    }
    Ok(EXIT_SUCCESS)
}

pub fn resolve(layout: &StoreLayout, root: &Path, json: bool) -> Result<u8, String> {
    let root = absolute(root);
    let mut hub = Hub::open(layout.clone());
    let resolution = hub.resolve_project(&root).map_err(|e| e.to_string())?;

    if json {
        println!("{}", json_pretty(&resolution)?);
    } else {
        println!("target:     {}", resolution.target_version);
        println!("engine:     {}", colorize_version(&resolution.engine.version));
        println!("root:       {}", resolution.engine.path.display());
        println!("executable: {}", resolution.executable.display());
    }
    Ok(EXIT_SUCCESS)
}

/// Launch the resolved editor on the project. The only place a process is
/// spawned; the editor is left running detached.
pub fn open(layout: &StoreLayout, root: &Path, json: bool) -> Result<u8, String> {
    let root = absolute(root);
    let mut hub = Hub::open(layout.clone());
    let resolution = hub.resolve_project(&root).map_err(|e| e.to_string())?;
    let project = hub
        .project(&root)
        .ok_or_else(|| format!("not a project: {}", root.display()))?;
    let args = resolution.launch_args(project);

    info!("launching {} {args:?}", resolution.executable.display());
    let child = Command::new(&resolution.executable)
        .args(&args)
        .spawn()
        .map_err(|e| format!("failed to launch {}: {e}", resolution.executable.display()))?;

    if json {
        let payload = serde_json::json!({
            "executable": resolution.executable,
            "args": args.iter().map(|a| a.to_string_lossy()).collect::<Vec<_>>(),
            "pid": child.id(),
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!(
            "opening '{}' with {} (pid {})",
            project.name,
            resolution.engine.version,
            child.id()
        );
    }
    Ok(EXIT_SUCCESS)
}
