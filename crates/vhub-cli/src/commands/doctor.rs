use super::{EXIT_FAILURE, EXIT_SUCCESS};
use vhub_core::{default_hub_registry_path, DiscoveryRoots, InventoryLock};
use vhub_schema::{Theme, THEME_KEY};
use vhub_store::{InventoryStore, Reconciled, StoreLayout};

pub fn run(layout: &StoreLayout, json_output: bool) -> Result<u8, String> {
    let mut checks: Vec<Check> = Vec::new();
    let mut all_pass = true;

    if layout.is_initialized() {
        checks.push(Check::pass(
            "data_dir",
            &format!("Data directory {}", layout.root().display()),
        ));
        let store = InventoryStore::new(layout.clone());
        check_inventory("engines", &store.reconcile_engines(), &mut checks, &mut all_pass);
        check_inventory("projects", &store.reconcile_projects(), &mut checks, &mut all_pass);
        check_settings(&store, &mut checks, &mut all_pass);
        check_lock(layout, &mut checks, &mut all_pass);
    } else {
        checks.push(Check::info(
            "data_dir",
            &format!(
                "Data directory {} not created yet (will be created on first save)",
                layout.root().display()
            ),
        ));
    }

    check_roots(layout, &mut checks);
    print_results(&checks, all_pass, json_output)
}

fn check_inventory<T>(
    kind: &str,
    report: &Reconciled<T>,
    checks: &mut Vec<Check>,
    all_pass: &mut bool,
) {
    let name = format!("{kind}_file");
    if report.corrupt {
        *all_pass = false;
        checks.push(Check::fail(
            &name,
            &format!("{kind}.json is corrupt and is being ignored"),
        ));
    } else if report.pruned.is_empty() {
        checks.push(Check::pass(
            &name,
            &format!("{} {kind} valid", report.kept.len()),
        ));
    } else {
        checks.push(Check::warn(
            &name,
            &format!(
                "{} {kind} valid, {} stale (dropped on next load): {}",
                report.kept.len(),
                report.pruned.len(),
                report
                    .pruned
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        ));
    }
}

fn check_settings(store: &InventoryStore, checks: &mut Vec<Check>, all_pass: &mut bool) {
    let settings = match store.load_settings_strict() {
        Ok(settings) => settings,
        Err(_) => {
            *all_pass = false;
            checks.push(Check::fail(
                "settings",
                "settings.json is corrupt and is being ignored",
            ));
            return;
        }
    };
    match settings.get(THEME_KEY) {
        Some(value) if value.parse::<Theme>().is_err() => checks.push(Check::warn(
            "settings",
            &format!("Unrecognized theme '{value}', using {}", Theme::default()),
        )),
        _ => checks.push(Check::pass(
            "settings",
            &format!("{} settings", settings.len()),
        )),
    }
}

fn check_lock(layout: &StoreLayout, checks: &mut Vec<Check>, all_pass: &mut bool) {
    match InventoryLock::try_acquire(&layout.lock_file()) {
        Ok(Some(_)) => checks.push(Check::pass("store_lock", "Inventory lock is free")),
        Ok(None) => checks.push(Check::warn(
            "store_lock",
            "Inventory lock is held by another process",
        )),
        Err(e) => {
            *all_pass = false;
            checks.push(Check::fail(
                "store_lock",
                &format!("Cannot check inventory lock: {e}"),
            ));
        }
    }
}

fn check_roots(layout: &StoreLayout, checks: &mut Vec<Check>) {
    let settings = InventoryStore::new(layout.clone()).load_settings();
    let roots = DiscoveryRoots::platform_default().with_settings(&settings);
    for (kind, dirs) in [("engine", &roots.engine_roots), ("project", &roots.project_roots)] {
        for dir in dirs {
            let status = if dir.is_dir() { "present" } else { "absent" };
            checks.push(Check::info(
                &format!("{kind}_root"),
                &format!("{kind} location {} ({status})", dir.display()),
            ));
        }
    }
    match default_hub_registry_path() {
        Some(path) if path.is_file() => checks.push(Check::info(
            "hub_registry",
            &format!("Hub project registry found at {}", path.display()),
        )),
        _ => checks.push(Check::info("hub_registry", "No hub project registry found")),
    }
}

fn print_results(checks: &[Check], all_pass: bool, json_output: bool) -> Result<u8, String> {
    if json_output {
        let json = serde_json::json!({
            "healthy": all_pass,
            "checks": checks.iter().map(|c| serde_json::json!({
                "name": c.name,
                "status": c.status,
                "message": c.message,
            })).collect::<Vec<_>>(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&json).map_err(|e| e.to_string())?
        );
    } else {
        println!("VHub Doctor\n");
        for check in checks {
            let icon = match check.status.as_str() {
                "pass" => "✓",
                "fail" => "✗",
                "warn" => "⚠",
                _ => "ℹ",
            };
            println!("  {icon} {}", check.message);
        }
        println!();
        if all_pass {
            println!("All checks passed.");
        } else {
            println!("Some checks failed. See above for details.");
        }
    }
    Ok(if all_pass { EXIT_SUCCESS } else { EXIT_FAILURE })
}

struct Check {
    name: String,
    status: String,
    message: String,
}

impl Check {
    fn new(name: &str, status: &str, message: &str) -> Self {
        Self {
            name: name.to_owned(),
            status: status.to_owned(),
            message: message.to_owned(),
        }
    }

    fn pass(name: &str, message: &str) -> Self {
        Self::new(name, "pass", message)
    }

    fn fail(name: &str, message: &str) -> Self {
        Self::new(name, "fail", message)
    }

    fn warn(name: &str, message: &str) -> Self {
        Self::new(name, "warn", message)
    }

    fn info(name: &str, message: &str) -> Self {
        Self::new(name, "info", message)
    }
}
