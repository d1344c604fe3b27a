use super::{json_pretty, lock, maybe_spinner, spin_ok, EXIT_SUCCESS};
use vhub_core::Hub;
use vhub_store::StoreLayout;

pub fn run(layout: &StoreLayout, json: bool) -> Result<u8, String> {
    let _lock = lock(layout)?;
    let mut hub = Hub::open(layout.clone());

    let pb = maybe_spinner(json, "scanning default locations...");
    let report = hub.rescan();
    if let Some(ref pb) = pb {
        spin_ok(pb, "scan finished");
    }

    if json {
        println!("{}", json_pretty(&report)?);
    } else {
        println!(
            "{} new engines, {} new projects",
            report.engines_added.len(),
            report.projects_added.len()
        );
        for path in report.engines_added.iter().chain(&report.projects_added) {
            println!("  + {}", path.display());
        }
    }
    Ok(EXIT_SUCCESS)
}
