use super::EXIT_SUCCESS;
use clap::{Command, CommandFactory};
use std::path::Path;

/// Write `vhub.1` plus one page per subcommand, nested groups included
/// (`vhub-engines-add.1`, ...).
pub fn run<C: CommandFactory>(dir: &Path) -> Result<u8, String> {
    std::fs::create_dir_all(dir).map_err(|e| format!("failed to create dir: {e}"))?;
    let count = render_tree(&C::command(), "vhub", dir)?;
    println!("{count} man pages written to {}", dir.display());
    Ok(EXIT_SUCCESS)
}

fn render_tree(cmd: &Command, page: &str, dir: &Path) -> Result<usize, String> {
    let man = clap_mangen::Man::new(cmd.clone());
    let mut buf = Vec::new();
    man.render(&mut buf)
        .map_err(|e| format!("man page render failed: {e}"))?;
    let path = dir.join(format!("{page}.1"));
    std::fs::write(&path, &buf).map_err(|e| format!("failed to write {}: {e}", path.display()))?;

    let mut count = 1;
    for sub in cmd.get_subcommands().filter(|s| s.get_name() != "help") {
        count += render_tree(sub, &format!("{page}-{}", sub.get_name()), dir)?;
    }
    Ok(count)
}
