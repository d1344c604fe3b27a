mod commands;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use commands::exit_code_for;
use std::path::PathBuf;
use std::process::ExitCode;
use vhub_store::StoreLayout;

#[derive(Debug, Parser)]
#[command(
    name = "vhub",
    version,
    about = "Inventory manager for Unity editor installs and projects"
)]
struct Cli {
    /// Application-data directory (default: $VHUB_DATA_DIR or <data dir>/VHub).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Manage installed editors.
    Engines {
        #[command(subcommand)]
        command: EnginesCommand,
    },
    /// Manage projects.
    Projects {
        #[command(subcommand)]
        command: ProjectsCommand,
    },
    /// Rescan the default install and project locations for new entries.
    Scan,
    /// Read and write settings.
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },
    /// Check the data directory and inventory files for problems.
    Doctor,
    /// Generate shell completions for bash, zsh, fish, elvish, or powershell.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
    /// Generate man pages in the specified directory.
    ManPages {
        /// Output directory for man pages.
        #[arg(default_value = "man")]
        dir: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
enum EnginesCommand {
    /// List known editors, discovering them on first use.
    List,
    /// Register the editor installed at ROOT.
    Add { root: PathBuf },
    /// Forget the editor registered at ROOT.
    Remove { root: PathBuf },
    /// Show the platform support modules installed under ROOT.
    Platforms { root: PathBuf },
}

#[derive(Debug, Subcommand)]
enum ProjectsCommand {
    /// List known projects, discovering them on first use.
    List,
    /// Register the project at ROOT.
    Add { root: PathBuf },
    /// Forget the project registered at ROOT.
    Remove { root: PathBuf },
    /// Choose the editor version a project opens with (omit to clear).
    Select {
        root: PathBuf,
        version: Option<String>,
    },
    /// Import projects from the hub's projects-v1.json.
    Import {
        /// Registry file (default: the hub's own registry location).
        file: Option<PathBuf>,
    },
    /// Show which editor would open the project at ROOT.
    Resolve { root: PathBuf },
    /// Open the project at ROOT in its resolved editor.
    Open { root: PathBuf },
}

#[derive(Debug, Subcommand)]
enum SettingsCommand {
    /// Show all settings, including defaults for recognized keys.
    List,
    /// Print one setting.
    Get { key: String },
    /// Set one setting.
    Set { key: String, value: String },
}

fn main() -> ExitCode {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe")
            || msg.contains("broken pipe")
            || msg.contains("os error 32")
            || msg.contains("failed printing to stdout")
        {
            std::process::exit(0);
        }
        default_hook(info);
    }));

    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("VHUB_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let layout = cli
        .data_dir
        .map_or_else(StoreLayout::from_env, StoreLayout::new);
    let json = cli.json;

    let result = match cli.command {
        Commands::Engines { command } => match command {
            EnginesCommand::List => commands::engines::list(&layout, json),
            EnginesCommand::Add { root } => commands::engines::add(&layout, &root, json),
            EnginesCommand::Remove { root } => commands::engines::remove(&layout, &root, json),
            EnginesCommand::Platforms { root } => commands::engines::platforms(&root, json),
        },
        Commands::Projects { command } => match command {
            ProjectsCommand::List => commands::projects::list(&layout, json),
            ProjectsCommand::Add { root } => commands::projects::add(&layout, &root, json),
            ProjectsCommand::Remove { root } => commands::projects::remove(&layout, &root, json),
            ProjectsCommand::Select { root, version } => {
                commands::projects::select(&layout, &root, version.as_deref(), json)
            }
            ProjectsCommand::Import { file } => {
                commands::projects::import(&layout, file.as_deref(), json)
            }
            ProjectsCommand::Resolve { root } => commands::projects::resolve(&layout, &root, json),
            ProjectsCommand::Open { root } => commands::projects::open(&layout, &root, json),
        },
        Commands::Scan => commands::scan::run(&layout, json),
        Commands::Settings { command } => match command {
            SettingsCommand::List => commands::settings::list(&layout, json),
            SettingsCommand::Get { key } => commands::settings::get(&layout, &key, json),
            SettingsCommand::Set { key, value } => {
                commands::settings::set(&layout, &key, &value, json)
            }
        },
        Commands::Doctor => commands::doctor::run(&layout, json),
        Commands::Completions { shell } => commands::completions::run::<Cli>(shell),
        Commands::ManPages { dir } => commands::man_pages::run::<Cli>(&dir),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            ExitCode::from(exit_code_for(&msg))
        }
    }
}
