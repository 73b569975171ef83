//! Bedrock Packs CLI
//!
//! Command-line front end for installing and managing add-on packs on a
//! Bedrock Dedicated Server. Without a subcommand it opens an interactive
//! menu; `scan` processes the auto-install queue for unattended use.

mod commands;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use bedrock_packs::config::{config_file_path, ConfigFile};
use bedrock_packs::environment::EnvironmentLocator;
use bedrock_packs::logging::init_logging;

use commands::config::ConfigCommands;
use commands::packs::{PackCommands, PackSettings};
use error::CliError;

#[derive(Parser)]
#[command(name = "bedrock-packs")]
#[command(version, about = "Install, activate and audit Bedrock server add-on packs")]
struct Cli {
    /// Server root (default: from config, then auto-detected)
    #[arg(long, global = true)]
    server_dir: Option<PathBuf>,

    /// World folder name (default: from config, then server.properties)
    #[arg(long, global = true)]
    world: Option<String>,

    /// Configuration file (default: <config dir>/bedrock-packs/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show progress messages on stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Packs(PackCommands),

    /// Manage the configuration file
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli.config.clone().unwrap_or_else(config_file_path);

    let command = match cli.command {
        Some(Commands::Config(command)) => return commands::config::run(command, &config_path),
        Some(Commands::Packs(command)) => Some(command),
        None => None,
    };

    let config = ConfigFile::load_from(&config_path)?;

    let console_level = if cli.verbose { "info" } else { "warn" };
    let _logging_guard = init_logging(
        &config.logging.directory,
        &config.logging.file,
        console_level,
    )
    .map_err(|e| CliError::LoggingInit(e.to_string()))?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_path.display(),
        "Bedrock Packs starting"
    );

    let server_root = cli.server_dir.or(config.server.root);
    let pinned = server_root.is_some();
    let locator = EnvironmentLocator::from_current_dir()?.with_override(server_root);

    let settings = PackSettings {
        world: cli.world.or(config.server.world),
        scratch_dir: config.install.scratch_dir,
        auto_activate: config.install.auto_activate,
    };

    match command {
        Some(command) => commands::packs::run(command, &locator, &settings),
        None => {
            if !atty::is(atty::Stream::Stdin) {
                return Err(CliError::NotInteractive);
            }
            commands::packs::run_interactive(&locator, &settings, pinned)
        }
    }
}
