//! Configuration management CLI commands.

use std::path::Path;

use clap::Subcommand;

use bedrock_packs::config::ConfigFile;

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// Write a default configuration file if none exists
    Init,

    /// Show the effective configuration
    Show,
}

/// Run a config subcommand against the file at `path`.
pub fn run(command: ConfigCommands, path: &Path) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => {
            println!("{}", path.display());
        }
        ConfigCommands::Init => {
            if ConfigFile::ensure_exists(path)? {
                println!("Created {}", path.display());
            } else {
                println!("{} already exists, left unchanged", path.display());
            }
        }
        ConfigCommands::Show => {
            let config = ConfigFile::load_from(path)?;
            let or_unset = |v: Option<String>| v.unwrap_or_else(|| "(not set)".to_string());

            println!("[server]");
            println!(
                "  root = {}",
                or_unset(config.server.root.map(|p| p.display().to_string()))
            );
            println!("  world = {}", or_unset(config.server.world));
            println!();
            println!("[install]");
            println!("  auto_activate = {}", config.install.auto_activate);
            println!("  scratch_dir = {}", config.install.scratch_dir);
            println!();
            println!("[logging]");
            println!("  directory = {}", config.logging.directory.display());
            println!("  file = {}", config.logging.file);
        }
    }
    Ok(())
}
