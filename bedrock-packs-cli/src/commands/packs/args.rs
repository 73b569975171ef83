//! Argument types and CLI definitions for pack commands.

use std::path::PathBuf;

use clap::Subcommand;

use bedrock_packs::inventory::StatusFilter;
use bedrock_packs::PackType;

/// Pack type argument for CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PackTypeArg {
    /// Behavior packs (entities, loot, scripts)
    Behavior,
    /// Resource packs (textures, models, sounds)
    Resource,
}

impl From<PackTypeArg> for PackType {
    fn from(arg: PackTypeArg) -> Self {
        match arg {
            PackTypeArg::Behavior => PackType::Behavior,
            PackTypeArg::Resource => PackType::Resource,
        }
    }
}

/// Active-state argument for CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum StatusArg {
    #[default]
    All,
    Active,
    Inactive,
}

impl From<StatusArg> for StatusFilter {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::All => StatusFilter::All,
            StatusArg::Active => StatusFilter::Active,
            StatusArg::Inactive => StatusFilter::Inactive,
        }
    }
}

/// Pack subcommands.
#[derive(Debug, Subcommand)]
pub enum PackCommands {
    /// Install everything waiting in addons_auto_install/
    #[command(alias = "auto-scan")]
    Scan {
        /// Scan every server found, not just the first
        #[arg(long)]
        all: bool,
    },

    /// Install a pack folder or a .zip/.mcpack/.mcaddon archive
    Install {
        /// Folder or archive to install
        path: PathBuf,
    },

    /// List installed packs and their activation state
    List {
        /// Only show one pack type
        #[arg(long = "type", value_enum)]
        pack_type: Option<PackTypeArg>,

        /// Only show active or inactive packs
        #[arg(long, value_enum, default_value_t = StatusArg::All)]
        status: StatusArg,

        /// Only show packs whose name, id or folder contains this text
        #[arg(long)]
        search: Option<String>,
    },

    /// Activate an installed pack in the target world
    Activate {
        /// Pack id (manifest header uuid)
        id: String,
    },

    /// Deactivate a pack in the target world, keeping its files
    Deactivate {
        /// Pack id (manifest header uuid)
        id: String,
    },

    /// Delete installed packs and remove them from the target world
    Delete {
        /// Pack ids to delete
        #[arg(required = true)]
        ids: Vec<String>,

        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Write the installed-content report
    Report,
}

/// Arguments for the scan command (one server).
pub struct ScanArgs;

/// Arguments for the install command.
pub struct InstallArgs {
    pub path: PathBuf,
}

/// Arguments for the list command.
pub struct ListArgs {
    pub pack_type: Option<PackTypeArg>,
    pub status: StatusArg,
    pub search: Option<String>,
}

/// Arguments for the activate command.
pub struct ActivateArgs {
    pub id: String,
}

/// Arguments for the deactivate command.
pub struct DeactivateArgs {
    pub id: String,
}

/// Arguments for the delete command.
pub struct DeleteArgs {
    pub ids: Vec<String>,
    pub yes: bool,
}

/// Arguments for the report command.
pub struct ReportArgs;
