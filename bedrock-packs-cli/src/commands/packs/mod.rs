//! Pack commands: scan, install, list, activate, deactivate, delete,
//! report and the interactive menu.
//!
//! This module implements the Command Pattern with trait-based dependency
//! injection:
//!
//! - `traits`: Core interfaces (`Output`, `PackService`, `CommandHandler`)
//! - `services`: Concrete implementations of the traits
//! - `args`: CLI argument types and parsing (clap-derived)
//! - `handlers`: Command handlers with the presentation logic
//! - `interactive`: dialoguer menus driving a manage session

mod args;
mod handlers;
mod interactive;
mod services;
mod traits;

#[cfg(test)]
mod tests;

pub use args::PackCommands;
pub use handlers::{
    ActivateHandler, DeactivateHandler, DeleteHandler, InstallHandler, ListHandler,
    ReportHandler, ScanHandler,
};
pub use services::{ConsoleInteraction, ConsoleOutput, DefaultPackService};
pub use traits::CommandHandler;

use std::path::PathBuf;

use bedrock_packs::environment::{EnvironmentLocator, ServerContext, ServerLayout};

use args::{
    ActivateArgs, DeactivateArgs, DeleteArgs, InstallArgs, ListArgs, ReportArgs, ScanArgs,
};
use traits::{CommandContext, Output};

use crate::error::CliError;

/// Settings shared by every pack command, resolved from flags and config.
#[derive(Debug, Clone)]
pub struct PackSettings {
    /// Preferred world folder name.
    pub world: Option<String>,
    /// Scratch folder name under the server root.
    pub scratch_dir: String,
    /// Activate packs after installing them.
    pub auto_activate: bool,
}

/// Resolve the world on one server root and build the production service.
fn open_service(root: PathBuf, settings: &PackSettings) -> Result<DefaultPackService, CliError> {
    let layout = ServerLayout::new(root).with_scratch_dir(settings.scratch_dir.clone());
    let ctx = ServerContext::resolve(layout, settings.world.as_deref())?;

    tracing::info!(
        root = %ctx.layout().root().display(),
        world = %ctx.world().name(),
        "Target server selected"
    );

    Ok(DefaultPackService::new(ctx, settings.auto_activate))
}

fn console_output() -> ConsoleOutput {
    ConsoleOutput::new(atty::is(atty::Stream::Stdout))
}

/// Run a pack subcommand.
///
/// Creates the production context with real implementations and
/// dispatches to the appropriate handler.
pub fn run(
    command: PackCommands,
    locator: &EnvironmentLocator,
    settings: &PackSettings,
) -> Result<(), CliError> {
    let output = console_output();
    let interaction = ConsoleInteraction::new();

    if let PackCommands::Scan { all: true } = command {
        return scan_all(locator, settings, &output, &interaction);
    }

    let located = locator.locate_server_root()?;
    tracing::debug!(root = %located.root.display(), rule = ?located.rule, "Server root located");

    let service = open_service(located.root, settings)?;
    let ctx = CommandContext::new(&output, &service, &interaction);

    match command {
        PackCommands::Scan { .. } => ScanHandler::execute(ScanArgs, &ctx),
        PackCommands::Install { path } => InstallHandler::execute(InstallArgs { path }, &ctx),
        PackCommands::List {
            pack_type,
            status,
            search,
        } => ListHandler::execute(
            ListArgs {
                pack_type,
                status,
                search,
            },
            &ctx,
        ),
        PackCommands::Activate { id } => ActivateHandler::execute(ActivateArgs { id }, &ctx),
        PackCommands::Deactivate { id } => {
            DeactivateHandler::execute(DeactivateArgs { id }, &ctx)
        }
        PackCommands::Delete { ids, yes } => DeleteHandler::execute(DeleteArgs { ids, yes }, &ctx),
        PackCommands::Report => ReportHandler::execute(ReportArgs, &ctx),
    }
}

/// Auto-scan every detected server. One server's failure does not stop
/// the others.
fn scan_all(
    locator: &EnvironmentLocator,
    settings: &PackSettings,
    output: &ConsoleOutput,
    interaction: &ConsoleInteraction,
) -> Result<(), CliError> {
    let roots = locator.detect_all();
    if roots.is_empty() {
        return locator
            .locate_server_root()
            .map(|_| ())
            .map_err(CliError::from);
    }

    let mut failed = 0;
    for root in roots {
        let result = open_service(root.clone(), settings).and_then(|service| {
            let ctx = CommandContext::new(output, &service, interaction);
            ScanHandler::execute(ScanArgs, &ctx)
        });

        match result {
            Ok(()) => {}
            Err(CliError::ScanFailed { failed: n }) => failed += n,
            Err(e) => {
                tracing::error!(root = %root.display(), error = %e, "Scan failed");
                output.error(&format!("{}: {}", root.display(), e));
                failed += 1;
            }
        }
        output.newline();
    }

    if failed == 0 {
        Ok(())
    } else {
        Err(CliError::ScanFailed { failed })
    }
}

/// Run the interactive menu.
///
/// `pinned` is true when the server root was given explicitly; otherwise
/// the user picks one if several servers are detected.
pub fn run_interactive(
    locator: &EnvironmentLocator,
    settings: &PackSettings,
    pinned: bool,
) -> Result<(), CliError> {
    let root = if pinned {
        locator.locate_server_root()?.root
    } else {
        let mut roots = locator.detect_all();
        match roots.len() {
            0 => locator.locate_server_root()?.root,
            1 => roots.remove(0),
            _ => interactive::choose_server(&roots)?,
        }
    };

    let service = open_service(root, settings)?;
    interactive::run(&service, &console_output())
}
