//! Command handlers for pack commands.
//!
//! Each handler implements the `CommandHandler` trait and contains the
//! presentation logic for its command; pack semantics live in the library.

use bedrock_packs::inventory::{PackFilter, PackView};
use bedrock_packs::orchestrator::{Confirmation, InstallBatch};
use bedrock_packs::PackType;

use super::args::{
    ActivateArgs, DeactivateArgs, DeleteArgs, InstallArgs, ListArgs, ReportArgs, ScanArgs,
};
use super::traits::{CommandContext, CommandHandler, Output};
use crate::error::CliError;

/// One listing line for a pack.
pub(super) fn format_entry(view: &PackView) -> String {
    format!(
        "[{}] {} {} v{} ({}) {}",
        if view.active { "x" } else { " " },
        view.pack.pack_type.short_label(),
        view.pack.name,
        view.pack.version,
        view.pack.folder_name(),
        view.pack.id
    )
}

/// Print what an install did.
pub(super) fn print_batch(output: &dyn Output, batch: &InstallBatch) {
    for pack in &batch.installed {
        output.indented(&format!(
            "installed {} {} ({})",
            pack.pack_type.short_label(),
            pack.name,
            pack.folder_name()
        ));
    }
    for pack in &batch.already_installed {
        output.indented(&format!(
            "already installed {} {} ({})",
            pack.pack_type.short_label(),
            pack.name,
            pack.id
        ));
    }
    if !batch.activated.is_empty() {
        output.indented(&format!("activated {} pack(s)", batch.activated.len()));
    }
    for failure in &batch.failed {
        output.error(&format!(
            "{}: {} ({})",
            failure.name,
            failure.error,
            failure.kind()
        ));
    }
}

// ============================================================================
// Scan Handler
// ============================================================================

/// Handler for the `scan` command.
pub struct ScanHandler;

impl CommandHandler for ScanHandler {
    type Args = ScanArgs;

    fn execute(_args: Self::Args, ctx: &CommandContext<'_>) -> Result<(), CliError> {
        ctx.output.header(&format!(
            "Auto-install queue: {}",
            ctx.packs.server_root().display()
        ));

        let summary = ctx.packs.auto_scan()?;

        if summary.processed.is_empty() && summary.failed.is_empty() {
            ctx.output.println("Nothing to install.");
            return Ok(());
        }

        for item in &summary.processed {
            ctx.output.println(&format!(
                "{} -> {}",
                item.archive.display(),
                item.moved_to.display()
            ));
            print_batch(ctx.output, &item.batch);
        }
        for failure in &summary.failed {
            ctx.output.error(&format!(
                "{}: {} ({})",
                failure.archive.display(),
                failure.message,
                failure.kind
            ));
        }

        ctx.output.newline();
        ctx.output.println(&format!(
            "{} processed, {} failed",
            summary.processed.len(),
            summary.failed.len()
        ));

        if summary.is_success() {
            Ok(())
        } else {
            Err(CliError::ScanFailed {
                failed: summary.failed.len(),
            })
        }
    }
}

// ============================================================================
// Install Handler
// ============================================================================

/// Handler for the `install` command.
pub struct InstallHandler;

impl CommandHandler for InstallHandler {
    type Args = InstallArgs;

    fn execute(args: Self::Args, ctx: &CommandContext<'_>) -> Result<(), CliError> {
        ctx.output.println(&format!(
            "Installing {} into world '{}'",
            args.path.display(),
            ctx.packs.world_name()
        ));

        let batch = ctx.packs.install(&args.path, ctx.output.progress())?;
        print_batch(ctx.output, &batch);

        if batch.is_empty() {
            ctx.output.warning("no packs found");
        }

        if batch.is_complete() {
            ctx.output.success(&format!(
                "{} installed, {} already present",
                batch.installed.len(),
                batch.already_installed.len()
            ));
            Ok(())
        } else {
            let total = batch.installed.len() + batch.already_installed.len() + batch.failed.len();
            Err(CliError::Incomplete {
                failed: batch.failed.len(),
                total,
            })
        }
    }
}

// ============================================================================
// List Handler
// ============================================================================

/// Handler for the `list` command.
pub struct ListHandler;

impl CommandHandler for ListHandler {
    type Args = ListArgs;

    fn execute(args: Self::Args, ctx: &CommandContext<'_>) -> Result<(), CliError> {
        let view = ctx.packs.combined_view()?;
        let filter = PackFilter::all()
            .with_type(args.pack_type.map(PackType::from))
            .with_status(args.status.into())
            .with_text(args.search.as_deref());

        ctx.output.header(&format!(
            "Packs in world '{}' ({} installed, {} active)",
            ctx.packs.world_name(),
            view.entries.len(),
            view.active_count()
        ));

        let shown = view.filtered(&filter);
        if shown.is_empty() {
            if filter.is_unrestricted() {
                ctx.output.println("No packs installed.");
            } else {
                ctx.output.println("No packs match the filter.");
            }
        }
        for entry in shown {
            ctx.output.indented(&format_entry(entry));
        }

        if !view.dangling.is_empty() {
            ctx.output.newline();
            ctx.output.warning(&format!(
                "{} active reference(s) point to packs that are not installed:",
                view.dangling.len()
            ));
            for dangling in &view.dangling {
                ctx.output.indented(&format!(
                    "{} {}",
                    dangling.pack_type.short_label(),
                    dangling.pack_id
                ));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Activate / Deactivate Handlers
// ============================================================================

/// Handler for the `activate` command.
pub struct ActivateHandler;

impl CommandHandler for ActivateHandler {
    type Args = ActivateArgs;

    fn execute(args: Self::Args, ctx: &CommandContext<'_>) -> Result<(), CliError> {
        let outcome = ctx.packs.activate(&args.id)?;
        if outcome.added.is_empty() {
            ctx.output.println(&format!("{} is already active", args.id));
        } else {
            ctx.output.success(&format!(
                "activated {} in world '{}'",
                args.id,
                ctx.packs.world_name()
            ));
        }
        Ok(())
    }
}

/// Handler for the `deactivate` command.
pub struct DeactivateHandler;

impl CommandHandler for DeactivateHandler {
    type Args = DeactivateArgs;

    fn execute(args: Self::Args, ctx: &CommandContext<'_>) -> Result<(), CliError> {
        let outcome = ctx.packs.deactivate(&args.id)?;
        if outcome.removed.is_empty() {
            ctx.output.println(&format!("{} was not active", args.id));
        } else {
            ctx.output.success(&format!(
                "deactivated {} in world '{}'",
                args.id,
                ctx.packs.world_name()
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Delete Handler
// ============================================================================

/// Handler for the `delete` command.
pub struct DeleteHandler;

impl CommandHandler for DeleteHandler {
    type Args = DeleteArgs;

    fn execute(args: Self::Args, ctx: &CommandContext<'_>) -> Result<(), CliError> {
        let confirmation = if args.yes {
            Confirmation::Confirmed
        } else {
            let prompt = format!(
                "Permanently delete {} pack(s) from {}?",
                args.ids.len(),
                ctx.packs.server_root().display()
            );
            Confirmation::from_flag(ctx.interaction.confirm(&prompt))
        };

        let summary = ctx.packs.delete(&args.ids, confirmation)?;
        if summary.cancelled {
            ctx.output.println("Delete cancelled, nothing changed.");
            return Ok(());
        }

        for pack in &summary.deleted {
            ctx.output.indented(&format!(
                "deleted {} {} ({})",
                pack.pack_type.short_label(),
                pack.name,
                pack.folder_name()
            ));
        }
        for failure in &summary.failed {
            ctx.output
                .error(&format!("{}: {}", failure.pack.name, failure.error));
        }

        if summary.failed.is_empty() {
            ctx.output
                .success(&format!("{} pack(s) deleted", summary.deleted.len()));
            Ok(())
        } else {
            Err(CliError::Incomplete {
                failed: summary.failed.len(),
                total: summary.deleted.len() + summary.failed.len(),
            })
        }
    }
}

// ============================================================================
// Report Handler
// ============================================================================

/// Handler for the `report` command.
pub struct ReportHandler;

impl CommandHandler for ReportHandler {
    type Args = ReportArgs;

    fn execute(_args: Self::Args, ctx: &CommandContext<'_>) -> Result<(), CliError> {
        let path = ctx.packs.write_report()?;
        ctx.output
            .success(&format!("report written to {}", path.display()));
        Ok(())
    }
}
