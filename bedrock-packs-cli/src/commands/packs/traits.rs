//! Core traits for the pack command handlers.
//!
//! Handlers depend on these interfaces only, so they can run against mocks
//! in tests and against a real server in production.

use std::path::{Path, PathBuf};

use bedrock_packs::inventory::CombinedView;
use bedrock_packs::orchestrator::{
    AutoScanSummary, Confirmation, DeleteSummary, InstallBatch, InstallProgressCallback,
    SelectionIntent,
};
use bedrock_packs::registry::ApplyOutcome;
use bedrock_packs::{ManagerResult, PackType};

use crate::error::CliError;

// ============================================================================
// Output Trait - Abstracts console/UI output
// ============================================================================

/// Trait for outputting messages to the user.
pub trait Output: Send + Sync {
    /// Print a line of text.
    fn println(&self, message: &str);

    /// Print text without a newline.
    #[allow(dead_code)]
    fn print(&self, message: &str);

    /// Print an empty line.
    fn newline(&self) {
        self.println("");
    }

    /// Print a section header.
    fn header(&self, title: &str) {
        self.println(title);
        self.println(&"=".repeat(title.chars().count()));
    }

    /// Print an indented line.
    fn indented(&self, message: &str) {
        self.println(&format!("  {}", message));
    }

    /// Print a warning message.
    fn warning(&self, message: &str) {
        self.println(&format!("Warning: {}", message));
    }

    /// Print an error message.
    fn error(&self, message: &str) {
        self.println(&format!("Error: {}", message));
    }

    /// Print a success message.
    fn success(&self, message: &str) {
        self.println(&format!("Success: {}", message));
    }

    /// A callback rendering install progress, if this output shows any.
    fn progress(&self) -> Option<InstallProgressCallback> {
        None
    }
}

// ============================================================================
// Pack Service Trait
// ============================================================================

/// Pack operations against one server and world.
pub trait PackService: Send + Sync {
    /// Root directory of the server.
    fn server_root(&self) -> &Path;

    /// Name of the target world.
    fn world_name(&self) -> &str;

    /// Install a folder or archive.
    fn install(
        &self,
        path: &Path,
        on_progress: Option<InstallProgressCallback>,
    ) -> ManagerResult<InstallBatch>;

    /// Process the auto-install queue.
    fn auto_scan(&self) -> ManagerResult<AutoScanSummary>;

    /// Installed packs joined with the activation lists.
    fn combined_view(&self) -> ManagerResult<CombinedView>;

    /// Activate an installed pack.
    fn activate(&self, pack_id: &str) -> ManagerResult<ApplyOutcome>;

    /// Deactivate a pack without touching its files.
    fn deactivate(&self, pack_id: &str) -> ManagerResult<ApplyOutcome>;

    /// Apply a manage selection.
    fn apply_selection(
        &self,
        intent: &SelectionIntent,
    ) -> ManagerResult<Vec<(PackType, ApplyOutcome)>>;

    /// Delete packs by id.
    fn delete(&self, pack_ids: &[String], confirmation: Confirmation)
        -> ManagerResult<DeleteSummary>;

    /// Write the installed-content report.
    fn write_report(&self) -> ManagerResult<PathBuf>;
}

// ============================================================================
// User Interaction Trait
// ============================================================================

/// Trait for user interaction (prompts, confirmation).
pub trait UserInteraction: Send + Sync {
    /// Prompt for yes/no confirmation. Anything but an explicit yes is no.
    fn confirm(&self, message: &str) -> bool;

    /// Read a line of input from the user.
    #[allow(dead_code)]
    fn read_line(&self) -> Option<String>;
}

// ============================================================================
// Command Context - Bundles dependencies for handlers
// ============================================================================

/// Context providing dependencies to command handlers.
pub struct CommandContext<'a> {
    /// Output interface for user messages.
    pub output: &'a dyn Output,

    /// Pack operations for the selected server.
    pub packs: &'a dyn PackService,

    /// User interaction for prompts.
    pub interaction: &'a dyn UserInteraction,
}

impl<'a> CommandContext<'a> {
    /// Create a new command context.
    pub fn new(
        output: &'a dyn Output,
        packs: &'a dyn PackService,
        interaction: &'a dyn UserInteraction,
    ) -> Self {
        Self {
            output,
            packs,
            interaction,
        }
    }
}

// ============================================================================
// Command Handler Trait
// ============================================================================

/// Trait for command handlers.
///
/// Each pack subcommand has a handler that implements this trait.
pub trait CommandHandler {
    /// The arguments type for this handler.
    type Args;

    /// Execute the command with the given arguments and context.
    fn execute(args: Self::Args, ctx: &CommandContext<'_>) -> Result<(), CliError>;
}
