//! Concrete implementations of the service traits.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use bedrock_packs::environment::ServerContext;
use bedrock_packs::inventory::CombinedView;
use bedrock_packs::orchestrator::{
    AutoScanSummary, Confirmation, DeleteSummary, InstallBatch, InstallProgressCallback,
    InstallStage, PackManager, SelectionIntent,
};
use bedrock_packs::registry::ApplyOutcome;
use bedrock_packs::{ManagerResult, PackType};

use super::traits::{Output, PackService, UserInteraction};

// ============================================================================
// Console Output Implementation
// ============================================================================

/// Standard console output implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleOutput {
    show_progress: bool,
}

impl ConsoleOutput {
    /// Create a new console output.
    ///
    /// `show_progress` enables the install spinner; it should be off when
    /// stdout is not a terminal.
    pub fn new(show_progress: bool) -> Self {
        Self { show_progress }
    }
}

impl Output for ConsoleOutput {
    fn println(&self, message: &str) {
        println!("{}", message);
    }

    fn print(&self, message: &str) {
        print!("{}", message);
        io::stdout().flush().ok();
    }

    fn progress(&self) -> Option<InstallProgressCallback> {
        if !self.show_progress {
            return None;
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {prefix:>10.bold} {wide_msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.enable_steady_tick(Duration::from_millis(100));

        Some(Box::new(move |stage: InstallStage, message: &str| {
            spinner.set_prefix(stage.name());
            spinner.set_message(message.to_string());
            if stage == InstallStage::Reporting {
                spinner.finish_and_clear();
            }
        }))
    }
}

// ============================================================================
// Console User Interaction Implementation
// ============================================================================

/// Standard console user interaction implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleInteraction;

impl ConsoleInteraction {
    /// Create a new console interaction.
    pub fn new() -> Self {
        Self
    }
}

impl UserInteraction for ConsoleInteraction {
    fn confirm(&self, message: &str) -> bool {
        print!("{} [y/N]: ", message);
        io::stdout().flush().ok();

        Confirmation::parse(self.read_line().as_deref()).is_confirmed()
    }

    fn read_line(&self) -> Option<String> {
        let mut input = String::new();
        match io::stdin().lock().read_line(&mut input) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(input.trim().to_string()),
        }
    }
}

// ============================================================================
// Default Pack Service Implementation
// ============================================================================

/// Pack service backed by a [`PackManager`] for one server and world.
#[derive(Debug, Clone)]
pub struct DefaultPackService {
    ctx: ServerContext,
    auto_activate: bool,
}

impl DefaultPackService {
    /// Create a service for a resolved server context.
    pub fn new(ctx: ServerContext, auto_activate: bool) -> Self {
        Self { ctx, auto_activate }
    }

    fn manager(&self) -> PackManager {
        PackManager::new(self.ctx.clone()).with_auto_activate(self.auto_activate)
    }
}

impl PackService for DefaultPackService {
    fn server_root(&self) -> &Path {
        self.ctx.layout().root()
    }

    fn world_name(&self) -> &str {
        self.ctx.world().name()
    }

    fn install(
        &self,
        path: &Path,
        on_progress: Option<InstallProgressCallback>,
    ) -> ManagerResult<InstallBatch> {
        let mut manager = self.manager();
        if let Some(callback) = on_progress {
            manager = manager.with_progress(callback);
        }
        manager.install_path(path)
    }

    fn auto_scan(&self) -> ManagerResult<AutoScanSummary> {
        self.manager().auto_scan()
    }

    fn combined_view(&self) -> ManagerResult<CombinedView> {
        self.manager().combined_view()
    }

    fn activate(&self, pack_id: &str) -> ManagerResult<ApplyOutcome> {
        self.manager().activate(pack_id)
    }

    fn deactivate(&self, pack_id: &str) -> ManagerResult<ApplyOutcome> {
        self.manager().deactivate(pack_id)
    }

    fn apply_selection(
        &self,
        intent: &SelectionIntent,
    ) -> ManagerResult<Vec<(PackType, ApplyOutcome)>> {
        self.manager().apply_selection(intent)
    }

    fn delete(
        &self,
        pack_ids: &[String],
        confirmation: Confirmation,
    ) -> ManagerResult<DeleteSummary> {
        self.manager().delete_by_ids(pack_ids, confirmation)
    }

    fn write_report(&self) -> ManagerResult<PathBuf> {
        self.manager().write_report()
    }
}
