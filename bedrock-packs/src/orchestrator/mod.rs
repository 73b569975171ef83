//! Composed operations over one server and world.
//!
//! [`PackManager`] ties the locator's [`ServerContext`](crate::environment::ServerContext)
//! to the inventory, the world registry and the extractor:
//!
//! - **Install** a folder or archive: stage, resolve, promote, activate, report.
//! - **Manage** the combined view through a [`ManageSession`], which yields a
//!   [`SelectionIntent`] applied as one write per pack type.
//! - **Deactivate**, or **delete** after an explicit [`Confirmation`].
//! - **Auto-scan** the `addons_auto_install/` queue.

mod autoscan;
mod confirm;
mod install;
mod manager;
mod report;
mod session;

pub use autoscan::{AutoScanSummary, ProcessedItem, QueueFailure, FAILED_LOG_SUFFIX};
pub use confirm::Confirmation;
pub use install::{InstallBatch, InstallFailure};
pub use manager::{
    DeleteFailure, DeleteSummary, InstallProgressCallback, InstallStage, PackManager,
};
pub use report::{render_report, write_report};
pub use session::{ManageSession, ManageState, SelectionIntent, TransitionError};
