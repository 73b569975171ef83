//! Server environment discovery.
//!
//! The [`EnvironmentLocator`] finds the server root once per invocation; the
//! resulting [`ServerContext`] (root layout plus target world) is then passed
//! explicitly to every component that needs a path.

mod layout;
mod locator;

pub use layout::{
    ServerContext, ServerLayout, WorldTarget, AUTO_INSTALL_DIR, DEFAULT_SCRATCH_DIR,
    PROCESSED_DIR, REPORT_FILE,
};
pub use locator::{
    EnvironmentLocator, LocateRule, LocatedServer, ServerMarkers, SERVER_EXECUTABLES,
};
