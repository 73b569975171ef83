//! CLI command implementations.
//!
//! # Command Modules
//!
//! - [`config`] - Configuration file (path, init, show)
//! - [`packs`] - Pack operations (scan, install, list, activate, deactivate,
//!   delete, report) and the interactive menu

pub mod config;
pub mod packs;
