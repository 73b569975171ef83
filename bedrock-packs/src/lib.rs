//! Bedrock Packs - add-on management for Bedrock Dedicated Server
//!
//! This library installs behavior and resource packs into a server, keeps
//! the per-world activation lists consistent, and reports what is installed
//! and active.
//!
//! # Overview
//!
//! | Module | Role |
//! |--------|------|
//! | [`environment`] | Find the server root and pick the target world |
//! | [`archive`] | Unpack `.zip`/`.mcpack`/`.mcaddon` into scratch |
//! | [`manifest`] | Resolve, repair or synthesize pack identities |
//! | [`inventory`] | Scan installed packs; the installed × active view |
//! | [`registry`] | Merge-safe, atomic edits of activation files |
//! | [`orchestrator`] | Install, manage, delete and auto-scan |
//!
//! # Example
//!
//! ```no_run
//! use bedrock_packs::environment::{EnvironmentLocator, ServerContext, ServerLayout};
//! use bedrock_packs::orchestrator::PackManager;
//!
//! let located = EnvironmentLocator::from_current_dir()?.locate_server_root()?;
//! let ctx = ServerContext::resolve(ServerLayout::new(located.root), None)?;
//! let manager = PackManager::new(ctx);
//!
//! let summary = manager.auto_scan()?;
//! println!("{} processed, {} failed", summary.processed.len(), summary.failed.len());
//! # Ok::<(), bedrock_packs::ManagerError>(())
//! ```

pub mod archive;
pub mod config;
pub mod environment;
pub mod error;
pub mod inventory;
pub mod logging;
pub mod manifest;
pub mod orchestrator;
pub mod pack;
pub mod registry;

mod json;

pub use error::{ErrorKind, ManagerError, ManagerResult};
pub use pack::{InstalledPack, PackIdentity, PackType, PackVersion};
