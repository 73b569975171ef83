//! World activation lists.
//!
//! A world references the packs it loads through two JSON files,
//! `world_behavior_packs.json` and `world_resource_packs.json`. The server
//! may read them at any moment, so they are only ever replaced atomically,
//! and never rewritten when they cannot be parsed.

mod entry;
mod world;

pub use entry::{ActivationEntry, ActivationList, ActivationRef, ApplyOutcome, BatchApply};
pub use world::{sibling, WorldRegistry, INVALID_BACKUP_SUFFIX, PREWRITE_BACKUP_SUFFIX};
