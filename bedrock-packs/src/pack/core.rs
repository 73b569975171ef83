//! Core pack identity type.
//!
//! The [`PackIdentity`] struct is the identity a pack carries everywhere:
//! in manifests, in the inventory and in world activation entries.

use std::fmt;

use super::types::{PackType, PackVersion};

/// Core pack identity.
///
/// Produced by the manifest resolver, either parsed from `manifest.json`
/// or synthesized deterministically from the pack's folder name.
///
/// # Example
///
/// ```
/// use bedrock_packs::pack::{PackIdentity, PackType, PackVersion};
///
/// let pack = PackIdentity::new(
///     "6f1c3a4e-4a9b-4f43-9b2a-3f0e5f1f2a10",
///     PackType::Behavior,
///     "Better Mobs BP",
///     PackVersion::new(1, 2, 0),
/// );
///
/// assert!(pack.is_behavior());
/// assert!(pack.matches_id("6F1C3A4E-4A9B-4F43-9B2A-3F0E5F1F2A10"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackIdentity {
    /// Unique identifier (`header.uuid`), kept exactly as written.
    pub id: String,

    /// Behavior or resource.
    pub pack_type: PackType,

    /// Display name (`header.name`, falling back to the folder name).
    pub name: String,

    /// Version from `header.version`.
    pub version: PackVersion,
}

impl PackIdentity {
    /// Create a new pack identity.
    pub fn new(
        id: impl Into<String>,
        pack_type: PackType,
        name: impl Into<String>,
        version: PackVersion,
    ) -> Self {
        Self {
            id: id.into(),
            pack_type,
            name: name.into(),
            version,
        }
    }

    /// Check if this is a behavior pack.
    pub fn is_behavior(&self) -> bool {
        self.pack_type == PackType::Behavior
    }

    /// Check if this is a resource pack.
    pub fn is_resource(&self) -> bool {
        self.pack_type == PackType::Resource
    }

    /// Compare against a pack id from another source.
    pub fn matches_id(&self, other: &str) -> bool {
        pack_ids_match(&self.id, other)
    }
}

impl fmt::Display for PackIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} v{} ({})",
            self.name, self.pack_type, self.version, self.id
        )
    }
}

/// Pack ids are UUIDs; the game treats them case-insensitively.
pub fn pack_ids_match(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}
