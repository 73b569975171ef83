//! Installed pack type with filesystem context.
//!
//! The [`InstalledPack`] struct extends [`PackIdentity`] with the directory
//! that owns the pack on disk, using composition.

use std::ops::Deref;
use std::path::{Path, PathBuf};

use super::core::PackIdentity;

/// A pack physically present in one of the server's pack directories.
///
/// `Deref` gives transparent access to the [`PackIdentity`] fields.
///
/// # Example
///
/// ```
/// use bedrock_packs::pack::{InstalledPack, PackIdentity, PackType, PackVersion};
///
/// let identity = PackIdentity::new("id-1", PackType::Behavior, "Mobs", PackVersion::default());
/// let installed = InstalledPack::new(identity, "/srv/bds/behavior_packs/Mobs");
///
/// assert_eq!(installed.name, "Mobs");
/// assert_eq!(installed.folder_name(), "Mobs");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPack {
    /// Core pack identity (composition).
    pub identity: PackIdentity,

    /// Directory owning the pack.
    pub directory: PathBuf,
}

impl InstalledPack {
    /// Create a new installed pack.
    pub fn new(identity: PackIdentity, directory: impl Into<PathBuf>) -> Self {
        Self {
            identity,
            directory: directory.into(),
        }
    }

    /// Directory owning the pack.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Folder name of the pack directory.
    pub fn folder_name(&self) -> String {
        self.directory
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

impl Deref for InstalledPack {
    type Target = PackIdentity;

    fn deref(&self) -> &Self::Target {
        &self.identity
    }
}

impl From<InstalledPack> for PackIdentity {
    fn from(installed: InstalledPack) -> Self {
        installed.identity
    }
}

impl AsRef<PackIdentity> for InstalledPack {
    fn as_ref(&self) -> &PackIdentity {
        &self.identity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pack::{PackType, PackVersion};

    fn test_identity() -> PackIdentity {
        PackIdentity::new(
            "id-1",
            PackType::Behavior,
            "Mobs",
            PackVersion::new(1, 0, 0),
        )
    }

    #[test]
    fn test_installed_pack_deref() {
        let installed = InstalledPack::new(test_identity(), "/srv/behavior_packs/Mobs_BP");

        assert_eq!(installed.id, "id-1");
        assert!(installed.is_behavior());
        assert_eq!(installed.folder_name(), "Mobs_BP");
    }

    #[test]
    fn test_installed_pack_into_identity() {
        let installed = InstalledPack::new(test_identity(), "/srv/behavior_packs/Mobs_BP");
        let identity: PackIdentity = installed.into();
        assert_eq!(identity.name, "Mobs");
    }

    #[test]
    fn test_installed_pack_folder_name_of_root() {
        let installed = InstalledPack::new(test_identity(), "/");
        assert_eq!(installed.folder_name(), "");
        assert_eq!(installed.directory(), Path::new("/"));
    }
}
