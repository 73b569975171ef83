//! Installed pack discovery.

use std::fs;
use std::path::PathBuf;

use crate::archive::folder_name;
use crate::environment::ServerLayout;
use crate::error::{ManagerError, ManagerResult};
use crate::manifest;
use crate::pack::{is_system_pack, InstalledPack, PackType};

/// A pack directory whose identity could not be resolved.
#[derive(Debug)]
pub struct UnresolvedPack {
    pub dir: PathBuf,
    pub error: ManagerError,
}

/// Full result of an inventory scan.
#[derive(Debug, Default)]
pub struct InventoryScan {
    /// Installed user packs, behavior packs first.
    pub packs: Vec<InstalledPack>,
    /// Directories that could not be resolved.
    pub unresolved: Vec<UnresolvedPack>,
    /// Directories repeating an id already seen for the same type.
    pub duplicates: Vec<InstalledPack>,
    /// Server-bundled packs that were skipped.
    pub system_skipped: usize,
}

/// Scans `behavior_packs/` and `resource_packs/`.
///
/// Only writes when a manifest has to be repaired or synthesized.
#[derive(Debug, Clone)]
pub struct PackInventory {
    layout: ServerLayout,
}

impl PackInventory {
    /// Create an inventory for a server layout.
    pub fn new(layout: &ServerLayout) -> Self {
        Self {
            layout: layout.clone(),
        }
    }

    /// Installed user packs.
    ///
    /// Directories that fail to resolve are logged and left out.
    pub fn scan(&self) -> ManagerResult<Vec<InstalledPack>> {
        let scan = self.scan_detailed()?;
        for unresolved in &scan.unresolved {
            tracing::warn!(
                dir = %unresolved.dir.display(),
                error = %unresolved.error,
                "Skipping unresolved pack"
            );
        }
        Ok(scan.packs)
    }

    /// Scan and keep every per-directory outcome.
    pub fn scan_detailed(&self) -> ManagerResult<InventoryScan> {
        let mut scan = InventoryScan::default();
        for pack_type in PackType::ALL {
            self.scan_type(pack_type, &mut scan)?;
        }
        tracing::debug!(
            packs = scan.packs.len(),
            unresolved = scan.unresolved.len(),
            system = scan.system_skipped,
            "Inventory scanned"
        );
        Ok(scan)
    }

    /// Look a pack up by id, in either pack directory.
    pub fn find(&self, pack_id: &str) -> ManagerResult<InstalledPack> {
        self.scan()?
            .into_iter()
            .find(|p| p.matches_id(pack_id))
            .ok_or_else(|| ManagerError::PackNotFound {
                pack_id: pack_id.to_string(),
            })
    }

    fn scan_type(&self, pack_type: PackType, scan: &mut InventoryScan) -> ManagerResult<()> {
        let root = self.layout.packs_dir(pack_type);
        let entries = match fs::read_dir(&root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(ManagerError::read(&root, e)),
        };

        let mut dirs: Vec<PathBuf> = entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect();
        dirs.sort();

        for dir in dirs {
            let name = folder_name(&dir);
            // Dot-folders are staging leftovers.
            if name.starts_with('.') {
                continue;
            }
            if is_system_pack(&name) {
                scan.system_skipped += 1;
                continue;
            }

            match manifest::resolve(&dir, Some(pack_type)) {
                Ok(identity) => {
                    let pack = InstalledPack::new(identity, dir);
                    let duplicate = scan
                        .packs
                        .iter()
                        .any(|p| p.pack_type == pack.pack_type && p.matches_id(&pack.id));
                    if duplicate {
                        tracing::warn!(
                            pack_id = %pack.id,
                            dir = %pack.directory().display(),
                            "Pack id already installed in another folder"
                        );
                        scan.duplicates.push(pack);
                    } else {
                        scan.packs.push(pack);
                    }
                }
                Err(error) => scan.unresolved.push(UnresolvedPack { dir, error }),
            }
        }

        Ok(())
    }
}
