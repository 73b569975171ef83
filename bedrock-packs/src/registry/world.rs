//! Reading and rewriting one world's activation files.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::entry::{ActivationEntry, ActivationList, ApplyOutcome, BatchApply};
use crate::environment::WorldTarget;
use crate::error::{ManagerError, ManagerResult};
use crate::json::{to_pretty_vec, write_atomic};
use crate::pack::{InstalledPack, PackType, PackVersion};

/// Suffix of the snapshot taken before every write.
pub const PREWRITE_BACKUP_SUFFIX: &str = ".prewrite.bak";

/// Suffix of the copy of an activation file that failed to parse.
pub const INVALID_BACKUP_SUFFIX: &str = ".invalid.bak";

/// A world's activation lists.
///
/// Every mutation follows the same protocol:
///
/// 1. Read the current file in full.
/// 2. Copy those bytes to `<file>.prewrite.bak`.
/// 3. Merge the change in memory.
/// 4. Write the result to a temporary sibling and flush it.
/// 5. Rename the sibling over the original.
///
/// When step 1 yields bytes that do not parse, they are copied to
/// `<file>.invalid.bak` instead and the operation fails with
/// `ActivationFileCorrupt`; the original file is left untouched.
#[derive(Debug, Clone)]
pub struct WorldRegistry {
    world_name: String,
    world_dir: PathBuf,
}

/// An activation file as loaded for a mutation.
struct Loaded {
    path: PathBuf,
    original: Option<Vec<u8>>,
    list: ActivationList,
}

impl WorldRegistry {
    /// Create a registry for the given world.
    pub fn new(world: &WorldTarget) -> Self {
        Self {
            world_name: world.name().to_string(),
            world_dir: world.dir().to_path_buf(),
        }
    }

    /// World folder name.
    pub fn world_name(&self) -> &str {
        &self.world_name
    }

    /// Path of the activation file for `pack_type`.
    pub fn activation_file(&self, pack_type: PackType) -> PathBuf {
        self.world_dir.join(pack_type.activation_file_name())
    }

    /// All entries of the activation file, in file order.
    ///
    /// A missing file is an empty list.
    pub fn read_entries(&self, pack_type: PackType) -> ManagerResult<Vec<ActivationEntry>> {
        let loaded = self.load(pack_type, false)?;
        Ok(loaded.list.entries().to_vec())
    }

    /// Ids of the packs active for `pack_type`.
    ///
    /// A missing file is an empty set.
    pub fn read_active(&self, pack_type: PackType) -> ManagerResult<BTreeSet<String>> {
        let loaded = self.load(pack_type, false)?;
        Ok(loaded.list.pack_ids())
    }

    /// Activate one pack.
    pub fn activate(
        &self,
        pack_type: PackType,
        pack_id: &str,
        version: PackVersion,
    ) -> ManagerResult<ApplyOutcome> {
        self.batch_apply(pack_type, &BatchApply::new().activate(pack_id, version))
    }

    /// Deactivate one pack. Its files are not touched.
    pub fn deactivate(&self, pack_type: PackType, pack_id: &str) -> ManagerResult<ApplyOutcome> {
        self.batch_apply(pack_type, &BatchApply::new().deactivate(pack_id))
    }

    /// Apply a batch as a single write.
    ///
    /// An empty batch rewrites the file with its original bytes.
    pub fn batch_apply(
        &self,
        pack_type: PackType,
        batch: &BatchApply,
    ) -> ManagerResult<ApplyOutcome> {
        let Loaded {
            path,
            original,
            mut list,
        } = self.load(pack_type, true)?;

        let outcome = list.apply(batch);

        let Some(original) = original else {
            if !outcome.changed() {
                return Ok(outcome);
            }
            let bytes = serialize(&path, &list)?;
            write_atomic(&path, &bytes)?;
            tracing::info!(
                file = %path.display(),
                added = outcome.added.len(),
                "Created activation file"
            );
            return Ok(outcome);
        };

        let backup = sibling(&path, PREWRITE_BACKUP_SUFFIX);
        fs::write(&backup, &original).map_err(|e| ManagerError::write(&backup, e))?;

        let bytes = if outcome.changed() {
            serialize(&path, &list)?
        } else {
            original
        };
        write_atomic(&path, &bytes)?;

        tracing::info!(
            file = %path.display(),
            added = outcome.added.len(),
            removed = outcome.removed.len(),
            "Updated activation file"
        );
        Ok(outcome)
    }

    /// Deactivate a pack if active, then delete its directory.
    ///
    /// Irreversible. Callers must have obtained explicit confirmation.
    pub fn delete_pack(&self, pack: &InstalledPack) -> ManagerResult<ApplyOutcome> {
        let loaded = self.load(pack.pack_type, true)?;

        let outcome = if loaded.list.contains(&pack.id) {
            self.deactivate(pack.pack_type, &pack.id)?
        } else {
            ApplyOutcome::default()
        };

        let dir = pack.directory();
        fs::remove_dir_all(dir).map_err(|e| ManagerError::write(dir, e))?;
        tracing::info!(pack_id = %pack.id, dir = %dir.display(), "Deleted pack");
        Ok(outcome)
    }

    fn load(&self, pack_type: PackType, snapshot_invalid: bool) -> ManagerResult<Loaded> {
        let path = self.activation_file(pack_type);

        let original = match fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(ManagerError::read(&path, e)),
        };

        let list = match &original {
            None => ActivationList::default(),
            Some(bytes) => match ActivationList::parse(bytes) {
                Ok(list) => list,
                Err(reason) => {
                    let backup = if snapshot_invalid {
                        let backup = sibling(&path, INVALID_BACKUP_SUFFIX);
                        fs::write(&backup, bytes).map_err(|e| ManagerError::write(&backup, e))?;
                        Some(backup)
                    } else {
                        None
                    };
                    tracing::error!(file = %path.display(), reason = %reason, "Activation file is corrupt");
                    return Err(ManagerError::ActivationFileCorrupt {
                        path,
                        backup,
                        reason,
                    });
                }
            },
        };

        Ok(Loaded {
            path,
            original,
            list,
        })
    }
}

fn serialize(path: &Path, list: &ActivationList) -> ManagerResult<Vec<u8>> {
    to_pretty_vec(&list.to_value())
        .map_err(|e| ManagerError::write(path, io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// `<file><suffix>` next to `path`.
pub fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}
