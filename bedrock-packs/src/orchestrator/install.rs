//! Install results and promotion of staged packs.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ErrorKind, ManagerError, ManagerResult};
use crate::pack::{unique_folder, InstalledPack, PackType};

/// A pack that could not be installed.
#[derive(Debug)]
pub struct InstallFailure {
    /// Staged folder name of the pack.
    pub name: String,
    pub error: ManagerError,
}

impl InstallFailure {
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}

/// Everything one install operation did.
#[derive(Debug, Default)]
pub struct InstallBatch {
    /// Newly placed in a pack directory.
    pub installed: Vec<InstalledPack>,
    /// Skipped because the same id was already installed.
    pub already_installed: Vec<InstalledPack>,
    /// Ids newly added to the world's activation lists.
    pub activated: Vec<String>,
    /// Packs that failed; the rest of the batch still ran.
    pub failed: Vec<InstallFailure>,
}

impl InstallBatch {
    /// Installed and already-installed packs of one type.
    pub fn present(&self, pack_type: PackType) -> impl Iterator<Item = &InstalledPack> {
        self.installed
            .iter()
            .chain(self.already_installed.iter())
            .filter(move |p| p.pack_type == pack_type)
    }

    /// Whether every pack made it.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Whether nothing at all was found to install.
    pub fn is_empty(&self) -> bool {
        self.installed.is_empty() && self.already_installed.is_empty() && self.failed.is_empty()
    }
}

/// Copy `src` into `type_dir` under a collision-free name derived from `name`.
///
/// The tree is first copied to a hidden `.<name>.partial` sibling and then
/// renamed into place, so a failed copy never leaves a half-installed pack
/// where the server would load it.
pub(crate) fn promote(src: &Path, type_dir: &Path, name: &str) -> ManagerResult<PathBuf> {
    fs::create_dir_all(type_dir).map_err(|e| ManagerError::create_dir(type_dir, e))?;

    let base = sanitize_folder_name(name);
    let partial = type_dir.join(format!(".{}.partial", base));
    if partial.exists() {
        fs::remove_dir_all(&partial).map_err(|e| ManagerError::write(&partial, e))?;
    }

    if let Err(e) = copy_tree(src, &partial) {
        let _ = fs::remove_dir_all(&partial);
        return Err(e);
    }

    let target = unique_folder(type_dir, &base);
    fs::rename(&partial, &target).map_err(|e| ManagerError::write(&target, e))?;
    Ok(target)
}

/// Recursively copy a directory. Symlinks are skipped.
pub(crate) fn copy_tree(src: &Path, dst: &Path) -> ManagerResult<u64> {
    fs::create_dir_all(dst).map_err(|e| ManagerError::create_dir(dst, e))?;

    let mut copied = 0u64;
    let entries = fs::read_dir(src).map_err(|e| ManagerError::read(src, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| ManagerError::read(src, e))?;
        let file_type = entry.file_type().map_err(|e| ManagerError::read(entry.path(), e))?;
        let from = entry.path();
        let to = dst.join(entry.file_name());

        if file_type.is_dir() {
            copied += copy_tree(&from, &to)?;
        } else if file_type.is_file() {
            copied += fs::copy(&from, &to).map_err(|e| ManagerError::write(&to, e))?;
        }
    }
    Ok(copied)
}

/// A folder name safe to create inside a pack directory.
fn sanitize_folder_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = cleaned.trim().trim_start_matches('.').trim();
    if trimmed.is_empty() {
        "pack".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_promote_copies_and_avoids_collisions() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        fs::create_dir_all(src.join("textures")).unwrap();
        fs::write(src.join("textures/a.png"), b"png").unwrap();
        let type_dir = temp.path().join("resource_packs");
        fs::create_dir_all(type_dir.join("Tex")).unwrap();

        let target = promote(&src, &type_dir, "Tex").unwrap();

        assert_eq!(target, type_dir.join("Tex_2"));
        assert!(target.join("textures/a.png").is_file());
        assert!(src.join("textures/a.png").is_file());
        assert!(!type_dir.join(".Tex.partial").exists());
    }

    #[test]
    fn test_promote_failure_leaves_nothing() {
        let temp = TempDir::new().unwrap();
        let type_dir = temp.path().join("behavior_packs");

        let err = promote(&temp.path().join("missing"), &type_dir, "Mobs").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(fs::read_dir(&type_dir).unwrap().count(), 0);
    }

    #[test]
    fn test_sanitize_folder_name() {
        assert_eq!(sanitize_folder_name("Mobs: v2/BP"), "Mobs_ v2_BP");
        assert_eq!(sanitize_folder_name("..hidden"), "hidden");
        assert_eq!(sanitize_folder_name("  "), "pack");
    }
}
