//! Pack root discovery inside staged trees and add-on folders.
//!
//! Add-ons arrive in many shapes: a bare pack, a folder holding `X BP` and
//! `X RP`, containers of containers, or archives of archives. Discovery
//! turns any of those into a flat list of pack roots.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::manifest::ContentMarkers;
use crate::pack::{has_type_marker, type_hint_from_name, PackType};

/// Deepest directory level searched below the root.
pub const MAX_DISCOVERY_DEPTH: usize = 5;

const MANIFEST_FILE: &str = "manifest.json";

/// A pack root found in a staged tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedPack {
    /// Directory holding the pack content.
    pub dir: PathBuf,
    /// Folder name the pack is installed under.
    pub name: String,
    /// Type suggested by the pack's location, if any.
    pub hint: Option<PackType>,
}

impl StagedPack {
    fn at(dir: &Path) -> Self {
        let name = folder_name(dir);
        Self {
            hint: type_hint_from_name(&name),
            dir: dir.to_path_buf(),
            name,
        }
    }
}

/// Find pack roots under `root`.
///
/// `root_name` names the fallback pack when `root` itself is the only pack
/// (staging directories have meaningless names). `units` are directories
/// produced by expanding nested archives; each is a pack on its own when
/// nothing more specific is found inside it.
pub fn discover_packs(root: &Path, root_name: &str, units: &[PathBuf]) -> Vec<StagedPack> {
    if root.join(MANIFEST_FILE).is_file() {
        return vec![named(root, root_name)];
    }

    let units: HashSet<&Path> = units.iter().map(PathBuf::as_path).collect();
    let mut found = Vec::new();
    scan(root, 0, &units, &mut found);

    if !found.is_empty() {
        return found;
    }

    // A lone wrapper folder is the pack, unless it is pack content itself.
    match single_wrapper(root).filter(|_| !has_content_markers(root)) {
        Some(inner) => vec![StagedPack::at(&inner)],
        None => vec![named(root, root_name)],
    }
}

fn scan(dir: &Path, depth: usize, units: &HashSet<&Path>, found: &mut Vec<StagedPack>) {
    if depth > MAX_DISCOVERY_DEPTH {
        return;
    }

    for child in sorted_subdirs(dir) {
        let name = folder_name(&child);

        if child.join(MANIFEST_FILE).is_file() {
            found.push(StagedPack::at(&child));
            continue;
        }

        if has_type_marker(&name) && !has_marked_subdir(&child) {
            found.push(StagedPack::at(&child));
            continue;
        }

        let before = found.len();
        scan(&child, depth + 1, units, found);

        if found.len() == before && units.contains(child.as_path()) {
            found.push(StagedPack::at(&child));
        }
    }
}

fn has_marked_subdir(dir: &Path) -> bool {
    sorted_subdirs(dir)
        .iter()
        .any(|sub| has_type_marker(&folder_name(sub)))
}

fn has_content_markers(dir: &Path) -> bool {
    let markers = ContentMarkers::scan(dir);
    markers.behavior + markers.resource > 0
}

fn single_wrapper(root: &Path) -> Option<PathBuf> {
    let entries: Vec<PathBuf> = fs::read_dir(root)
        .ok()?
        .flatten()
        .map(|e| e.path())
        .collect();
    match entries.as_slice() {
        [only] if only.is_dir() => Some(only.clone()),
        _ => None,
    }
}

fn named(dir: &Path, name: &str) -> StagedPack {
    StagedPack {
        dir: dir.to_path_buf(),
        name: name.to_string(),
        hint: type_hint_from_name(name),
    }
}

pub(crate) fn sorted_subdirs(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut dirs: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();
    dirs
}

pub(crate) fn folder_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"{}").unwrap();
    }

    #[test]
    fn test_root_with_manifest_is_single_pack() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("manifest.json"));
        touch(&temp.path().join("sub BP/manifest.json"));

        let packs = discover_packs(temp.path(), "Mobs", &[]);
        assert_eq!(packs.len(), 1);
        assert_eq!(packs[0].name, "Mobs");
        assert_eq!(packs[0].dir, temp.path());
    }

    #[test]
    fn test_marked_folders() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("Addon/Addon BP/entities/cow.json"));
        touch(&temp.path().join("Addon/Addon RP/textures/cow.png"));

        let packs = discover_packs(temp.path(), "addon", &[]);
        let names: Vec<_> = packs.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Addon BP", "Addon RP"]);
        assert_eq!(packs[0].hint, Some(PackType::Behavior));
        assert_eq!(packs[1].hint, Some(PackType::Resource));
    }

    #[test]
    fn test_marked_container_is_descended() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("Craft - BP v2/Craft BP/entities/a.json"));
        touch(&temp.path().join("Craft - BP v2/Craft RP/textures/a.png"));

        let packs = discover_packs(temp.path(), "craft", &[]);
        let names: Vec<_> = packs.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Craft BP", "Craft RP"]);
    }

    #[test]
    fn test_manifest_dir_wins_over_name() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("packs/mobs/manifest.json"));

        let packs = discover_packs(temp.path(), "x", &[]);
        assert_eq!(packs.len(), 1);
        assert_eq!(packs[0].name, "mobs");
        assert_eq!(packs[0].hint, None);
    }

    #[test]
    fn test_nested_archive_unit_is_pack() {
        let temp = TempDir::new().unwrap();
        let unit = temp.path().join("mobs");
        touch(&unit.join("entities/cow.json"));

        let packs = discover_packs(temp.path(), "bundle", &[unit.clone()]);
        assert_eq!(packs, vec![StagedPack::at(&unit)]);
    }

    #[test]
    fn test_single_wrapper_fallback() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("Cool Textures/textures/a.png"));

        let packs = discover_packs(temp.path(), "cool", &[]);
        assert_eq!(packs.len(), 1);
        assert_eq!(packs[0].name, "Cool Textures");
    }

    #[test]
    fn test_lone_content_folder_is_not_a_wrapper() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("textures/a.png"));

        let packs = discover_packs(temp.path(), "Tex", &[]);
        assert_eq!(packs.len(), 1);
        assert_eq!(packs[0].dir, temp.path());
        assert_eq!(packs[0].name, "Tex");
    }

    #[test]
    fn test_root_fallback_uses_given_name() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("textures/a.png"));
        touch(&temp.path().join("pack_icon.png"));

        let packs = discover_packs(temp.path(), "Faithful RP", &[]);
        assert_eq!(packs.len(), 1);
        assert_eq!(packs[0].dir, temp.path());
        assert_eq!(packs[0].hint, Some(PackType::Resource));
    }

    #[test]
    fn test_depth_limit() {
        let temp = TempDir::new().unwrap();
        let mut deep = temp.path().to_path_buf();
        for i in 0..=MAX_DISCOVERY_DEPTH + 1 {
            deep = deep.join(format!("d{}", i));
        }
        touch(&deep.join("Deep BP/manifest.json"));
        touch(&temp.path().join("top.txt"));

        let packs = discover_packs(temp.path(), "root", &[]);
        assert_eq!(packs.len(), 1);
        assert_eq!(packs[0].dir, temp.path());
    }
}
