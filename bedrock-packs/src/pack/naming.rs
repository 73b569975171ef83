//! Centralized pack naming conventions.
//!
//! This module is the single source of truth for what folder names mean:
//! - Type hints from add-on folder names (e.g., `Better Mobs BP`, `mobs_rp`)
//! - Server-bundled system packs that are never managed (e.g., `vanilla_1.20.50`)
//! - The normalized form of a folder name used to derive synthesized ids
//! - Collision-free folder names in the managed pack directories

use std::path::{Path, PathBuf};

use super::PackType;

/// Folder names shipped with the dedicated server.
const SYSTEM_PACK_NAMES: &[&str] = &[
    "vanilla",
    "chemistry",
    "editor",
    "premium_cache",
    "development_behavior_packs",
    "development_resource_packs",
];

/// Prefixes of versioned folders shipped with the dedicated server.
const SYSTEM_PACK_PREFIXES: &[&str] = &["vanilla_", "chemistry", "experimental_"];

/// Infer a pack type from a folder name.
///
/// A name marks a behavior pack when one of its words is `bp` or contains
/// `behavior`/`behaviour`, and a resource pack when one of its words is `rp`
/// or contains `resource`. Names that mark both, or neither, give `None`.
///
/// # Examples
///
/// ```
/// use bedrock_packs::pack::{type_hint_from_name, PackType};
///
/// assert_eq!(type_hint_from_name("Better Mobs BP"), Some(PackType::Behavior));
/// assert_eq!(type_hint_from_name("mobs_rp"), Some(PackType::Resource));
/// assert_eq!(type_hint_from_name("Resource Pack"), Some(PackType::Resource));
/// assert_eq!(type_hint_from_name("warp-tools"), None);
/// ```
pub fn type_hint_from_name(name: &str) -> Option<PackType> {
    let (is_bp, is_rp) = name_markers(name);
    match (is_bp, is_rp) {
        (true, false) => Some(PackType::Behavior),
        (false, true) => Some(PackType::Resource),
        _ => None,
    }
}

/// Whether a folder name carries any behavior/resource marker at all.
///
/// Used during add-on discovery to tell pack folders from containers.
pub fn has_type_marker(name: &str) -> bool {
    let (is_bp, is_rp) = name_markers(name);
    is_bp || is_rp
}

fn name_markers(name: &str) -> (bool, bool) {
    let lower = name.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    let is_bp = words
        .iter()
        .any(|w| *w == "bp" || w.contains("behavior") || w.contains("behaviour"));
    let is_rp = words
        .iter()
        .any(|w| *w == "rp" || w.contains("resource"));

    (is_bp, is_rp)
}

/// Check whether a folder is one of the server-bundled system packs.
///
/// # Examples
///
/// ```
/// use bedrock_packs::pack::is_system_pack;
///
/// assert!(is_system_pack("vanilla"));
/// assert!(is_system_pack("vanilla_1.20.50"));
/// assert!(is_system_pack("Chemistry_1.20.60"));
/// assert!(!is_system_pack("my_vanilla_tweaks"));
/// ```
pub fn is_system_pack(folder_name: &str) -> bool {
    let lower = folder_name.trim().to_lowercase();
    SYSTEM_PACK_NAMES.contains(&lower.as_str())
        || SYSTEM_PACK_PREFIXES
            .iter()
            .any(|prefix| lower.starts_with(prefix))
}

/// Normalize a folder name for deterministic id derivation.
///
/// Lowercases, trims and collapses internal whitespace so that
/// `"My  Pack "` and `"my pack"` converge on the same identity.
pub fn normalize_folder_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Pick a folder under `parent` that does not exist yet.
///
/// Returns `parent/base` when free, otherwise `parent/base_2`, `parent/base_3`, ...
pub fn unique_folder(parent: &Path, base: &str) -> PathBuf {
    let candidate = parent.join(base);
    if !candidate.exists() {
        return candidate;
    }
    let mut n = 2u32;
    loop {
        let candidate = parent.join(format!("{}_{}", base, n));
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_type_hint_variants() {
        assert_eq!(type_hint_from_name("bp"), Some(PackType::Behavior));
        assert_eq!(type_hint_from_name("Addon_BP"), Some(PackType::Behavior));
        assert_eq!(type_hint_from_name("Addon-bp v2"), Some(PackType::Behavior));
        assert_eq!(
            type_hint_from_name("Behaviour Pack"),
            Some(PackType::Behavior)
        );
        assert_eq!(type_hint_from_name("RP"), Some(PackType::Resource));
        assert_eq!(type_hint_from_name("Addon RP 1.2"), Some(PackType::Resource));
    }

    #[test]
    fn test_type_hint_rejects_partial_words() {
        assert_eq!(type_hint_from_name("warp"), None);
        assert_eq!(type_hint_from_name("bpm_counter"), None);
        assert_eq!(type_hint_from_name("MyAddon"), None);
    }

    #[test]
    fn test_type_hint_conflicting_markers() {
        assert_eq!(type_hint_from_name("behavior and resource"), None);
        assert!(has_type_marker("behavior and resource"));
        assert!(!has_type_marker("addon"));
    }

    #[test]
    fn test_system_packs() {
        for name in [
            "vanilla",
            "vanilla_1.21.0",
            "chemistry",
            "chemistry_1.20.50",
            "experimental_camera",
            "premium_cache",
            "development_behavior_packs",
        ] {
            assert!(is_system_pack(name), "{} should be a system pack", name);
        }
        assert!(!is_system_pack("vanillatweaks"));
        assert!(!is_system_pack("Mobs BP"));
    }

    #[test]
    fn test_normalize_folder_name() {
        assert_eq!(normalize_folder_name("  My   Pack "), "my pack");
        assert_eq!(
            normalize_folder_name("My Pack"),
            normalize_folder_name("my pack")
        );
    }

    #[test]
    fn test_unique_folder() {
        let temp = TempDir::new().unwrap();
        assert_eq!(unique_folder(temp.path(), "Mobs"), temp.path().join("Mobs"));

        std::fs::create_dir(temp.path().join("Mobs")).unwrap();
        assert_eq!(
            unique_folder(temp.path(), "Mobs"),
            temp.path().join("Mobs_2")
        );

        std::fs::create_dir(temp.path().join("Mobs_2")).unwrap();
        assert_eq!(
            unique_folder(temp.path(), "Mobs"),
            temp.path().join("Mobs_3")
        );
    }
}
