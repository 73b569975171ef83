//! Content-based pack type inference.

use std::fs;
use std::path::Path;

use crate::pack::PackType;

/// Top-level folders only found in behavior packs.
const BEHAVIOR_DIRS: &[&str] = &[
    "entities",
    "functions",
    "scripts",
    "loot_tables",
    "recipes",
    "items",
    "spawn_rules",
    "trading",
    "feature_rules",
    "features",
    "structures",
];

/// Top-level folders only found in resource packs.
const RESOURCE_DIRS: &[&str] = &[
    "textures",
    "models",
    "sounds",
    "ui",
    "texts",
    "particles",
    "render_controllers",
    "attachables",
    "entity",
    "fogs",
];

/// Top-level files only found in resource packs.
const RESOURCE_FILES: &[&str] = &["sounds.json", "blocks.json", "biomes_client.json"];

/// Marker counts found at a pack root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentMarkers {
    pub behavior: usize,
    pub resource: usize,
}

impl ContentMarkers {
    /// Count markers directly below `dir`.
    pub fn scan(dir: &Path) -> Self {
        let mut markers = Self::default();
        let Ok(entries) = fs::read_dir(dir) else {
            return markers;
        };

        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().to_lowercase();
            let path = entry.path();

            if path.is_dir() {
                if BEHAVIOR_DIRS.contains(&name.as_str()) {
                    markers.behavior += 1;
                } else if RESOURCE_DIRS.contains(&name.as_str()) {
                    markers.resource += 1;
                }
            } else if RESOURCE_FILES.contains(&name.as_str()) || name.ends_with(".geo.json") {
                markers.resource += 1;
            } else if name.ends_with(".mcfunction") || name.ends_with(".js") {
                markers.behavior += 1;
            }
        }

        markers
    }

    /// The type with strictly more markers; ties decide nothing.
    pub fn verdict(&self) -> Option<PackType> {
        use std::cmp::Ordering;
        match self.behavior.cmp(&self.resource) {
            Ordering::Greater => Some(PackType::Behavior),
            Ordering::Less => Some(PackType::Resource),
            Ordering::Equal => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_behavior_markers() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("entities")).unwrap();
        fs::create_dir_all(temp.path().join("loot_tables")).unwrap();
        fs::create_dir_all(temp.path().join("textures")).unwrap();

        let markers = ContentMarkers::scan(temp.path());
        assert_eq!(markers, ContentMarkers { behavior: 2, resource: 1 });
        assert_eq!(markers.verdict(), Some(PackType::Behavior));
    }

    #[test]
    fn test_resource_markers() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("Textures")).unwrap();
        fs::write(temp.path().join("cow.geo.json"), "{}").unwrap();

        assert_eq!(
            ContentMarkers::scan(temp.path()).verdict(),
            Some(PackType::Resource)
        );
    }

    #[test]
    fn test_tie_and_empty_are_undecided() {
        let temp = TempDir::new().unwrap();
        assert_eq!(ContentMarkers::scan(temp.path()).verdict(), None);

        fs::create_dir_all(temp.path().join("scripts")).unwrap();
        fs::create_dir_all(temp.path().join("ui")).unwrap();
        assert_eq!(ContentMarkers::scan(temp.path()).verdict(), None);
    }
}
