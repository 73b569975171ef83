//! Core value types for the pack system.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Pack type.
///
/// Determines which server directory holds the pack and which world
/// activation file references it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PackType {
    /// Behavior pack (entities, scripts, loot tables, recipes).
    Behavior,
    /// Resource pack (textures, models, sounds, UI).
    Resource,
}

impl PackType {
    /// Both pack types, behavior first.
    pub const ALL: [PackType; 2] = [PackType::Behavior, PackType::Resource];

    /// Name of the server directory holding packs of this type.
    pub fn packs_dir_name(&self) -> &'static str {
        match self {
            PackType::Behavior => "behavior_packs",
            PackType::Resource => "resource_packs",
        }
    }

    /// Name of the world activation file for this type.
    pub fn activation_file_name(&self) -> &'static str {
        match self {
            PackType::Behavior => "world_behavior_packs.json",
            PackType::Resource => "world_resource_packs.json",
        }
    }

    /// The `modules[].type` value written into synthesized manifests.
    pub fn module_type(&self) -> &'static str {
        match self {
            PackType::Behavior => "data",
            PackType::Resource => "resources",
        }
    }

    /// Map a manifest `modules[].type` value to a pack type.
    ///
    /// `script` and `javascript` modules only ever appear in behavior packs,
    /// `client_data` only in resource packs. `world_template` and
    /// `skin_pack` modules are not server packs.
    pub fn from_module_type(module_type: &str) -> Option<Self> {
        match module_type.to_ascii_lowercase().as_str() {
            "data" | "script" | "javascript" => Some(PackType::Behavior),
            "resources" | "client_data" => Some(PackType::Resource),
            _ => None,
        }
    }

    /// Short label used in listings.
    pub fn short_label(&self) -> &'static str {
        match self {
            PackType::Behavior => "BP",
            PackType::Resource => "RP",
        }
    }
}

impl fmt::Display for PackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackType::Behavior => write!(f, "behavior"),
            PackType::Resource => write!(f, "resource"),
        }
    }
}

impl FromStr for PackType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "behavior" | "behaviour" | "bp" => Ok(PackType::Behavior),
            "resource" | "rp" => Ok(PackType::Resource),
            other => Err(format!("unknown pack type '{}'", other)),
        }
    }
}

/// Pack version as the `[major, minor, patch]` triple used by manifests
/// and activation files.
///
/// Informational only: no ordering constraints are enforced between packs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[u32; 3]", into = "[u32; 3]")]
pub struct PackVersion(pub [u32; 3]);

impl PackVersion {
    /// Create a version from its components.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self([major, minor, patch])
    }

    /// Parse a JSON value holding a three-element numeric array.
    ///
    /// Returns `None` for anything else (strings, short arrays, floats).
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        let items = value.as_array()?;
        if items.len() != 3 {
            return None;
        }
        let mut parts = [0u32; 3];
        for (slot, item) in parts.iter_mut().zip(items) {
            *slot = u32::try_from(item.as_u64()?).ok()?;
        }
        Some(Self(parts))
    }

    /// Render as a JSON array.
    pub fn to_json(self) -> serde_json::Value {
        serde_json::Value::from(self.0.to_vec())
    }
}

impl Default for PackVersion {
    fn default() -> Self {
        Self::new(1, 0, 0)
    }
}

impl From<[u32; 3]> for PackVersion {
    fn from(parts: [u32; 3]) -> Self {
        Self(parts)
    }
}

impl From<PackVersion> for [u32; 3] {
    fn from(version: PackVersion) -> Self {
        version.0
    }
}

impl fmt::Display for PackVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.0[0], self.0[1], self.0[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pack_type_paths() {
        assert_eq!(PackType::Behavior.packs_dir_name(), "behavior_packs");
        assert_eq!(PackType::Resource.packs_dir_name(), "resource_packs");
        assert_eq!(
            PackType::Behavior.activation_file_name(),
            "world_behavior_packs.json"
        );
        assert_eq!(
            PackType::Resource.activation_file_name(),
            "world_resource_packs.json"
        );
    }

    #[test]
    fn test_pack_type_from_module_type() {
        assert_eq!(PackType::from_module_type("data"), Some(PackType::Behavior));
        assert_eq!(PackType::from_module_type("script"), Some(PackType::Behavior));
        assert_eq!(
            PackType::from_module_type("Resources"),
            Some(PackType::Resource)
        );
        assert_eq!(PackType::from_module_type("skin_pack"), None);
    }

    #[test]
    fn test_pack_type_parse() {
        assert_eq!("behavior".parse::<PackType>(), Ok(PackType::Behavior));
        assert_eq!("RP".parse::<PackType>(), Ok(PackType::Resource));
        assert!("world".parse::<PackType>().is_err());
    }

    #[test]
    fn test_pack_version_from_json() {
        assert_eq!(
            PackVersion::from_json(&json!([1, 2, 3])),
            Some(PackVersion::new(1, 2, 3))
        );
        assert_eq!(PackVersion::from_json(&json!([1, 2])), None);
        assert_eq!(PackVersion::from_json(&json!("1.2.3")), None);
        assert_eq!(PackVersion::from_json(&json!([1, -2, 3])), None);
    }

    #[test]
    fn test_pack_version_serde_as_array() {
        let v = PackVersion::new(2, 0, 1);
        assert_eq!(serde_json::to_string(&v).unwrap(), "[2,0,1]");
        let back: PackVersion = serde_json::from_str("[2,0,1]").unwrap();
        assert_eq!(back, v);
    }

    #[test]
    fn test_pack_version_display() {
        assert_eq!(PackVersion::new(1, 21, 0).to_string(), "1.21.0");
        assert_eq!(PackVersion::default().to_string(), "1.0.0");
    }
}
