//! Typed `manifest.json` records.
//!
//! Only the fields the pack manager reads are modelled; everything else
//! (dependencies, metadata, capabilities, ...) is carried in `extra` maps so
//! a rewritten manifest loses nothing. Modelled leaf fields stay JSON values:
//! a field of an unexpected type is ignored when reading, never a reason to
//! reject the whole manifest.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::pack::{PackType, PackVersion};

/// `format_version` written into synthesized manifests.
pub const DEFAULT_FORMAT_VERSION: u32 = 2;

/// `header.min_engine_version` written into synthesized manifests.
pub const DEFAULT_MIN_ENGINE_VERSION: [u32; 3] = [1, 19, 0];

/// A pack manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_version: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<ManifestHeader>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modules: Option<Vec<ManifestModule>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `header` object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestHeader {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<Value>,

    /// `[major, minor, patch]`, or a `"major.minor.patch"` string in newer
    /// format versions. Kept as written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_engine_version: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of `modules`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestModule {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub module_type: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Manifest {
    /// Parse manifest bytes. `None` when the JSON is invalid or its shape
    /// does not match a manifest at all (e.g. `header` is not an object).
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let value: Value = serde_json::from_slice(strip_bom(bytes)).ok()?;
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value).ok()
    }

    /// The pack type declared by the modules, if any.
    ///
    /// The first module with a server pack type decides.
    pub fn declared_type(&self) -> Option<PackType> {
        self.modules
            .iter()
            .flatten()
            .filter_map(|m| text(&m.module_type))
            .find_map(PackType::from_module_type)
    }

    /// `header.uuid`, when present.
    pub fn header_uuid(&self) -> Option<&str> {
        text(&self.header.as_ref()?.uuid)
    }

    /// `header.name`, when present and not blank.
    pub fn header_name(&self) -> Option<&str> {
        text(&self.header.as_ref()?.name).filter(|n| !n.trim().is_empty())
    }

    /// `header.version`, when it is a valid version.
    pub fn header_version(&self) -> Option<PackVersion> {
        self.header.as_ref()?.version.as_ref().and_then(parse_version)
    }
}

/// Read a version given either as `[1, 2, 3]` or `"1.2.3"`.
pub fn parse_version(value: &Value) -> Option<PackVersion> {
    if let Some(version) = PackVersion::from_json(value) {
        return Some(version);
    }
    let raw = value.as_str()?;
    // Pre-release and build suffixes are informational.
    let core = raw.split(['-', '+']).next()?;
    let mut parts = [0u32; 3];
    let mut count = 0;
    for (slot, piece) in parts.iter_mut().zip(core.split('.')) {
        *slot = piece.trim().parse().ok()?;
        count += 1;
    }
    if count != 3 || core.split('.').count() != 3 {
        return None;
    }
    Some(PackVersion(parts))
}

/// The string inside an optional field, if it is one.
pub(crate) fn text(field: &Option<Value>) -> Option<&str> {
    field.as_ref().and_then(Value::as_str)
}

/// Absent, `null`, or a blank string.
pub(crate) fn is_unset(field: &Option<Value>) -> bool {
    match field {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_manifest() {
        let raw = json!({
            "format_version": 2,
            "header": {
                "name": "Mobs",
                "description": "More mobs",
                "uuid": "6f1c3a4e-4a9b-4f43-9b2a-3f0e5f1f2a10",
                "version": [1, 2, 0],
                "min_engine_version": [1, 20, 0]
            },
            "modules": [
                {"type": "data", "uuid": "0a1c3a4e-4a9b-4f43-9b2a-3f0e5f1f2a10", "version": [1, 2, 0]}
            ],
            "dependencies": [{"uuid": "x", "version": [1, 0, 0]}]
        });
        let manifest = Manifest::parse(raw.to_string().as_bytes()).unwrap();

        assert_eq!(manifest.declared_type(), Some(PackType::Behavior));
        assert_eq!(manifest.header_name(), Some("Mobs"));
        assert_eq!(manifest.header_version(), Some(PackVersion::new(1, 2, 0)));
        assert!(manifest.extra.contains_key("dependencies"));
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let raw = json!({
            "format_version": 2,
            "header": {"name": "X", "uuid": "u", "lock_template_options": true},
            "modules": [{"type": "resources", "custom": 1}],
            "metadata": {"authors": ["someone"]}
        });
        let manifest = Manifest::parse(raw.to_string().as_bytes()).unwrap();
        let back = serde_json::to_value(&manifest).unwrap();
        assert_eq!(back, raw);
    }

    #[test]
    fn test_parse_rejects_wrong_shapes() {
        assert!(Manifest::parse(b"not json").is_none());
        assert!(Manifest::parse(b"[1, 2]").is_none());
        assert!(Manifest::parse(br#"{"header": "nope"}"#).is_none());
        assert!(Manifest::parse(br#"{"modules": [1]}"#).is_none());
    }

    #[test]
    fn test_mistyped_fields_do_not_reject_manifest() {
        let raw = json!({
            "header": {
                "name": 42,
                "description": ["line one", "line two"],
                "uuid": "6f1c3a4e-4a9b-4f43-9b2a-3f0e5f1f2a10"
            },
            "modules": [{"type": 7}, {"type": "data"}]
        });
        let manifest = Manifest::parse(raw.to_string().as_bytes()).unwrap();

        assert_eq!(manifest.header_name(), None);
        assert_eq!(
            manifest.header_uuid(),
            Some("6f1c3a4e-4a9b-4f43-9b2a-3f0e5f1f2a10")
        );
        assert_eq!(manifest.declared_type(), Some(PackType::Behavior));
        assert_eq!(serde_json::to_value(&manifest).unwrap(), raw);
    }

    #[test]
    fn test_is_unset() {
        assert!(is_unset(&None));
        assert!(is_unset(&Some(Value::Null)));
        assert!(is_unset(&Some(json!("  "))));
        assert!(!is_unset(&Some(json!(["x"]))));
        assert!(!is_unset(&Some(json!("Mobs"))));
    }

    #[test]
    fn test_parse_accepts_bom() {
        let mut bytes = b"\xEF\xBB\xBF".to_vec();
        bytes.extend_from_slice(br#"{"header": {"name": "B"}}"#);
        assert_eq!(Manifest::parse(&bytes).unwrap().header_name(), Some("B"));
    }

    #[test]
    fn test_parse_version_forms() {
        assert_eq!(parse_version(&json!([1, 0, 3])), Some(PackVersion::new(1, 0, 3)));
        assert_eq!(parse_version(&json!("2.1.0")), Some(PackVersion::new(2, 1, 0)));
        assert_eq!(
            parse_version(&json!("2.1.0-beta")),
            Some(PackVersion::new(2, 1, 0))
        );
        assert_eq!(parse_version(&json!("2.1")), None);
        assert_eq!(parse_version(&json!("2.1.0.4")), None);
        assert_eq!(parse_version(&json!(true)), None);
    }

    #[test]
    fn test_declared_type_skips_unknown_modules() {
        let manifest = Manifest {
            modules: Some(vec![
                ManifestModule {
                    module_type: Some(json!("skin_pack")),
                    ..Default::default()
                },
                ManifestModule {
                    module_type: Some(json!("resources")),
                    ..Default::default()
                },
            ]),
            ..Default::default()
        };
        assert_eq!(manifest.declared_type(), Some(PackType::Resource));
    }
}
