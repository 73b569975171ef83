//! Identity resolution for pack directories.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde_json::{json, Value};
use uuid::Uuid;

use super::heuristics::ContentMarkers;
use super::model::{
    is_unset, parse_version, text, Manifest, ManifestModule, DEFAULT_FORMAT_VERSION,
    DEFAULT_MIN_ENGINE_VERSION,
};
use crate::archive::folder_name;
use crate::error::{ManagerError, ManagerResult};
use crate::json::{to_pretty_vec, write_atomic};
use crate::pack::{normalize_folder_name, type_hint_from_name, PackIdentity, PackType, PackVersion};

/// File name of the identity file inside a pack.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Namespace for ids derived from folder names.
const PACK_NAMESPACE: Uuid = Uuid::from_u128(0x8a3c_5e2f_61d4_4b7e_9f10_2c6d_b4a9_e731);

/// The rule that decided a pack's type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeRule {
    /// `modules[].type` in the manifest.
    ManifestModules,
    /// The directory the pack was found in.
    LocationHint,
    /// Behavior/resource markers in the folder name.
    FolderName,
    /// Characteristic files and folders inside the pack.
    ContentMarkers,
}

impl fmt::Display for TypeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ManifestModules => "manifest-modules",
            Self::LocationHint => "location-hint",
            Self::FolderName => "folder-name",
            Self::ContentMarkers => "content-markers",
        };
        f.write_str(name)
    }
}

/// What happened to the manifest file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestOutcome {
    /// Valid as found; nothing written.
    Parsed,
    /// Parsed but incomplete; missing fields filled in and written back.
    Repaired,
    /// Missing or unparseable; a new one was written.
    Synthesized,
}

/// Result of resolving one pack directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub identity: PackIdentity,
    pub type_rule: TypeRule,
    pub outcome: ManifestOutcome,
}

/// Resolve the identity of the pack in `dir`, named after its folder.
pub fn resolve(dir: &Path, location_hint: Option<PackType>) -> ManagerResult<PackIdentity> {
    resolve_as(dir, &folder_name(dir), location_hint).map(|r| r.identity)
}

/// Resolve the identity of the pack in `dir`, using `name` wherever the
/// folder name would be used (display name fallback, id derivation).
///
/// A complete manifest is read without touching the file. Otherwise the
/// type is inferred through the fallback chain (manifest modules, location
/// hint, folder name, content markers) and the repaired or synthesized
/// manifest is written back so later scans take the fast path.
pub fn resolve_as(
    dir: &Path,
    name: &str,
    location_hint: Option<PackType>,
) -> ManagerResult<Resolution> {
    let path = dir.join(MANIFEST_FILE);

    let existing = if path.is_file() {
        let bytes = fs::read(&path).map_err(|e| ManagerError::read(&path, e))?;
        let parsed = Manifest::parse(&bytes);
        if parsed.is_none() {
            tracing::warn!(path = %path.display(), "Unparseable manifest, a new one will be written");
        }
        parsed
    } else {
        None
    };

    if let Some(manifest) = &existing {
        if let Some(identity) = complete_identity(manifest, name) {
            if let Some(hint) = location_hint.filter(|h| *h != identity.pack_type) {
                tracing::warn!(
                    pack = %identity.name,
                    declared = %identity.pack_type,
                    location = %hint,
                    "Manifest type disagrees with pack location"
                );
            }
            return Ok(Resolution {
                identity,
                type_rule: TypeRule::ManifestModules,
                outcome: ManifestOutcome::Parsed,
            });
        }
    }

    let (pack_type, rule) = infer_type(existing.as_ref(), dir, name, location_hint)?;
    tracing::info!(pack = %name, pack_type = %pack_type, rule = %rule, "Inferred pack type");

    let outcome = if existing.is_some() {
        ManifestOutcome::Repaired
    } else {
        ManifestOutcome::Synthesized
    };

    let manifest = repair(existing.unwrap_or_default(), name, pack_type);
    let bytes = to_pretty_vec(&manifest)
        .map_err(|e| ManagerError::write(&path, io::Error::new(io::ErrorKind::InvalidData, e)))?;
    write_atomic(&path, &bytes)?;

    let identity = complete_identity(&manifest, name).ok_or_else(|| ManagerError::AmbiguousType {
        path: dir.to_path_buf(),
    })?;

    tracing::info!(
        pack_id = %identity.id,
        pack = %identity.name,
        outcome = ?outcome,
        "Wrote manifest"
    );

    Ok(Resolution {
        identity,
        type_rule: rule,
        outcome,
    })
}

/// Deterministic pack id for a folder name.
///
/// Folder names differing only in case or whitespace map to the same id.
pub fn synthesize_id(name: &str) -> String {
    Uuid::new_v5(&PACK_NAMESPACE, normalize_folder_name(name).as_bytes()).to_string()
}

fn synthesize_module_id(name: &str, index: usize) -> String {
    let seed = format!("{}:module:{}", normalize_folder_name(name), index);
    Uuid::new_v5(&PACK_NAMESPACE, seed.as_bytes()).to_string()
}

fn is_valid_uuid(value: &str) -> bool {
    Uuid::parse_str(value.trim()).is_ok()
}

/// Identity from a manifest that has a valid uuid and a declared type.
fn complete_identity(manifest: &Manifest, folder: &str) -> Option<PackIdentity> {
    let id = manifest.header_uuid().filter(|u| is_valid_uuid(u))?;
    let pack_type = manifest.declared_type()?;

    // Localized manifests carry a translation key instead of a name.
    let name = manifest
        .header_name()
        .filter(|n| *n != "pack.name")
        .unwrap_or(folder);

    Some(PackIdentity::new(
        id.trim(),
        pack_type,
        name,
        manifest.header_version().unwrap_or_default(),
    ))
}

fn infer_type(
    manifest: Option<&Manifest>,
    dir: &Path,
    name: &str,
    location_hint: Option<PackType>,
) -> ManagerResult<(PackType, TypeRule)> {
    if let Some(t) = manifest.and_then(Manifest::declared_type) {
        return Ok((t, TypeRule::ManifestModules));
    }
    if let Some(t) = location_hint {
        return Ok((t, TypeRule::LocationHint));
    }
    if let Some(t) = type_hint_from_name(name) {
        return Ok((t, TypeRule::FolderName));
    }

    let markers = ContentMarkers::scan(dir);
    if let Some(t) = markers.verdict() {
        tracing::debug!(
            behavior = markers.behavior,
            resource = markers.resource,
            "Content markers"
        );
        return Ok((t, TypeRule::ContentMarkers));
    }

    tracing::warn!(dir = %dir.display(), "No rule could decide the pack type");
    Err(ManagerError::AmbiguousType {
        path: dir.to_path_buf(),
    })
}

fn default_description(pack_type: PackType) -> String {
    let label = match pack_type {
        PackType::Behavior => "Behavior",
        PackType::Resource => "Resource",
    };
    format!("{} pack for Bedrock Dedicated Server", label)
}

/// Fill in whatever is missing, keeping every valid and unknown field.
fn repair(mut manifest: Manifest, name: &str, pack_type: PackType) -> Manifest {
    manifest
        .format_version
        .get_or_insert_with(|| json!(DEFAULT_FORMAT_VERSION));

    let header = manifest.header.get_or_insert_with(Default::default);
    if is_unset(&header.name) {
        header.name = Some(Value::String(name.to_string()));
    }
    if is_unset(&header.description) {
        header.description = Some(Value::String(default_description(pack_type)));
    }
    if !text(&header.uuid).is_some_and(is_valid_uuid) {
        header.uuid = Some(Value::String(synthesize_id(name)));
    }
    if header.version.as_ref().and_then(parse_version).is_none() {
        header.version = Some(PackVersion::default().to_json());
    }
    header
        .min_engine_version
        .get_or_insert_with(|| json!(DEFAULT_MIN_ENGINE_VERSION));

    let modules = manifest.modules.get_or_insert_with(Vec::new);
    let declares_type = modules
        .iter()
        .filter_map(|m| text(&m.module_type))
        .any(|t| PackType::from_module_type(t).is_some());
    if !declares_type {
        modules.push(ManifestModule {
            module_type: Some(Value::String(pack_type.module_type().to_string())),
            ..Default::default()
        });
    }
    for (index, module) in modules.iter_mut().enumerate() {
        if !text(&module.uuid).is_some_and(is_valid_uuid) {
            module.uuid = Some(Value::String(synthesize_module_id(name, index)));
        }
        if module.version.as_ref().and_then(parse_version).is_none() {
            module.version = Some(PackVersion::default().to_json());
        }
    }

    manifest
}
