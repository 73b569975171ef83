//! Activation list records.
//!
//! An activation file is a JSON array of objects, each naming one pack:
//!
//! ```json
//! [
//!     { "pack_id": "6f1c3a4e-...", "version": [1, 0, 0] }
//! ]
//! ```
//!
//! Entries are validated when parsed (`pack_id` must be a string) and keep
//! their original object, so fields this crate does not model survive any
//! number of rewrites. Numbers are held as written (`1.50` stays `1.50`).

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use crate::pack::{pack_ids_match, PackIdentity, PackVersion};

/// One entry of a world activation list.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivationEntry {
    pack_id: String,
    version: Option<PackVersion>,
    raw: Map<String, Value>,
}

impl ActivationEntry {
    /// Create an entry as this crate writes it.
    pub fn new(pack_id: impl Into<String>, version: PackVersion) -> Self {
        let pack_id = pack_id.into();
        let mut raw = Map::new();
        raw.insert("pack_id".to_string(), Value::String(pack_id.clone()));
        raw.insert("version".to_string(), version.to_json());
        Self {
            pack_id,
            version: Some(version),
            raw,
        }
    }

    /// Validate one element of an activation array.
    pub fn from_value(value: Value) -> Result<Self, String> {
        let Value::Object(raw) = value else {
            return Err("entry is not an object".to_string());
        };
        let pack_id = match raw.get("pack_id") {
            Some(Value::String(id)) => id.clone(),
            Some(_) => return Err("pack_id is not a string".to_string()),
            None => return Err("entry has no pack_id".to_string()),
        };
        let version = raw.get("version").and_then(PackVersion::from_json);
        Ok(Self {
            pack_id,
            version,
            raw,
        })
    }

    /// The referenced pack id, as written.
    pub fn pack_id(&self) -> &str {
        &self.pack_id
    }

    /// The referenced version, when it is a valid triple.
    pub fn version(&self) -> Option<PackVersion> {
        self.version
    }

    /// The entry object exactly as read.
    pub fn raw(&self) -> &Map<String, Value> {
        &self.raw
    }

    /// Whether this entry references `pack_id`.
    pub fn references(&self, pack_id: &str) -> bool {
        pack_ids_match(&self.pack_id, pack_id)
    }
}

/// A pack to add to an activation list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationRef {
    pub pack_id: String,
    pub version: PackVersion,
}

impl ActivationRef {
    /// Create a reference.
    pub fn new(pack_id: impl Into<String>, version: PackVersion) -> Self {
        Self {
            pack_id: pack_id.into(),
            version,
        }
    }
}

impl From<&PackIdentity> for ActivationRef {
    fn from(identity: &PackIdentity) -> Self {
        Self::new(identity.id.clone(), identity.version)
    }
}

/// One merged change to a single activation list.
///
/// Built by callers and consumed by
/// [`WorldRegistry::batch_apply`](super::WorldRegistry::batch_apply). Ids
/// listed in both `add` and `remove` end up active.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchApply {
    pub add: Vec<ActivationRef>,
    pub remove: BTreeSet<String>,
}

impl BatchApply {
    /// An empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pack to activate.
    pub fn activate(mut self, pack_id: impl Into<String>, version: PackVersion) -> Self {
        self.add.push(ActivationRef::new(pack_id, version));
        self
    }

    /// Add a pack to deactivate.
    pub fn deactivate(mut self, pack_id: impl Into<String>) -> Self {
        self.remove.insert(pack_id.into());
        self
    }

    /// Whether the batch requests nothing.
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }
}

/// What a merge changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyOutcome {
    /// Ids appended to the list.
    pub added: Vec<String>,
    /// Ids whose entries were dropped.
    pub removed: Vec<String>,
}

impl ApplyOutcome {
    /// Whether the list content changed.
    pub fn changed(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty()
    }
}

/// A parsed activation list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivationList {
    entries: Vec<ActivationEntry>,
}

impl ActivationList {
    /// Parse activation file bytes.
    ///
    /// A file holding only whitespace is an empty list. Anything that is
    /// not an array of objects with a string `pack_id` is rejected with a
    /// reason.
    pub fn parse(bytes: &[u8]) -> Result<Self, String> {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        let value: Value = serde_json::from_slice(bytes).map_err(|e| e.to_string())?;
        let Value::Array(items) = value else {
            return Err("root is not an array".to_string());
        };

        let entries = items
            .into_iter()
            .enumerate()
            .map(|(i, item)| ActivationEntry::from_value(item).map_err(|e| format!("entry {}: {}", i, e)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { entries })
    }

    /// Entries in file order.
    pub fn entries(&self) -> &[ActivationEntry] {
        &self.entries
    }

    /// Whether any entry references `pack_id`.
    pub fn contains(&self, pack_id: &str) -> bool {
        self.entries.iter().any(|e| e.references(pack_id))
    }

    /// Referenced ids.
    pub fn pack_ids(&self) -> BTreeSet<String> {
        self.entries.iter().map(|e| e.pack_id.clone()).collect()
    }

    /// Merge a batch into the list.
    ///
    /// Entries for removed ids are dropped; new ids are appended in batch
    /// order. Every other entry keeps its position and content.
    pub fn apply(&mut self, batch: &BatchApply) -> ApplyOutcome {
        let mut outcome = ApplyOutcome::default();

        let keeps_active = |id: &str| batch.add.iter().any(|a| pack_ids_match(&a.pack_id, id));
        let drops = |entry: &ActivationEntry| {
            batch.remove.iter().any(|r| entry.references(r)) && !keeps_active(entry.pack_id())
        };

        let mut removed = Vec::new();
        self.entries.retain(|entry| {
            if drops(entry) {
                removed.push(entry.pack_id.clone());
                false
            } else {
                true
            }
        });
        outcome.removed = removed;

        for reference in &batch.add {
            if self.contains(&reference.pack_id) {
                continue;
            }
            self.entries
                .push(ActivationEntry::new(reference.pack_id.clone(), reference.version));
            outcome.added.push(reference.pack_id.clone());
        }

        outcome
    }

    /// The list as a JSON array of the original entry objects.
    pub fn to_value(&self) -> Value {
        Value::Array(
            self.entries
                .iter()
                .map(|e| Value::Object(e.raw.clone()))
                .collect(),
        )
    }
}
