//! JSON serialization and atomic file replacement shared by the writers.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tempfile::NamedTempFile;

use crate::error::{ManagerError, ManagerResult};

/// Serialize with four-space indentation, the layout the game writes.
pub(crate) fn to_pretty_vec<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;
    Ok(out)
}

/// Replace `path` with `bytes` so readers see the old or the new content,
/// never a partial write.
///
/// The bytes go to a temporary sibling first, are flushed to disk, and the
/// sibling is renamed over `path`.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> ManagerResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| ManagerError::create_dir(dir, e))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| ManagerError::write(dir, e))?;
    tmp.write_all(bytes)
        .map_err(|e| ManagerError::write(tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| ManagerError::write(tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| ManagerError::write(path, e.error))?;
    Ok(())
}
