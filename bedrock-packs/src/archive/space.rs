//! Free-space probing for the scratch area.

use std::path::Path;

/// Source of free-space information for a filesystem path.
pub trait SpaceProbe: Send + Sync {
    /// Bytes available to unprivileged writers at `path`.
    ///
    /// `None` when the platform cannot tell; the pre-check is then skipped.
    fn available_bytes(&self, path: &Path) -> Option<u64>;
}

/// Probe backed by the filesystem statistics call (`statvfs(3)` on Unix).
#[derive(Debug, Default, Clone, Copy)]
pub struct StatvfsProbe;

impl SpaceProbe for StatvfsProbe {
    fn available_bytes(&self, path: &Path) -> Option<u64> {
        match fs4::available_space(path) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Free space unknown");
                None
            }
        }
    }
}

/// Probe reporting a fixed amount of free space.
#[derive(Debug, Clone, Copy)]
pub struct FixedSpace(pub u64);

impl SpaceProbe for FixedSpace {
    fn available_bytes(&self, _path: &Path) -> Option<u64> {
        Some(self.0)
    }
}
