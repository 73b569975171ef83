//! Supported archive container formats.

use std::fmt;
use std::path::Path;

use crate::error::{ManagerError, ManagerResult};

/// Add-on container formats. All three are zip files underneath.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveFormat {
    /// Plain `.zip`.
    Zip,
    /// `.mcpack`: a single pack.
    McPack,
    /// `.mcaddon`: one or more packs, often as nested `.mcpack` files.
    McAddon,
}

impl ArchiveFormat {
    /// Extensions accepted by the installer, lowercase, without dot.
    pub const EXTENSIONS: [&'static str; 3] = ["zip", "mcpack", "mcaddon"];

    /// Detect the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> ManagerResult<Self> {
        Self::detect(path).ok_or_else(|| ManagerError::UnsupportedArchive {
            path: path.to_path_buf(),
        })
    }

    /// Like [`from_path`](Self::from_path) but without the error.
    pub fn detect(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "zip" => Some(Self::Zip),
            "mcpack" => Some(Self::McPack),
            "mcaddon" => Some(Self::McAddon),
            _ => None,
        }
    }

    /// Whether `path` looks like a supported archive.
    pub fn is_archive(path: &Path) -> bool {
        path.is_file() && Self::detect(path).is_some()
    }

    /// Extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::McPack => "mcpack",
            Self::McAddon => "mcaddon",
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}", self.extension())
    }
}
