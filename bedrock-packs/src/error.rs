//! Error types for the pack manager.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for manager operations.
pub type ManagerResult<T> = Result<T, ManagerError>;

/// Errors that can occur during pack management operations.
#[derive(Debug, Error)]
pub enum ManagerError {
    /// No recognizable Bedrock server layout was found.
    #[error("no Bedrock server found (searched: {})", display_paths(.searched))]
    EnvironmentNotFound { searched: Vec<PathBuf> },

    /// The server has no world matching the request.
    #[error("world not found: {name} (in {})", .worlds_dir.display())]
    WorldNotFound { name: String, worlds_dir: PathBuf },

    /// An archive could not be opened or unpacked.
    #[error("archive is corrupt or unreadable: {}: {reason}", .path.display())]
    ArchiveCorrupt { path: PathBuf, reason: String },

    /// A file does not have one of the supported archive extensions.
    #[error("unsupported archive format: {}", .path.display())]
    UnsupportedArchive { path: PathBuf },

    /// The scratch area cannot hold the decompressed archive.
    #[error(
        "insufficient space in {} to extract archive: need {required} bytes, {available} available",
        .path.display()
    )]
    InsufficientSpace {
        path: PathBuf,
        required: u64,
        available: u64,
    },

    /// No rule could decide whether a pack is a behavior or resource pack.
    #[error("cannot tell whether {} is a behavior or resource pack", .path.display())]
    AmbiguousType { path: PathBuf },

    /// A world activation file exists but cannot be parsed.
    #[error(
        "activation file {} is invalid ({reason}){}",
        .path.display(),
        backup_note(.backup)
    )]
    ActivationFileCorrupt {
        path: PathBuf,
        /// Copy of the unparseable bytes, when a write was attempted.
        backup: Option<PathBuf>,
        reason: String,
    },

    /// A pack with the same id is already installed.
    #[error("pack {name} ({pack_id}) is already installed")]
    AlreadyInstalled { pack_id: String, name: String },

    /// A pack id does not refer to any installed pack.
    #[error("pack not found: {pack_id}")]
    PackNotFound { pack_id: String },

    /// Failed to read a file or directory.
    #[error("failed to read {}: {source}", .path.display())]
    ReadFailed { path: PathBuf, source: io::Error },

    /// Failed to write a file or directory.
    #[error("failed to write {}: {source}", .path.display())]
    WriteFailed { path: PathBuf, source: io::Error },

    /// Failed to create a directory.
    #[error("failed to create directory {}: {source}", .path.display())]
    CreateDirFailed { path: PathBuf, source: io::Error },

    /// Invalid path provided.
    #[error("invalid path: {0}")]
    InvalidPath(String),
}

/// Fieldless classification of a [`ManagerError`], used in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    EnvironmentNotFound,
    WorldNotFound,
    ArchiveCorrupt,
    UnsupportedArchive,
    InsufficientSpace,
    AmbiguousType,
    ActivationFileCorrupt,
    AlreadyInstalled,
    PackNotFound,
    Io,
    InvalidPath,
}

impl ErrorKind {
    /// Stable name used in logs, reports and failure files.
    pub fn name(&self) -> &'static str {
        match self {
            Self::EnvironmentNotFound => "EnvironmentNotFound",
            Self::WorldNotFound => "WorldNotFound",
            Self::ArchiveCorrupt => "ArchiveCorrupt",
            Self::UnsupportedArchive => "UnsupportedArchive",
            Self::InsufficientSpace => "InsufficientSpace",
            Self::AmbiguousType => "AmbiguousType",
            Self::ActivationFileCorrupt => "ActivationFileCorrupt",
            Self::AlreadyInstalled => "AlreadyInstalled",
            Self::PackNotFound => "PackNotFound",
            Self::Io => "Io",
            Self::InvalidPath => "InvalidPath",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl ManagerError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EnvironmentNotFound { .. } => ErrorKind::EnvironmentNotFound,
            Self::WorldNotFound { .. } => ErrorKind::WorldNotFound,
            Self::ArchiveCorrupt { .. } => ErrorKind::ArchiveCorrupt,
            Self::UnsupportedArchive { .. } => ErrorKind::UnsupportedArchive,
            Self::InsufficientSpace { .. } => ErrorKind::InsufficientSpace,
            Self::AmbiguousType { .. } => ErrorKind::AmbiguousType,
            Self::ActivationFileCorrupt { .. } => ErrorKind::ActivationFileCorrupt,
            Self::AlreadyInstalled { .. } => ErrorKind::AlreadyInstalled,
            Self::PackNotFound { .. } => ErrorKind::PackNotFound,
            Self::ReadFailed { .. } | Self::WriteFailed { .. } | Self::CreateDirFailed { .. } => {
                ErrorKind::Io
            }
            Self::InvalidPath(_) => ErrorKind::InvalidPath,
        }
    }

    /// Informational errors are reported but never fail an operation.
    pub fn is_informational(&self) -> bool {
        matches!(self, Self::AlreadyInstalled { .. })
    }

    pub(crate) fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::ReadFailed {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::WriteFailed {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn create_dir(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::CreateDirFailed {
            path: path.into(),
            source,
        }
    }
}

fn backup_note(backup: &Option<PathBuf>) -> String {
    match backup {
        Some(path) => format!(
            "; its content was saved to {} and it was not modified",
            path.display()
        ),
        None => String::new(),
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "nothing".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
