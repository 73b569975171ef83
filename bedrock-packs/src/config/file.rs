//! Loading and saving `config.ini`.

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

pub use super::settings::ConfigFile;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

impl ConfigFile {
    /// Load configuration from the default path.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Save configuration to a specific path, creating its directory.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        let content = super::writer::to_config_string(self);
        std::fs::write(path, content).map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }

    /// Write a default config file at `path` unless one exists.
    ///
    /// Returns whether a file was written.
    pub fn ensure_exists(path: &Path) -> Result<bool, ConfigFileError> {
        if path.exists() {
            return Ok(false);
        }
        Self::default().save_to(path)?;
        Ok(true)
    }
}

/// Directory holding the config file (`<config dir>/bedrock-packs`).
pub fn config_directory() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bedrock-packs")
}

/// Default config file path.
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let temp = TempDir::new().unwrap();

        let config = ConfigFile::load_from(&temp.path().join("missing.ini")).unwrap();

        assert_eq!(config, ConfigFile::default());
        assert!(config.install.auto_activate);
        assert_eq!(config.install.scratch_dir, ".tmp_addon_extract");
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/config.ini");

        let mut config = ConfigFile::default();
        config.server.root = Some(PathBuf::from("/srv/bedrock"));
        config.server.world = Some("Survival".to_string());
        config.install.auto_activate = false;
        config.logging.directory = PathBuf::from("/var/log/bedrock-packs");
        config.save_to(&path).unwrap();

        let loaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_ensure_exists_keeps_existing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");

        assert!(ConfigFile::ensure_exists(&path).unwrap());
        std::fs::write(&path, "[server]\nworld = Mine\n").unwrap();
        assert!(!ConfigFile::ensure_exists(&path).unwrap());

        let loaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(loaded.server.world.as_deref(), Some("Mine"));
    }

    #[test]
    fn test_config_file_path_name() {
        let path = config_file_path();
        assert!(path.ends_with("bedrock-packs/config.ini"));
    }
}
