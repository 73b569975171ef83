//! Settings structs, one per `[section]`, and their defaults.

use std::path::PathBuf;

use crate::environment::DEFAULT_SCRATCH_DIR;

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "bedrock-packs.log";

/// Default log directory (`<state dir>/bedrock-packs/logs`).
pub fn default_log_dir() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bedrock-packs")
        .join("logs")
}

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub server: ServerSettings,
    pub install: InstallSettings,
    pub logging: LoggingSettings,
}

/// `[server]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerSettings {
    /// Server root; skips detection when set.
    pub root: Option<PathBuf>,
    /// World folder to target instead of `level-name`.
    pub world: Option<String>,
}

/// `[install]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallSettings {
    /// Activate packs for the world after installing them.
    pub auto_activate: bool,
    /// Scratch folder name, relative to the server root.
    pub scratch_dir: String,
}

impl Default for InstallSettings {
    fn default() -> Self {
        Self {
            auto_activate: true,
            scratch_dir: DEFAULT_SCRATCH_DIR.to_string(),
        }
    }
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    pub directory: PathBuf,
    pub file: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: default_log_dir(),
            file: DEFAULT_LOG_FILE.to_string(),
        }
    }
}
