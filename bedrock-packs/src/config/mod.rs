//! User configuration from `config.ini`.
//!
//! The file is optional; every key has a default. Command-line flags take
//! precedence over anything read here.
//!
//! ```ini
//! [server]
//! root = /srv/bedrock
//! world = Bedrock level
//!
//! [install]
//! auto_activate = true
//! scratch_dir = .tmp_addon_extract
//!
//! [logging]
//! directory = ~/.local/state/bedrock-packs/logs
//! file = bedrock-packs.log
//! ```

mod file;
mod parser;
mod settings;
mod writer;

pub use file::{config_directory, config_file_path, ConfigFile, ConfigFileError};
pub use settings::{
    default_log_dir, InstallSettings, LoggingSettings, ServerSettings, DEFAULT_LOG_FILE,
};
