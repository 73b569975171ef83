//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use bedrock_packs::config::ConfigFileError;
use bedrock_packs::{ErrorKind, ManagerError};

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// A pack operation failed
    Manager(ManagerError),
    /// Some auto-install queue items failed
    ScanFailed { failed: usize },
    /// Some packs of an install or delete did not make it
    Incomplete { failed: usize, total: usize },
    /// Interactive mode without a terminal
    NotInteractive,
    /// A prompt could not be shown or read
    Prompt(String),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Manager(e) => match e.kind() {
                ErrorKind::EnvironmentNotFound => {
                    eprintln!();
                    eprintln!("Run the command from the server directory, or point at it:");
                    eprintln!("  bedrock-packs --server-dir /path/to/bedrock-server <command>");
                    eprintln!("  or set 'root' in the [server] section of config.ini");
                }
                ErrorKind::ActivationFileCorrupt => {
                    eprintln!();
                    eprintln!("The activation file was left untouched. Fix or remove it,");
                    eprintln!("then run the command again.");
                }
                ErrorKind::InsufficientSpace => {
                    eprintln!();
                    eprintln!("Free some space on the server volume, or set 'scratch_dir'");
                    eprintln!("in the [install] section of config.ini.");
                }
                _ => {}
            },
            CliError::ScanFailed { .. } => {
                eprintln!();
                eprintln!("Failed archives stay in the queue with a .failed.log next to them.");
            }
            CliError::NotInteractive => {
                eprintln!();
                eprintln!("Use a subcommand instead, for example:");
                eprintln!("  bedrock-packs scan");
                eprintln!("  bedrock-packs list");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Manager(e) => write!(f, "{} ({})", e, e.kind()),
            CliError::ScanFailed { failed } => {
                write!(f, "{} queue item(s) failed to install", failed)
            }
            CliError::Incomplete { failed, total } => {
                write!(f, "{} of {} pack(s) failed", failed, total)
            }
            CliError::NotInteractive => {
                write!(f, "Interactive mode needs a terminal on stdin")
            }
            CliError::Prompt(msg) => write!(f, "Prompt failed: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Manager(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ManagerError> for CliError {
    fn from(e: ManagerError) -> Self {
        CliError::Manager(e)
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<dialoguer::Error> for CliError {
    fn from(e: dialoguer::Error) -> Self {
        CliError::Prompt(e.to_string())
    }
}
