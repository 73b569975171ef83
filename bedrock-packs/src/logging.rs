//! Logging infrastructure.
//!
//! Provides structured logging with file output and console output:
//! - Writes to `<log dir>/bedrock-packs.log` (cleared on session start)
//! - Prints a compact form to stderr, leaving stdout to command output
//! - File level configurable via the RUST_LOG environment variable

use std::fs;
use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping this guard will flush and close the log file writer.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Initialize logging.
///
/// Creates the log directory if needed, clears the previous log file and
/// sets up output to both the file and stderr.
///
/// # Arguments
///
/// * `log_dir` - Directory for log files
/// * `log_file` - Log filename
/// * `console_level` - Filter for stderr output (e.g. "warn")
///
/// The file receives `info` and above unless RUST_LOG says otherwise.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file cleared.
pub fn init_logging(
    log_dir: &Path,
    log_file: &str,
    console_level: &str,
) -> Result<LoggingGuard, io::Error> {
    fs::create_dir_all(log_dir)?;
    fs::write(log_dir.join(log_file), "")?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_file);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_target(false)
        .with_filter(file_filter);

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .compact()
        .with_filter(EnvFilter::new(console_level));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .init();

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_structure() {
        use tracing_appender::non_blocking::NonBlocking;

        let (non_blocking, guard) = NonBlocking::new(std::io::sink());
        drop(non_blocking);

        let _logging_guard = LoggingGuard { _file_guard: guard };
    }

    #[test]
    fn test_unwritable_directory_is_an_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let blocker = temp.path().join("file");
        fs::write(&blocker, b"x").unwrap();

        // A regular file where the directory should be.
        let result = init_logging(&blocker.join("logs"), "test.log", "warn");
        assert!(result.is_err());
    }
}
