//! Non-interactive processing of the `addons_auto_install/` queue.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use glob::Pattern;

use super::install::InstallBatch;
use super::manager::PackManager;
use crate::archive::ArchiveFormat;
use crate::error::{ErrorKind, ManagerError, ManagerResult};
use crate::registry::sibling;

/// Suffix of the log written next to a queue item that failed.
pub const FAILED_LOG_SUFFIX: &str = ".failed.log";

/// A queue item that was installed and moved to `processed/`.
#[derive(Debug)]
pub struct ProcessedItem {
    pub archive: PathBuf,
    pub moved_to: PathBuf,
    pub batch: InstallBatch,
}

/// A queue item left in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueFailure {
    pub archive: PathBuf,
    pub kind: ErrorKind,
    pub message: String,
}

/// Outcome of one pass over the queue.
#[derive(Debug, Default)]
pub struct AutoScanSummary {
    pub processed: Vec<ProcessedItem>,
    pub failed: Vec<QueueFailure>,
}

impl AutoScanSummary {
    /// True when no queue item failed. An empty queue is a success.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

impl PackManager {
    /// Install every archive waiting in the queue.
    ///
    /// Items are handled in file name order and each one at most once. A
    /// failing item gets a `<file>.failed.log` and stays in the queue; the
    /// scan continues with the next one. A corrupt activation file stops the
    /// whole scan.
    pub fn auto_scan(&self) -> ManagerResult<AutoScanSummary> {
        let layout = self.context().layout();
        let queue = layout.auto_install_dir();
        let mut summary = AutoScanSummary::default();

        if !queue.is_dir() {
            tracing::debug!(queue = %queue.display(), "No auto-install queue");
            return Ok(summary);
        }

        let items = queued_archives(&queue)?;
        tracing::info!(queue = %queue.display(), items = items.len(), "Scanning auto-install queue");

        for archive in items {
            let result = self
                .install_from_archive(&archive)
                .and_then(|batch| incomplete_batch_error(&archive, batch));

            match result {
                Ok(batch) => match move_to_processed(&layout.processed_dir(), &archive) {
                    Ok(moved_to) => {
                        let _ = fs::remove_file(sibling(&archive, FAILED_LOG_SUFFIX));
                        tracing::info!(archive = %archive.display(), to = %moved_to.display(), "Queue item processed");
                        summary.processed.push(ProcessedItem {
                            archive,
                            moved_to,
                            batch,
                        });
                    }
                    Err(e) => summary.failed.push(record_failure(&archive, &e)),
                },
                Err(e) if e.kind() == ErrorKind::ActivationFileCorrupt => {
                    record_failure(&archive, &e);
                    return Err(e);
                }
                Err(e) => summary.failed.push(record_failure(&archive, &e)),
            }
        }

        Ok(summary)
    }
}

/// Archives in the queue directory, sorted.
fn queued_archives(queue: &Path) -> ManagerResult<Vec<PathBuf>> {
    let pattern = format!("{}/*", Pattern::escape(&queue.to_string_lossy()));
    let entries = glob::glob(&pattern).map_err(|e| ManagerError::InvalidPath(e.to_string()))?;

    let mut items: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!(error = %e, "Unreadable queue entry");
                None
            }
        })
        .filter(|p| p.is_file() && ArchiveFormat::is_archive(p))
        .collect();
    items.sort();
    Ok(items)
}

/// Turn a batch with failed packs into the error of its first failure.
fn incomplete_batch_error(archive: &Path, mut batch: InstallBatch) -> ManagerResult<InstallBatch> {
    if batch.is_complete() {
        return Ok(batch);
    }
    let names: Vec<String> = batch.failed.iter().map(|f| f.name.clone()).collect();
    let first = batch.failed.remove(0);
    tracing::warn!(
        archive = %archive.display(),
        failed = ?names,
        "Some packs in the archive were not installed"
    );
    Err(first.error)
}

/// Move an archive into `processed/`, never overwriting an earlier one.
fn move_to_processed(processed: &Path, archive: &Path) -> ManagerResult<PathBuf> {
    fs::create_dir_all(processed).map_err(|e| ManagerError::create_dir(processed, e))?;

    let name = archive
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| ManagerError::InvalidPath(archive.display().to_string()))?;
    let mut target = processed.join(&name);

    if target.exists() {
        let stem = archive
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = archive
            .extension()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut n = 2u32;
        loop {
            target = processed.join(format!("{}_{}.{}", stem, n, ext));
            if !target.exists() {
                break;
            }
            n += 1;
        }
    }

    fs::rename(archive, &target).map_err(|e| ManagerError::write(&target, e))?;
    Ok(target)
}

fn record_failure(archive: &Path, error: &ManagerError) -> QueueFailure {
    let kind = error.kind();
    tracing::error!(archive = %archive.display(), kind = %kind, error = %error, "Queue item failed");

    let log = sibling(archive, FAILED_LOG_SUFFIX);
    let text = format!(
        "archive: {}\nkind: {}\nerror: {}\ntime: {}\n",
        archive.display(),
        kind,
        error,
        Local::now().to_rfc3339()
    );
    if let Err(e) = fs::write(&log, text) {
        tracing::warn!(log = %log.display(), error = %e, "Failed to write failure log");
    }

    QueueFailure {
        archive: archive.to_path_buf(),
        kind,
        message: error.to_string(),
    }
}
