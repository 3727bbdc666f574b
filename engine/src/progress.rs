//! Progress reporting and shared transfer counters.
//!
//! The `ProgressCallback` trait decouples the ingest engine from any specific
//! UI technology: the engine never prints, it reports. Bucket tasks run on
//! independent threads, so implementations must be `Send + Sync`.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use crate::model::{MediaFile, MediaKind};

/// Trait for receiving progress updates from an ingest run.
///
/// Implement this trait to receive callbacks during discovery, grouping and
/// transfer. The CLI provides an implementation that prints to stderr under
/// `--verbose`. Methods may be invoked concurrently from bucket tasks.
pub trait ProgressCallback: Send + Sync {
    /// Called once when the source walk begins.
    fn on_scan_started(&self, root: &Path);

    /// Called for a walk entry that could not be read; the entry is skipped
    /// and the walk continues.
    fn on_walk_error(&self, message: &str);

    /// Called for every path retained by the extension filter.
    fn on_file_retained(&self, path: &Path);

    /// Called when a retained file cannot be stat'ed while building its
    /// record (vanished since discovery, permissions); the file is skipped.
    fn on_record_error(&self, message: &str);

    /// Called when a record is excluded by the from-date cutoff.
    fn on_file_skipped(&self, file: &MediaFile);

    /// Called when a bucket task begins copying into its directory.
    fn on_bucket_started(&self, kind: MediaKind, date_key: &str, directory: &Path);

    /// Called after each successful file copy.
    fn on_file_copied(&self, file: &MediaFile, destination: &Path);

    /// Called when a file copy or bucket directory creation fails; the run
    /// continues with the next file or bucket.
    fn on_transfer_error(&self, message: &str);
}

/// Shared file/byte counters, incremented concurrently by bucket tasks.
///
/// Created once per ingest run, read once at the end for the summary.
/// Atomic adds guarantee no lost updates across tasks.
#[derive(Debug, Default)]
pub struct TransferTotals {
    files: AtomicU64,
    bytes: AtomicU64,
}

impl TransferTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one successfully copied file of the given size.
    pub fn record(&self, bytes: u64) {
        self.files.fetch_add(1, Ordering::Relaxed);
        self.bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn files(&self) -> u64 {
        self.files.load(Ordering::Relaxed)
    }

    pub fn bytes(&self) -> u64 {
        self.bytes.load(Ordering::Relaxed)
    }
}
