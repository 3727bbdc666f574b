//! Run orchestration.
//!
//! Ties the pipeline stages together: discover the source tree, filter by
//! the allow-list, build classified records, bucket them by date, then hand
//! both group maps to the transfer engine.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use crate::error::IngestError;
use crate::model::{IngestOptions, IngestSummary, MediaFile, MediaGroups};
use crate::progress::ProgressCallback;
use crate::{group, scan, transfer};

/// The grouped result of discovery, filtering and classification: everything
/// the transfer engine needs, before any byte has been copied.
#[derive(Debug)]
pub struct IngestPlan {
    pub photos: MediaGroups,
    pub videos: MediaGroups,
}

impl IngestPlan {
    /// Total number of records across both kinds.
    pub fn file_count(&self) -> usize {
        self.photos.values().map(Vec::len).sum::<usize>()
            + self.videos.values().map(Vec::len).sum::<usize>()
    }
}

/// Discover, filter, classify and group the source tree.
///
/// A file that cannot be stat'ed after discovery (vanished, permissions) is
/// skipped and reported through the callback; it does not abort the plan.
///
/// # Errors
/// Returns an error only for an unusable source root.
pub fn plan_ingest(
    options: &IngestOptions,
    progress: Option<&dyn ProgressCallback>,
) -> Result<IngestPlan, IngestError> {
    let paths = scan::discover(&options.source, progress)?;
    let retained = scan::filter_paths(paths, &options.include_formats);
    let records = build_records(retained, progress);

    let (photos, videos) = group::group_by_date(records, options.from_date, progress);
    Ok(IngestPlan { photos, videos })
}

/// Build classified records for the retained paths. A stat failure skips the
/// file and reports it on the record-error channel.
fn build_records(
    paths: Vec<PathBuf>,
    progress: Option<&dyn ProgressCallback>,
) -> Vec<MediaFile> {
    let mut records = Vec::with_capacity(paths.len());
    for path in paths {
        match MediaFile::from_path(&path) {
            Ok(record) => {
                if let Some(callback) = progress {
                    callback.on_file_retained(&record.source_path);
                }
                records.push(record);
            }
            Err(error) => {
                if let Some(callback) = progress {
                    callback.on_record_error(&error.to_string());
                }
            }
        }
    }
    records
}

/// Check that a destination root exists and is a directory.
///
/// Runs before any byte is copied: an unusable destination root is a setup
/// failure for the whole run, unlike the per-bucket failures tolerated
/// during transfer. A missing root is never fabricated here; a typo in the
/// configuration should be rejected, not materialized on disk.
fn validate_destination_root(root: &Path) -> Result<(), IngestError> {
    match fs::metadata(root) {
        Ok(metadata) => {
            if metadata.is_dir() {
                Ok(())
            } else {
                Err(IngestError::InvalidDestination {
                    path: root.to_path_buf(),
                    reason: "Destination must be a directory".to_string(),
                })
            }
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(IngestError::DestinationNotFound {
            path: root.to_path_buf(),
        }),
        Err(e) => Err(IngestError::DestinationAccessDenied {
            path: root.to_path_buf(),
            source: e,
        }),
    }
}

/// Execute a full ingest run: validate destinations, plan, then transfer.
///
/// # Errors
/// Returns an error for an unusable source or destination root; everything
/// past setup is best-effort and lands in the summary instead.
pub fn run_ingest(
    options: &IngestOptions,
    progress: Option<&dyn ProgressCallback>,
) -> Result<IngestSummary, IngestError> {
    validate_destination_root(&options.photo_destination)?;
    validate_destination_root(&options.video_destination)?;

    let plan = plan_ingest(options, progress)?;
    Ok(transfer::transfer(&plan.photos, &plan.videos, options, progress))
}
