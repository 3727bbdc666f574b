//! Core data model for ingest runs.
//!
//! This module defines the main data structures for representing an ingest:
//! - MediaKind: photo/video classification by filename extension
//! - MediaFile: a single classified file with its capture timestamp
//! - MediaGroups: files bucketed by calendar date
//! - IngestOptions, IngestSummary: run configuration and result

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use chrono::{DateTime, Local, NaiveDate};
use crate::error::IngestError;

/// Extensions classified as photos. Checked before the video table, so a name
/// matching both tables classifies as Photo.
const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "arw", "dng"];

/// Extensions classified as video.
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi"];

/// Classification of a file by its filename extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    Video,
    /// Neither table matched; routed to neither destination by the grouper.
    Unknown,
}

impl MediaKind {
    /// Classify a filename by case-insensitive suffix match against the fixed
    /// photo and video extension tables.
    pub fn from_name(name: &str) -> MediaKind {
        let lower = name.to_lowercase();

        if PHOTO_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
            return MediaKind::Photo;
        }
        if VIDEO_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
            return MediaKind::Video;
        }
        MediaKind::Unknown
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Photo => write!(f, "photo"),
            MediaKind::Video => write!(f, "video"),
            MediaKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// A single discovered file, classified and stamped with its capture time.
///
/// The capture timestamp is the filesystem modification time, used as a proxy
/// for when the media was recorded. Immutable once built.
#[derive(Debug, Clone)]
pub struct MediaFile {
    /// Full source path
    pub source_path: PathBuf,

    /// Final path component, used as the destination filename
    pub file_name: String,

    /// Classification by extension
    pub kind: MediaKind,

    /// Filesystem modification time in the local timezone
    pub captured_at: DateTime<Local>,
}

impl MediaFile {
    /// Build a record for a discovered path: classify the filename and stat
    /// the file once for its modification time.
    ///
    /// # Errors
    /// Returns `IngestError::FileAccess` if the file cannot be stat'ed
    /// (vanished since discovery, permission denied).
    pub fn from_path(path: &Path) -> Result<MediaFile, IngestError> {
        let metadata = fs::metadata(path).map_err(|e| IngestError::FileAccess {
            path: path.to_path_buf(),
            source: e,
        })?;
        let modified = metadata.modified().map_err(|e| IngestError::FileAccess {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| IngestError::InvalidSource {
                path: path.to_path_buf(),
                reason: "Path has no filename component".to_string(),
            })?;

        Ok(MediaFile {
            source_path: path.to_path_buf(),
            kind: MediaKind::from_name(&file_name),
            file_name,
            captured_at: DateTime::<Local>::from(modified),
        })
    }

    /// The 8-character `YYYYMMDD` bucket key for this file's capture date,
    /// derived in the local timezone.
    pub fn date_key(&self) -> String {
        self.captured_at.format("%Y%m%d").to_string()
    }
}

/// Files bucketed by date key. Keys iterate in calendar order; within a
/// bucket, files keep their discovery order.
pub type MediaGroups = BTreeMap<String, Vec<MediaFile>>;

/// Configuration for a single ingest run.
///
/// Constructed once by the caller (CLI/config layer) and threaded through
/// every pipeline entry point; the engine holds no ambient configuration.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Root directory to scan for media
    pub source: PathBuf,

    /// Destination root for photo date directories
    pub photo_destination: PathBuf,

    /// Destination root for video date directories
    pub video_destination: PathBuf,

    /// Merged allow-list of lowercased, dot-free extension tokens
    pub include_formats: Vec<String>,

    /// Optional suffix appended to every date directory name
    pub dest_suffix: Option<String>,

    /// Inclusive lower-bound capture date; earlier records are excluded
    pub from_date: Option<NaiveDate>,
}

/// A per-file or per-bucket transfer failure, collected rather than raised.
#[derive(Debug)]
pub struct TransferFailure {
    /// Source file (or bucket directory) the failure applies to
    pub path: PathBuf,

    /// Human-readable description of what went wrong
    pub message: String,

    /// OS error code underlying the failure, if one exists
    pub error_code: Option<u32>,
}

/// Aggregate result of a transfer run.
///
/// Counters reflect only successful copies; a partially failed run still
/// reports accurate counts for what did succeed.
#[derive(Debug)]
pub struct IngestSummary {
    /// Number of files successfully copied
    pub files_copied: u64,

    /// Sum of source sizes for successfully copied files
    pub bytes_copied: u64,

    /// Every copy or directory-creation failure encountered
    pub failures: Vec<TransferFailure>,
}

impl IngestSummary {
    /// True if every planned copy succeeded.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
