//! # SD Ingest Engine
//!
//! A headless pipeline for pulling media off a source volume (typically a
//! camera SD card) into a date-organized destination tree.
//!
//! ## Overview
//!
//! The engine discovers files under a source root, keeps those whose
//! extension is on the caller's allow-list, classifies each as photo or video
//! by filename, buckets them by capture date (filesystem modification time),
//! and copies every bucket into `{destination}/{YYYYMMDD}` directories.
//! Buckets copy concurrently; per-file failures are collected, never raised,
//! so a partially failed run still reports accurate totals.
//!
//! ## Basic Usage
//!
//! ```no_run
//! use std::path::PathBuf;
//! use engine::{run_ingest, IngestOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = IngestOptions {
//!     source: PathBuf::from("/media/sdcard"),
//!     photo_destination: PathBuf::from("/mnt/archive/photos"),
//!     video_destination: PathBuf::from("/mnt/archive/video"),
//!     include_formats: vec!["jpg".into(), "arw".into(), "mp4".into()],
//!     dest_suffix: None,
//!     from_date: None,
//! };
//!
//! let summary = run_ingest(&options, None)?;
//! println!("{} files, {} bytes", summary.files_copied, summary.bytes_copied);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - **model**: Core data structures (MediaFile, MediaKind, groups, options)
//! - **error**: Error types and handling
//! - **scan**: Source discovery and extension filtering
//! - **group**: Date bucketing per media kind
//! - **transfer**: Concurrent bucket copy with shared counters
//! - **progress**: Progress callback trait and transfer totals
//! - **ingest**: Run orchestration (plan, run)

pub mod model;
pub mod error;
pub mod scan;
pub mod group;
pub mod transfer;
pub mod progress;
pub mod ingest;

// Re-export main types and functions
pub use model::{
    IngestOptions, IngestSummary, MediaFile, MediaGroups, MediaKind, TransferFailure,
};
pub use error::IngestError;
pub use ingest::{plan_ingest, run_ingest, IngestPlan};
pub use progress::{ProgressCallback, TransferTotals};
