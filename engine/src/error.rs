//! Error types for the ingest engine.
//!
//! The primary error type is `IngestError`, which represents setup-level errors
//! that prevent an ingest run from being executed. Per-file copy failures are
//! collected as `TransferFailure` entries in the run summary, not raised.

use std::fmt::{Display, self};
use std::path::PathBuf;
use std::io;
use std::error::Error;

/// Errors that can occur at the run level (preventing execution).
///
/// These errors are typically non-recoverable and stop the run.
/// Per-file copy failures are recorded in the `IngestSummary`, not in this enum.
#[derive(Debug)]
pub enum IngestError {
    /// Source directory does not exist
    SourceNotFound { path: PathBuf },

    /// Source directory is not accessible (permissions)
    SourceAccessDenied { path: PathBuf, source: io::Error },

    /// Source path exists but is not usable as a scan root
    InvalidSource { path: PathBuf, reason: String },

    /// Destination root does not exist
    DestinationNotFound { path: PathBuf },

    /// Destination root is not accessible (permissions)
    DestinationAccessDenied { path: PathBuf, source: io::Error },

    /// Destination path exists but is not usable as a destination root
    InvalidDestination { path: PathBuf, reason: String },

    /// Failed to stat a discovered file (vanished mid-run, permissions)
    FileAccess { path: PathBuf, source: io::Error },

    /// Failed to read from a source file
    ReadError { path: PathBuf, source: io::Error },

    /// Failed to write to a destination file
    WriteError { path: PathBuf, source: io::Error },

    /// Failed to create a date-bucket directory
    DirectoryCreationFailed { path: PathBuf, source: io::Error },
}

impl Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SourceNotFound { path } => {
                write!(f, "Source directory not found: {}", path.display())
            }
            Self::SourceAccessDenied { path, .. } => {
                write!(f, "Source directory access denied: {}", path.display())
            }
            Self::InvalidSource { path, reason } => {
                write!(f, "Invalid source: {} ({})", path.display(), reason)
            }
            Self::DestinationNotFound { path } => {
                write!(f, "Destination directory not found: {}", path.display())
            }
            Self::DestinationAccessDenied { path, .. } => {
                write!(f, "Destination directory access denied: {}", path.display())
            }
            Self::InvalidDestination { path, reason } => {
                write!(f, "Invalid destination: {} ({})", path.display(), reason)
            }
            Self::FileAccess { path, source } => {
                write!(f, "Failed to access file: {} ({})", path.display(), source)
            }
            Self::ReadError { path, .. } => {
                write!(f, "Failed to read file: {}", path.display())
            }
            Self::WriteError { path, .. } => {
                write!(f, "Failed to write file: {}", path.display())
            }
            Self::DirectoryCreationFailed { path, .. } => {
                write!(f, "Failed to create directory: {}", path.display())
            }
        }
    }
}

impl Error for IngestError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::SourceAccessDenied { source, .. }
            | Self::DestinationAccessDenied { source, .. }
            | Self::FileAccess { source, .. }
            | Self::ReadError { source, .. }
            | Self::WriteError { source, .. }
            | Self::DirectoryCreationFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl IngestError {
    /// Extract the OS error code from this error, if available.
    pub fn raw_os_error(&self) -> Option<u32> {
        match self {
            Self::SourceAccessDenied { source, .. }
            | Self::DestinationAccessDenied { source, .. }
            | Self::FileAccess { source, .. }
            | Self::ReadError { source, .. }
            | Self::WriteError { source, .. }
            | Self::DirectoryCreationFailed { source, .. } => {
                source.raw_os_error().map(|e| e as u32)
            }
            _ => None,
        }
    }
}
