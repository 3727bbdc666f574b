//! Source discovery and extension filtering.
//!
//! Discovery recursively walks the source root and yields every regular file.
//! A walk error on an individual entry is reported through the progress
//! callback and skipped; it never aborts the overall walk. An unreadable or
//! missing root, by contrast, is fatal.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use crate::error::IngestError;
use crate::progress::ProgressCallback;

/// Recursively list every regular file under `root` in depth-first order.
///
/// Directories are descended into; symlinks are not followed and are not
/// yielded. Downstream stages must not depend on the traversal order.
///
/// # Errors
/// Returns an error only for an unusable root: missing, inaccessible, or not
/// a directory. Per-entry walk errors are reported via `progress` and the
/// affected entry is skipped.
pub fn discover(
    root: &Path,
    progress: Option<&dyn ProgressCallback>,
) -> Result<Vec<PathBuf>, IngestError> {
    match fs::metadata(root) {
        Ok(metadata) => {
            if !metadata.is_dir() {
                return Err(IngestError::InvalidSource {
                    path: root.to_path_buf(),
                    reason: "Source must be a directory".to_string(),
                });
            }
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(IngestError::SourceNotFound {
                path: root.to_path_buf(),
            });
        }
        Err(e) => {
            return Err(IngestError::SourceAccessDenied {
                path: root.to_path_buf(),
                source: e,
            });
        }
    }

    if let Some(callback) = progress {
        callback.on_scan_started(root);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() {
                    files.push(entry.into_path());
                }
            }
            Err(e) => {
                if let Some(callback) = progress {
                    callback.on_walk_error(&e.to_string());
                }
            }
        }
    }

    Ok(files)
}

/// Keep only paths whose lowercased string form ends with one of the allowed
/// extension tokens (dot-free, compared case-insensitively).
///
/// Input order is preserved. An empty allow-list yields an empty result.
pub fn filter_paths(paths: Vec<PathBuf>, allowed: &[String]) -> Vec<PathBuf> {
    paths
        .into_iter()
        .filter(|path| {
            let lower = path.to_string_lossy().to_lowercase();
            allowed.iter().any(|ext| lower.ends_with(&ext.to_lowercase()))
        })
        .collect()
}
