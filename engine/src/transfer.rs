//! Concurrent bucket transfer.
//!
//! One task per media kind, one nested task per date bucket, joined with
//! `std::thread::scope` at both levels. Each bucket owns its destination
//! directory exclusively, so tasks never contend on the filesystem; the only
//! shared state is the pair of atomic counters and the failure list.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::thread;
use crate::error::IngestError;
use crate::model::{IngestOptions, IngestSummary, MediaFile, MediaGroups, MediaKind, TransferFailure};
use crate::progress::{ProgressCallback, TransferTotals};

/// Destination directory name for a date bucket: `{key}` or `{key}_{suffix}`.
pub fn bucket_dir_name(date_key: &str, suffix: Option<&str>) -> String {
    match suffix {
        Some(suffix) if !suffix.is_empty() => format!("{}_{}", date_key, suffix),
        _ => date_key.to_string(),
    }
}

/// Copy the full contents of `src` to `dst`, overwriting any existing file,
/// and carry the source modification time over to the destination (the mtime
/// is the capture timestamp, so it must survive the copy).
///
/// # Returns
/// Number of bytes copied
pub fn copy_file(src: &Path, dst: &Path) -> Result<u64, IngestError> {
    let mut src_file = fs::File::open(src).map_err(|e| IngestError::ReadError {
        path: src.to_path_buf(),
        source: e,
    })?;

    let src_mtime = src_file.metadata().ok().and_then(|m| m.modified().ok());

    let mut dst_file = fs::File::create(dst).map_err(|e| IngestError::WriteError {
        path: dst.to_path_buf(),
        source: e,
    })?;

    let bytes_copied = io::copy(&mut src_file, &mut dst_file).map_err(|e| {
        if e.kind() == io::ErrorKind::PermissionDenied {
            IngestError::WriteError {
                path: dst.to_path_buf(),
                source: e,
            }
        } else {
            IngestError::ReadError {
                path: src.to_path_buf(),
                source: e,
            }
        }
    })?;

    if let Some(mtime) = src_mtime {
        let _ = filetime::set_file_mtime(dst, filetime::FileTime::from_system_time(mtime));
    }

    Ok(bytes_copied)
}

/// Execute the transfer: every photo bucket into the photo destination root,
/// every video bucket into the video destination root, concurrently.
///
/// Destination roots are expected to exist already (run orchestration
/// validates them); each bucket creates exactly one directory level below
/// its root. Returns only after every kind task and every nested bucket task
/// has joined. Per-file and per-bucket errors are collected in the summary
/// and never abort the run; counters reflect successful copies only.
pub fn transfer(
    photos: &MediaGroups,
    videos: &MediaGroups,
    options: &IngestOptions,
    progress: Option<&dyn ProgressCallback>,
) -> IngestSummary {
    let totals = TransferTotals::new();
    let failures = Mutex::new(Vec::new());
    let suffix = options.dest_suffix.as_deref();

    thread::scope(|s| {
        s.spawn(|| {
            transfer_kind(
                MediaKind::Photo,
                photos,
                &options.photo_destination,
                suffix,
                &totals,
                &failures,
                progress,
            )
        });
        s.spawn(|| {
            transfer_kind(
                MediaKind::Video,
                videos,
                &options.video_destination,
                suffix,
                &totals,
                &failures,
                progress,
            )
        });
    });

    IngestSummary {
        files_copied: totals.files(),
        bytes_copied: totals.bytes(),
        failures: failures.into_inner().unwrap_or_else(|e| e.into_inner()),
    }
}

/// Fan out one task per date bucket of a single kind and wait for all of them.
fn transfer_kind(
    kind: MediaKind,
    groups: &MediaGroups,
    destination_root: &Path,
    suffix: Option<&str>,
    totals: &TransferTotals,
    failures: &Mutex<Vec<TransferFailure>>,
    progress: Option<&dyn ProgressCallback>,
) {
    thread::scope(|s| {
        for (date_key, files) in groups {
            s.spawn(move || {
                transfer_bucket(
                    kind,
                    date_key,
                    files,
                    destination_root,
                    suffix,
                    totals,
                    failures,
                    progress,
                )
            });
        }
    });
}

/// Copy one bucket's files into its dated directory.
///
/// A directory creation failure skips the whole bucket; a copy failure skips
/// only that file. Both are recorded and reported, never raised.
fn transfer_bucket(
    kind: MediaKind,
    date_key: &str,
    files: &[MediaFile],
    destination_root: &Path,
    suffix: Option<&str>,
    totals: &TransferTotals,
    failures: &Mutex<Vec<TransferFailure>>,
    progress: Option<&dyn ProgressCallback>,
) {
    let directory = destination_root.join(bucket_dir_name(date_key, suffix));

    // Idempotent: a pre-existing directory is fine, only a real failure
    // (permissions, disk full) abandons the bucket.
    if let Err(error) = ensure_bucket_dir(&directory) {
        if let Some(callback) = progress {
            callback.on_transfer_error(&error.to_string());
        }
        record_failure(failures, directory, &error);
        return;
    }

    if let Some(callback) = progress {
        callback.on_bucket_started(kind, date_key, &directory);
    }

    for file in files {
        let destination = directory.join(&file.file_name);
        match copy_file(&file.source_path, &destination) {
            Ok(bytes) => {
                totals.record(bytes);
                if let Some(callback) = progress {
                    callback.on_file_copied(file, &destination);
                }
            }
            Err(error) => {
                if let Some(callback) = progress {
                    callback.on_transfer_error(&error.to_string());
                }
                record_failure(failures, file.source_path.clone(), &error);
            }
        }
    }
}

/// Create a bucket directory directly under its (already validated)
/// destination root. A path that already exists as a directory is fine;
/// anything else is a creation failure.
fn ensure_bucket_dir(path: &Path) -> Result<(), IngestError> {
    match fs::create_dir(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
        Err(e) => Err(IngestError::DirectoryCreationFailed {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

fn record_failure(failures: &Mutex<Vec<TransferFailure>>, path: PathBuf, error: &IngestError) {
    let mut failures = failures.lock().unwrap_or_else(|e| e.into_inner());
    failures.push(TransferFailure {
        path,
        message: error.to_string(),
        error_code: error.raw_os_error(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use filetime::FileTime;
    use std::time::SystemTime;

    fn make_record(dir: &Path, name: &str, y: i32, m: u32, d: u32, contents: &[u8]) -> MediaFile {
        let path = dir.join(name);
        fs::write(&path, contents).expect("Failed to write file");
        let captured = Local.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap();
        filetime::set_file_mtime(&path, FileTime::from_system_time(SystemTime::from(captured)))
            .expect("Failed to set mtime");
        MediaFile::from_path(&path).expect("Failed to build record")
    }

    fn options(photo_dest: &Path, video_dest: &Path, suffix: Option<&str>) -> IngestOptions {
        IngestOptions {
            source: PathBuf::from("unused"),
            photo_destination: photo_dest.to_path_buf(),
            video_destination: video_dest.to_path_buf(),
            include_formats: vec!["jpg".to_string(), "mp4".to_string()],
            dest_suffix: suffix.map(|s| s.to_string()),
            from_date: None,
        }
    }

    #[test]
    fn test_bucket_dir_name_without_suffix() {
        assert_eq!(bucket_dir_name("20220830", None), "20220830");
        assert_eq!(bucket_dir_name("20220830", Some("")), "20220830");
    }

    #[test]
    fn test_bucket_dir_name_with_suffix() {
        assert_eq!(bucket_dir_name("20220830", Some("raw")), "20220830_raw");
    }

    #[test]
    fn test_copy_file_copies_contents_and_mtime() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let record = make_record(temp_dir.path(), "DSC1.jpg", 2022, 8, 30, b"jpeg data");
        let dst = temp_dir.path().join("copied.jpg");

        let bytes = copy_file(&record.source_path, &dst).expect("Failed to copy");
        assert_eq!(bytes, 9);
        assert_eq!(fs::read(&dst).expect("Failed to read"), b"jpeg data");

        let copied = MediaFile::from_path(&dst).expect("Failed to stat copy");
        assert_eq!(copied.date_key(), "20220830");
    }

    #[test]
    fn test_copy_file_overwrites_existing_destination() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let record = make_record(temp_dir.path(), "DSC1.jpg", 2022, 8, 30, b"new contents");
        let dst = temp_dir.path().join("existing.jpg");
        fs::write(&dst, b"previous ingest left this here").expect("Failed to write");

        copy_file(&record.source_path, &dst).expect("Failed to copy");
        assert_eq!(fs::read(&dst).expect("Failed to read"), b"new contents");
    }

    #[test]
    fn test_transfer_copies_buckets_into_dated_directories() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("src");
        fs::create_dir(&src).expect("Failed to create src");
        let photo_dest = temp_dir.path().join("photos");
        let video_dest = temp_dir.path().join("videos");
        fs::create_dir(&photo_dest).expect("Failed to create photo dest");
        fs::create_dir(&video_dest).expect("Failed to create video dest");

        let mut photos = MediaGroups::new();
        photos.insert(
            "20220830".to_string(),
            vec![
                make_record(&src, "DSC1.jpg", 2022, 8, 30, b"one"),
                make_record(&src, "DSC2.jpg", 2022, 8, 30, b"twoo"),
            ],
        );
        photos.insert(
            "20220831".to_string(),
            vec![make_record(&src, "DSC9.jpg", 2022, 8, 31, b"three")],
        );
        let mut videos = MediaGroups::new();
        videos.insert(
            "20220830".to_string(),
            vec![make_record(&src, "C0001.mp4", 2022, 8, 30, b"movie")],
        );

        let opts = options(&photo_dest, &video_dest, None);
        let summary = transfer(&photos, &videos, &opts, None);

        assert!(summary.is_clean());
        assert_eq!(summary.files_copied, 4);
        assert_eq!(summary.bytes_copied, 3 + 4 + 5 + 5);
        assert!(photo_dest.join("20220830").join("DSC1.jpg").is_file());
        assert!(photo_dest.join("20220830").join("DSC2.jpg").is_file());
        assert!(photo_dest.join("20220831").join("DSC9.jpg").is_file());
        assert!(video_dest.join("20220830").join("C0001.mp4").is_file());
    }

    #[test]
    fn test_transfer_applies_destination_suffix() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("src");
        fs::create_dir(&src).expect("Failed to create src");
        let photo_dest = temp_dir.path().join("photos");
        let video_dest = temp_dir.path().join("videos");
        fs::create_dir(&photo_dest).expect("Failed to create photo dest");
        fs::create_dir(&video_dest).expect("Failed to create video dest");

        let mut photos = MediaGroups::new();
        photos.insert(
            "20220830".to_string(),
            vec![make_record(&src, "DSC1.jpg", 2022, 8, 30, b"x")],
        );

        let opts = options(&photo_dest, &video_dest, Some("raw"));
        let summary = transfer(&photos, &MediaGroups::new(), &opts, None);

        assert_eq!(summary.files_copied, 1);
        assert!(photo_dest.join("20220830_raw").join("DSC1.jpg").is_file());
    }

    #[test]
    fn test_transfer_tolerates_preexisting_bucket_directory() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("src");
        fs::create_dir(&src).expect("Failed to create src");
        let photo_dest = temp_dir.path().join("photos");
        fs::create_dir_all(photo_dest.join("20220830")).expect("Failed to pre-create bucket");

        let mut photos = MediaGroups::new();
        photos.insert(
            "20220830".to_string(),
            vec![make_record(&src, "DSC1.jpg", 2022, 8, 30, b"x")],
        );

        let opts = options(&photo_dest, &temp_dir.path().join("videos"), None);
        let summary = transfer(&photos, &MediaGroups::new(), &opts, None);

        assert!(summary.is_clean());
        assert_eq!(summary.files_copied, 1);
    }

    #[test]
    fn test_transfer_skips_vanished_file_and_continues() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("src");
        fs::create_dir(&src).expect("Failed to create src");
        let photo_dest = temp_dir.path().join("photos");
        fs::create_dir(&photo_dest).expect("Failed to create photo dest");

        let vanished = make_record(&src, "gone.jpg", 2022, 8, 30, b"ephemeral");
        let surviving = make_record(&src, "stays.jpg", 2022, 8, 30, b"kept");
        fs::remove_file(&vanished.source_path).expect("Failed to remove file");

        let mut photos = MediaGroups::new();
        photos.insert("20220830".to_string(), vec![vanished, surviving]);

        let opts = options(&photo_dest, &temp_dir.path().join("videos"), None);
        let summary = transfer(&photos, &MediaGroups::new(), &opts, None);

        assert_eq!(summary.files_copied, 1);
        assert_eq!(summary.bytes_copied, 4);
        assert_eq!(summary.failures.len(), 1);
        assert!(summary.failures[0].path.ends_with("gone.jpg"));
        assert!(
            summary.failures[0].error_code.is_some(),
            "OS error code should accompany the failure"
        );
        assert!(photo_dest.join("20220830").join("stays.jpg").is_file());
        assert!(!photo_dest.join("20220830").join("gone.jpg").exists());
    }

    #[test]
    fn test_transfer_directory_failure_skips_only_that_bucket() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("src");
        fs::create_dir(&src).expect("Failed to create src");
        let photo_dest = temp_dir.path().join("photos");
        fs::create_dir(&photo_dest).expect("Failed to create photo dest");

        // A plain file where the bucket directory should go fails directory
        // creation for that bucket only.
        fs::write(photo_dest.join("20220830"), b"in the way").expect("Failed to write blocker");

        let mut photos = MediaGroups::new();
        photos.insert(
            "20220830".to_string(),
            vec![make_record(&src, "blocked.jpg", 2022, 8, 30, b"aa")],
        );
        photos.insert(
            "20220831".to_string(),
            vec![make_record(&src, "fine.jpg", 2022, 8, 31, b"bbb")],
        );

        let opts = options(&photo_dest, &temp_dir.path().join("videos"), None);
        let summary = transfer(&photos, &MediaGroups::new(), &opts, None);

        assert_eq!(summary.files_copied, 1);
        assert_eq!(summary.bytes_copied, 3);
        assert_eq!(summary.failures.len(), 1);
        assert!(photo_dest.join("20220831").join("fine.jpg").is_file());
    }
}
