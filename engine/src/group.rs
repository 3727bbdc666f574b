//! Date bucketing.
//!
//! Splits classified records into two independent group maps, one per media
//! kind, keyed by the `YYYYMMDD` capture date. Records of unknown kind are
//! routed to neither map.

use chrono::NaiveDate;
use crate::model::{MediaFile, MediaGroups, MediaKind};
use crate::progress::ProgressCallback;

/// Bucket records by capture date, split by media kind.
///
/// Returns `(photos, videos)`. A record whose capture date falls strictly
/// before `from_date` is excluded from both outputs (reported via the
/// progress callback). Records of `Unknown` kind are dropped from both
/// outputs without a report. Within a bucket, records keep their input order.
pub fn group_by_date(
    records: Vec<MediaFile>,
    from_date: Option<NaiveDate>,
    progress: Option<&dyn ProgressCallback>,
) -> (MediaGroups, MediaGroups) {
    let mut photos = MediaGroups::new();
    let mut videos = MediaGroups::new();

    for record in records {
        if let Some(cutoff) = from_date {
            if record.captured_at.date_naive() < cutoff {
                if let Some(callback) = progress {
                    callback.on_file_skipped(&record);
                }
                continue;
            }
        }

        let key = record.date_key();
        match record.kind {
            MediaKind::Photo => photos.entry(key).or_default().push(record),
            MediaKind::Video => videos.entry(key).or_default().push(record),
            MediaKind::Unknown => {}
        }
    }

    (photos, videos)
}
