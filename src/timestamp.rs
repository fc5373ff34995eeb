//! Capture-time resolution.
//!
//! Every asset gets at most one timestamp, resolved through an ordered
//! fallback chain: embedded EXIF first, then progressively looser filename
//! conventions. The containing folder has the last word on the year.
//!
//! ## Resolution chain
//!
//! 1. EXIF `DateTimeOriginal`, `DateTime`, `DateTimeDigitized` (photos only)
//! 2. `IMG_YYYYMMDD_HHMMSS` filename marker
//! 3. `VID_YYYYMMDD_HHMMSS` filename marker
//! 4. `C360_YYYY-MM-DD-HH-MM-SS` camera-app marker
//! 5. A 13-digit run of digits, read as epoch milliseconds in UTC
//! 6. Loose `YYYY-MM-DD HH:MM:SS` with `.`/`-`/`_` delimiters
//! 7. Loose `YYYY-MM-DD`, time defaulting to midnight
//! 8. No match → the asset has no timestamp
//!
//! Whatever the chain finds, the year is rewritten to the folder's year; a
//! Feb 29 landing in a non-leap year becomes Mar 1 with the time of day
//! kept. Display and ordering therefore always agree with the folder an
//! asset lives in, even when a camera clock was set wrong.

use crate::scan::{MediaKind, SourceAsset};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use exif::{In, Tag};
use regex::{Captures, Regex};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::LazyLock;

static RE_IMG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)IMG_(\d{8})_(\d{6})").unwrap());

static RE_VID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)VID_(\d{8})_(\d{6})").unwrap());

static RE_C360: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)C360_(\d{4}-\d{2}-\d{2}-\d{2}-\d{2}-\d{2})").unwrap());

static RE_EPOCH_MS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d{13})").unwrap());

static RE_LOOSE_DATETIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"((?:19|20)\d{2})[._-](\d{2})[._-](\d{2})[ ._-]{1,3}(\d{2})[._-]?(\d{2})[._-]?(\d{2})")
        .unwrap()
});

static RE_LOOSE_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"((?:19|20)\d{2})[._-](\d{2})[._-](\d{2})").unwrap());

type NameStrategy = fn(&str) -> Option<NaiveDateTime>;

/// Filename strategies in priority order. Each either produces a valid
/// calendar datetime or passes to the next; a regex hit whose captures
/// fail validation does not stop the chain.
const NAME_STRATEGIES: &[NameStrategy] = &[
    img_marker,
    vid_marker,
    c360_marker,
    epoch_millis,
    loose_datetime,
    loose_date,
];

/// Resolve the capture time for one asset, aligned to its folder year.
pub fn resolve(asset: &SourceAsset) -> Option<NaiveDateTime> {
    let dt = match asset.kind {
        MediaKind::Photo => {
            embedded_capture_time(&asset.path).or_else(|| from_filename(&asset.name))
        }
        MediaKind::Video => from_filename(&asset.name),
    }?;
    Some(align_to_year(dt, asset.year))
}

/// Try every filename strategy in order.
pub fn from_filename(name: &str) -> Option<NaiveDateTime> {
    NAME_STRATEGIES.iter().find_map(|strategy| strategy(name))
}

/// Force `dt` into `year`, keeping month, day and time of day.
///
/// Feb 29 has no equivalent in a non-leap year and becomes Mar 1 there.
pub fn align_to_year(dt: NaiveDateTime, year: i32) -> NaiveDateTime {
    if dt.year() == year {
        return dt;
    }
    match dt.with_year(year) {
        Some(adjusted) => adjusted,
        None => match NaiveDate::from_ymd_opt(year, 3, 1) {
            Some(date) => date.and_time(dt.time()),
            None => dt,
        },
    }
}

/// Catalog fields for a resolved timestamp: display string plus epoch
/// seconds (UTC). Unknown timestamps yield an empty string and no epoch.
pub fn date_fields(dt: Option<NaiveDateTime>) -> (String, Option<i64>) {
    match dt {
        Some(dt) => (
            dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            Some(dt.and_utc().timestamp()),
        ),
        None => (String::new(), None),
    }
}

fn embedded_capture_time(path: &Path) -> Option<NaiveDateTime> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    let meta = exif::Reader::new().read_from_container(&mut reader).ok()?;

    for tag in [Tag::DateTimeOriginal, Tag::DateTime, Tag::DateTimeDigitized] {
        if let Some(field) = meta.get_field(tag, In::PRIMARY) {
            if let Some(dt) = parse_exif_datetime(&field.display_value().to_string()) {
                return Some(dt);
            }
        }
    }
    None
}

/// Parse an EXIF datetime string, tolerating the delimiter variations
/// cameras produce (`-`, `/`, `\`, `.` in place of `:`).
fn parse_exif_datetime(value: &str) -> Option<NaiveDateTime> {
    let normalized = value.trim().replace(['-', '/', '\\', '.'], ":");
    if let Ok(dt) = NaiveDateTime::parse_from_str(&normalized, "%Y:%m:%d %H:%M:%S") {
        return Some(dt);
    }
    // Date-only value → midnight
    NaiveDate::parse_from_str(&normalized, "%Y:%m:%d")
        .ok()?
        .and_hms_opt(0, 0, 0)
}

fn capture_u32(caps: &Captures, i: usize) -> Option<u32> {
    caps.get(i)?.as_str().parse().ok()
}

fn compact_marker(re: &Regex, name: &str) -> Option<NaiveDateTime> {
    let caps = re.captures(name)?;
    let compact = format!("{}{}", &caps[1], &caps[2]);
    NaiveDateTime::parse_from_str(&compact, "%Y%m%d%H%M%S").ok()
}

fn img_marker(name: &str) -> Option<NaiveDateTime> {
    compact_marker(&RE_IMG, name)
}

fn vid_marker(name: &str) -> Option<NaiveDateTime> {
    compact_marker(&RE_VID, name)
}

fn c360_marker(name: &str) -> Option<NaiveDateTime> {
    let caps = RE_C360.captures(name)?;
    NaiveDateTime::parse_from_str(&caps[1], "%Y-%m-%d-%H-%M-%S").ok()
}

fn epoch_millis(name: &str) -> Option<NaiveDateTime> {
    let caps = RE_EPOCH_MS.captures(name)?;
    let ms: i64 = caps[1].parse().ok()?;
    Some(DateTime::from_timestamp_millis(ms)?.naive_utc())
}

fn loose_datetime(name: &str) -> Option<NaiveDateTime> {
    let caps = RE_LOOSE_DATETIME.captures(name)?;
    let date = NaiveDate::from_ymd_opt(
        capture_u32(&caps, 1)? as i32,
        capture_u32(&caps, 2)?,
        capture_u32(&caps, 3)?,
    )?;
    date.and_hms_opt(
        capture_u32(&caps, 4)?,
        capture_u32(&caps, 5)?,
        capture_u32(&caps, 6)?,
    )
}

fn loose_date(name: &str) -> Option<NaiveDateTime> {
    let caps = RE_LOOSE_DATE.captures(name)?;
    let date = NaiveDate::from_ymd_opt(
        capture_u32(&caps, 1)? as i32,
        capture_u32(&caps, 2)?,
        capture_u32(&caps, 3)?,
    )?;
    date.and_hms_opt(0, 0, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use std::path::PathBuf;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    // =========================================================================
    // Filename strategy tests
    // =========================================================================

    #[test]
    fn img_marker_parses() {
        assert_eq!(
            from_filename("IMG_20180305_143000.jpg"),
            Some(dt(2018, 3, 5, 14, 30, 0))
        );
    }

    #[test]
    fn img_marker_is_case_insensitive() {
        assert_eq!(
            from_filename("img_20180305_143000.jpg"),
            Some(dt(2018, 3, 5, 14, 30, 0))
        );
    }

    #[test]
    fn vid_marker_parses() {
        assert_eq!(
            from_filename("VID_20181224_191500.mp4"),
            Some(dt(2018, 12, 24, 19, 15, 0))
        );
    }

    #[test]
    fn c360_marker_parses_with_millis_suffix() {
        assert_eq!(
            from_filename("C360_2015-06-17-16-03-38-492.jpg"),
            Some(dt(2015, 6, 17, 16, 3, 38))
        );
    }

    #[test]
    fn epoch_millis_reads_as_utc() {
        // 1609459200000 ms = 2021-01-01T00:00:00Z
        assert_eq!(
            from_filename("photo_1609459200000.jpg"),
            Some(dt(2021, 1, 1, 0, 0, 0))
        );
    }

    #[test]
    fn loose_datetime_with_mixed_delimiters() {
        assert_eq!(
            from_filename("2018-03-05_14.30.00.jpg"),
            Some(dt(2018, 3, 5, 14, 30, 0))
        );
    }

    #[test]
    fn loose_date_defaults_to_midnight() {
        assert_eq!(
            from_filename("scan 2019-07-04.png"),
            Some(dt(2019, 7, 4, 0, 0, 0))
        );
    }

    #[test]
    fn img_marker_wins_over_epoch() {
        assert_eq!(
            from_filename("IMG_20180305_143000_1609459200000.jpg"),
            Some(dt(2018, 3, 5, 14, 30, 0))
        );
    }

    #[test]
    fn invalid_calendar_values_fall_through() {
        // Month 99 fails IMG validation, and nothing later matches either
        assert_eq!(from_filename("IMG_99999999_999999.jpg"), None);
    }

    #[test]
    fn undated_name_returns_none() {
        assert_eq!(from_filename("birthday.jpg"), None);
        assert_eq!(from_filename(""), None);
    }

    // =========================================================================
    // EXIF value parsing tests
    // =========================================================================

    #[test]
    fn exif_datetime_standard_form() {
        assert_eq!(
            parse_exif_datetime("2018:03:05 14:30:00"),
            Some(dt(2018, 3, 5, 14, 30, 0))
        );
    }

    #[test]
    fn exif_datetime_normalizes_delimiters() {
        assert_eq!(
            parse_exif_datetime("2018-03-05 14:30:00"),
            Some(dt(2018, 3, 5, 14, 30, 0))
        );
        assert_eq!(
            parse_exif_datetime("2018/03/05 14:30:00"),
            Some(dt(2018, 3, 5, 14, 30, 0))
        );
    }

    #[test]
    fn exif_date_only_becomes_midnight() {
        assert_eq!(
            parse_exif_datetime("2018:03:05"),
            Some(dt(2018, 3, 5, 0, 0, 0))
        );
    }

    #[test]
    fn exif_garbage_is_none() {
        assert_eq!(parse_exif_datetime("not a date"), None);
        assert_eq!(parse_exif_datetime(""), None);
    }

    // =========================================================================
    // Year alignment tests
    // =========================================================================

    #[test]
    fn align_keeps_matching_year() {
        let t = dt(2018, 3, 5, 14, 30, 0);
        assert_eq!(align_to_year(t, 2018), t);
    }

    #[test]
    fn align_rewrites_year_keeping_time() {
        assert_eq!(
            align_to_year(dt(2019, 3, 5, 14, 30, 0), 2018),
            dt(2018, 3, 5, 14, 30, 0)
        );
    }

    #[test]
    fn align_maps_feb29_to_mar1_in_non_leap_year() {
        assert_eq!(
            align_to_year(dt(2016, 2, 29, 10, 15, 0), 2018),
            dt(2018, 3, 1, 10, 15, 0)
        );
    }

    #[test]
    fn align_keeps_feb29_in_leap_year() {
        assert_eq!(
            align_to_year(dt(2016, 2, 29, 10, 15, 0), 2020),
            dt(2020, 2, 29, 10, 15, 0)
        );
    }

    // =========================================================================
    // resolve / date_fields tests
    // =========================================================================

    #[test]
    fn resolve_video_uses_filename_only() {
        let asset = SourceAsset {
            path: PathBuf::from("/nonexistent/VID_20181224_191500.mp4"),
            name: "VID_20181224_191500.mp4".to_string(),
            kind: MediaKind::Video,
            year: 2018,
        };
        assert_eq!(resolve(&asset), Some(dt(2018, 12, 24, 19, 15, 0)));
    }

    #[test]
    fn resolve_photo_falls_back_to_filename_when_unreadable() {
        let asset = SourceAsset {
            path: PathBuf::from("/nonexistent/IMG_20190305_143000.jpg"),
            name: "IMG_20190305_143000.jpg".to_string(),
            kind: MediaKind::Photo,
            year: 2018,
        };
        // Filename says 2019, folder says 2018: folder wins
        assert_eq!(resolve(&asset), Some(dt(2018, 3, 5, 14, 30, 0)));
    }

    #[test]
    fn resolve_unknown_returns_none() {
        let asset = SourceAsset {
            path: PathBuf::from("/nonexistent/party.mp4"),
            name: "party.mp4".to_string(),
            kind: MediaKind::Video,
            year: 2018,
        };
        assert_eq!(resolve(&asset), None);
    }

    #[test]
    fn date_fields_for_known_timestamp() {
        let (date, ts) = date_fields(Some(dt(2021, 1, 1, 0, 0, 0)));
        assert_eq!(date, "2021-01-01 00:00:00");
        assert_eq!(ts, Some(1609459200));
    }

    #[test]
    fn date_fields_for_unknown_timestamp() {
        assert_eq!(date_fields(None), (String::new(), None));
    }

    #[test]
    fn align_preserves_time_of_day_fields() {
        let aligned = align_to_year(dt(2016, 2, 29, 23, 59, 58), 2017);
        assert_eq!(
            (aligned.hour(), aligned.minute(), aligned.second()),
            (23, 59, 58)
        );
    }
}
