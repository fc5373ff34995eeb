//! Filesystem scanning.
//!
//! Stage 1 of the build pipeline. Walks the source tree to discover year
//! directories and the media files inside them.
//!
//! ## Directory Structure
//!
//! The pipeline expects a flat year-per-directory layout:
//!
//! ```text
//! photos/                          # Source root
//! ├── config.toml                  # Build configuration (optional)
//! ├── 2018/
//! │   ├── IMG_20180305_143000.jpg
//! │   ├── C360_2018-07-22-10-15-02-331.jpg
//! │   └── VID_20181224_191500.mp4
//! ├── 2019/
//! │   └── holiday.png
//! └── notes/                       # Not a year → ignored
//! ```
//!
//! Only directories whose name is a four-digit year between 1900 and 2100
//! participate in the build; files in the root and directories with other
//! names are ignored. Media files are matched by extension,
//! case-insensitively, and everything else inside a year directory is
//! skipped. An empty year directory is still a year: it shows up in the
//! catalog with no items.

use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source directory not found: {0}")]
    SourceNotFound(PathBuf),
}

/// Photo extensions the pipeline accepts as sources.
pub const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Video container extensions, copied through without transcoding.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "m4v", "webm"];

/// Directory names outside this range are ordinary directories, not years.
const YEAR_RANGE: RangeInclusive<i32> = 1900..=2100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    Video,
}

/// One media file discovered in a year directory.
#[derive(Debug, Clone)]
pub struct SourceAsset {
    pub path: PathBuf,
    /// Original filename; drives ordering and the catalog display name.
    pub name: String,
    pub kind: MediaKind,
    /// Year of the containing directory.
    pub year: i32,
}

/// A source directory whose name is a valid year.
#[derive(Debug, Clone)]
pub struct YearDir {
    pub year: i32,
    pub path: PathBuf,
}

/// Per-year media counts for the `check` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearInventory {
    pub year: i32,
    pub photos: usize,
    pub videos: usize,
}

/// Classify a path by extension. Non-media files return `None`.
pub fn media_kind(path: &Path) -> Option<MediaKind> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    if PHOTO_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Photo)
    } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Video)
    } else {
        None
    }
}

/// Parse a directory name as a year, if it is one.
pub fn parse_year(name: &str) -> Option<i32> {
    if name.len() != 4 || !name.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let year: i32 = name.parse().ok()?;
    YEAR_RANGE.contains(&year).then_some(year)
}

/// Find all year directories under `root`, sorted ascending.
pub fn discover_years(root: &Path) -> Result<Vec<YearDir>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::SourceNotFound(root.to_path_buf()));
    }

    let mut years: Vec<YearDir> = fs::read_dir(root)?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .filter_map(|e| {
            let name = e.file_name().to_string_lossy().to_string();
            parse_year(&name).map(|year| YearDir {
                year,
                path: e.path(),
            })
        })
        .collect();

    years.sort_by_key(|y| y.year);
    Ok(years)
}

/// List the media files directly inside a year directory.
///
/// Sorted by lowercased filename (raw name as tiebreak) so scan order is
/// deterministic across filesystems.
pub fn collect_media(dir: &YearDir) -> Result<Vec<SourceAsset>, ScanError> {
    let mut assets: Vec<SourceAsset> = fs::read_dir(&dir.path)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter_map(|path| {
            let kind = media_kind(&path)?;
            let name = path.file_name()?.to_string_lossy().to_string();
            Some(SourceAsset {
                path,
                name,
                kind,
                year: dir.year,
            })
        })
        .collect();

    assets.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });
    Ok(assets)
}

/// Count media per year without touching any outputs.
pub fn inventory(root: &Path) -> Result<Vec<YearInventory>, ScanError> {
    let mut rows = Vec::new();
    for dir in discover_years(root)? {
        let media = collect_media(&dir)?;
        let photos = media.iter().filter(|a| a.kind == MediaKind::Photo).count();
        rows.push(YearInventory {
            year: dir.year,
            photos,
            videos: media.len() - photos,
        });
    }
    Ok(rows)
}
