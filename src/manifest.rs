//! Timeline catalog: the single JSON document the site reads.
//!
//! The catalog is rebuilt wholesale on every run and written in one pass;
//! there is no incremental patching. Years ascend, items within a year
//! order by capture time with undated items last, and counts are computed
//! once over the final structure.
//!
//! ## Item shape
//!
//! Items are tagged by `kind`. A photo references its four derived files,
//! a video references its verbatim copy plus poster renditions (or the
//! shared placeholder when no poster could be extracted). All asset
//! references are site-relative (`assets/<year>/<file>`) so the output
//! directory can be served from any prefix.

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Catalog filename under `<output>/data/`.
pub const CATALOG_FILE: &str = "timeline.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoItem {
    pub name: String,
    pub date: String,
    pub ts: Option<i64>,
    pub src: String,
    pub src_fallback: String,
    pub thumb: String,
    pub thumb_fallback: String,
    pub w: u32,
    pub h: u32,
    pub tw: u32,
    pub th: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoItem {
    pub name: String,
    pub date: String,
    pub ts: Option<i64>,
    pub video: String,
    /// Empty when no poster frame could be extracted.
    pub poster: String,
    pub poster_fallback: String,
    pub thumb: String,
    pub thumb_fallback: String,
    pub w: u32,
    pub h: u32,
    pub tw: u32,
    pub th: u32,
}

/// One timeline entry, tagged by `kind` in the JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TimelineItem {
    Photo(PhotoItem),
    Video(VideoItem),
}

impl TimelineItem {
    pub fn name(&self) -> &str {
        match self {
            TimelineItem::Photo(p) => &p.name,
            TimelineItem::Video(v) => &v.name,
        }
    }

    pub fn ts(&self) -> Option<i64> {
        match self {
            TimelineItem::Photo(p) => p.ts,
            TimelineItem::Video(v) => v.ts,
        }
    }

    pub fn is_video(&self) -> bool {
        matches!(self, TimelineItem::Video(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearEntry {
    pub year: i32,
    pub items: Vec<TimelineItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Counts {
    pub years: usize,
    pub items: usize,
    pub photos: usize,
    pub videos: usize,
    pub regenerated: usize,
    pub videos_copied: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub generated_at: String,
    pub years: Vec<YearEntry>,
    pub counts: Counts,
}

/// Site-relative reference for a derived file in a year directory.
pub fn asset_web_path(year: i32, file: &str) -> String {
    format!("assets/{year}/{file}")
}

/// Where the catalog lives under the output root.
pub fn catalog_path(output_root: &Path) -> PathBuf {
    output_root.join("data").join(CATALOG_FILE)
}

/// Order items by capture time, undated last, with a total tie-break.
///
/// Key: (has no timestamp, epoch seconds, lowercased name), then the raw
/// name, so two runs over the same tree always produce identical output.
pub fn sort_items(items: &mut [TimelineItem]) {
    items.sort_by(|a, b| {
        (a.ts().is_none(), a.ts().unwrap_or(0), a.name().to_lowercase())
            .cmp(&(b.ts().is_none(), b.ts().unwrap_or(0), b.name().to_lowercase()))
            .then_with(|| a.name().cmp(b.name()))
    });
}

/// Assemble the final catalog: sort years and items, compute counts,
/// stamp the generation time.
pub fn build_catalog(
    mut years: Vec<YearEntry>,
    regenerated: usize,
    videos_copied: usize,
) -> Catalog {
    years.sort_by_key(|y| y.year);
    for year in &mut years {
        sort_items(&mut year.items);
    }

    let items: usize = years.iter().map(|y| y.items.len()).sum();
    let videos: usize = years
        .iter()
        .flat_map(|y| y.items.iter())
        .filter(|i| i.is_video())
        .count();

    let counts = Counts {
        years: years.len(),
        items,
        photos: items - videos,
        videos,
        regenerated,
        videos_copied,
    };

    Catalog {
        generated_at: Local::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
        years,
        counts,
    }
}

/// Serialize the catalog and write it in one pass.
///
/// Returns the path written.
pub fn write_catalog(output_root: &Path, catalog: &Catalog) -> Result<PathBuf, ManifestError> {
    let path = catalog_path(output_root);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(catalog)?;
    fs::write(&path, json)?;
    Ok(path)
}
