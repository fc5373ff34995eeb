//! Build orchestration.
//!
//! Walks the year directories, decides per asset whether its derived files
//! need regenerating, transcodes what is stale, sweeps what is orphaned,
//! and assembles the timeline catalog. One call does the whole run:
//!
//! ```text
//! photos/                          site/
//! ├── 2018/                        ├── assets/
//! │   ├── IMG_20180305_1430.jpg    │   ├── video-placeholder.svg
//! │   └── clip.mp4          ───►   │   └── 2018/
//! └── 2019/                        │       ├── IMG_20180305_1430.avif
//!     └── beach.png                │       ├── IMG_20180305_1430_thumb.avif
//!                                  │       ├── IMG_20180305_1430.jpg
//!                                  │       ├── IMG_20180305_1430_thumb.jpg
//!                                  │       ├── clip.mp4
//!                                  │       └── clip.avif ... (poster set)
//!                                  └── data/
//!                                      └── timeline.json
//! ```
//!
//! Per-asset failures never abort the run. A photo that cannot be encoded
//! is dropped from the catalog and its leftovers are swept; a video whose
//! poster cannot be extracted keeps its catalog entry with a placeholder
//! thumbnail. Unreadable year directories are skipped and reported.
//!
//! Processing is sequential. Re-running against unchanged sources performs
//! no encoding work and leaves the output tree byte-identical apart from
//! the catalog's generation timestamp.

use crate::config::Settings;
use crate::imaging::{
    BackendError, DeriveConfig, ImageBackend, Quality, RustBackend, WebImageSet, derive_web_set,
    web_set_names,
};
use crate::manifest::{
    self, Catalog, ManifestError, PhotoItem, TimelineItem, VideoItem, YearEntry, asset_web_path,
};
use crate::reconcile;
use crate::scan::{self, MediaKind, ScanError, SourceAsset};
use crate::stale;
use crate::timestamp;
use crate::video::{self, FrameExtractor, PLACEHOLDER_WEB_PATH, VideoError};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
    #[error("Video error: {0}")]
    Video(#[from] VideoError),
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),
}

/// Per-asset errors surfaced as event detail, never as run failures.
#[derive(Error, Debug)]
enum PosterError {
    #[error(transparent)]
    Video(#[from] VideoError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Options for one build run.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub derive: DeriveConfig,
    /// Regenerate everything, ignoring mtimes.
    pub force: bool,
}

impl BuildOptions {
    /// Build options from loaded settings.
    pub fn from_settings(settings: &Settings, force: bool) -> Self {
        let img = &settings.images;
        Self {
            derive: DeriveConfig {
                max_edge: img.max_size,
                thumb_edge: img.thumb_size,
                quality: Quality::new(img.quality),
                thumb_quality: Quality::new(img.thumb_quality),
                fallback_quality: Quality::new(img.fallback_quality),
                fallback_thumb_quality: Quality::new(img.fallback_thumb_quality),
            },
            force,
        }
    }
}

/// How a single source asset fared during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Photo renditions were (re)encoded.
    Encoded,
    /// Video container and poster set were (re)built.
    Copied,
    /// All outputs newer than the source; nothing was done.
    UpToDate,
    /// Item kept, but with a placeholder thumbnail and no poster.
    Degraded,
    /// Item dropped from the catalog after a processing failure.
    Skipped,
}

/// Progress event emitted while a build runs.
#[derive(Debug, Clone)]
pub enum BuildEvent {
    YearStarted {
        year: i32,
        media_count: usize,
    },
    ItemProcessed {
        name: String,
        disposition: Disposition,
        detail: Option<String>,
    },
    YearSwept {
        year: i32,
        removed: usize,
    },
}

/// Per-year tally for the final report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct YearSummary {
    pub year: i32,
    /// Items that made it into the catalog.
    pub items: usize,
    pub encoded: usize,
    pub copied: usize,
    pub up_to_date: usize,
    pub degraded: usize,
    pub skipped: usize,
    pub orphans_removed: usize,
}

impl YearSummary {
    fn new(year: i32) -> Self {
        Self {
            year,
            ..Self::default()
        }
    }
}

/// Everything one build run produced, for the CLI output layer.
#[derive(Debug)]
pub struct BuildReport {
    pub catalog: Catalog,
    pub catalog_path: PathBuf,
    pub years: Vec<YearSummary>,
    /// Years whose directories could not be read.
    pub skipped_years: Vec<i32>,
}

impl BuildReport {
    pub fn orphans_removed(&self) -> usize {
        self.years.iter().map(|y| y.orphans_removed).sum()
    }

    pub fn degraded(&self) -> usize {
        self.years.iter().map(|y| y.degraded).sum()
    }

    pub fn skipped(&self) -> usize {
        self.years.iter().map(|y| y.skipped).sum()
    }
}

/// Result of processing one source asset.
struct ItemOutcome {
    item: Option<TimelineItem>,
    disposition: Disposition,
    detail: Option<String>,
    /// Any derived output was rebuilt this run.
    regenerated: bool,
    /// The video container was copied this run.
    container_copied: bool,
}

impl ItemOutcome {
    fn skipped(detail: String) -> Self {
        Self {
            item: None,
            disposition: Disposition::Skipped,
            detail: Some(detail),
            regenerated: false,
            container_copied: false,
        }
    }
}

/// Run a full build with the production backend and auto-detected ffmpeg.
pub fn build(
    source_root: &Path,
    output_root: &Path,
    options: &BuildOptions,
    events: Option<Sender<BuildEvent>>,
) -> Result<BuildReport, PipelineError> {
    let backend = RustBackend::new();
    let extractor = FrameExtractor::detect();
    build_with_backend(
        &backend,
        &extractor,
        source_root,
        output_root,
        options,
        events,
    )
}

/// Run a full build using a specific backend (allows testing with mock).
pub fn build_with_backend(
    backend: &impl ImageBackend,
    extractor: &FrameExtractor,
    source_root: &Path,
    output_root: &Path,
    options: &BuildOptions,
    events: Option<Sender<BuildEvent>>,
) -> Result<BuildReport, PipelineError> {
    let year_dirs = scan::discover_years(source_root)?;

    // Fail on an unwritable output root before any processing starts.
    std::fs::create_dir_all(output_root.join("assets"))?;

    let mut year_entries = Vec::new();
    let mut summaries = Vec::new();
    let mut skipped_years = Vec::new();
    let mut regenerated = 0;
    let mut videos_copied = 0;
    let mut placeholder_written = false;

    for year_dir in &year_dirs {
        let media = match scan::collect_media(year_dir) {
            Ok(media) => media,
            Err(_) => {
                skipped_years.push(year_dir.year);
                continue;
            }
        };

        emit(
            &events,
            BuildEvent::YearStarted {
                year: year_dir.year,
                media_count: media.len(),
            },
        );

        if !placeholder_written && media.iter().any(|a| a.kind == MediaKind::Video) {
            video::ensure_placeholder(output_root)?;
            placeholder_written = true;
        }

        let year_out = output_root.join("assets").join(year_dir.year.to_string());
        std::fs::create_dir_all(&year_out)?;

        let mut items = Vec::new();
        let mut expected: HashSet<String> = HashSet::new();
        let mut summary = YearSummary::new(year_dir.year);

        for asset in &media {
            let outcome = match asset.kind {
                MediaKind::Photo => {
                    process_photo(backend, asset, &year_out, options, &mut expected)
                }
                MediaKind::Video => process_video(
                    backend,
                    extractor,
                    asset,
                    &year_out,
                    options,
                    &mut expected,
                ),
            };

            match outcome.disposition {
                Disposition::Encoded => summary.encoded += 1,
                Disposition::Copied => summary.copied += 1,
                Disposition::UpToDate => summary.up_to_date += 1,
                Disposition::Degraded => summary.degraded += 1,
                Disposition::Skipped => summary.skipped += 1,
            }
            if outcome.regenerated {
                regenerated += 1;
            }
            if outcome.container_copied {
                videos_copied += 1;
            }

            emit(
                &events,
                BuildEvent::ItemProcessed {
                    name: asset.name.clone(),
                    disposition: outcome.disposition,
                    detail: outcome.detail,
                },
            );

            if let Some(item) = outcome.item {
                items.push(item);
            }
        }

        let removed = reconcile::sweep_orphans(&year_out, &expected);
        summary.orphans_removed = removed;
        emit(
            &events,
            BuildEvent::YearSwept {
                year: year_dir.year,
                removed,
            },
        );

        summary.items = items.len();
        summaries.push(summary);
        year_entries.push(YearEntry {
            year: year_dir.year,
            items,
        });
    }

    let catalog = manifest::build_catalog(year_entries, regenerated, videos_copied);
    let catalog_path = manifest::write_catalog(output_root, &catalog)?;

    Ok(BuildReport {
        catalog,
        catalog_path,
        years: summaries,
        skipped_years,
    })
}

fn emit(events: &Option<Sender<BuildEvent>>, event: BuildEvent) {
    if let Some(tx) = events {
        // A dropped receiver only mutes progress output.
        let _ = tx.send(event);
    }
}

/// Process one photo: regenerate the web set if stale, otherwise read the
/// realized dimensions back from the existing outputs.
fn process_photo(
    backend: &impl ImageBackend,
    asset: &SourceAsset,
    year_out: &Path,
    options: &BuildOptions,
    expected: &mut HashSet<String>,
) -> ItemOutcome {
    let stem = file_stem(&asset.name);
    let names = web_set_names(&stem);
    let outputs: Vec<PathBuf> = names.iter().map(|n| year_out.join(n)).collect();
    let is_stale = stale::is_stale(&asset.path, &outputs, options.force);

    let (set, disposition) = if is_stale {
        match derive_web_set(backend, &asset.path, year_out, &stem, &options.derive) {
            Ok(set) => (set, Disposition::Encoded),
            // Outputs stay out of the expected set, so leftovers from a
            // previously healthy source get swept.
            Err(err) => return ItemOutcome::skipped(err.to_string()),
        }
    } else {
        (existing_web_set(backend, year_out, names.clone()), Disposition::UpToDate)
    };

    expected.extend(names);

    let (date, ts) = timestamp::date_fields(timestamp::resolve(asset));
    let item = TimelineItem::Photo(PhotoItem {
        name: asset.name.clone(),
        date,
        ts,
        src: asset_web_path(asset.year, &set.primary),
        src_fallback: asset_web_path(asset.year, &set.primary_fallback),
        thumb: asset_web_path(asset.year, &set.thumb),
        thumb_fallback: asset_web_path(asset.year, &set.thumb_fallback),
        w: set.width,
        h: set.height,
        tw: set.thumb_width,
        th: set.thumb_height,
    });

    ItemOutcome {
        item: Some(item),
        disposition,
        detail: None,
        regenerated: is_stale,
        container_copied: false,
    }
}

/// Process one video: copy the container verbatim if stale, then derive a
/// poster set from an extracted frame when a frame tool is available.
fn process_video(
    backend: &impl ImageBackend,
    extractor: &FrameExtractor,
    asset: &SourceAsset,
    year_out: &Path,
    options: &BuildOptions,
    expected: &mut HashSet<String>,
) -> ItemOutcome {
    let stem = file_stem(&asset.name);
    let poster_names = web_set_names(&stem);

    // The poster set only counts as an output while a frame tool can
    // produce it; without one, the container alone decides staleness and
    // stale posters from earlier runs become orphans.
    let mut output_names: Vec<&str> = vec![asset.name.as_str()];
    if extractor.is_available() {
        output_names.extend(poster_names.iter().map(|n| n.as_str()));
    }
    let outputs: Vec<PathBuf> = output_names.iter().map(|n| year_out.join(n)).collect();
    let is_stale = stale::is_stale(&asset.path, &outputs, options.force);

    let mut container_copied = false;
    let mut poster: Option<WebImageSet> = None;
    let mut detail = None;

    if is_stale {
        if let Err(err) = video::copy_video(&asset.path, &year_out.join(&asset.name)) {
            return ItemOutcome::skipped(err.to_string());
        }
        container_copied = true;

        if extractor.is_available() {
            match derive_poster(backend, extractor, &asset.path, year_out, &stem, options) {
                Ok(set) => poster = Some(set),
                Err(err) => detail = Some(err.to_string()),
            }
        }
    } else if extractor.is_available() {
        poster = Some(existing_web_set(backend, year_out, poster_names.clone()));
    }

    expected.insert(asset.name.clone());
    if poster.is_some() {
        expected.extend(poster_names);
    }

    let (date, ts) = timestamp::date_fields(timestamp::resolve(asset));
    let video_ref = asset_web_path(asset.year, &asset.name);

    let (item, disposition) = match poster {
        Some(set) => {
            let item = VideoItem {
                name: asset.name.clone(),
                date,
                ts,
                video: video_ref,
                poster: asset_web_path(asset.year, &set.primary),
                poster_fallback: asset_web_path(asset.year, &set.primary_fallback),
                thumb: asset_web_path(asset.year, &set.thumb),
                thumb_fallback: asset_web_path(asset.year, &set.thumb_fallback),
                w: set.width,
                h: set.height,
                tw: set.thumb_width,
                th: set.thumb_height,
            };
            let disposition = if container_copied {
                Disposition::Copied
            } else {
                Disposition::UpToDate
            };
            (item, disposition)
        }
        None => {
            let item = VideoItem {
                name: asset.name.clone(),
                date,
                ts,
                video: video_ref,
                poster: String::new(),
                poster_fallback: String::new(),
                thumb: PLACEHOLDER_WEB_PATH.to_string(),
                thumb_fallback: PLACEHOLDER_WEB_PATH.to_string(),
                w: 0,
                h: 0,
                tw: 0,
                th: 0,
            };
            (item, Disposition::Degraded)
        }
    };

    ItemOutcome {
        item: Some(TimelineItem::Video(item)),
        disposition,
        detail,
        regenerated: container_copied,
        container_copied,
    }
}

/// Extract one frame and run it through the photo pipeline.
fn derive_poster(
    backend: &impl ImageBackend,
    extractor: &FrameExtractor,
    source: &Path,
    year_out: &Path,
    stem: &str,
    options: &BuildOptions,
) -> Result<WebImageSet, PosterError> {
    let frame = extractor.extract_frame(source, video::POSTER_SEEK_SECS)?;
    let set = derive_web_set(backend, frame.path(), year_out, stem, &options.derive)?;
    Ok(set)
}

/// Rebuild a `WebImageSet` for outputs already on disk.
///
/// Identify failures degrade to zero dimensions rather than forcing a
/// re-encode; the file references stay valid either way.
fn existing_web_set(
    backend: &impl ImageBackend,
    year_out: &Path,
    names: [String; 4],
) -> WebImageSet {
    let (width, height) = identify_or_zero(backend, &year_out.join(&names[0]));
    let (thumb_width, thumb_height) = identify_or_zero(backend, &year_out.join(&names[1]));
    let [primary, thumb, primary_fallback, thumb_fallback] = names;
    WebImageSet {
        primary,
        primary_fallback,
        thumb,
        thumb_fallback,
        width,
        height,
        thumb_width,
        thumb_height,
    }
}

fn identify_or_zero(backend: &impl ImageBackend, path: &Path) -> (u32, u32) {
    match backend.identify(path) {
        Ok(dims) => (dims.width, dims.height),
        Err(_) => (0, 0),
    }
}

fn file_stem(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string())
}
