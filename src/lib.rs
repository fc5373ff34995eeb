//! # Yearbook
//!
//! An incremental build pipeline that turns a tree of year-named directories
//! of photos and videos into a web-ready asset bundle plus one JSON timeline
//! catalog. Your filesystem is the data source: a directory named `2018` is
//! the year 2018, and the media files inside are its timeline.
//!
//! # Architecture: Build, Then Sweep
//!
//! One run walks every year directory and pushes each media file through a
//! fixed sequence of small modules:
//!
//! ```text
//! photos/<year>/*  →  scan        (year discovery, media classification)
//!                  →  timestamp   (EXIF → filename markers → unknown)
//!                  →  stale       (mtime oracle over the derived outputs)
//!                  →  imaging     (bounded AVIF + JPEG rendition sets)
//!                  →  video       (verbatim copies, ffmpeg poster frames)
//!                  →  reconcile   (sweep orphaned outputs per year)
//!                  →  manifest    (sorted catalog → data/timeline.json)
//! ```
//!
//! [`pipeline`] owns the control flow and reduces every asset to a
//! disposition (encoded, copied, up to date, degraded, skipped), so the run
//! report is data rather than log archaeology. Per-asset failures degrade or
//! skip that asset; they never abort the run.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Source discovery: year directories, media classification, inventory |
//! | [`timestamp`] | Capture-time resolution chain and folder-year alignment |
//! | [`stale`] | Pure mtime staleness check deciding regeneration |
//! | [`imaging`] | Codec boundary: identify + resize behind a backend trait |
//! | [`video`] | Verbatim container copies, poster frames, placeholder asset |
//! | [`reconcile`] | Orphaned-output sweep of year output directories |
//! | [`manifest`] | Catalog model, deterministic ordering, JSON serialization |
//! | [`pipeline`] | Orchestration: the per-year build loop and run report |
//! | [`config`] | Optional `config.toml` loading and validation |
//! | [`output`] | CLI output formatting — progress events and summaries |
//!
//! # Design Decisions
//!
//! ## AVIF With JPEG Fallbacks
//!
//! Primary renditions and thumbnails are AVIF (the `image` crate's
//! rav1e-backed encoder), which comfortably beats JPEG on size at web
//! quality. Every rendition gets a JPEG sibling so the catalog can drive a
//! `<picture>` element with a fallback for consumers that cannot decode
//! AVIF. Renditions are bounded on the longer edge and never upscaled.
//!
//! ## Mtime Staleness, No Build State
//!
//! An asset is regenerated when any of its outputs is missing or older than
//! the source, checked file by file. There is no cache database and no
//! manifest diffing: the output tree itself is the build ledger, and any
//! doubt (unreadable metadata) regenerates rather than trusts.
//!
//! ## The Year Directory Has the Final Say
//!
//! Capture times come from EXIF tags or filename markers, but archives are
//! organized by a human dropping files into year folders. When metadata and
//! folder disagree, the resolved timestamp is rewritten to the folder's
//! year; a Feb 29 that cannot survive the rewrite falls to March 1, keeping
//! the time of day. Items with no resolvable time sort after dated ones.
//!
//! ## Sequential By Design
//!
//! Assets are processed one at a time. Incremental staleness makes re-runs
//! cheap, which matters more for an archive that grows a year at a time
//! than peak first-build throughput, and it keeps every run deterministic
//! and debuggable.
//!
//! ## Optional FFmpeg
//!
//! Video frame decoding stays out of the binary. `ffmpeg` is looked up once
//! per run; when present, one frame per video becomes a poster/thumbnail
//! set through the photo pipeline. When absent, videos still appear on the
//! timeline with a bundled placeholder thumbnail and the run completes.

pub mod config;
pub mod imaging;
pub mod manifest;
pub mod output;
pub mod pipeline;
pub mod reconcile;
pub mod scan;
pub mod stale;
pub mod timestamp;
pub mod video;

#[cfg(test)]
pub(crate) mod test_helpers;
