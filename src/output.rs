//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Build
//!
//! Progress is streamed per year while the pipeline runs:
//!
//! ```text
//! 2018 (3 files)
//!     IMG_20180305_143000.jpg: encoded
//!     C360_2018-07-01-09-15-30.jpg: up to date
//!     clip.mp4: degraded
//!         frame extraction failed: ffmpeg exited with status 1
//!     swept 2 orphaned files
//! ```
//!
//! followed by a run summary:
//!
//! ```text
//! Timeline: 42 items across 3 years (40 photos, 2 videos)
//! Regenerated 5 items, copied 1 video, removed 2 orphans
//! Catalog → site/data/timeline.json
//! ```
//!
//! ## Check
//!
//! ```text
//! Years
//!     2018: 12 photos, 1 video
//!     2019: empty
//! Total: 12 photos, 1 video
//! ```
//!
//! # Architecture
//!
//! Each surface has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.

use crate::pipeline::{BuildEvent, BuildReport, Disposition};
use crate::scan::YearInventory;

// ============================================================================
// Shared helpers
// ============================================================================

/// Count with a naively pluralized noun: `1 photo`, `2 photos`.
fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

/// Photo/video tally, omitting zero halves: `12 photos, 1 video`.
fn media_counts(photos: usize, videos: usize) -> String {
    match (photos, videos) {
        (0, 0) => "empty".to_string(),
        (_, 0) => plural(photos, "photo"),
        (0, _) => plural(videos, "video"),
        _ => format!("{}, {}", plural(photos, "photo"), plural(videos, "video")),
    }
}

fn disposition_label(disposition: Disposition) -> &'static str {
    match disposition {
        Disposition::Encoded => "encoded",
        Disposition::Copied => "copied",
        Disposition::UpToDate => "up to date",
        Disposition::Degraded => "degraded",
        Disposition::Skipped => "skipped",
    }
}

// ============================================================================
// Build progress output
// ============================================================================

/// Format a single build progress event as display lines.
///
/// Items lead with their filename and this run's disposition; failure
/// details follow as indented context. Sweeps that removed nothing are
/// silent.
pub fn format_build_event(event: &BuildEvent) -> Vec<String> {
    match event {
        BuildEvent::YearStarted { year, media_count } => {
            vec![format!("{} ({})", year, plural(*media_count, "file"))]
        }
        BuildEvent::ItemProcessed {
            name,
            disposition,
            detail,
        } => {
            let mut lines = vec![format!("    {}: {}", name, disposition_label(*disposition))];
            if let Some(detail) = detail {
                lines.push(format!("        {}", detail));
            }
            lines
        }
        BuildEvent::YearSwept { removed, .. } => {
            if *removed == 0 {
                Vec::new()
            } else {
                vec![format!("    swept {}", plural(*removed, "orphaned file"))]
            }
        }
    }
}

// ============================================================================
// Build summary output
// ============================================================================

/// Format the end-of-run summary.
pub fn format_build_summary(report: &BuildReport) -> Vec<String> {
    let counts = &report.catalog.counts;
    let mut lines = Vec::new();

    lines.push(format!(
        "Timeline: {} across {} ({})",
        plural(counts.items, "item"),
        plural(counts.years, "year"),
        media_counts(counts.photos, counts.videos),
    ));
    lines.push(format!(
        "Regenerated {}, copied {}, removed {}",
        plural(counts.regenerated, "item"),
        plural(counts.videos_copied, "video"),
        plural(report.orphans_removed(), "orphan"),
    ));

    let degraded = report.degraded();
    if degraded > 0 {
        lines.push(format!(
            "{} without a poster frame",
            plural(degraded, "video")
        ));
    }
    let skipped = report.skipped();
    if skipped > 0 {
        lines.push(format!("{} skipped after errors", plural(skipped, "item")));
    }
    if !report.skipped_years.is_empty() {
        let years: Vec<String> = report.skipped_years.iter().map(|y| y.to_string()).collect();
        lines.push(format!(
            "Unreadable year directories skipped: {}",
            years.join(", ")
        ));
    }

    lines.push(format!(
        "Catalog \u{2192} {}",
        report.catalog_path.display()
    ));
    lines
}

/// Print the build summary to stdout.
pub fn print_build_summary(report: &BuildReport) {
    for line in format_build_summary(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Check output
// ============================================================================

/// Format `check` output: per-year media counts plus a total line.
pub fn format_check_output(rows: &[YearInventory]) -> Vec<String> {
    let mut lines = vec!["Years".to_string()];

    if rows.is_empty() {
        lines.push("    (no year directories found)".to_string());
    }
    for row in rows {
        lines.push(format!(
            "    {}: {}",
            row.year,
            media_counts(row.photos, row.videos)
        ));
    }

    let photos: usize = rows.iter().map(|r| r.photos).sum();
    let videos: usize = rows.iter().map(|r| r.videos).sum();
    lines.push(format!("Total: {}", media_counts(photos, videos)));
    lines
}

/// Print check output to stdout.
pub fn print_check_output(rows: &[YearInventory]) {
    for line in format_check_output(rows) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
