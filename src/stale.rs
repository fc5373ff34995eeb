//! Freshness decisions for derived outputs.
//!
//! One question, answered from filesystem state alone: does this source
//! need its derived files rebuilt? No cache database, no content hashes.
//! Running the same decision twice against unchanged files gives the same
//! answer, which is what makes reruns of the pipeline idempotent.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// True when `source` needs its derived files rebuilt.
///
/// Stale when `force` is set, when any output is missing, when the source
/// modification time is strictly newer than any output's, or when any of
/// those checks cannot be answered. Equal timestamps count as fresh.
pub fn is_stale(source: &Path, outputs: &[PathBuf], force: bool) -> bool {
    if force {
        return true;
    }

    let source_mtime = match mtime(source) {
        Some(t) => t,
        None => return true,
    };

    outputs.iter().any(|out| match mtime(out) {
        Some(out_mtime) => source_mtime > out_mtime,
        None => true,
    })
}

fn mtime(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).ok()?.modified().ok()
}
