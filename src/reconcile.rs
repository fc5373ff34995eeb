//! Orphan sweeping for output year directories.
//!
//! After a year is processed, every derived file in its output directory
//! should be accounted for by some current source. Files with recognized
//! derived extensions that nothing expects are leftovers from renamed or
//! deleted sources and are removed. Files the pipeline would never
//! produce are left alone, whatever their origin.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Extensions the pipeline itself produces in year directories.
const DERIVED_EXTENSIONS: &[&str] = &["avif", "jpg", "mp4", "mov", "m4v", "webm"];

/// Delete derived files in `dir` that are not named in `expected`.
///
/// Returns the number of files removed. Deletion failures are swallowed
/// and not counted; the next run sees those files again. A missing
/// directory sweeps nothing.
pub fn sweep_orphans(dir: &Path, expected: &HashSet<String>) -> usize {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return 0,
    };

    let mut removed = 0;
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if !path.is_file() || !has_derived_extension(&path) {
            continue;
        }
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => continue,
        };
        if expected.contains(name) {
            continue;
        }
        if fs::remove_file(&path).is_ok() {
            removed += 1;
        }
    }
    removed
}

fn has_derived_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| DERIVED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
}
