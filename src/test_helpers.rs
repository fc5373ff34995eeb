//! Shared test utilities for the yearbook test suite.
//!
//! Catalog lookup helpers that panic with a clear message on miss, so
//! assertions read as intent instead of option plumbing:
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let photo = find_photo(&report.catalog, "IMG_20180305_143000.jpg");
//! assert_eq!(photo.date, "2018-03-05 14:30:00");
//!
//! let entry = find_year(&report.catalog, 2018);
//! assert_eq!(entry.items.len(), 2);
//! ```

use crate::manifest::{Catalog, PhotoItem, TimelineItem, VideoItem, YearEntry};

/// Find a year entry. Panics if not found.
pub fn find_year(catalog: &Catalog, year: i32) -> &YearEntry {
    catalog
        .years
        .iter()
        .find(|y| y.year == year)
        .unwrap_or_else(|| {
            let years: Vec<i32> = catalog.years.iter().map(|y| y.year).collect();
            panic!("year {year} not found. Available: {years:?}")
        })
}

/// Find a photo item by name anywhere in the catalog. Panics if not found.
pub fn find_photo<'a>(catalog: &'a Catalog, name: &str) -> &'a PhotoItem {
    all_items(catalog)
        .find_map(|item| match item {
            TimelineItem::Photo(photo) if photo.name == name => Some(photo),
            _ => None,
        })
        .unwrap_or_else(|| {
            panic!(
                "photo '{name}' not found. Available: {:?}",
                item_names(catalog)
            )
        })
}

/// Find a video item by name anywhere in the catalog. Panics if not found.
pub fn find_video<'a>(catalog: &'a Catalog, name: &str) -> &'a VideoItem {
    all_items(catalog)
        .find_map(|item| match item {
            TimelineItem::Video(video) if video.name == name => Some(video),
            _ => None,
        })
        .unwrap_or_else(|| {
            panic!(
                "video '{name}' not found. Available: {:?}",
                item_names(catalog)
            )
        })
}

/// All item names in catalog order.
pub fn item_names(catalog: &Catalog) -> Vec<&str> {
    all_items(catalog).map(|i| i.name()).collect()
}

fn all_items(catalog: &Catalog) -> impl Iterator<Item = &TimelineItem> {
    catalog.years.iter().flat_map(|y| y.items.iter())
}
