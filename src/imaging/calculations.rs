//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate output dimensions so the longer edge fits within `max_edge`.
///
/// Preserves aspect ratio and never upscales: a source already within the
/// bound is returned unchanged. The shorter edge is rounded to the nearest
/// pixel and kept at 1 minimum so degenerate aspect ratios never collapse
/// to a zero dimension.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `max_edge` - Maximum size of the longer edge in pixels
///
/// # Returns
/// * `(width, height)` - Output dimensions
///
/// # Examples
/// ```
/// # use yearbook::imaging::fit_long_edge;
/// // 4000x3000 landscape bounded to 1440 → 1440x1080
/// assert_eq!(fit_long_edge((4000, 3000), 1440), (1440, 1080));
///
/// // 1200x900 already fits → unchanged
/// assert_eq!(fit_long_edge((1200, 900), 1440), (1200, 900));
/// ```
pub fn fit_long_edge(source: (u32, u32), max_edge: u32) -> (u32, u32) {
    let (src_w, src_h) = source;
    let longer_edge = src_w.max(src_h);

    if longer_edge <= max_edge {
        return (src_w, src_h);
    }

    let ratio = max_edge as f64 / longer_edge as f64;
    if src_w >= src_h {
        // Landscape or square: width is the longer edge
        (max_edge, ((src_h as f64 * ratio).round() as u32).max(1))
    } else {
        // Portrait: height is the longer edge
        (((src_w as f64 * ratio).round() as u32).max(1), max_edge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_downscales_landscape() {
        // 4000x3000, bound 1440 → 1440x1080
        assert_eq!(fit_long_edge((4000, 3000), 1440), (1440, 1080));
    }

    #[test]
    fn fit_downscales_portrait() {
        // 3000x4000, bound 1440 → 1080x1440
        assert_eq!(fit_long_edge((3000, 4000), 1440), (1080, 1440));
    }

    #[test]
    fn fit_downscales_square() {
        assert_eq!(fit_long_edge((2000, 2000), 420), (420, 420));
    }

    #[test]
    fn fit_never_upscales() {
        // 800x600 already within 1440 → unchanged
        assert_eq!(fit_long_edge((800, 600), 1440), (800, 600));
    }

    #[test]
    fn fit_exact_bound_is_unchanged() {
        assert_eq!(fit_long_edge((1440, 900), 1440), (1440, 900));
    }

    #[test]
    fn fit_rounds_shorter_edge() {
        // 1000x667, bound 420 → 420x280 (667 * 0.42 = 280.14)
        assert_eq!(fit_long_edge((1000, 667), 420), (420, 280));
    }

    #[test]
    fn fit_clamps_degenerate_aspect_to_one_pixel() {
        // 10000x1 bounded to 420 → shorter edge rounds to 0, clamped to 1
        assert_eq!(fit_long_edge((10000, 1), 420), (420, 1));
    }
}
