//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take configuration, compute parameters, and call the backend.

use super::backend::{BackendError, ImageBackend};
use super::calculations::fit_long_edge;
use super::params::{Quality, ResizeParams};
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// The four derived files produced for one asset, with realized dimensions.
///
/// Paths are bare filenames; callers decide which directory they live in
/// and how they are referenced from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebImageSet {
    pub primary: String,
    pub primary_fallback: String,
    pub thumb: String,
    pub thumb_fallback: String,
    pub width: u32,
    pub height: u32,
    pub thumb_width: u32,
    pub thumb_height: u32,
}

/// Configuration for derived-image generation.
#[derive(Debug, Clone)]
pub struct DeriveConfig {
    /// Long-edge bound for the primary rendition.
    pub max_edge: u32,
    /// Long-edge bound for the thumbnail rendition.
    pub thumb_edge: u32,
    pub quality: Quality,
    pub thumb_quality: Quality,
    pub fallback_quality: Quality,
    pub fallback_thumb_quality: Quality,
}

impl Default for DeriveConfig {
    fn default() -> Self {
        Self {
            max_edge: 1440,
            thumb_edge: 420,
            quality: Quality::new(82),
            thumb_quality: Quality::new(72),
            fallback_quality: Quality::new(88),
            fallback_thumb_quality: Quality::new(80),
        }
    }
}

/// The four filenames a web set for `stem` consists of.
///
/// Order: primary AVIF, thumbnail AVIF, primary JPEG, thumbnail JPEG.
/// Also used to decide staleness and to mark files as expected during
/// orphan sweeps, so it must stay in sync with [`derive_web_set`].
pub fn web_set_names(stem: &str) -> [String; 4] {
    [
        format!("{stem}.avif"),
        format!("{stem}_thumb.avif"),
        format!("{stem}.jpg"),
        format!("{stem}_thumb.jpg"),
    ]
}

/// Create the four web files for one source image.
///
/// Generates a bounded primary rendition and a bounded thumbnail, each
/// encoded as AVIF with a JPEG fallback. Sources already within a bound
/// pass through at their own size.
pub fn derive_web_set(
    backend: &impl ImageBackend,
    source: &Path,
    output_dir: &Path,
    stem: &str,
    config: &DeriveConfig,
) -> Result<WebImageSet> {
    let dims = backend.identify(source)?;
    let (width, height) = fit_long_edge((dims.width, dims.height), config.max_edge);
    let (thumb_width, thumb_height) = fit_long_edge((dims.width, dims.height), config.thumb_edge);

    let [primary, thumb, primary_fallback, thumb_fallback] = web_set_names(stem);

    let jobs = [
        (&primary, width, height, config.quality),
        (&thumb, thumb_width, thumb_height, config.thumb_quality),
        (&primary_fallback, width, height, config.fallback_quality),
        (
            &thumb_fallback,
            thumb_width,
            thumb_height,
            config.fallback_thumb_quality,
        ),
    ];

    for (name, w, h, quality) in jobs {
        backend.resize(&ResizeParams {
            source: source.to_path_buf(),
            output: output_dir.join(name),
            width: w,
            height: h,
            quality,
        })?;
    }

    Ok(WebImageSet {
        primary,
        primary_fallback,
        thumb,
        thumb_fallback,
        width,
        height,
        thumb_width,
        thumb_height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::Dimensions;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};

    #[test]
    fn web_set_names_cover_both_formats() {
        let names = web_set_names("IMG_001");
        assert_eq!(
            names,
            [
                "IMG_001.avif".to_string(),
                "IMG_001_thumb.avif".to_string(),
                "IMG_001.jpg".to_string(),
                "IMG_001_thumb.jpg".to_string(),
            ]
        );
    }

    #[test]
    fn derive_emits_identify_then_four_resizes() {
        let backend = MockBackend::with_dimensions(vec![Dimensions {
            width: 4000,
            height: 3000,
        }]);

        let set = derive_web_set(
            &backend,
            Path::new("/photos/2019/beach.jpg"),
            Path::new("/site/assets/2019"),
            "beach",
            &DeriveConfig::default(),
        )
        .unwrap();

        assert_eq!(set.width, 1440);
        assert_eq!(set.height, 1080);
        assert_eq!(set.thumb_width, 420);
        assert_eq!(set.thumb_height, 315);
        assert_eq!(set.primary, "beach.avif");
        assert_eq!(set.primary_fallback, "beach.jpg");
        assert_eq!(set.thumb, "beach_thumb.avif");
        assert_eq!(set.thumb_fallback, "beach_thumb.jpg");

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 5);
        assert!(matches!(&ops[0], RecordedOp::Identify(_)));
        assert!(matches!(
            &ops[1],
            RecordedOp::Resize { output, width: 1440, height: 1080, quality: 82, .. }
                if output.ends_with("beach.avif")
        ));
        assert!(matches!(
            &ops[2],
            RecordedOp::Resize { output, width: 420, height: 315, quality: 72, .. }
                if output.ends_with("beach_thumb.avif")
        ));
        assert!(matches!(
            &ops[3],
            RecordedOp::Resize { output, width: 1440, height: 1080, quality: 88, .. }
                if output.ends_with("beach.jpg")
        ));
        assert!(matches!(
            &ops[4],
            RecordedOp::Resize { output, width: 420, height: 315, quality: 80, .. }
                if output.ends_with("beach_thumb.jpg")
        ));
    }

    #[test]
    fn derive_small_source_keeps_original_dimensions() {
        let backend = MockBackend::with_dimensions(vec![Dimensions {
            width: 300,
            height: 200,
        }]);

        let set = derive_web_set(
            &backend,
            Path::new("/photos/2020/tiny.png"),
            Path::new("/site/assets/2020"),
            "tiny",
            &DeriveConfig::default(),
        )
        .unwrap();

        assert_eq!((set.width, set.height), (300, 200));
        assert_eq!((set.thumb_width, set.thumb_height), (300, 200));
    }

    #[test]
    fn derive_outputs_land_in_output_dir() {
        let backend = MockBackend::with_dimensions(vec![Dimensions {
            width: 1000,
            height: 800,
        }]);

        derive_web_set(
            &backend,
            Path::new("/photos/2021/pic.jpg"),
            Path::new("/site/assets/2021"),
            "pic",
            &DeriveConfig::default(),
        )
        .unwrap();

        for op in backend.get_operations() {
            if let RecordedOp::Resize { output, .. } = op {
                assert!(output.starts_with("/site/assets/2021/"), "got {output}");
            }
        }
    }

    #[test]
    fn derive_propagates_identify_failure() {
        let backend = MockBackend::new();
        let result = derive_web_set(
            &backend,
            Path::new("/photos/2021/corrupt.jpg"),
            Path::new("/site/assets/2021"),
            "corrupt",
            &DeriveConfig::default(),
        );
        assert!(matches!(result, Err(BackendError::ProcessingFailed(_))));
    }
}
