//! Video handling: verbatim copies and poster frames.
//!
//! Video containers are never transcoded; they are copied into the output
//! tree unchanged. When ffmpeg is on PATH, a poster frame is grabbed
//! shortly after the start of the clip and pushed through the same
//! resize/encode path as a photo. Without ffmpeg the build still
//! completes: videos keep their copies and the catalog points their
//! thumbnails at a bundled placeholder graphic.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VideoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Frame extraction failed: {0}")]
    FrameExtraction(String),
    #[error("No frame extraction tool available")]
    ToolUnavailable,
}

/// Seek offset for poster frames, past any black lead-in.
pub const POSTER_SEEK_SECS: f64 = 0.75;

/// Catalog path of the shared placeholder graphic.
pub const PLACEHOLDER_WEB_PATH: &str = "assets/video-placeholder.svg";

const PLACEHOLDER_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 420 315">
  <rect width="420" height="315" fill="#1a1d21"/>
  <circle cx="210" cy="157.5" r="46" fill="none" stroke="#8a919a" stroke-width="6"/>
  <path d="M196 133l44 24.5-44 24.5z" fill="#8a919a"/>
</svg>
"##;

/// Copy a video container into the output tree unchanged.
///
/// Returns the number of bytes copied.
pub fn copy_video(source: &Path, output: &Path) -> Result<u64, VideoError> {
    Ok(fs::copy(source, output)?)
}

/// Write the placeholder graphic under `<output>/assets/` if missing.
pub fn ensure_placeholder(output_root: &Path) -> Result<(), VideoError> {
    let path = output_root.join("assets").join("video-placeholder.svg");
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, PLACEHOLDER_SVG)?;
    Ok(())
}

/// Poster-frame extractor backed by ffmpeg, when present.
pub struct FrameExtractor {
    tool: Option<PathBuf>,
}

impl FrameExtractor {
    /// Look for ffmpeg on PATH.
    pub fn detect() -> Self {
        Self {
            tool: which::which("ffmpeg").ok(),
        }
    }

    /// An extractor that never extracts; every video gets the placeholder.
    pub fn disabled() -> Self {
        Self { tool: None }
    }

    pub fn is_available(&self) -> bool {
        self.tool.is_some()
    }

    /// Grab one frame at `seek_secs` into a scratch PNG.
    ///
    /// Clips shorter than the seek offset get one retry from the very
    /// first frame. The returned handle deletes the scratch file on drop.
    pub fn extract_frame(
        &self,
        video: &Path,
        seek_secs: f64,
    ) -> Result<NamedTempFile, VideoError> {
        let tool = self.tool.as_ref().ok_or(VideoError::ToolUnavailable)?;

        let frame = run_ffmpeg(tool, video, seek_secs)?;
        if frame_is_empty(&frame) {
            let retry = run_ffmpeg(tool, video, 0.0)?;
            if frame_is_empty(&retry) {
                return Err(VideoError::FrameExtraction(format!(
                    "no frame produced from {}",
                    video.display()
                )));
            }
            return Ok(retry);
        }
        Ok(frame)
    }
}

fn run_ffmpeg(tool: &Path, video: &Path, seek_secs: f64) -> Result<NamedTempFile, VideoError> {
    let frame = tempfile::Builder::new()
        .prefix("yearbook-poster-")
        .suffix(".png")
        .tempfile()?;

    // -y: the temp file already exists on disk, ffmpeg must overwrite it
    let output = Command::new(tool)
        .args(["-v", "error", "-y", "-ss", &format!("{seek_secs:.3}")])
        .arg("-i")
        .arg(video)
        .args(["-frames:v", "1"])
        .arg(frame.path())
        .output()?;

    if !output.status.success() {
        return Err(VideoError::FrameExtraction(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }
    Ok(frame)
}

fn frame_is_empty(frame: &NamedTempFile) -> bool {
    fs::metadata(frame.path())
        .map(|m| m.len() == 0)
        .unwrap_or(true)
}
