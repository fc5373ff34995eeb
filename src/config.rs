//! Build configuration module.
//!
//! Handles loading and validating an optional `config.toml` placed at the
//! source root, next to the year directories:
//!
//! ```text
//! photos/
//! ├── config.toml    # optional, overrides stock defaults
//! ├── 2018/
//! └── 2019/
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [images]
//! max_size = 1440              # Long edge of primary renditions (px)
//! thumb_size = 420             # Long edge of thumbnails (px)
//! quality = 82                 # AVIF quality (1-100)
//! thumb_quality = 72           # AVIF thumbnail quality (1-100)
//! fallback_quality = 88        # JPEG fallback quality (1-100)
//! fallback_thumb_quality = 80  # JPEG fallback thumbnail quality (1-100)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want. Unspecified
//! keys keep their defaults, and unknown keys are rejected to catch typos
//! early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Config filename looked up at the source root.
pub const CONFIG_FILE: &str = "config.toml";

/// Build settings loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Rendition encoding settings (sizes, qualities).
    pub images: ImagesConfig,
}

impl Settings {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.images.max_size == 0 || self.images.thumb_size == 0 {
            return Err(ConfigError::Validation(
                "images.max_size and images.thumb_size must be at least 1".into(),
            ));
        }

        for (key, quality) in [
            ("images.quality", self.images.quality),
            ("images.thumb_quality", self.images.thumb_quality),
            ("images.fallback_quality", self.images.fallback_quality),
            (
                "images.fallback_thumb_quality",
                self.images.fallback_thumb_quality,
            ),
        ] {
            if !(1..=100).contains(&quality) {
                return Err(ConfigError::Validation(format!(
                    "{key} must be 1-100, got {quality}"
                )));
            }
        }

        Ok(())
    }
}

/// Rendition encoding settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// Pixel bound for the longer edge of primary renditions.
    pub max_size: u32,
    /// Pixel bound for the longer edge of thumbnails.
    pub thumb_size: u32,
    /// AVIF encoding quality for primary renditions (1 = worst, 100 = best).
    pub quality: u32,
    /// AVIF encoding quality for thumbnails.
    pub thumb_quality: u32,
    /// JPEG fallback quality for primary renditions.
    pub fallback_quality: u32,
    /// JPEG fallback quality for thumbnails.
    pub fallback_thumb_quality: u32,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            max_size: 1440,
            thumb_size: 420,
            quality: 82,
            thumb_quality: 72,
            fallback_quality: 88,
            fallback_thumb_quality: 80,
        }
    }
}

// =============================================================================
// Config loading and validation
// =============================================================================

/// Load settings from `config.toml` at the source root.
///
/// Returns stock defaults when the file does not exist. Rejects unknown
/// keys and validates the result.
pub fn load_settings(source_root: &Path) -> Result<Settings, ConfigError> {
    let config_path = source_root.join(CONFIG_FILE);
    let settings: Settings = if config_path.exists() {
        let content = fs::read_to_string(&config_path)?;
        toml::from_str(&content)?
    } else {
        Settings::default()
    };
    settings.validate()?;
    Ok(settings)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Yearbook Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file at the root of the photo tree, next to the year
# directories. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Rendition encoding
# ---------------------------------------------------------------------------
[images]
# Pixel bound for the longer edge of primary renditions.
# Sources smaller than this are never upscaled.
max_size = 1440

# Pixel bound for the longer edge of thumbnails.
thumb_size = 420

# AVIF encoding quality (1 = worst, 100 = best).
quality = 82
thumb_quality = 72

# JPEG fallback quality. The fallbacks run a few points higher than
# their AVIF counterparts.
fallback_quality = 88
fallback_thumb_quality = 80
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &Path, content: &str) {
        fs::write(dir.join(CONFIG_FILE), content).unwrap();
    }

    #[test]
    fn default_config_has_encoding_settings() {
        let settings = Settings::default();
        assert_eq!(settings.images.max_size, 1440);
        assert_eq!(settings.images.thumb_size, 420);
        assert_eq!(settings.images.quality, 82);
        assert_eq!(settings.images.thumb_quality, 72);
        assert_eq!(settings.images.fallback_quality, 88);
        assert_eq!(settings.images.fallback_thumb_quality, 80);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[images]
quality = 70
"#;
        let settings: Settings = toml::from_str(toml).unwrap();
        // Overridden value
        assert_eq!(settings.images.quality, 70);
        // Default values preserved
        assert_eq!(settings.images.max_size, 1440);
        assert_eq!(settings.images.fallback_quality, 88);
    }

    // =========================================================================
    // load_settings tests
    // =========================================================================

    #[test]
    fn load_settings_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let settings = load_settings(tmp.path()).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn load_settings_reads_file() {
        let tmp = TempDir::new().unwrap();
        write_config(
            tmp.path(),
            r#"
[images]
max_size = 2000
quality = 60
"#,
        );

        let settings = load_settings(tmp.path()).unwrap();
        assert_eq!(settings.images.max_size, 2000);
        assert_eq!(settings.images.quality, 60);
        // Unspecified values should be defaults
        assert_eq!(settings.images.thumb_size, 420);
    }

    #[test]
    fn load_settings_full_config() {
        let tmp = TempDir::new().unwrap();
        write_config(
            tmp.path(),
            r#"
[images]
max_size = 1920
thumb_size = 300
quality = 65
thumb_quality = 55
fallback_quality = 75
fallback_thumb_quality = 68
"#,
        );

        let settings = load_settings(tmp.path()).unwrap();
        assert_eq!(settings.images.max_size, 1920);
        assert_eq!(settings.images.thumb_size, 300);
        assert_eq!(settings.images.quality, 65);
        assert_eq!(settings.images.thumb_quality, 55);
        assert_eq!(settings.images.fallback_quality, 75);
        assert_eq!(settings.images.fallback_thumb_quality, 68);
    }

    #[test]
    fn load_settings_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        write_config(tmp.path(), "this is not valid toml [[[");
        let result = load_settings(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    // =========================================================================
    // Unknown key rejection tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let toml_str = r#"
[images]
qualty = 82
"#;
        let result: Result<Settings, _> = toml::from_str(toml_str);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let toml_str = r#"
[imagez]
quality = 82
"#;
        let result: Result<Settings, _> = toml::from_str(toml_str);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_key_rejected_via_load_settings() {
        let tmp = TempDir::new().unwrap();
        write_config(
            tmp.path(),
            r#"
[images]
qualty = 82
"#,
        );
        assert!(load_settings(tmp.path()).is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_quality_boundaries_ok() {
        let mut settings = Settings::default();
        settings.images.quality = 100;
        assert!(settings.validate().is_ok());

        settings.images.quality = 1;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn validate_quality_out_of_range() {
        let mut settings = Settings::default();
        settings.images.quality = 101;
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("images.quality"));

        settings.images.quality = 82;
        settings.images.thumb_quality = 0;
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("images.thumb_quality"));
    }

    #[test]
    fn validate_zero_size_rejected() {
        let mut settings = Settings::default();
        settings.images.max_size = 0;
        assert!(settings.validate().is_err());

        settings.images.max_size = 1440;
        settings.images.thumb_size = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn validate_default_config_passes() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn load_settings_validates_values() {
        let tmp = TempDir::new().unwrap();
        write_config(
            tmp.path(),
            r#"
[images]
quality = 200
"#,
        );
        let result = load_settings(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // stock_config_toml tests
    // =========================================================================

    #[test]
    fn stock_config_toml_is_valid_toml() {
        let content = stock_config_toml();
        let _: toml::Value = toml::from_str(content).expect("stock config must be valid TOML");
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let content = stock_config_toml();
        let settings: Settings = toml::from_str(content).unwrap();
        assert_eq!(settings, Settings::default());
    }
}
