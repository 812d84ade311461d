//! Pipeline configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::encode::JpegQuality;
use crate::transform::{FilterType, DEFAULT_MAX_OUTPUT_PIXELS};

/// Prefix of every download file name.
pub const DEFAULT_DOWNLOAD_PREFIX: &str = "gambar_modifikasi";

/// A configuration value that cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{field} must be at least 1")]
    NotPositive { field: &'static str },

    #[error("download_prefix must not be empty")]
    EmptyPrefix,
}

/// Defaults and UI hints for a session.
///
/// Every field has a default, so a partial object deserializes fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Filter used by the resize action.
    pub resize_filter: FilterType,
    /// The default resize target is the original divided by this.
    pub default_scale_divisor: u32,
    /// Step of the width/height number inputs.
    pub dimension_step: u32,
    /// JPEG quality before the user touches the slider.
    pub default_jpeg_quality: JpegQuality,
    /// Step of the JPEG quality slider.
    pub jpeg_quality_step: u8,
    /// Download file names are `{prefix}_{w}x{h}.{ext}`.
    pub download_prefix: String,
    /// Reuse encoded download bytes while image, format and quality are unchanged.
    pub cache_downloads: bool,
    /// Resize targets with more pixels than this are refused.
    pub max_output_pixels: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            resize_filter: FilterType::Bilinear,
            default_scale_divisor: 2,
            dimension_step: 10,
            default_jpeg_quality: JpegQuality::default(),
            jpeg_quality_step: 5,
            download_prefix: DEFAULT_DOWNLOAD_PREFIX.to_string(),
            cache_downloads: true,
            max_output_pixels: DEFAULT_MAX_OUTPUT_PIXELS,
        }
    }
}

impl PipelineConfig {
    /// Check the values a session divides or formats with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_scale_divisor == 0 {
            return Err(ConfigError::NotPositive {
                field: "default_scale_divisor",
            });
        }
        if self.dimension_step == 0 {
            return Err(ConfigError::NotPositive {
                field: "dimension_step",
            });
        }
        if self.jpeg_quality_step == 0 {
            return Err(ConfigError::NotPositive {
                field: "jpeg_quality_step",
            });
        }
        if self.max_output_pixels == 0 {
            return Err(ConfigError::NotPositive {
                field: "max_output_pixels",
            });
        }
        if self.download_prefix.is_empty() {
            return Err(ConfigError::EmptyPrefix);
        }
        Ok(())
    }
}
