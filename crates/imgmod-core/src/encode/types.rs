//! Core types for image encoding.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The codec reported a failure
    #[error("{format} encoding failed: {message}")]
    EncodingFailed {
        format: OutputFormat,
        message: String,
    },
}

/// Download format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Lossless, larger files.
    #[default]
    Png,
    /// Lossy, quality-controlled, smaller files.
    Jpeg,
}

impl OutputFormat {
    /// Both formats, in the order the selector lists them.
    pub const ALL: [OutputFormat; 2] = [OutputFormat::Png, OutputFormat::Jpeg];

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpeg",
        }
    }

    /// MIME type of the encoded bytes.
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
        }
    }

    /// Whether the quality setting has any effect.
    pub fn uses_quality(self) -> bool {
        matches!(self, OutputFormat::Jpeg)
    }

    /// Selector label.
    pub fn label(self) -> &'static str {
        match self {
            OutputFormat::Png => "PNG (lossless, larger file)",
            OutputFormat::Jpeg => "JPEG (compressed, smaller file)",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Png => f.write_str("PNG"),
            OutputFormat::Jpeg => f.write_str("JPEG"),
        }
    }
}

/// Error returned when parsing an unknown format name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown output format: {0}")]
pub struct ParseFormatError(pub String);

impl FromStr for OutputFormat {
    type Err = ParseFormatError;

    /// Accepts `png`, `jpeg` and `jpg`, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            _ => Err(ParseFormatError(s.to_string())),
        }
    }
}

/// JPEG quality, always within [`JpegQuality::MIN`]..=[`JpegQuality::MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct JpegQuality(u8);

impl JpegQuality {
    pub const MIN: u8 = 10;
    pub const MAX: u8 = 100;
    pub const DEFAULT: u8 = 95;

    /// Create a quality value, clamping into the accepted range.
    pub fn new(value: u8) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for JpegQuality {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl From<u8> for JpegQuality {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

impl From<JpegQuality> for u8 {
    fn from(quality: JpegQuality) -> Self {
        quality.0
    }
}

/// Check that `pixels` holds exactly `width * height` RGB samples.
pub(super) fn validate_rgb(pixels: &[u8], width: u32, height: u32) -> Result<(), EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = (width as usize) * (height as usize) * 3;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }
    Ok(())
}
