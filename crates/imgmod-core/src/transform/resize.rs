//! Exact-size resizing.
//!
//! The requested dimensions are used as given; aspect ratio is the caller's
//! business. Functions return new buffers without modifying the input.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::{PixelBuffer, CHANNELS};

/// Errors from the transform engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// A resize target with a non-positive (or out of range) edge.
    #[error("Invalid dimensions {width} x {height}: width and height must be greater than 0")]
    InvalidDimension { width: i64, height: i64 },

    /// Pixel data length doesn't match the buffer's dimensions.
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    MalformedBuffer { expected: usize, actual: usize },

    /// A resize target with more pixels than the configured budget.
    #[error("Target {width} x {height} exceeds the limit of {max_pixels} pixels")]
    TooLarge {
        width: u32,
        height: u32,
        max_pixels: u64,
    },
}

/// Largest output, in pixels, a resize may produce unless configured otherwise
/// (50 megapixels, about 150 MB of RGB samples).
pub const DEFAULT_MAX_OUTPUT_PIXELS: u64 = 50_000_000;

/// Filter type for resizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation.
    #[default]
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// A validated, strictly positive resize target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeTarget {
    pub width: u32,
    pub height: u32,
}

impl ResizeTarget {
    /// Validate raw numeric input from the width/height fields.
    ///
    /// # Errors
    ///
    /// Returns `TransformError::InvalidDimension` if either value is `<= 0`
    /// or does not fit in a `u32`.
    pub fn new(width: i64, height: i64) -> Result<Self, TransformError> {
        let invalid = || TransformError::InvalidDimension { width, height };
        if width <= 0 || height <= 0 {
            return Err(invalid());
        }
        Ok(Self {
            width: u32::try_from(width).map_err(|_| invalid())?,
            height: u32::try_from(height).map_err(|_| invalid())?,
        })
    }

    pub fn pixel_count(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Reject targets whose output would exceed `max_pixels`.
    ///
    /// # Errors
    ///
    /// Returns `TransformError::TooLarge` when `width * height > max_pixels`.
    pub fn within_limit(self, max_pixels: u64) -> Result<Self, TransformError> {
        if self.pixel_count() > max_pixels {
            return Err(TransformError::TooLarge {
                width: self.width,
                height: self.height,
                max_pixels,
            });
        }
        Ok(self)
    }
}

/// Borrow the samples as an `image::RgbImage`, checking the buffer length.
pub(super) fn as_rgb_image(image: &PixelBuffer) -> Result<image::RgbImage, TransformError> {
    let malformed = TransformError::MalformedBuffer {
        expected: image.width as usize * image.height as usize * CHANNELS,
        actual: image.pixels.len(),
    };
    if image.pixels.len() != image.width as usize * image.height as usize * CHANNELS {
        return Err(malformed);
    }
    image.to_rgb_image().ok_or(malformed)
}

/// Resize an image to exact dimensions with bilinear interpolation.
///
/// # Errors
///
/// Returns `TransformError::InvalidDimension` if `width` or `height` is zero.
pub fn resize(image: &PixelBuffer, width: u32, height: u32) -> Result<PixelBuffer, TransformError> {
    resize_with_filter(image, width, height, FilterType::Bilinear)
}

/// Resize an image to exact dimensions with the given filter.
///
/// The channel order of `image` is carried over to the result.
///
/// # Errors
///
/// * `TransformError::InvalidDimension` if `width` or `height` is zero.
/// * `TransformError::MalformedBuffer` if the source pixel data is inconsistent.
pub fn resize_with_filter(
    image: &PixelBuffer,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<PixelBuffer, TransformError> {
    if width == 0 || height == 0 {
        return Err(TransformError::InvalidDimension {
            width: width.into(),
            height: height.into(),
        });
    }

    // Fast path: if dimensions match, just clone
    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let rgb_image = as_rgb_image(image)?;
    let resized = image::imageops::resize(&rgb_image, width, height, filter.to_image_filter());

    Ok(PixelBuffer::from_rgb_image(resized, image.order))
}


// ============================================================================
// Property-Based Tests
// ============================================================================
