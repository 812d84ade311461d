//! Core types for image decoding.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of samples stored per pixel. Alpha is never carried.
pub const CHANNELS: usize = 3;

/// Error types for image decoding operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The bytes do not start with the signature of any known image format.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The format was recognized but is not one of JPEG or PNG.
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// The decoded image has a zero-sized edge.
    #[error("Image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
}

/// Order of the three color samples inside each pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelOrder {
    /// Red, green, blue. Everything the decoder produces uses this order.
    #[default]
    Rgb,
    /// Blue, green, red.
    Bgr,
}

/// Container format an upload was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    Jpeg,
    Png,
}

impl SourceFormat {
    /// Short display name, e.g. "JPEG".
    pub fn name(self) -> &'static str {
        match self {
            SourceFormat::Jpeg => "JPEG",
            SourceFormat::Png => "PNG",
        }
    }
}

/// Informational metadata extracted at decode time. Never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageMetadata {
    /// Container format of the upload.
    pub format: SourceFormat,
    /// Color type of the source before conversion to RGB (e.g. "Rgba8").
    pub color_type: String,
    /// Embedded tags (EXIF fields, PNG text/density/gamma, JPEG JFIF header)
    /// keyed by display name, sorted by name.
    pub tags: BTreeMap<String, String>,
}

impl ImageMetadata {
    /// True when no embedded tags could be read.
    pub fn is_unavailable(&self) -> bool {
        self.tags.is_empty()
    }
}

/// A 3-channel, 8-bit pixel grid in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Sample order inside each pixel.
    pub order: ChannelOrder,
    /// Pixel data, 3 bytes per pixel. Length is width * height * 3.
    pub pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Create a new RGB-ordered buffer with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self::with_order(width, height, ChannelOrder::Rgb, pixels)
    }

    /// Create a new buffer with an explicit channel order.
    pub fn with_order(width: u32, height: u32, order: ChannelOrder, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * CHANNELS,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            order,
            pixels,
        }
    }

    /// Create a buffer from an `image::RgbImage`, labelling its samples with `order`.
    pub fn from_rgb_image(img: image::RgbImage, order: ChannelOrder) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            order,
            pixels: img.into_raw(),
        }
    }

    /// View the samples as an `image::RgbImage`.
    ///
    /// The image crate only sees three samples per pixel, so this works for
    /// both orders as long as the operation does not mix channels.
    pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// Return a copy with samples rearranged into `order`.
    pub fn to_order(&self, order: ChannelOrder) -> PixelBuffer {
        if self.order == order {
            return self.clone();
        }
        let mut pixels = self.pixels.clone();
        for px in pixels.chunks_exact_mut(CHANNELS) {
            px.swap(0, 2);
        }
        PixelBuffer {
            width: self.width,
            height: self.height,
            order,
            pixels,
        }
    }

    /// (height, width, channels), the array shape of the buffer.
    pub fn shape(&self) -> (u32, u32, usize) {
        (self.height, self.width, CHANNELS)
    }
}

/// Result of decoding an upload: pixels plus display-only metadata.
#[derive(Debug, Clone)]
pub struct DecodedUpload {
    pub image: PixelBuffer,
    pub metadata: ImageMetadata,
}
