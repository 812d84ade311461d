//! WASM-compatible wrapper types for image data.

use imgmod_core::decode::{ChannelOrder, PixelBuffer};
use imgmod_core::transform::FilterType;
use serde::Serialize;
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::prelude::*;

/// An RGB pixel buffer for JavaScript.
///
/// # Memory Management
///
/// The pixel data lives in WASM memory. `pixels()` copies it into a
/// JavaScript `Uint8Array`.
#[wasm_bindgen]
pub struct JsPixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsPixelBuffer {
    /// Create a buffer from dimensions and RGB pixel data (3 bytes per pixel,
    /// row-major order).
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsPixelBuffer {
        JsPixelBuffer {
            width,
            height,
            pixels,
        }
    }

    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the number of bytes in the pixel buffer (width * height * 3)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGB pixel data as Uint8Array (a copy).
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }
}

impl JsPixelBuffer {
    /// Wrap a core buffer, reordering it to RGB if needed.
    pub(crate) fn from_buffer(image: PixelBuffer) -> Self {
        let image = match image.order {
            ChannelOrder::Rgb => image,
            ChannelOrder::Bgr => image.to_order(ChannelOrder::Rgb),
        };
        Self {
            width: image.width,
            height: image.height,
            pixels: image.pixels,
        }
    }

    /// Copy into a core buffer for the pipeline functions.
    ///
    /// Returns `None` when the pixel data does not match the dimensions.
    pub(crate) fn to_buffer(&self) -> Option<PixelBuffer> {
        let expected = self.width as usize * self.height as usize * 3;
        if self.width == 0 || self.height == 0 || self.pixels.len() != expected {
            return None;
        }
        Some(PixelBuffer::new(self.width, self.height, self.pixels.clone()))
    }
}

/// Convert a u8 filter type value to the core FilterType enum.
///
/// Values:
/// - 0 = Nearest
/// - 1 = Bilinear
/// - 2 = Lanczos3
///
/// Any other value defaults to Bilinear.
pub(crate) fn filter_from_u8(value: u8) -> FilterType {
    match value {
        0 => FilterType::Nearest,
        2 => FilterType::Lanczos3,
        _ => FilterType::Bilinear,
    }
}

/// Convert a JS number from a width/height input to an integer.
///
/// Fractions are truncated, NaN becomes 0 and out-of-range values saturate,
/// so the core validation sees every bad input as non-positive or too large.
pub(crate) fn dimension_from_js(value: f64) -> i64 {
    value as i64
}

/// Convert a JS number from the quality slider to a byte.
///
/// Fractions are truncated, NaN and negatives become 0 and anything past 255
/// saturates; the core then clamps the byte into the JPEG quality range.
pub(crate) fn quality_from_js(value: f64) -> u8 {
    value as u8
}

/// Serialize a core value into a plain JS value.
///
/// Uses the JSON-compatible serializer so maps arrive as plain objects
/// (`view.original.metadata.Make`) rather than `Map` instances.
pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
