//! Image decoding WASM bindings.
//!
//! # Functions
//!
//! - [`decode_image`] - Decode a JPEG or PNG upload to RGB pixels
//! - [`read_metadata`] - Decode an upload and return only its metadata
//! - [`is_supported_file`] - Check a file name against the accepted extensions
//!
//! # Example
//!
//! ```typescript
//! import { decode_image, is_supported_file } from '@imgmod/wasm';
//!
//! if (is_supported_file(file.name)) {
//!   const image = decode_image(new Uint8Array(await file.arrayBuffer()));
//!   console.log(`Decoded ${image.width}x${image.height}`);
//! }
//! ```

use crate::types::{to_js, JsPixelBuffer};
use imgmod_core::decode;
use wasm_bindgen::prelude::*;

/// Decode a JPEG or PNG image from bytes.
///
/// The format is detected from the content, not the file name. Alpha is
/// dropped and grayscale is expanded, so the result is always RGB.
///
/// # Errors
///
/// Returns an error if the bytes are not an image, are another image format,
/// or are corrupted.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsPixelBuffer, JsValue> {
    decode::decode_image(bytes)
        .map(|upload| JsPixelBuffer::from_buffer(upload.image))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Decode an upload and return its metadata as
/// `{ format, color_type, tags }`.
#[wasm_bindgen]
pub fn read_metadata(bytes: &[u8]) -> Result<JsValue, JsValue> {
    let upload = decode::decode_image(bytes).map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_js(&upload.metadata)
}

/// Whether a file name has one of the accepted extensions (jpg, jpeg, png).
#[wasm_bindgen]
pub fn is_supported_file(file_name: &str) -> bool {
    decode::extension_is_supported(file_name)
}
