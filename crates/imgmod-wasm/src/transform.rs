//! WASM bindings for resize and rotation.

use crate::types::{filter_from_u8, JsPixelBuffer};
use imgmod_core::transform::{
    resize_with_filter as core_resize, rotate as core_rotate, ResizeTarget, Rotation,
    DEFAULT_MAX_OUTPUT_PIXELS,
};
use wasm_bindgen::prelude::*;

fn malformed() -> JsValue {
    JsValue::from_str("Pixel data does not match image dimensions")
}

/// Resize an image to exactly `width` x `height`.
///
/// # Arguments
///
/// * `image` - Source image
/// * `width` / `height` - Target size, both at least 1, at most 50 megapixels
/// * `filter` - 0 = Nearest, 1 = Bilinear, 2 = Lanczos3
///
/// # Example (TypeScript)
///
/// ```typescript
/// const half = resize(image, image.width / 2, image.height / 2, 1);
/// ```
#[wasm_bindgen]
pub fn resize(
    image: &JsPixelBuffer,
    width: u32,
    height: u32,
    filter: u8,
) -> Result<JsPixelBuffer, JsValue> {
    let target = ResizeTarget::new(width.into(), height.into())
        .and_then(|target| target.within_limit(DEFAULT_MAX_OUTPUT_PIXELS))
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let buffer = image.to_buffer().ok_or_else(malformed)?;
    core_resize(&buffer, target.width, target.height, filter_from_u8(filter))
        .map(JsPixelBuffer::from_buffer)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Rotate an image by a quarter-turn multiple.
///
/// `rotation` is one of `none`, `right90`, `left90` or `half_turn`.
/// Quarter turns swap width and height.
#[wasm_bindgen]
pub fn rotate(image: &JsPixelBuffer, rotation: &str) -> Result<JsPixelBuffer, JsValue> {
    let rotation = rotation
        .parse::<Rotation>()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let buffer = image.to_buffer().ok_or_else(malformed)?;
    core_rotate(&buffer, rotation)
        .map(JsPixelBuffer::from_buffer)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Rotation ids in menu order.
#[wasm_bindgen]
pub fn rotation_choices() -> Vec<String> {
    Rotation::ALL.iter().map(|r| r.id().to_string()).collect()
}
