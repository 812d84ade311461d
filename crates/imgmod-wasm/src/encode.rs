//! Image encoding WASM bindings.
//!
//! # Functions
//!
//! - [`encode_image`] - Encode a pixel buffer as PNG or JPEG
//! - [`encode_jpeg`] - Encode raw RGB pixel data to JPEG bytes
//! - [`download_file_name`] - Build the download file name for an image
//!
//! # Example
//!
//! ```typescript
//! import { encode_image, download_file_name } from '@imgmod/wasm';
//!
//! const bytes = encode_image(image, 'jpeg', 80);
//! const name = download_file_name('resized', image.width, image.height, 'jpeg');
//! ```

use crate::types::{quality_from_js, JsPixelBuffer};
use imgmod_core::controller;
use imgmod_core::encode::{self, JpegQuality, OutputFormat};
use wasm_bindgen::prelude::*;

fn parse_format(format: &str) -> Result<OutputFormat, JsValue> {
    format
        .parse::<OutputFormat>()
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Encode an image as `png` or `jpeg` (`jpg` also accepted).
///
/// `quality` is only used for JPEG. Any number is accepted and clamped to
/// 10..=100.
///
/// # Errors
///
/// Returns an error for an unknown format, or if the pixel data does not
/// match the image dimensions.
#[wasm_bindgen]
pub fn encode_image(image: &JsPixelBuffer, format: &str, quality: f64) -> Result<Vec<u8>, JsValue> {
    let format = parse_format(format)?;
    let buffer = image
        .to_buffer()
        .ok_or_else(|| JsValue::from_str("Pixel data does not match image dimensions"))?;
    encode::encode(&buffer, format, JpegQuality::new(quality_from_js(quality)))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Encode RGB pixel data (3 bytes per pixel, row-major) to JPEG bytes.
///
/// # Quality Guidelines
///
/// * 90-100: High quality (default 95)
/// * 70-90: Good quality, much smaller files
/// * Below 50: Visible artifacts
#[wasm_bindgen]
pub fn encode_jpeg(pixels: &[u8], width: u32, height: u32, quality: f64) -> Result<Vec<u8>, JsValue> {
    encode::encode_jpeg(pixels, width, height, quality_from_js(quality))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// `<prefix>_<width>x<height>.<png|jpeg>`
#[wasm_bindgen]
pub fn download_file_name(
    prefix: &str,
    width: u32,
    height: u32,
    format: &str,
) -> Result<String, JsValue> {
    let format = parse_format(format)?;
    Ok(controller::download_file_name(prefix, width, height, format))
}

/// MIME type for a download format.
#[wasm_bindgen]
pub fn mime_type(format: &str) -> Result<String, JsValue> {
    Ok(parse_format(format)?.mime_type().to_string())
}


/// WASM-specific tests that require JsValue.
///
/// These tests use functions that return `Result<T, JsValue>` and can only
/// run on wasm32 targets. Use `wasm-pack test` to run these.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_encode_image_png() {
        let img = JsPixelBuffer::new(4, 4, vec![10u8; 48]);
        let png = encode_image(&img, "png", 0.0).unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }

    #[wasm_bindgen_test]
    fn test_encode_image_unknown_format() {
        let img = JsPixelBuffer::new(4, 4, vec![10u8; 48]);
        assert!(encode_image(&img, "bmp", 90.0).is_err());
    }

    #[wasm_bindgen_test]
    fn test_encode_jpeg_invalid_pixel_data() {
        let pixels = vec![128u8; 50 * 50 * 3]; // Wrong size for 100x100
        assert!(encode_jpeg(&pixels, 100, 100, 90.0).is_err());
    }

    #[wasm_bindgen_test]
    fn test_encode_jpeg_out_of_range_quality_is_clamped() {
        let pixels = vec![128u8; 8 * 8 * 3];
        assert_eq!(
            encode_jpeg(&pixels, 8, 8, 1000.0).unwrap(),
            encode_jpeg(&pixels, 8, 8, 100.0).unwrap()
        );
        assert_eq!(
            encode_jpeg(&pixels, 8, 8, -4.0).unwrap(),
            encode_jpeg(&pixels, 8, 8, 10.0).unwrap()
        );
    }

    #[wasm_bindgen_test]
    fn test_download_file_name_jpg_alias() {
        assert_eq!(
            download_file_name("out", 3, 2, "jpg").unwrap(),
            "out_3x2.jpeg"
        );
    }

    #[wasm_bindgen_test]
    fn test_mime_type() {
        assert_eq!(mime_type("png").unwrap(), "image/png");
    }
}
