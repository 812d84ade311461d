//! JPEG encoding for downloads.
//!
//! Uses `jpeg-encoder` with optimized Huffman tables: a second pass over the
//! coefficients builds per-image tables, which shrinks the file without
//! touching pixel fidelity. Quality is clamped to the range the quality
//! slider offers.

use jpeg_encoder::{ColorType, Encoder};
use log::debug;

use super::types::validate_rgb;
use super::{EncodeError, JpegQuality, OutputFormat};

/// Encode RGB pixel data to JPEG bytes.
///
/// # Arguments
///
/// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
/// * `width` - Image width in pixels, at most 65535
/// * `height` - Image height in pixels, at most 65535
/// * `quality` - JPEG quality; values outside 10-100 are clamped
///
/// # Returns
///
/// JPEG-encoded bytes on success, or an error if encoding fails.
///
/// # Example
///
/// ```
/// use imgmod_core::encode::encode_jpeg;
///
/// let pixels = vec![128u8; 100 * 100 * 3]; // Gray image
/// let jpeg = encode_jpeg(&pixels, 100, 100, 90).unwrap();
///
/// // Verify JPEG magic bytes
/// assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
/// ```
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    encode_jpeg_with(pixels, width, height, JpegQuality::new(quality), true)
}

fn encode_jpeg_with(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: JpegQuality,
    optimize_huffman: bool,
) -> Result<Vec<u8>, EncodeError> {
    validate_rgb(pixels, width, height)?;

    let failed = |message: String| EncodeError::EncodingFailed {
        format: OutputFormat::Jpeg,
        message,
    };
    let (w, h) = match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(failed(format!(
                "{}x{} exceeds the JPEG limit of {} pixels per side",
                width,
                height,
                u16::MAX
            )))
        }
    };

    let mut bytes = Vec::new();
    let mut encoder = Encoder::new(&mut bytes, quality.value());
    encoder.set_optimized_huffman_tables(optimize_huffman);
    encoder
        .encode(pixels, w, h, ColorType::Rgb)
        .map_err(|e| failed(e.to_string()))?;

    debug!(
        "encoded {}x{} JPEG at quality {} (optimized tables: {}): {} bytes",
        width,
        height,
        quality.value(),
        optimize_huffman,
        bytes.len()
    );
    Ok(bytes)
}
