//! Lossless PNG encoding for downloads.

use image::codecs::png::PngEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use log::debug;

use super::types::validate_rgb;
use super::{EncodeError, OutputFormat};

/// Encode RGB pixel data to PNG bytes.
///
/// PNG has no quality setting; the result always decodes to exactly `pixels`.
pub fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, EncodeError> {
    validate_rgb(pixels, width, height)?;

    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed {
            format: OutputFormat::Png,
            message: e.to_string(),
        })?;

    debug!("encoded {}x{} PNG: {} bytes", width, height, bytes.len());
    Ok(bytes)
}
