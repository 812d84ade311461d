//! Decoding of uploaded JPEG and PNG files.

use std::io::Cursor;

use image::{ImageFormat, ImageReader};
use log::debug;

use super::metadata::read_tags;
use super::{ChannelOrder, DecodeError, DecodedUpload, ImageMetadata, PixelBuffer, SourceFormat};

/// File extensions the upload widget accepts.
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Decode an uploaded image into an RGB pixel buffer and its metadata.
///
/// The format is sniffed from the bytes, not from the file name. Only JPEG
/// and PNG are accepted. EXIF orientation is not applied: the pixel grid is
/// taken exactly as stored. Alpha and grayscale sources are converted to
/// 3-channel RGB.
///
/// # Errors
///
/// * `DecodeError::InvalidFormat` if the bytes match no known image signature.
/// * `DecodeError::UnsupportedFormat` for a recognized format other than JPEG/PNG.
/// * `DecodeError::CorruptedFile` if the data is truncated or malformed.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedUpload, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let format = match reader.format() {
        Some(ImageFormat::Jpeg) => SourceFormat::Jpeg,
        Some(ImageFormat::Png) => SourceFormat::Png,
        Some(other) => return Err(DecodeError::UnsupportedFormat(format!("{:?}", other))),
        None => return Err(DecodeError::InvalidFormat),
    };

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let color_type = format!("{:?}", img.color());
    let rgb_img = img.into_rgb8();
    let (width, height) = rgb_img.dimensions();
    if width == 0 || height == 0 {
        return Err(DecodeError::EmptyImage { width, height });
    }

    let metadata = ImageMetadata {
        format,
        color_type,
        tags: read_tags(bytes, format),
    };
    debug!(
        "decoded {} {}x{} ({}), {} metadata tags",
        format.name(),
        width,
        height,
        metadata.color_type,
        metadata.tags.len()
    );

    Ok(DecodedUpload {
        image: PixelBuffer::from_rgb_image(rgb_img, ChannelOrder::Rgb),
        metadata,
    })
}

/// Check a file name against the accepted upload extensions (case-insensitive).
pub fn extension_is_supported(file_name: &str) -> bool {
    match file_name.rsplit_once('.') {
        Some((_, ext)) => SUPPORTED_EXTENSIONS
            .iter()
            .any(|supported| supported.eq_ignore_ascii_case(ext)),
        None => false,
    }
}
