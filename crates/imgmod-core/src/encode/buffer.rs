//! Encoding of pixel buffers in the user's chosen format.

use crate::decode::{ChannelOrder, PixelBuffer};

use super::{encode_jpeg, encode_png, EncodeError, JpegQuality, OutputFormat};

/// Encode a pixel buffer as `format`.
///
/// Buffers in either channel order are accepted; BGR data is reordered to RGB
/// before it reaches the codec. `quality` only applies to JPEG.
pub fn encode(
    image: &PixelBuffer,
    format: OutputFormat,
    quality: JpegQuality,
) -> Result<Vec<u8>, EncodeError> {
    let rgb;
    let pixels = match image.order {
        ChannelOrder::Rgb => &image.pixels,
        ChannelOrder::Bgr => {
            rgb = image.to_order(ChannelOrder::Rgb);
            &rgb.pixels
        }
    };

    match format {
        OutputFormat::Png => encode_png(pixels, image.width, image.height),
        OutputFormat::Jpeg => encode_jpeg(pixels, image.width, image.height, quality.value()),
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
