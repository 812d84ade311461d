//! Image decoding for uploaded files.
//!
//! This module provides functionality for:
//! - Sniffing and decoding JPEG and PNG uploads into 3-channel RGB buffers
//! - Extracting display-only EXIF metadata
//! - Checking upload file names against the accepted extensions
//!
//! All operations are synchronous and pure functions of the input bytes.
//!
//! # Examples
//!
//! ```ignore
//! use imgmod_core::decode::decode_image;
//!
//! let bytes = std::fs::read("photo.png").unwrap();
//! let upload = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{} image", upload.image.width, upload.image.height);
//! ```

mod metadata;
mod types;
mod upload;

pub use types::{
    ChannelOrder, DecodeError, DecodedUpload, ImageMetadata, PixelBuffer, SourceFormat, CHANNELS,
};
pub use upload::{decode_image, extension_is_supported, SUPPORTED_EXTENSIONS};
