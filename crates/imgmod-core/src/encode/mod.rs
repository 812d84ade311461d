//! Image encoding for downloads.
//!
//! This module provides functionality for:
//! - Encoding images to lossless PNG
//! - Encoding images to JPEG with a clamped quality setting
//! - Format/extension/MIME bookkeeping for the download button
//!
//! # Examples
//!
//! ```ignore
//! use imgmod_core::encode::{encode, JpegQuality, OutputFormat};
//!
//! let bytes = encode(&image, OutputFormat::Jpeg, JpegQuality::new(80)).unwrap();
//! println!("Encoded {} bytes", bytes.len());
//! ```

mod buffer;
mod jpeg;
mod png;
mod types;

pub use buffer::encode;
pub use jpeg::encode_jpeg;
pub use png::encode_png;
pub use types::{EncodeError, JpegQuality, OutputFormat, ParseFormatError};
