//! imgmod WASM - WebAssembly bindings for imgmod
//!
//! This crate exposes the imgmod-core resize/rotate pipeline to
//! JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `session` - The interactive session (upload, resize, rotate, download)
//! - `types` - WASM-compatible wrapper types for image data
//! - `decode` - Image decoding bindings (JPEG, PNG)
//! - `transform` - Resize and rotation bindings
//! - `encode` - Image encoding bindings (PNG, JPEG export)
//! - `logger` - Routes core log output to the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsImageSession } from '@imgmod/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const session = new JsImageSession();
//! session.upload(file.name, new Uint8Array(await file.arrayBuffer()));
//! console.log(session.phase);
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod encode;
mod logger;
mod session;
mod transform;
mod types;

// Re-export public types
pub use decode::{decode_image, is_supported_file, read_metadata};
pub use encode::{download_file_name, encode_image, encode_jpeg, mime_type};
pub use logger::set_log_level;
pub use session::JsImageSession;
pub use transform::{resize, rotate, rotation_choices};
pub use types::JsPixelBuffer;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logger::init(log::LevelFilter::Info);
    log::debug!("imgmod-wasm {} ready", version());
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
