//! Image transformation operations: resize and rotation.
//!
//! Both operations are pure functions over a [`PixelBuffer`](crate::decode::PixelBuffer)
//! and return a new buffer. The session applies them in this order:
//! 1. Resize (always from the original upload)
//! 2. Rotation (of the currently persisted result)
//!
//! Origin is the top-left corner.

mod resize;
mod rotation;

pub use resize::{
    resize, resize_with_filter, FilterType, ResizeTarget, TransformError, DEFAULT_MAX_OUTPUT_PIXELS,
};
pub use rotation::{rotate, ParseRotationError, Rotation};
