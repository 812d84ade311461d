//! Quarter-turn rotations.
//!
//! Only lossless rotations are offered, so every output pixel is an exact
//! copy of one source pixel and no interpolation is involved. The pixel
//! shuffling is done by `image::imageops`.

use std::fmt;
use std::str::FromStr;

use image::imageops;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::resize::as_rgb_image;
use super::TransformError;
use crate::decode::PixelBuffer;

/// The rotation choices offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rotation {
    /// Leave the image as it is.
    #[default]
    None,
    /// 90 degrees clockwise.
    Right90,
    /// 90 degrees counter-clockwise.
    Left90,
    /// 180 degrees.
    HalfTurn,
}

impl Rotation {
    /// Every choice, in the order the selector lists them.
    pub const ALL: [Rotation; 4] = [
        Rotation::None,
        Rotation::Right90,
        Rotation::Left90,
        Rotation::HalfTurn,
    ];

    /// Stable identifier used across the JS boundary.
    pub fn id(self) -> &'static str {
        match self {
            Rotation::None => "none",
            Rotation::Right90 => "right90",
            Rotation::Left90 => "left90",
            Rotation::HalfTurn => "half_turn",
        }
    }

    /// Human-readable label for the selector.
    pub fn label(self) -> &'static str {
        match self {
            Rotation::None => "None",
            Rotation::Right90 => "90° Right",
            Rotation::Left90 => "90° Left",
            Rotation::HalfTurn => "180°",
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when parsing an unknown rotation identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown rotation: {0}")]
pub struct ParseRotationError(pub String);

impl FromStr for Rotation {
    type Err = ParseRotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rotation::ALL
            .into_iter()
            .find(|rotation| rotation.id() == s)
            .ok_or_else(|| ParseRotationError(s.to_string()))
    }
}

/// Rotate an image by a quarter-turn multiple.
///
/// `Rotation::None` returns an identical copy. `Right90` and `Left90` swap
/// the output width and height; `HalfTurn` keeps them. The channel order of
/// the source is preserved.
///
/// # Errors
///
/// Returns `TransformError::MalformedBuffer` if the pixel data does not match
/// the buffer's dimensions.
///
/// # Example
///
/// ```
/// use imgmod_core::decode::PixelBuffer;
/// use imgmod_core::transform::{rotate, Rotation};
///
/// let image = PixelBuffer::new(4, 2, vec![0u8; 4 * 2 * 3]);
/// let rotated = rotate(&image, Rotation::Right90).unwrap();
/// assert_eq!((rotated.width, rotated.height), (2, 4));
/// ```
pub fn rotate(image: &PixelBuffer, rotation: Rotation) -> Result<PixelBuffer, TransformError> {
    let rgb_image = as_rgb_image(image)?;

    let rotated = match rotation {
        Rotation::None => rgb_image,
        Rotation::Right90 => imageops::rotate90(&rgb_image),
        Rotation::Left90 => imageops::rotate270(&rgb_image),
        Rotation::HalfTurn => imageops::rotate180(&rgb_image),
    };

    Ok(PixelBuffer::from_rgb_image(rotated, image.order))
}


// ============================================================================
// Property-Based Tests
// ============================================================================
