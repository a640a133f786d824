//! Geometry and pixel-layout normalization for the Pocket display.
//!
//! # Transform Order
//!
//! Every decoded image goes through the same steps:
//! 1. Quarter turn counter-clockwise (unconditional)
//! 2. Resize to [`MAX_THUMBNAIL_HEIGHT`] according to the [`ScalePolicy`]
//! 3. RGBA to BGRA channel swap
//!
//! # Coordinate System
//!
//! - Origin is top-left corner
//! - Buffers are row-major and tightly packed, 4 bytes per pixel

mod bgra;
mod rotation;

pub use bgra::{swap_red_blue, TransformedImage};
pub use rotation::rotate_counter_clockwise;

use crate::decode::{calculate_height_dimensions, resize_to_height, DecodeError, DecodedImage};

/// Tallest thumbnail the game details screen shows without cropping.
pub const MAX_THUMBNAIL_HEIGHT: u32 = 175;

/// When to resample the rotated image to [`MAX_THUMBNAIL_HEIGHT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScalePolicy {
    /// Only resize images whose rotated width exceeds the maximum.
    /// Small images are never enlarged.
    #[default]
    CapOversized,
    /// Always resize to the maximum height (box art / upscale mode).
    Always,
}

impl ScalePolicy {
    /// Policy selected by the upscale / box-art flag.
    pub fn from_upscale(upscale: bool) -> Self {
        if upscale {
            ScalePolicy::Always
        } else {
            ScalePolicy::CapOversized
        }
    }

    /// Whether an image of the given rotated width should be resampled.
    pub fn should_resize(self, rotated_width: u32) -> bool {
        match self {
            ScalePolicy::Always => true,
            ScalePolicy::CapOversized => rotated_width > MAX_THUMBNAIL_HEIGHT,
        }
    }
}

/// Size of the thumbnail `prepare_thumbnail` would produce for a source of
/// `width` x `height`.
pub fn thumbnail_dimensions(width: u32, height: u32, policy: ScalePolicy) -> (u32, u32) {
    // A quarter turn swaps the axes
    let (rotated_width, rotated_height) = (height, width);
    if policy.should_resize(rotated_width) && rotated_height != MAX_THUMBNAIL_HEIGHT {
        calculate_height_dimensions(rotated_width, rotated_height, MAX_THUMBNAIL_HEIGHT)
    } else {
        (rotated_width, rotated_height)
    }
}

/// Run the full display transform on a decoded image.
///
/// The output size is checked against the container's 16-bit fields before
/// any pixels are rotated or resampled.
///
/// # Errors
///
/// Returns `DecodeError::DimensionOverflow` if the thumbnail would be wider
/// or taller than `u16::MAX`, and `DecodeError::BufferSizeMismatch` if the
/// pixel buffer does not match its declared dimensions.
pub fn prepare_thumbnail(
    image: DecodedImage,
    policy: ScalePolicy,
) -> Result<TransformedImage, DecodeError> {
    let (width, height) = thumbnail_dimensions(image.width, image.height, policy);
    if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
        return Err(DecodeError::DimensionOverflow { width, height });
    }

    let rotated = rotate_counter_clockwise(image)?;

    let sized = if policy.should_resize(rotated.width) {
        resize_to_height(rotated, MAX_THUMBNAIL_HEIGHT)?
    } else {
        rotated
    };

    Ok(TransformedImage::from_rgba(sized))
}
