//! Quarter-turn rotation.
//!
//! The Pocket shows thumbnails in portrait orientation, so every landscape
//! source is turned a quarter counter-clockwise before any resampling.
//! Quarter turns are exact pixel permutations; no interpolation is involved.

use crate::decode::{DecodeError, DecodedImage};

/// Turn an image 90 degrees counter-clockwise. Width and height swap.
///
/// # Errors
///
/// Returns `DecodeError::BufferSizeMismatch` if the pixel buffer does not
/// match the declared dimensions.
pub fn rotate_counter_clockwise(image: DecodedImage) -> Result<DecodedImage, DecodeError> {
    let expected = image.width as usize * image.height as usize * 4;
    let actual = image.pixels.len();
    let rgba = image
        .into_rgba_image()
        .ok_or(DecodeError::BufferSizeMismatch { expected, actual })?;

    Ok(DecodedImage::from_rgba_image(image::imageops::rotate270(&rgba)))
}
