//! Image resizing for thumbnail generation.
//!
//! Provides resize operations using the `image` crate's algorithms.
//! All functions consume the input and return a new `DecodedImage`; when no
//! resampling is needed the input is handed back untouched.

use image::imageops::FilterType;

use super::{DecodeError, DecodedImage};

/// Every thumbnail is resampled with Lanczos3.
const THUMBNAIL_FILTER: FilterType = FilterType::Lanczos3;

/// Resample an image to exactly `width` x `height`.
///
/// # Errors
///
/// Returns `DecodeError::InvalidDimensions` if either target dimension is zero.
/// Returns `DecodeError::BufferSizeMismatch` if the source buffer is malformed.
pub fn resize(
    image: DecodedImage,
    width: u32,
    height: u32,
) -> Result<DecodedImage, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidDimensions { width, height });
    }

    // Fast path: if dimensions match, nothing to do
    if image.width == width && image.height == height {
        return Ok(image);
    }

    let expected = image.width as usize * image.height as usize * 4;
    let actual = image.pixels.len();
    let rgba_image = image
        .into_rgba_image()
        .ok_or(DecodeError::BufferSizeMismatch { expected, actual })?;

    let resized = image::imageops::resize(&rgba_image, width, height, THUMBNAIL_FILTER);

    Ok(DecodedImage::from_rgba_image(resized))
}

/// Resize an image to a fixed height, scaling the width proportionally.
///
/// Empty images and images already at `target_height` are returned unchanged,
/// so no resampling artifacts are introduced for a no-op.
///
/// # Errors
///
/// Returns `DecodeError::InvalidDimensions` if `target_height` is zero.
pub fn resize_to_height(
    image: DecodedImage,
    target_height: u32,
) -> Result<DecodedImage, DecodeError> {
    if target_height == 0 {
        return Err(DecodeError::InvalidDimensions {
            width: image.width,
            height: target_height,
        });
    }

    if image.is_empty() || image.height == target_height {
        return Ok(image);
    }

    let (new_width, new_height) =
        calculate_height_dimensions(image.width, image.height, target_height);

    resize(image, new_width, new_height)
}

/// Calculate dimensions for a fixed target height while preserving aspect ratio.
///
/// The width is rounded to the nearest pixel and never drops below 1.
/// Zero-sized input is returned as-is.
pub fn calculate_height_dimensions(width: u32, height: u32, target_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (width, height);
    }

    let scale = target_height as f64 / height as f64;
    let new_width = (width as f64 * scale).round() as u32;
    (new_width.max(1), target_height)
}
