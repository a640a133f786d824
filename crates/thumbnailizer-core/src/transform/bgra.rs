//! BGRA pixel layout expected by the Pocket.

use crate::decode::DecodedImage;

/// Swap the red and blue byte of every 4-byte pixel in place.
///
/// The swap is its own inverse, so the same routine converts RGBA to BGRA and
/// back. A trailing partial pixel, which a tightly packed buffer never has, is
/// left alone.
#[inline]
pub fn swap_red_blue(pixels: &mut [u8]) {
    for px in pixels.chunks_exact_mut(4) {
        px.swap(0, 2);
    }
}

/// An image ready for the container encoder: rotated, resized and in BGRA
/// order with no row padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl TransformedImage {
    /// Convert a straight-alpha RGBA image into BGRA.
    pub fn from_rgba(image: DecodedImage) -> Self {
        let DecodedImage {
            width,
            height,
            mut pixels,
        } = image;
        swap_red_blue(&mut pixels);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Build from a BGRA buffer, checking that it is tightly packed.
    ///
    /// Returns `None` when the buffer length is not `width * height * 4`.
    pub fn from_bgra(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        if pixels.len() != width as usize * height as usize * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// BGRA pixel data, row-major, 4 bytes per pixel.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Swap back to RGBA.
    pub fn into_rgba(self) -> DecodedImage {
        let Self {
            width,
            height,
            mut pixels,
        } = self;
        swap_red_blue(&mut pixels);
        DecodedImage::new(width, height, pixels)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: swapping twice is the identity.
        #[test]
        fn prop_swap_is_involution(pixels in proptest::collection::vec(any::<u8>(), 0..256)) {
            let mut swapped = pixels.clone();
            swap_red_blue(&mut swapped);
            swap_red_blue(&mut swapped);
            prop_assert_eq!(swapped, pixels);
        }

        /// Property: only the red and blue bytes move.
        #[test]
        fn prop_swap_touches_only_red_blue(pixels in proptest::collection::vec(any::<[u8; 4]>(), 0..64)) {
            let mut flat = pixels.concat();
            swap_red_blue(&mut flat);
            for (before, after) in pixels.iter().zip(flat.chunks_exact(4)) {
                prop_assert_eq!(after, &[before[2], before[1], before[0], before[3]][..]);
            }
        }
    }
}
