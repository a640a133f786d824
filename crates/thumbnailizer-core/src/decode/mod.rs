//! Image decoding for the thumbnail pipeline.
//!
//! This module provides functionality for:
//! - Detecting the encoded format from magic numbers, not file extensions
//! - Decoding PNG, JPEG, GIF, BMP, TIFF and WebP to straight-alpha RGBA
//! - Resizing decoded images with aspect ratio preserved
//!
//! # Architecture
//!
//! All operations are synchronous and work on in-memory byte slices. Reading
//! the source file is left to the caller so that I/O failures can be reported
//! separately from decoder failures.
//!
//! # Examples
//!
//! ```ignore
//! use thumbnailizer_core::decode::decode_image;
//!
//! let bytes = std::fs::read("Tetris (World).png").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{} image", image.width, image.height);
//! ```

mod resize;
mod sniff;
mod types;

pub use resize::{calculate_height_dimensions, resize, resize_to_height};
pub use sniff::{decode_image, sniff_format};
pub use types::{DecodeError, DecodedImage, SourceFormat};
