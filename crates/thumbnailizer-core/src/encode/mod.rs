//! Thumbnail container encoding for the Analogue Pocket.
//!
//! This module provides functionality for:
//! - Serializing a [`TransformedImage`](crate::transform::TransformedImage)
//!   into the Pocket's `.bin` thumbnail layout
//! - Parsing that layout back for inspection and verification
//!
//! # Layout
//!
//! ```text
//! offset  size     field
//! 0       4        magic " IPA" (0x20 0x49 0x50 0x41)
//! 4       2        height, u16 little-endian
//! 6       2        width, u16 little-endian
//! 8       4*W*H    BGRA8 pixels, row-major, no padding
//! ```
//!
//! # Examples
//!
//! ```ignore
//! use thumbnailizer_core::encode::write_thumbnail;
//!
//! let path = std::path::Path::new("out/deadbeef.bin");
//! write_thumbnail(path, &transformed).unwrap();
//! ```

mod container;

pub use container::{
    encode_thumbnail, encode_to_vec, read_thumbnail, write_thumbnail, EncodeError, Section,
    ThumbnailHeader, HEADER_LEN, HEADER_MAGIC,
};
