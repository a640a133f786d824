//! Thumbnailizer Core - Analogue Pocket thumbnail transcoding
//!
//! This crate turns ordinary box art and screenshots into the Pocket's `.bin`
//! thumbnail format: it locates the image for each catalog entry, decodes it
//! by content, rotates and resizes it for the portrait display, swaps it to
//! BGRA and writes the fixed binary container named after the game's CRC32.
//!
//! # Module Structure
//!
//! - `catalog` - Checksums, catalog entries and datafile loading
//! - `resolve` - Finding the source image for an entry
//! - `decode` - Format sniffing, decoding and resizing
//! - `transform` - Rotation, scale policy and BGRA conversion
//! - `encode` - The `.bin` container
//! - `pipeline` - Batch orchestration

pub mod catalog;
pub mod decode;
pub mod encode;
pub mod error;
pub mod pipeline;
pub mod resolve;
pub mod transform;

pub use catalog::{load_datafile, parse_datafile, CatalogEntry, CatalogError, Checksum};
pub use error::{ErrorKind, ThumbnailError};
pub use pipeline::{process_catalog, process_entry, BatchConfig, BatchError, BatchSummary};
pub use resolve::SourceLocation;
pub use transform::{prepare_thumbnail, ScalePolicy, TransformedImage, MAX_THUMBNAIL_HEIGHT};
