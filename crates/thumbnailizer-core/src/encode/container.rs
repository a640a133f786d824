//! `.bin` container writer and reader.
//!
//! Only the 32-bit (8 bits per channel) variant is produced. The 16-bit
//! variant shares the layout but uses `0x10` as the first magic byte.

use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::transform::TransformedImage;

/// Magic bytes opening every 32-bit thumbnail: ASCII `" IPA"`.
pub const HEADER_MAGIC: [u8; 4] = [0x20, 0x49, 0x50, 0x41];

/// Size of the magic plus the two dimension fields.
pub const HEADER_LEN: usize = 8;

/// The part of the container being written when a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Header,
    Height,
    Width,
    PixelData,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::Header => "header",
            Section::Height => "height",
            Section::Width => "width",
            Section::PixelData => "pixel data",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while writing or reading a thumbnail container.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Width or height does not fit the 16-bit header fields.
    #[error("Dimensions {width}x{height} exceed the 16-bit header limit of {}", u16::MAX)]
    DimensionOverflow { width: u32, height: u32 },

    /// The output file could not be created or truncated.
    #[error("Failed to create {}: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing one of the container sections failed.
    #[error("Failed to write {section}: {source}")]
    Write {
        section: Section,
        #[source]
        source: io::Error,
    },

    /// The container does not start with the expected magic bytes.
    #[error("Invalid thumbnail magic: {0:02x?}")]
    InvalidMagic([u8; 4]),

    /// The container is shorter or longer than its header declares.
    #[error("Invalid thumbnail length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

/// The dimension fields of a thumbnail container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailHeader {
    pub height: u16,
    pub width: u16,
}

impl ThumbnailHeader {
    /// Header for an image, rejecting dimensions that would be truncated.
    ///
    /// # Errors
    ///
    /// Returns `EncodeError::DimensionOverflow` if either side exceeds `u16::MAX`.
    pub fn for_image(image: &TransformedImage) -> Result<Self, EncodeError> {
        let overflow = || EncodeError::DimensionOverflow {
            width: image.width(),
            height: image.height(),
        };
        Ok(Self {
            height: u16::try_from(image.height()).map_err(|_| overflow())?,
            width: u16::try_from(image.width()).map_err(|_| overflow())?,
        })
    }

    /// Number of pixel bytes following the header.
    pub fn payload_len(&self) -> usize {
        usize::from(self.width) * usize::from(self.height) * 4
    }

    /// Total container size in bytes.
    pub fn file_len(&self) -> usize {
        HEADER_LEN + self.payload_len()
    }
}

/// Serialize a thumbnail to any writer.
///
/// # Errors
///
/// Returns `EncodeError::DimensionOverflow` before writing anything if the
/// image is too large, or `EncodeError::Write` naming the failed section.
pub fn encode_thumbnail<W: Write>(writer: &mut W, image: &TransformedImage) -> Result<(), EncodeError> {
    let header = ThumbnailHeader::for_image(image)?;

    write_section(writer, Section::Header, &HEADER_MAGIC)?;
    write_section(writer, Section::Height, &header.height.to_le_bytes())?;
    write_section(writer, Section::Width, &header.width.to_le_bytes())?;
    write_section(writer, Section::PixelData, image.pixels())?;

    Ok(())
}

/// Serialize a thumbnail into a new byte vector.
pub fn encode_to_vec(image: &TransformedImage) -> Result<Vec<u8>, EncodeError> {
    let mut buffer = Vec::with_capacity(HEADER_LEN + image.pixels().len());
    encode_thumbnail(&mut buffer, image)?;
    Ok(buffer)
}

/// Write a thumbnail to `path`, creating or truncating the file.
///
/// A failure part way through leaves a truncated file behind; reruns simply
/// overwrite it.
pub fn write_thumbnail(path: &Path, image: &TransformedImage) -> Result<(), EncodeError> {
    // Validate before touching the filesystem so an oversized image leaves no file
    ThumbnailHeader::for_image(image)?;

    let mut file = File::create(path).map_err(|source| EncodeError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    encode_thumbnail(&mut file, image)?;

    debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "wrote thumbnail"
    );
    Ok(())
}

/// Parse a container back into its BGRA image.
///
/// # Errors
///
/// Returns `EncodeError::InvalidMagic` for a foreign header (including the
/// 16-bit variant) and `EncodeError::InvalidLength` if the byte count does not
/// match the declared dimensions.
pub fn read_thumbnail(bytes: &[u8]) -> Result<TransformedImage, EncodeError> {
    if bytes.len() < HEADER_LEN {
        return Err(EncodeError::InvalidLength {
            expected: HEADER_LEN,
            actual: bytes.len(),
        });
    }

    let magic = [bytes[0], bytes[1], bytes[2], bytes[3]];
    if magic != HEADER_MAGIC {
        return Err(EncodeError::InvalidMagic(magic));
    }

    let header = ThumbnailHeader {
        height: u16::from_le_bytes([bytes[4], bytes[5]]),
        width: u16::from_le_bytes([bytes[6], bytes[7]]),
    };
    if bytes.len() != header.file_len() {
        return Err(EncodeError::InvalidLength {
            expected: header.file_len(),
            actual: bytes.len(),
        });
    }

    let pixels = bytes[HEADER_LEN..].to_vec();
    TransformedImage::from_bgra(u32::from(header.width), u32::from(header.height), pixels).ok_or(
        EncodeError::InvalidLength {
            expected: header.file_len(),
            actual: bytes.len(),
        },
    )
}

fn write_section<W: Write>(writer: &mut W, section: Section, bytes: &[u8]) -> Result<(), EncodeError> {
    writer
        .write_all(bytes)
        .map_err(|source| EncodeError::Write { section, source })
}
