//! Per-entry pipeline errors.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::decode::DecodeError;
use crate::encode::EncodeError;

/// Coarse classification used to decide between skipping and aborting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No source image exists for the entry. The entry is skipped.
    NotFound,
    /// No decoder matched the file contents.
    UnsupportedFormat,
    /// The decoder rejected the stream, including checksum failures.
    DecodeFailure,
    /// A filesystem operation failed.
    IoFailure,
    /// The transformed image is too large for the container header.
    DimensionOverflow,
}

impl ErrorKind {
    /// Only a missing source is recoverable; everything else ends the batch.
    pub fn is_fatal(self) -> bool {
        !matches!(self, ErrorKind::NotFound)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::NotFound => "not found",
            ErrorKind::UnsupportedFormat => "unsupported format",
            ErrorKind::DecodeFailure => "decode failure",
            ErrorKind::IoFailure => "I/O failure",
            ErrorKind::DimensionOverflow => "dimension overflow",
        };
        f.write_str(name)
    }
}

/// Errors produced while turning one catalog entry into a thumbnail.
#[derive(Debug, Error)]
pub enum ThumbnailError {
    /// No image for the entry in any supported extension.
    #[error("No image file found for {name:?} in {}", dir.display())]
    NotFound { name: String, dir: PathBuf },

    /// The source file's contents match no known image format.
    #[error("Unsupported image format: {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    /// The source image could not be decoded or transformed.
    #[error("Failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    /// The source image could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The thumbnail could not be written.
    #[error("Failed to write {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: EncodeError,
    },
}

impl ThumbnailError {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ThumbnailError::NotFound { .. } => ErrorKind::NotFound,
            ThumbnailError::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            ThumbnailError::Decode {
                source: DecodeError::DimensionOverflow { .. },
                ..
            } => ErrorKind::DimensionOverflow,
            ThumbnailError::Decode { .. } => ErrorKind::DecodeFailure,
            ThumbnailError::Read { .. } => ErrorKind::IoFailure,
            ThumbnailError::Encode { source, .. } => match source {
                EncodeError::DimensionOverflow { .. } => ErrorKind::DimensionOverflow,
                _ => ErrorKind::IoFailure,
            },
        }
    }

    /// Whether the decoder rejected an embedded checksum. These images can
    /// usually be fixed by re-saving them in an image editor.
    pub fn is_checksum_failure(&self) -> bool {
        matches!(
            self,
            ThumbnailError::Decode {
                source: DecodeError::ChecksumMismatch { .. },
                ..
            }
        )
    }

    /// Path of the file involved, if any.
    pub fn path(&self) -> &std::path::Path {
        match self {
            ThumbnailError::NotFound { dir, .. } => dir,
            ThumbnailError::UnsupportedFormat { path }
            | ThumbnailError::Decode { path, .. }
            | ThumbnailError::Read { path, .. }
            | ThumbnailError::Encode { path, .. } => path,
        }
    }
}
