//! Batch orchestration: resolve, decode, transform and encode every entry.
//!
//! Entries are processed one at a time in catalog order. A missing source
//! image is skipped; any other failure stops the batch at that entry.
//! Output names are unique per checksum, so a rerun simply overwrites the
//! previous artifacts with byte-identical ones.

use std::fs;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::catalog::CatalogEntry;
use crate::decode::{decode_image, DecodeError};
use crate::encode::write_thumbnail;
use crate::error::{ErrorKind, ThumbnailError};
use crate::resolve::{resolve_source, SourceLocation};
use crate::transform::{prepare_thumbnail, ScalePolicy};

/// Settings for a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    /// Image directory (catalog mode) or single image (single-file mode).
    pub source: SourceLocation,
    /// Existing directory receiving `{checksum}.bin` files.
    pub out_dir: PathBuf,
    /// Resize every image to the maximum height, not only oversized ones.
    pub upscale: bool,
    /// Report skipped entries at info level instead of debug.
    pub verbose: bool,
}

impl BatchConfig {
    pub fn scale_policy(&self) -> ScalePolicy {
        ScalePolicy::from_upscale(self.upscale)
    }
}

/// Counts reported after a completed batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    /// Entries for which an artifact was written.
    pub processed: usize,
    /// Entries without a source image.
    pub skipped: usize,
    /// Entries in the catalog.
    pub total: usize,
}

/// A fatal per-entry failure that aborted the batch.
#[derive(Debug, Error)]
#[error("{entry}: {source}")]
pub struct BatchError {
    /// Name of the entry being processed.
    pub entry: String,
    /// Entries completed before the failure.
    pub processed: usize,
    #[source]
    pub source: ThumbnailError,
}

impl BatchError {
    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }
}

/// Produce the thumbnail for a single entry and return the artifact path.
///
/// # Errors
///
/// Returns `ThumbnailError::NotFound` if no source image exists, and the
/// matching variant for read, decode and write failures.
pub fn process_entry(entry: &CatalogEntry, config: &BatchConfig) -> Result<PathBuf, ThumbnailError> {
    let source = resolve_source(&config.source, entry.name())?;

    let bytes = fs::read(&source).map_err(|e| ThumbnailError::Read {
        path: source.clone(),
        source: e,
    })?;

    let decoded = decode_image(&bytes).map_err(|e| match e {
        DecodeError::UnsupportedFormat => ThumbnailError::UnsupportedFormat {
            path: source.clone(),
        },
        other => ThumbnailError::Decode {
            path: source.clone(),
            source: other,
        },
    })?;
    drop(bytes);

    let transformed =
        prepare_thumbnail(decoded, config.scale_policy()).map_err(|e| ThumbnailError::Decode {
            path: source.clone(),
            source: e,
        })?;

    let output = config.out_dir.join(entry.checksum().artifact_file_name());
    write_thumbnail(&output, &transformed).map_err(|e| ThumbnailError::Encode {
        path: output.clone(),
        source: e,
    })?;

    debug!(
        entry = entry.name(),
        source = %source.display(),
        output = %output.display(),
        "processed entry"
    );
    Ok(output)
}

/// Process every entry in order, skipping missing images and stopping at
/// the first hard error.
///
/// # Errors
///
/// Returns a `BatchError` naming the entry whose read, decode or write failed.
pub fn process_catalog(
    entries: &[CatalogEntry],
    config: &BatchConfig,
) -> Result<BatchSummary, BatchError> {
    let mut summary = BatchSummary {
        total: entries.len(),
        ..Default::default()
    };

    for entry in entries {
        match process_entry(entry, config) {
            Ok(_) => summary.processed += 1,
            Err(err) if !err.kind().is_fatal() => {
                summary.skipped += 1;
                if config.verbose {
                    info!(entry = entry.name(), kind = %err.kind(), "could not find image file, skipping");
                } else {
                    debug!(entry = entry.name(), kind = %err.kind(), "could not find image file, skipping");
                }
            }
            Err(err) => {
                if err.is_checksum_failure() {
                    warn!(
                        entry = entry.name(),
                        path = %err.path().display(),
                        "image has an invalid checksum; try opening and re-saving it in an image editor"
                    );
                }
                return Err(BatchError {
                    entry: entry.name().to_string(),
                    processed: summary.processed,
                    source: err,
                });
            }
        }
    }

    info!(
        processed = summary.processed,
        skipped = summary.skipped,
        total = summary.total,
        "batch complete"
    );
    Ok(summary)
}
