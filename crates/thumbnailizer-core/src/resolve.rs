//! Locating the source image for a catalog entry.

use std::path::{Path, PathBuf};

use tracing::trace;

use crate::error::ThumbnailError;

/// Extensions probed in catalog mode, most common first.
pub const SOURCE_EXTENSIONS: [&str; 8] = ["png", "jpg", "webp", "gif", "jpeg", "bmp", "tif", "tiff"];

/// Where source images come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    /// Catalog mode: a directory searched by entry name.
    Directory(PathBuf),
    /// Single-file mode: the image to use, as given.
    File(PathBuf),
}

/// Apply the libretro-thumbnails naming convention, which stores `&` as `_`.
pub fn normalize_name(name: &str) -> String {
    name.replace('&', "_")
}

/// Candidate paths for `name` inside `dir`, in probe order.
pub fn candidate_paths(dir: &Path, name: &str) -> Vec<PathBuf> {
    let normalized = normalize_name(name);
    SOURCE_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{normalized}.{ext}")))
        .collect()
}

/// Resolve the image file for an entry.
///
/// In catalog mode this returns the first candidate that exists as a file.
/// Single-file mode returns the configured path without checking it; read
/// errors surface when it is opened.
///
/// # Errors
///
/// Returns `ThumbnailError::NotFound` when no candidate exists.
pub fn resolve_source(location: &SourceLocation, name: &str) -> Result<PathBuf, ThumbnailError> {
    match location {
        SourceLocation::File(path) => Ok(path.clone()),
        SourceLocation::Directory(dir) => candidate_paths(dir, name)
            .into_iter()
            .find(|path| {
                let found = path.is_file();
                trace!(path = %path.display(), found, "probed source");
                found
            })
            .ok_or_else(|| ThumbnailError::NotFound {
                name: name.to_string(),
                dir: dir.clone(),
            }),
    }
}
