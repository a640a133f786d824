//! Catalog entries and dat-o-matic datafile loading.
//!
//! Only the game name and the first rom's CRC32 are read from a datafile;
//! everything else in the schema is ignored.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur while building a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The checksum is not an 8-digit hexadecimal CRC32.
    #[error("{value:?} is not a valid crc32 hash")]
    InvalidChecksum { value: String },

    /// A game in the datafile carries a malformed checksum.
    #[error("Game {game:?} has an invalid crc32 hash {value:?}")]
    InvalidGameChecksum { game: String, value: String },

    /// The datafile could not be read.
    #[error("Failed to read datafile {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The datafile is not well-formed XML.
    #[error("Failed to parse datafile: {0}")]
    Xml(#[from] quick_xml::DeError),
}

/// A normalized CRC32: eight lowercase hex digits, no `0x` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Checksum(String);

impl Checksum {
    /// Normalize and validate a user- or datafile-supplied checksum.
    ///
    /// Surrounding whitespace is trimmed, case is folded and a leading `0x`
    /// (as copied from dat-o-matic) is dropped.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidChecksum` unless exactly eight hex digits
    /// remain.
    pub fn parse(raw: &str) -> Result<Self, CatalogError> {
        let lowered = raw.trim().to_ascii_lowercase();
        let digits = lowered.strip_prefix("0x").unwrap_or(&lowered);

        if digits.len() != 8 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CatalogError::InvalidChecksum {
                value: raw.to_string(),
            });
        }
        Ok(Self(digits.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the artifact produced for this checksum.
    pub fn artifact_file_name(&self) -> String {
        format!("{}.bin", self.0)
    }
}

impl FromStr for Checksum {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One game to produce a thumbnail for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    name: String,
    checksum: Checksum,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, checksum: Checksum) -> Self {
        Self {
            name: name.into(),
            checksum,
        }
    }

    /// Entry for single-file mode: the name is the image's file stem.
    pub fn for_image(image_path: &Path, checksum: Checksum) -> Self {
        let name = image_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| image_path.display().to_string());
        Self::new(name, checksum)
    }

    /// Human-readable name used to locate the source image.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn checksum(&self) -> &Checksum {
        &self.checksum
    }
}

#[derive(Debug, Deserialize)]
struct Datafile {
    #[serde(rename = "game", default)]
    games: Vec<Game>,
}

#[derive(Debug, Deserialize)]
struct Game {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "rom", default)]
    roms: Vec<Rom>,
}

#[derive(Debug, Deserialize)]
struct Rom {
    #[serde(rename = "@crc", default)]
    crc: Option<String>,
}

/// Parse a dat-o-matic datafile into catalog entries, preserving order.
///
/// Games without a rom CRC are skipped with a warning.
///
/// # Errors
///
/// Returns `CatalogError::Xml` for malformed XML and
/// `CatalogError::InvalidGameChecksum` for a CRC that is not 8 hex digits.
pub fn parse_datafile(xml: &str) -> Result<Vec<CatalogEntry>, CatalogError> {
    let datafile: Datafile = quick_xml::de::from_str(xml)?;

    let mut entries = Vec::with_capacity(datafile.games.len());
    for game in datafile.games {
        let Some(raw) = game.roms.into_iter().find_map(|rom| rom.crc) else {
            warn!(entry = %game.name, "game has no rom crc, skipping");
            continue;
        };

        let checksum = Checksum::parse(&raw).map_err(|_| CatalogError::InvalidGameChecksum {
            game: game.name.clone(),
            value: raw.clone(),
        })?;
        entries.push(CatalogEntry::new(game.name, checksum));
    }

    debug!(entries = entries.len(), "parsed datafile");
    Ok(entries)
}

/// Read and parse a datafile from disk.
pub fn load_datafile(path: &Path) -> Result<Vec<CatalogEntry>, CatalogError> {
    let xml = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_datafile(&xml)
}
