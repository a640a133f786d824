//! Content-based format detection and decoding.
//!
//! File extensions are not trusted: a `.png` may hold a JPEG or random bytes.
//! The leading bytes are compared once against a fixed magic-number table and
//! the matching decoder from the `image` crate is selected explicitly.

use std::error::Error as StdError;
use std::io::Cursor;
use std::ops::Range;

use image::{ImageError, ImageReader};

use super::{DecodeError, DecodedImage, SourceFormat};

/// A magic-number pattern. Bytes inside `wildcard` match anything.
#[derive(Debug, Clone)]
struct MagicNumber {
    bytes: &'static [u8],
    wildcard: Range<usize>,
}

impl MagicNumber {
    const fn exact(bytes: &'static [u8]) -> Self {
        Self {
            bytes,
            wildcard: 0..0,
        }
    }

    const fn with_wildcard(bytes: &'static [u8], wildcard: Range<usize>) -> Self {
        Self { bytes, wildcard }
    }

    fn matches(&self, prefix: &[u8]) -> bool {
        prefix.len() >= self.bytes.len()
            && self
                .bytes
                .iter()
                .zip(prefix)
                .enumerate()
                .all(|(i, (expected, actual))| self.wildcard.contains(&i) || expected == actual)
    }
}

/// Length of the longest pattern in [`MAGIC_TABLE`].
const LONGEST_MAGIC: usize = 12;

/// Magic numbers for every supported source format.
const MAGIC_TABLE: &[(MagicNumber, SourceFormat)] = &[
    (
        MagicNumber::exact(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]),
        SourceFormat::Png,
    ),
    // JFIF
    (
        MagicNumber::exact(&[0xFF, 0xD8, 0xFF, 0xE0]),
        SourceFormat::Jpeg,
    ),
    // EXIF: APP1 segment length sits between the marker and the identifier
    (
        MagicNumber::with_wildcard(
            &[0xFF, 0xD8, 0xFF, 0xE1, 0x00, 0x00, 0x45, 0x78, 0x69, 0x66, 0x00, 0x00],
            4..6,
        ),
        SourceFormat::Jpeg,
    ),
    // Adobe
    (
        MagicNumber::exact(&[0xFF, 0xD8, 0xFF, 0xEE]),
        SourceFormat::Jpeg,
    ),
    // No application segment, quantization table first
    (
        MagicNumber::exact(&[0xFF, 0xD8, 0xFF, 0xDB]),
        SourceFormat::Jpeg,
    ),
    (MagicNumber::exact(b"GIF87a"), SourceFormat::Gif),
    (MagicNumber::exact(b"GIF89a"), SourceFormat::Gif),
    (MagicNumber::exact(b"BM"), SourceFormat::Bmp),
    (MagicNumber::exact(&[0x49, 0x49, 0x2A, 0x00]), SourceFormat::Tiff),
    (MagicNumber::exact(&[0x4D, 0x4D, 0x00, 0x2A]), SourceFormat::Tiff),
    // RIFF container, bytes 4..8 are the chunk size
    (
        MagicNumber::with_wildcard(b"RIFF\0\0\0\0WEBP", 4..8),
        SourceFormat::WebP,
    ),
];

/// Identify the encoded format of `bytes` from its leading magic number.
///
/// Returns `None` when nothing in the table matches.
pub fn sniff_format(bytes: &[u8]) -> Option<SourceFormat> {
    let prefix = &bytes[..bytes.len().min(LONGEST_MAGIC)];
    MAGIC_TABLE
        .iter()
        .find(|(magic, _)| magic.matches(prefix))
        .map(|(_, format)| *format)
}

/// Decode an encoded image into straight-alpha RGBA, choosing the decoder by
/// content.
///
/// # Errors
///
/// Returns `DecodeError::UnsupportedFormat` if no magic number matches.
/// Returns `DecodeError::ChecksumMismatch` if the decoder rejected an
/// embedded checksum (for example a PNG chunk CRC).
/// Returns `DecodeError::CorruptedFile` for any other decoder failure.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let format = sniff_format(bytes).ok_or(DecodeError::UnsupportedFormat)?;

    let img = ImageReader::with_format(Cursor::new(bytes), format.to_image_format())
        .decode()
        .map_err(|e| classify_error(format, e))?;

    Ok(DecodedImage::from_rgba_image(img.into_rgba8()))
}

fn classify_error(format: SourceFormat, err: ImageError) -> DecodeError {
    if matches!(err, ImageError::Limits(_)) {
        return DecodeError::OutOfMemory;
    }

    let message = err.to_string();
    if format == SourceFormat::Png && is_checksum_failure(&err) {
        DecodeError::ChecksumMismatch { format, message }
    } else {
        DecodeError::CorruptedFile { format, message }
    }
}

/// Checksum failures are only distinguishable by message: the png crate
/// surfaces chunk CRC mismatches as generic format errors.
fn is_checksum_failure(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        let message = e.to_string().to_ascii_lowercase();
        if message.contains("crc") || message.contains("checksum") {
            return true;
        }
        current = e.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::error::{DecodingError, ImageFormatHint};
    use image::{DynamicImage, ImageFormat, RgbImage};

    fn encode_fixture(format: ImageFormat, width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x * 40) as u8, (y * 60) as u8, 200])
        });
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buffer, format)
            .unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_longest_magic_covers_table() {
        for (magic, _) in MAGIC_TABLE {
            assert!(magic.bytes.len() <= LONGEST_MAGIC);
            assert!(magic.wildcard.end <= magic.bytes.len());
        }
    }

    #[test]
    fn test_sniff_png() {
        let bytes = encode_fixture(ImageFormat::Png, 3, 2);
        assert_eq!(sniff_format(&bytes), Some(SourceFormat::Png));
    }

    #[test]
    fn test_sniff_jpeg_variants() {
        assert_eq!(
            sniff_format(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10]),
            Some(SourceFormat::Jpeg)
        );
        assert_eq!(
            sniff_format(&[0xFF, 0xD8, 0xFF, 0xEE, 0x00]),
            Some(SourceFormat::Jpeg)
        );
        assert_eq!(
            sniff_format(&[0xFF, 0xD8, 0xFF, 0xDB, 0x00]),
            Some(SourceFormat::Jpeg)
        );
    }

    #[test]
    fn test_sniff_exif_jpeg_ignores_segment_length() {
        let exif = [
            0xFF, 0xD8, 0xFF, 0xE1, 0x12, 0x34, b'E', b'x', b'i', b'f', 0x00, 0x00, 0x4D,
        ];
        assert_eq!(sniff_format(&exif), Some(SourceFormat::Jpeg));

        let mut not_exif = exif;
        not_exif[6] = b'X';
        assert_eq!(sniff_format(&not_exif), None);
    }

    #[test]
    fn test_sniff_webp_ignores_riff_size() {
        let bytes = b"RIFF\x24\x01\x00\x00WEBPVP8L";
        assert_eq!(sniff_format(bytes), Some(SourceFormat::WebP));

        let wave = b"RIFF\x24\x01\x00\x00WAVEfmt ";
        assert_eq!(sniff_format(wave), None);
    }

    #[test]
    fn test_sniff_gif_tiff_bmp() {
        assert_eq!(sniff_format(b"GIF87a\x01\x00"), Some(SourceFormat::Gif));
        assert_eq!(sniff_format(b"GIF89a\x01\x00"), Some(SourceFormat::Gif));
        assert_eq!(sniff_format(b"BM\x00\x00"), Some(SourceFormat::Bmp));
        assert_eq!(sniff_format(b"II*\x00\x08"), Some(SourceFormat::Tiff));
        assert_eq!(sniff_format(b"MM\x00*\x00"), Some(SourceFormat::Tiff));
    }

    #[test]
    fn test_sniff_short_or_unknown_input() {
        assert_eq!(sniff_format(&[]), None);
        assert_eq!(sniff_format(&[0x89, 0x50]), None);
        assert_eq!(sniff_format(b"hello world, not an image"), None);
    }

    #[test]
    fn test_decode_every_supported_format() {
        for format in [
            ImageFormat::Png,
            ImageFormat::Jpeg,
            ImageFormat::Gif,
            ImageFormat::Bmp,
            ImageFormat::Tiff,
            ImageFormat::WebP,
        ] {
            let bytes = encode_fixture(format, 5, 3);
            let img = decode_image(&bytes)
                .unwrap_or_else(|e| panic!("Failed to decode {:?}: {}", format, e));

            assert_eq!(img.width, 5, "{:?}", format);
            assert_eq!(img.height, 3, "{:?}", format);
            assert_eq!(img.pixels.len(), 5 * 3 * 4, "{:?}", format);
        }
    }

    #[test]
    fn test_decode_unknown_bytes() {
        let result = decode_image(b"definitely not an image");
        assert!(matches!(result, Err(DecodeError::UnsupportedFormat)));
    }

    #[test]
    fn test_decode_empty_bytes() {
        assert!(matches!(
            decode_image(&[]),
            Err(DecodeError::UnsupportedFormat)
        ));
    }

    #[test]
    fn test_decode_truncated_png() {
        let bytes = encode_fixture(ImageFormat::Png, 4, 4);
        let result = decode_image(&bytes[..20]);

        match result {
            Err(DecodeError::CorruptedFile { format, .. }) => {
                assert_eq!(format, SourceFormat::Png)
            }
            Err(e) => panic!("Expected CorruptedFile error, got: {:?}", e),
            Ok(_) => panic!("Expected error, got success"),
        }
    }

    #[test]
    fn test_decode_png_with_bad_crc() {
        let mut bytes = encode_fixture(ImageFormat::Png, 4, 4);
        // IHDR CRC lives at bytes 29..33
        bytes[29] ^= 0xFF;

        match decode_image(&bytes) {
            Err(DecodeError::ChecksumMismatch { format, .. }) => {
                assert_eq!(format, SourceFormat::Png)
            }
            Err(e) => panic!("Expected ChecksumMismatch error, got: {:?}", e),
            Ok(_) => panic!("Expected error, got success"),
        }
    }

    #[test]
    fn test_crc_wording_only_counts_for_png() {
        let failure = |format: ImageFormat| {
            ImageError::Decoding(DecodingError::new(
                ImageFormatHint::Exact(format),
                "invalid crc in marker segment",
            ))
        };

        assert!(matches!(
            classify_error(SourceFormat::Png, failure(ImageFormat::Png)),
            DecodeError::ChecksumMismatch { .. }
        ));
        assert!(matches!(
            classify_error(SourceFormat::Jpeg, failure(ImageFormat::Jpeg)),
            DecodeError::CorruptedFile {
                format: SourceFormat::Jpeg,
                ..
            }
        ));
        assert!(matches!(
            classify_error(SourceFormat::WebP, failure(ImageFormat::WebP)),
            DecodeError::CorruptedFile { .. }
        ));
    }

    #[test]
    fn test_extension_is_irrelevant() {
        // A BMP payload is decoded as BMP no matter what the caller thinks it is.
        let bytes = encode_fixture(ImageFormat::Bmp, 2, 2);
        assert_eq!(sniff_format(&bytes), Some(SourceFormat::Bmp));
        assert!(decode_image(&bytes).is_ok());
    }
}
