//! End-to-end tests: source images on disk in, `.bin` artifacts out.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};
use thumbnailizer_core::decode::decode_image;
use thumbnailizer_core::encode::{encode_to_vec, read_thumbnail};
use thumbnailizer_core::transform::rotate_counter_clockwise;
use thumbnailizer_core::{
    process_catalog, BatchConfig, CatalogEntry, Checksum, ScalePolicy, SourceLocation,
};

fn gradient(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
    })
}

fn write_image(path: &Path, img: DynamicImage, format: ImageFormat) {
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, format).unwrap();
    fs::write(path, buffer.into_inner()).unwrap();
}

fn catalog_config(source: &Path, out: &Path, upscale: bool) -> BatchConfig {
    BatchConfig {
        source: SourceLocation::Directory(source.to_path_buf()),
        out_dir: out.to_path_buf(),
        upscale,
        verbose: true,
    }
}

fn entry(name: &str, crc: &str) -> CatalogEntry {
    CatalogEntry::new(name, Checksum::parse(crc).unwrap())
}

#[test]
fn minimal_fixture_of_each_format_decodes_to_known_size() {
    let formats = [
        ImageFormat::Png,
        ImageFormat::Jpeg,
        ImageFormat::Gif,
        ImageFormat::Bmp,
        ImageFormat::Tiff,
        ImageFormat::WebP,
    ];

    for format in formats {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(7, 4, image::Rgb([9, 99, 199])));
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, format).unwrap();

        let decoded = decode_image(buffer.get_ref()).unwrap();
        assert_eq!((decoded.width, decoded.height), (7, 4), "{:?}", format);
    }
}

#[test]
fn landscape_without_upscale_keeps_rotated_size() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let source = gradient(300, 100);
    write_image(
        &src.path().join("Wide.png"),
        DynamicImage::ImageRgba8(source.clone()),
        ImageFormat::Png,
    );

    let summary = process_catalog(
        &[entry("Wide", "00c0ffee")],
        &catalog_config(src.path(), out.path(), false),
    )
    .unwrap();
    assert_eq!(summary.processed, 1);

    let bytes = fs::read(out.path().join("00c0ffee.bin")).unwrap();
    assert_eq!(bytes.len(), 8 + 4 * 100 * 300);
    assert_eq!(&bytes[0..4], b" IPA");
    assert_eq!(u16::from_le_bytes([bytes[4], bytes[5]]), 300);
    assert_eq!(u16::from_le_bytes([bytes[6], bytes[7]]), 100);

    // Pixel section is the rotated source with red and blue swapped
    let decoded = thumbnailizer_core::decode::DecodedImage::from_rgba_image(source);
    let rotated = rotate_counter_clockwise(decoded).unwrap();
    let mut expected = rotated.pixels;
    for px in expected.chunks_exact_mut(4) {
        px.swap(0, 2);
    }
    assert_eq!(&bytes[8..], &expected[..]);
}

#[test]
fn landscape_with_upscale_is_forced_to_175_high() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_image(
        &src.path().join("Wide.png"),
        DynamicImage::ImageRgba8(gradient(300, 100)),
        ImageFormat::Png,
    );

    process_catalog(
        &[entry("Wide", "00c0ffee")],
        &catalog_config(src.path(), out.path(), true),
    )
    .unwrap();

    let bytes = fs::read(out.path().join("00c0ffee.bin")).unwrap();
    assert_eq!(u16::from_le_bytes([bytes[4], bytes[5]]), 175);
    assert_eq!(u16::from_le_bytes([bytes[6], bytes[7]]), 58);
    assert_eq!(bytes.len(), 8 + 4 * 58 * 175);
}

#[test]
fn container_pixels_round_trip_to_transformed_rgba() {
    let decoded = thumbnailizer_core::decode::DecodedImage::from_rgba_image(gradient(64, 48));
    let transformed = thumbnailizer_core::prepare_thumbnail(decoded, ScalePolicy::Always).unwrap();

    let bytes = encode_to_vec(&transformed).unwrap();
    let parsed = read_thumbnail(&bytes).unwrap();

    assert_eq!(parsed.clone().into_rgba(), transformed.clone().into_rgba());
    assert_eq!(parsed, transformed);
}

#[test]
fn rerun_produces_identical_artifacts() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_image(
        &src.path().join("Box.png"),
        DynamicImage::ImageRgba8(gradient(120, 160)),
        ImageFormat::Png,
    );
    let entries = [entry("Box", "12345678")];
    let config = catalog_config(src.path(), out.path(), true);

    process_catalog(&entries, &config).unwrap();
    let first = fs::read(out.path().join("12345678.bin")).unwrap();
    process_catalog(&entries, &config).unwrap();
    let second = fs::read(out.path().join("12345678.bin")).unwrap();

    assert_eq!(first, second);
}

#[test]
fn ampersand_names_and_prefixed_checksums() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_image(
        &src.path().join("Kirby_Ajax.png"),
        DynamicImage::ImageRgba8(gradient(20, 10)),
        ImageFormat::Png,
    );
    // A decoy with a lower priority extension must not be picked
    fs::write(src.path().join("Kirby_Ajax.jpg"), b"garbage").unwrap();

    let summary = process_catalog(
        &[entry("Kirby&Ajax", "0XDEADBEEF")],
        &catalog_config(src.path(), out.path(), false),
    )
    .unwrap();

    assert_eq!(summary.processed, 1);
    assert!(out.path().join("deadbeef.bin").is_file());
}

#[test]
fn absent_images_are_excluded_from_processed_count() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_image(
        &src.path().join("Present.webp"),
        DynamicImage::ImageRgba8(gradient(8, 8)),
        ImageFormat::WebP,
    );

    let summary = process_catalog(
        &[entry("Absent", "00000001"), entry("Present", "00000002")],
        &catalog_config(src.path(), out.path(), false),
    )
    .unwrap();

    assert_eq!(summary.total, 2);
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 1);
}

#[test]
fn duplicate_checksum_overwrites_earlier_artifact() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_image(
        &src.path().join("First.png"),
        DynamicImage::ImageRgba8(gradient(10, 10)),
        ImageFormat::Png,
    );
    write_image(
        &src.path().join("Second.png"),
        DynamicImage::ImageRgba8(gradient(20, 10)),
        ImageFormat::Png,
    );

    process_catalog(
        &[entry("First", "0000abcd"), entry("Second", "0000ABCD")],
        &catalog_config(src.path(), out.path(), false),
    )
    .unwrap();

    let thumb = read_thumbnail(&fs::read(out.path().join("0000abcd.bin")).unwrap()).unwrap();
    assert_eq!((thumb.width(), thumb.height()), (10, 20));
}
