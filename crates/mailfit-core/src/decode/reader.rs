//! Image decoding with EXIF orientation handling.
//!
//! Accepts the formats a resume upload realistically arrives in: JPEG
//! (what the camera/canvas path produces) and PNG (screenshots, scans).

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::DynamicImage;
use image::ImageReader;

use super::{DecodeError, Orientation, SourceImage};

/// Decode an image from bytes, applying EXIF orientation correction.
///
/// The format is sniffed from the byte stream; JPEG and PNG are accepted.
///
/// # Arguments
///
/// * `bytes` - Raw image file bytes
///
/// # Returns
///
/// A `SourceImage` with RGB pixel data and correct orientation applied.
///
/// # Errors
///
/// Returns `DecodeError::EmptyInput` if `bytes` is empty, reported before any
/// decode work happens.
/// Returns `DecodeError::UnsupportedFormat` if the bytes are not a recognized
/// image format.
/// Returns `DecodeError::Corrupted` if the image data is truncated or invalid.
pub fn decode_image(bytes: &[u8]) -> Result<SourceImage, DecodeError> {
    let orientation = extract_orientation(bytes);
    let img = decode_pixels(bytes)?;

    let oriented = apply_orientation(img, orientation);
    Ok(SourceImage::from_rgb_image(oriented.into_rgb8()))
}

/// Decode an image from bytes without applying EXIF orientation.
///
/// Use this when the pixels are already correctly oriented, e.g. when they
/// came out of a canvas that applied the tag itself.
pub fn decode_image_no_orientation(bytes: &[u8]) -> Result<SourceImage, DecodeError> {
    let img = decode_pixels(bytes)?;
    Ok(SourceImage::from_rgb_image(img.into_rgb8()))
}

/// Check whether a byte stream looks like an image format this pipeline can
/// decode. Cheap header sniff, no pixel work.
pub fn is_supported_image(bytes: &[u8]) -> bool {
    matches!(
        image::guess_format(bytes),
        Ok(image::ImageFormat::Jpeg) | Ok(image::ImageFormat::Png)
    )
}

/// Extract the EXIF orientation value from image bytes (for external use).
///
/// Returns `Orientation::Normal` if no EXIF data is found or orientation
/// cannot be determined.
pub fn get_orientation(bytes: &[u8]) -> Orientation {
    extract_orientation(bytes)
}

fn decode_pixels(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::EmptyInput);
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::Corrupted(e.to_string()))?;

    // Sniff failure means the header matched nothing we know, as opposed to a
    // recognized format with broken contents.
    if reader.format().is_none() {
        return Err(DecodeError::UnsupportedFormat);
    }

    reader
        .decode()
        .map_err(|e| DecodeError::Corrupted(e.to_string()))
}

fn extract_orientation(bytes: &[u8]) -> Orientation {
    let exif_reader = Reader::new();
    let mut cursor = Cursor::new(bytes);

    match exif_reader.read_from_container(&mut cursor) {
        Ok(exif) => {
            if let Some(field) = exif.get_field(Tag::Orientation, In::PRIMARY) {
                if let Some(value) = field.value.get_uint(0) {
                    return Orientation::from(value);
                }
            }
            Orientation::Normal
        }
        Err(_) => Orientation::Normal,
    }
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
