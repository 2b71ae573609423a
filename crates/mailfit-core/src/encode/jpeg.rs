//! JPEG encoding with a canvas-style quality scale.
//!
//! Wraps the `image` crate's JPEG encoder. Quality is taken as a 0.0-1.0
//! fraction and mapped onto the encoder's 1-100 scale, so the same numbers
//! the browser caller passes to `canvas.toBlob` mean the same thing here.

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;
use thiserror::Error;

/// Errors that can occur during JPEG encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// JPEG encoding failed
    #[error("JPEG encoding failed: {0}")]
    EncodingFailed(String),
}

/// Encode RGB pixel data to JPEG bytes.
///
/// # Arguments
///
/// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - Encode quality as a 0.0-1.0 fraction (canvas scale); values
///   outside the range are clamped
///
/// # Returns
///
/// JPEG-encoded bytes on success, or an error if encoding fails.
///
/// # Errors
///
/// Returns an error if the dimensions are zero or the pixel buffer length
/// doesn't match `width * height * 3`.
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: f32,
) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected_len = (width as usize) * (height as usize) * 3;
    if pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: pixels.len(),
        });
    }

    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality_to_percent(quality));

    encoder
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// Map a 0.0-1.0 quality fraction onto the encoder's 1-100 scale.
///
/// NaN and out-of-range inputs clamp rather than error; the compressor's
/// schedule only ever produces in-range values, but the WASM boundary can
/// hand us anything.
fn quality_to_percent(quality: f32) -> u8 {
    let fraction = if quality.is_nan() {
        1.0
    } else {
        quality.clamp(0.01, 1.0)
    };
    ((fraction * 100.0).round() as u8).clamp(1, 100)
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for generating image dimensions (keep small for speed).
    fn dimensions_strategy() -> impl Strategy<Value = (u32, u32)> {
        (1u32..=50, 1u32..=50)
    }

    /// Strategy for generating canvas-scale quality values.
    fn quality_strategy() -> impl Strategy<Value = f32> {
        0.0f32..=1.0
    }

    proptest! {
        /// Property: Encoding always produces a framed JPEG for valid input.
        #[test]
        fn prop_valid_input_produces_valid_jpeg(
            (width, height) in dimensions_strategy(),
            quality in quality_strategy(),
        ) {
            let size = (width as usize) * (height as usize) * 3;
            let pixels = vec![128u8; size];

            let jpeg_bytes = encode_jpeg(&pixels, width, height, quality).unwrap();

            prop_assert_eq!(&jpeg_bytes[0..2], &[0xFF, 0xD8], "Should have SOI marker");
            let len = jpeg_bytes.len();
            prop_assert!(len >= 4, "JPEG should have at least 4 bytes");
            prop_assert_eq!(&jpeg_bytes[len - 2..], &[0xFF, 0xD9], "Should have EOI marker");
        }

        /// Property: Any float quality is accepted after clamping.
        #[test]
        fn prop_all_quality_values_work(quality in -10.0f32..=10.0) {
            let pixels = vec![128u8; 10 * 10 * 3];
            let result = encode_jpeg(&pixels, 10, 10, quality);
            prop_assert!(result.is_ok(), "Quality {} should work after clamping", quality);
        }

        /// Property: Mismatched pixel buffer length always errors.
        #[test]
        fn prop_invalid_pixel_length_returns_error(
            (width, height) in dimensions_strategy(),
            extra_or_missing in -10i32..=10,
        ) {
            prop_assume!(extra_or_missing != 0);

            let expected_size = (width as usize) * (height as usize) * 3;
            let actual_size = if extra_or_missing > 0 {
                expected_size + extra_or_missing as usize
            } else {
                expected_size.saturating_sub((-extra_or_missing) as usize)
            };
            prop_assume!(actual_size != expected_size);

            let pixels = vec![128u8; actual_size];
            let result = encode_jpeg(&pixels, width, height, 0.9);

            prop_assert!(
                matches!(result, Err(EncodeError::InvalidPixelData { .. })),
                "Mismatched pixel data should return InvalidPixelData error"
            );
        }

        /// Property: Various pixel patterns encode successfully.
        #[test]
        fn prop_various_pixel_patterns(
            (width, height) in (5u32..=20, 5u32..=20),
            pattern in 0u8..=4,
        ) {
            let size = (width as usize) * (height as usize) * 3;
            let pixels: Vec<u8> = match pattern {
                0 => vec![0u8; size],
                1 => vec![255u8; size],
                2 => vec![128u8; size],
                3 => (0..size).map(|i| (i % 256) as u8).collect(),
                _ => (0..size).map(|i| ((i * 37) % 256) as u8).collect(),
            };

            let jpeg = encode_jpeg(&pixels, width, height, 0.9).unwrap();
            prop_assert_eq!(&jpeg[0..2], &[0xFF, 0xD8], "Should have valid JPEG header");
        }
    }
}
