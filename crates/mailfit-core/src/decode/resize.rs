//! Downscaling for the compression pipeline.
//!
//! The compressor clamps a source image into a width x height box exactly once
//! before any encode attempt; byte-size targeting is then done purely through
//! encode quality. All functions return new `SourceImage` instances without
//! modifying the input.

use super::{DecodeError, FilterType, SourceImage};

/// Resize an image to exact dimensions.
///
/// # Arguments
///
/// * `image` - The source image to resize
/// * `width` - Target width in pixels
/// * `height` - Target height in pixels
/// * `filter` - Interpolation filter to use
///
/// # Errors
///
/// Returns `DecodeError::InvalidDimensions` if either target dimension is zero.
pub fn resize(
    image: &SourceImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<SourceImage, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidDimensions { width, height });
    }

    // Fast path: if dimensions match, just clone
    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let rgb_image = image
        .to_rgb_image()
        .ok_or_else(|| DecodeError::Corrupted("Pixel buffer does not match dimensions".to_string()))?;

    let resized = image::imageops::resize(&rgb_image, width, height, filter.to_image_filter());

    Ok(SourceImage::from_rgb_image(resized))
}

/// Scale an image down so it fits within a `max_width` x `max_height` box,
/// preserving aspect ratio.
///
/// Applied once per compression, never iteratively. Images that already fit
/// are returned unchanged; this function never upscales.
///
/// # Errors
///
/// Returns `DecodeError::InvalidDimensions` if either box dimension is zero.
pub fn clamp_to_box(
    image: &SourceImage,
    max_width: u32,
    max_height: u32,
    filter: FilterType,
) -> Result<SourceImage, DecodeError> {
    if max_width == 0 || max_height == 0 {
        return Err(DecodeError::InvalidDimensions {
            width: max_width,
            height: max_height,
        });
    }

    if image.width <= max_width && image.height <= max_height {
        return Ok(image.clone());
    }

    let (new_width, new_height) = fit_within(image.width, image.height, max_width, max_height);
    resize(image, new_width, new_height, filter)
}

/// Calculate the dimensions of `width` x `height` scaled down to fit within
/// the `max_width` x `max_height` box, preserving aspect ratio.
///
/// Both output dimensions are guaranteed at or under their maxima; the binding
/// edge lands exactly on its maximum. Inputs that already fit come back
/// unchanged, and non-degenerate inputs never collapse below 1px.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }
    if width <= max_width && height <= max_height {
        return (width, height);
    }

    let width_ratio = max_width as f64 / width as f64;
    let height_ratio = max_height as f64 / height as f64;
    let scale = width_ratio.min(height_ratio);

    let new_width = ((width as f64 * scale).round() as u32).max(1);
    let new_height = ((height as f64 * scale).round() as u32).max(1);
    (new_width, new_height)
}
