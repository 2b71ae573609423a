//! Image decoding WASM bindings.
//!
//! # Functions
//!
//! - [`decode_image`] - Decode a JPEG or PNG image from bytes
//! - [`is_supported_image`] - Cheap header sniff before committing to a decode
//!
//! # Example
//!
//! ```typescript
//! import { decode_image, is_supported_image } from '@mailfit/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! if (is_supported_image(bytes)) {
//!   const image = decode_image(bytes);
//!   console.log(`Decoded ${image.width}x${image.height}`);
//! }
//! ```

use crate::types::JsSourceImage;
use mailfit_core::decode;
use wasm_bindgen::prelude::*;

/// Decode a JPEG or PNG image from bytes.
///
/// EXIF orientation is applied automatically, so portrait phone photos come
/// out upright.
///
/// # Arguments
///
/// * `bytes` - The raw image file bytes as a `Uint8Array`
///
/// # Returns
///
/// A `JsSourceImage` containing the decoded RGB pixel data, or an error if
/// decoding fails.
///
/// # Errors
///
/// Returns an error if:
/// - The buffer is empty
/// - The bytes are not a recognized image format
/// - The image data is corrupted or truncated
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsSourceImage, JsValue> {
    decode::decode_image(bytes)
        .map(JsSourceImage::from_source)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Check whether bytes look like an image format the pipeline can decode.
///
/// Use this to filter a file picker's selection before reading the whole
/// file through the decoder.
#[wasm_bindgen]
pub fn is_supported_image(bytes: &[u8]) -> bool {
    decode::is_supported_image(bytes)
}
