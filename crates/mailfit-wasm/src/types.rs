//! WASM-compatible wrapper types for image data.
//!
//! This module provides JavaScript-friendly types that wrap the core Mailfit
//! types, handling the conversion between Rust and JavaScript data
//! representations.

use js_sys::Uint8Array;
use mailfit_core::compress::CompressedImage;
use mailfit_core::decode::SourceImage;
use wasm_bindgen::prelude::*;

/// A decoded image wrapper for JavaScript.
///
/// Wraps the core `SourceImage` and exposes dimensions and pixel data to JS.
///
/// # Memory Management
///
/// The pixel data lives in WASM memory; `pixels()` copies it out as a
/// `Uint8Array`. wasm-bindgen's finalizer releases the WASM-side buffer when
/// the JS wrapper is collected.
#[wasm_bindgen]
pub struct JsSourceImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsSourceImage {
    /// Create a new JsSourceImage from dimensions and pixel data.
    ///
    /// # Arguments
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsSourceImage {
        JsSourceImage {
            width,
            height,
            pixels,
        }
    }

    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the number of bytes in the pixel buffer (width * height * 3 for RGB)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGB pixel data as Uint8Array.
    ///
    /// Note: This creates a copy of the pixel data.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }
}

impl JsSourceImage {
    /// Create a JsSourceImage from a core SourceImage.
    pub(crate) fn from_source(img: SourceImage) -> Self {
        Self {
            width: img.width,
            height: img.height,
            pixels: img.pixels,
        }
    }

    /// Convert back to a core SourceImage.
    ///
    /// Note: This clones the pixel data.
    pub(crate) fn to_source(&self) -> SourceImage {
        SourceImage {
            width: self.width,
            height: self.height,
            pixels: self.pixels.clone(),
        }
    }
}

/// A compressed image result for JavaScript.
///
/// Carries the encoded JPEG bytes plus the quality and dimensions the
/// accepted attempt landed on, so the caller can report what was delivered.
#[wasm_bindgen]
pub struct JsCompressedImage {
    bytes: Vec<u8>,
    quality: f32,
    width: u32,
    height: u32,
}

#[wasm_bindgen]
impl JsCompressedImage {
    /// The encoded JPEG bytes as a Uint8Array (copied out of WASM memory).
    #[wasm_bindgen(getter)]
    pub fn bytes(&self) -> Uint8Array {
        Uint8Array::from(self.bytes.as_slice())
    }

    /// Size of the encoded output in bytes.
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.bytes.len()
    }

    /// Quality of the accepted encode attempt (0.0-1.0).
    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> f32 {
        self.quality
    }

    /// Output width in pixels.
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Output height in pixels.
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }
}

impl JsCompressedImage {
    /// Create a JsCompressedImage from a core result.
    pub(crate) fn from_compressed(result: CompressedImage) -> Self {
        Self {
            bytes: result.bytes,
            quality: result.quality,
            width: result.width,
            height: result.height,
        }
    }

    /// Borrow the encoded bytes without the Uint8Array copy.
    pub(crate) fn raw_bytes(&self) -> &[u8] {
        &self.bytes
    }
}
