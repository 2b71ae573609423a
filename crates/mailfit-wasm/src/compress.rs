//! Adaptive compression WASM bindings.
//!
//! This module exposes the core compression pipeline to JavaScript. Targets
//! and envelope plans cross the boundary as plain objects; omitted fields
//! take the upload path's defaults, so `compress(image)` with no config is
//! the standard first pass.
//!
//! # Functions
//!
//! - [`compress`] - One compression pass over a decoded image
//! - [`compress_bytes`] - Decode raw file bytes and run one pass
//! - [`compress_to_fit`] - Run the envelope retry plan over a decoded image
//! - [`compress_to_fit_bytes`] - Decode raw file bytes and run the plan
//!
//! # Example
//!
//! ```typescript
//! import { compress_to_fit_bytes } from '@mailfit/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const result = compress_to_fit_bytes(bytes, { ceilingBytes: 2_621_440 });
//! console.log(`${result.byte_length} bytes at quality ${result.quality}`);
//! ```

use crate::types::{JsCompressedImage, JsSourceImage};
use mailfit_core::compress::{self, CompressionTarget, EnvelopePlan, MAX_SOURCE_BYTES};
use mailfit_core::decode::{self, SourceImage};
use wasm_bindgen::prelude::*;
use web_sys::console;

fn parse_target(value: JsValue) -> Result<CompressionTarget, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(CompressionTarget::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn parse_plan(value: JsValue) -> Result<EnvelopePlan, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(EnvelopePlan::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn run_plan(source: &SourceImage, plan: &EnvelopePlan) -> Result<JsCompressedImage, JsValue> {
    console::log_1(&JsValue::from_str(&format!(
        "mailfit: compressing {}x{} against a {}-byte ceiling",
        source.width, source.height, plan.ceiling_bytes
    )));

    let result = compress::compress_to_fit(source, plan)
        .map(JsCompressedImage::from_compressed)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    console::log_1(&JsValue::from_str(&format!(
        "mailfit: delivered {} bytes at quality {:.2} ({}x{})",
        result.byte_length(),
        result.quality(),
        result.width(),
        result.height()
    )));

    Ok(result)
}

/// Run one compression pass over a decoded image.
///
/// # Arguments
///
/// * `image` - The decoded source image
/// * `target` - A plain object with any subset of `maxWidth`, `maxHeight`,
///   `targetBytes`, `initialQuality`, `minQuality`; missing fields default
///   to the standard first pass (1920x2560, 2.5 MiB, 0.85 start, 0.3 floor)
///
/// # Returns
///
/// A `JsCompressedImage`. At the quality floor the result may still be over
/// `targetBytes`; check `byte_length` or use [`compress_to_fit`] when the
/// ceiling is hard.
///
/// # Errors
///
/// Returns an error for a malformed target object, degenerate image
/// dimensions, or an encoder failure.
#[wasm_bindgen]
pub fn compress(image: &JsSourceImage, target: JsValue) -> Result<JsCompressedImage, JsValue> {
    let target = parse_target(target)?;
    compress::compress(&image.to_source(), &target)
        .map(JsCompressedImage::from_compressed)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Decode raw file bytes and run one compression pass.
///
/// Sources over the 10 MiB intake limit are rejected before decoding.
#[wasm_bindgen]
pub fn compress_bytes(bytes: &[u8], target: JsValue) -> Result<JsCompressedImage, JsValue> {
    let target = parse_target(target)?;
    compress::compress_bytes(bytes, &target)
        .map(JsCompressedImage::from_compressed)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Run the envelope retry plan over a decoded image.
///
/// # Arguments
///
/// * `image` - The decoded source image
/// * `plan` - A plain object with any subset of `envelopes`, `ceilingBytes`,
///   `minQuality`; missing fields default to the standard escalation
///   (1920x2560 → 1600x2000 → 1200x1600 against a 2.5 MiB ceiling)
///
/// # Errors
///
/// Returns an error when every envelope is exhausted without meeting the
/// ceiling ("still too large"), or for the same failures as [`compress`].
#[wasm_bindgen]
pub fn compress_to_fit(image: &JsSourceImage, plan: JsValue) -> Result<JsCompressedImage, JsValue> {
    let plan = parse_plan(plan)?;
    run_plan(&image.to_source(), &plan)
}

/// Decode raw file bytes and run the envelope retry plan.
///
/// This is the whole upload-preparation flow in one call: intake size gate,
/// decode with orientation correction, then the plan.
#[wasm_bindgen]
pub fn compress_to_fit_bytes(bytes: &[u8], plan: JsValue) -> Result<JsCompressedImage, JsValue> {
    let plan = parse_plan(plan)?;

    let size = bytes.len() as u64;
    if size > MAX_SOURCE_BYTES {
        return Err(JsValue::from_str(&format!(
            "Source file is too large: {} bytes (limit {})",
            size, MAX_SOURCE_BYTES
        )));
    }

    let source = decode::decode_image(bytes).map_err(|e| JsValue::from_str(&e.to_string()))?;
    run_plan(&source, &plan)
}
