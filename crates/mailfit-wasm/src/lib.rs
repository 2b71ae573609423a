//! Mailfit WASM - WebAssembly bindings for Mailfit
//!
//! This crate exposes the mailfit-core compression pipeline to
//! JavaScript/TypeScript applications: the upload flow decodes a picked file,
//! compresses it under the delivery budget, and assembles the POST payload,
//! all inside the browser before any bytes leave the machine.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for image data
//! - `decode` - Image decoding bindings (JPEG/PNG, orientation correction)
//! - `compress` - Adaptive compression and envelope-plan bindings
//! - `payload` - Upload POST body assembly and size budgets
//!
//! # Usage
//!
//! ```typescript
//! import init, { compress_to_fit_bytes, build_attachment_payload } from '@mailfit/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const result = compress_to_fit_bytes(bytes, undefined);
//! const payload = build_attachment_payload(
//!   result.bytes, submission.id, submission.email,
//!   submission.fullName, file.name, 'image/jpeg',
//! );
//! ```

use wasm_bindgen::prelude::*;

mod compress;
mod decode;
mod payload;
mod types;

// Re-export public types
pub use compress::{compress, compress_bytes, compress_to_fit, compress_to_fit_bytes};
pub use decode::{decode_image, is_supported_image};
pub use payload::{base64_budget_bytes, base64_len, binary_target_bytes, build_attachment_payload};
pub use types::{JsCompressedImage, JsSourceImage};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // Future: Set up panic hook for better error messages in browser console
    // when console_error_panic_hook feature is added
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
