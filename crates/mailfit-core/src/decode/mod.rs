//! Image decoding pipeline for Mailfit.
//!
//! This module provides functionality for:
//! - Decoding JPEG and PNG images with EXIF orientation correction
//! - Clamping images into a bounding box before encoding
//! - Exact resizing with a choice of interpolation filters
//!
//! # Architecture
//!
//! The decoding pipeline is designed to be used from Web Workers via WASM
//! bindings. All operations are synchronous and single-threaded within WASM,
//! and each returns a fresh `SourceImage` rather than mutating shared state.
//!
//! # Examples
//!
//! ```ignore
//! use mailfit_core::decode::{decode_image, SourceImage};
//!
//! let bytes = std::fs::read("resume.jpg").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{} image", image.width, image.height);
//! ```

mod reader;
mod resize;
mod types;

pub use reader::{decode_image, decode_image_no_orientation, get_orientation, is_supported_image};
pub use resize::{clamp_to_box, fit_within, resize};
pub use types::{DecodeError, FilterType, Orientation, SourceImage};
