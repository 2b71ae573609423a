//! Image encoding pipeline for Mailfit.
//!
//! This module provides functionality for:
//! - Encoding RGB pixel data to JPEG with a canvas-style quality knob
//!
//! # Architecture
//!
//! The encoder is a stateless function the compressor calls once per quality
//! attempt. Quality is expressed on the 0.0-1.0 scale the browser's
//! `canvas.toBlob` uses, so configuration values survive the trip from JS
//! unchanged.

mod jpeg;

pub use jpeg::{encode_jpeg, EncodeError};
