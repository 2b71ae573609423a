//! Adaptive image compression.
//!
//! This module implements the size-targeting procedure the upload path runs
//! before a resume image leaves the browser: clamp the image into a bounding
//! box once, then re-encode at decaying quality until the output fits under a
//! byte ceiling or the quality floor is reached.
//!
//! # Architecture
//!
//! Compression is a pure function from (image, target) to result. There is no
//! retained state between invocations and no hidden retry: when a single
//! target isn't enough, the caller escalates through an explicit
//! [`EnvelopePlan`] of progressively tighter targets.
//!
//! Two phases, by design:
//!
//! 1. **Dimension clamp**, applied exactly once. Resolution reduction is the
//!    expensive, quality-destroying lever, so it is pulled a single time per
//!    target rather than inside the loop.
//! 2. **Quality search**, multiplicative decay from `initial_quality` by
//!    [`QUALITY_DECAY`] per attempt, floored at `min_quality`. The decay
//!    factor bounds the attempt count to a small constant without an explicit
//!    iteration counter.
//!
//! # Examples
//!
//! ```ignore
//! use mailfit_core::compress::{compress_bytes, CompressionTarget};
//!
//! let bytes = std::fs::read("resume.jpg").unwrap();
//! let result = compress_bytes(&bytes, &CompressionTarget::default()).unwrap();
//! println!("{} bytes at quality {:.2}", result.byte_size(), result.quality);
//! ```

mod envelope;

pub use envelope::{
    compress_to_fit, compress_to_fit_with_cancel, Envelope, EnvelopePlan, FitError,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::{clamp_to_box, decode_image, DecodeError, FilterType, SourceImage};
use crate::encode::{encode_jpeg, EncodeError};

/// Multiplicative quality reduction applied between encode attempts.
pub const QUALITY_DECAY: f32 = 0.8;

/// Largest source file accepted into the pipeline. Anything bigger is
/// rejected up front instead of being decoded and churned through encode
/// attempts that cannot plausibly reach the upload budget.
pub const MAX_SOURCE_BYTES: u64 = 10 * 1024 * 1024;

/// Configuration for one compression pass.
///
/// Quality values use the canvas 0.0-1.0 scale. The default mirrors the
/// upload path's first pass: a 1920x2560 box, a 2.5 MiB byte ceiling,
/// starting quality 0.85 with a 0.3 floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompressionTarget {
    /// Maximum output width in pixels.
    pub max_width: u32,
    /// Maximum output height in pixels.
    pub max_height: u32,
    /// Byte ceiling the encoded output should fit under.
    pub target_bytes: u64,
    /// Quality of the first encode attempt (0.0-1.0).
    pub initial_quality: f32,
    /// Quality floor; the search never encodes below this (0.0-1.0).
    pub min_quality: f32,
}

impl Default for CompressionTarget {
    fn default() -> Self {
        Self {
            max_width: 1920,
            max_height: 2560,
            target_bytes: 2_621_440, // 2.5 MiB
            initial_quality: 0.85,
            min_quality: 0.3,
        }
    }
}

impl CompressionTarget {
    /// Check the configuration invariants.
    ///
    /// Requires non-zero box dimensions, a positive byte ceiling, and
    /// `0 < min_quality <= initial_quality <= 1.0`.
    pub fn validate(&self) -> Result<(), CompressError> {
        if self.max_width == 0 || self.max_height == 0 {
            return Err(CompressError::InvalidTarget(format!(
                "bounding box must be non-zero, got {}x{}",
                self.max_width, self.max_height
            )));
        }
        if self.target_bytes == 0 {
            return Err(CompressError::InvalidTarget(
                "target byte size must be positive".to_string(),
            ));
        }
        // The comparisons are written to also reject NaN
        if !(self.initial_quality > 0.0 && self.initial_quality <= 1.0) {
            return Err(CompressError::InvalidTarget(format!(
                "initial quality must be in (0, 1], got {}",
                self.initial_quality
            )));
        }
        if !(self.min_quality > 0.0 && self.min_quality <= self.initial_quality) {
            return Err(CompressError::InvalidTarget(format!(
                "min quality must be in (0, initial quality], got {}",
                self.min_quality
            )));
        }
        Ok(())
    }
}

/// A successfully compressed image.
#[derive(Debug, Clone)]
pub struct CompressedImage {
    /// JPEG-encoded output bytes.
    pub bytes: Vec<u8>,
    /// Quality of the accepted encode attempt (0.0-1.0).
    pub quality: f32,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
}

impl CompressedImage {
    /// Size of the encoded output in bytes.
    pub fn byte_size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Whether the encoded output fits under `budget` bytes.
    pub fn fits(&self, budget: u64) -> bool {
        self.byte_size() <= budget
    }
}

/// Errors that can occur during a compression pass.
#[derive(Debug, Error)]
pub enum CompressError {
    /// The input image has degenerate dimensions; reported before any encode
    /// attempt.
    #[error("Invalid input image: width ({width}) and height ({height}) must be non-zero")]
    InvalidInput { width: u32, height: u32 },

    /// The compression target violates its invariants.
    #[error("Invalid compression target: {0}")]
    InvalidTarget(String),

    /// The source file exceeds [`MAX_SOURCE_BYTES`].
    #[error("Source file is too large: {size} bytes (limit {limit})")]
    SourceTooLarge { size: u64, limit: u64 },

    /// The source bytes could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// An encode attempt failed.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// The exact sequence of qualities the search will attempt.
///
/// Starts at `initial`; each subsequent value is the previous multiplied by
/// [`QUALITY_DECAY`]. The sequence stops before a value would land at or
/// below `min`, so every attempted quality stays at or above the floor. For
/// the defaults (0.85 start, 0.3 floor, 0.8 decay) that is 5 attempts.
pub fn quality_schedule(initial: f32, min: f32) -> Vec<f32> {
    let mut schedule = Vec::new();
    let mut quality = initial;
    loop {
        schedule.push(quality);
        let next = quality * QUALITY_DECAY;
        if next <= min {
            return schedule;
        }
        quality = next;
    }
}

/// Compress a decoded image to fit under `target.target_bytes`.
///
/// Clamps the image into the target's bounding box once, then walks the
/// quality schedule encoding the clamped pixels at each step. The first
/// attempt that fits is returned. If the schedule is exhausted, the final
/// floor-quality encode is returned as a best-effort `Ok` even though it is
/// over budget; callers that need a hard ceiling check [`CompressedImage::fits`]
/// or use [`compress_to_fit`], which escalates through tighter envelopes.
///
/// # Errors
///
/// Returns `CompressError::InvalidInput` for degenerate input dimensions and
/// `CompressError::InvalidTarget` for a misconfigured target, both before any
/// encode attempt.
pub fn compress(
    image: &SourceImage,
    target: &CompressionTarget,
) -> Result<CompressedImage, CompressError> {
    target.validate()?;
    if image.is_empty() {
        return Err(CompressError::InvalidInput {
            width: image.width,
            height: image.height,
        });
    }

    let clamped = clamp_to_box(image, target.max_width, target.max_height, FilterType::Lanczos3)?;

    // Walks the same sequence quality_schedule() describes; kept as a loop so
    // the final attempt's output can be returned without a re-encode.
    let mut quality = target.initial_quality;
    loop {
        let bytes = encode_jpeg(&clamped.pixels, clamped.width, clamped.height, quality)?;
        let next = quality * QUALITY_DECAY;

        if bytes.len() as u64 <= target.target_bytes || next <= target.min_quality {
            return Ok(CompressedImage {
                bytes,
                quality,
                width: clamped.width,
                height: clamped.height,
            });
        }
        quality = next;
    }
}

/// Decode raw file bytes and compress them in one step.
///
/// This is the entry point matching the upload flow: a file arrives as bytes,
/// gets size-gated and decoded, then compressed against the target.
///
/// # Errors
///
/// Returns `DecodeError::EmptyInput` (wrapped) for a zero-byte buffer and
/// `CompressError::SourceTooLarge` for files over [`MAX_SOURCE_BYTES`], both
/// checked before any decode work.
pub fn compress_bytes(
    bytes: &[u8],
    target: &CompressionTarget,
) -> Result<CompressedImage, CompressError> {
    if bytes.is_empty() {
        return Err(CompressError::Decode(DecodeError::EmptyInput));
    }
    let size = bytes.len() as u64;
    if size > MAX_SOURCE_BYTES {
        return Err(CompressError::SourceTooLarge {
            size,
            limit: MAX_SOURCE_BYTES,
        });
    }

    let image = decode_image(bytes)?;
    compress(&image, target)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
