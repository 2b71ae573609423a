//! Caller-level retry policy over progressively tighter targets.
//!
//! A single compression pass is lenient: at the quality floor it returns an
//! over-budget result rather than failing. The hard ceiling lives here. An
//! [`EnvelopePlan`] lists envelopes in tightening order plus the absolute
//! byte ceiling an accepted result must satisfy; each envelope is one visible
//! retry, never a hidden loop inside the compressor.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{compress, CompressError, CompressedImage, CompressionTarget};
use crate::decode::SourceImage;

const MIB: u64 = 1024 * 1024;

/// One attempt in a retry plan: a bounding box, a byte target, and the
/// quality the attempt starts from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    /// Maximum output width in pixels.
    pub max_width: u32,
    /// Maximum output height in pixels.
    pub max_height: u32,
    /// Byte ceiling for this attempt's quality search.
    pub target_bytes: u64,
    /// Starting quality for this attempt (0.0-1.0).
    pub initial_quality: f32,
}

impl Envelope {
    /// Expand into a full compression target using the plan's shared floor.
    pub fn to_target(&self, min_quality: f32) -> CompressionTarget {
        CompressionTarget {
            max_width: self.max_width,
            max_height: self.max_height,
            target_bytes: self.target_bytes,
            initial_quality: self.initial_quality,
            min_quality,
        }
    }
}

/// An ordered list of envelopes and the absolute ceiling a result must meet.
///
/// The default plan is the upload path's escalation: a generous first pass,
/// then two passes that tighten dimensions, byte target, and starting quality
/// together, all against a 2.5 MiB ceiling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EnvelopePlan {
    /// Envelopes tried in order; should tighten monotonically.
    pub envelopes: Vec<Envelope>,
    /// Absolute byte ceiling an accepted result must fit under.
    pub ceiling_bytes: u64,
    /// Quality floor shared by every envelope (0.0-1.0).
    pub min_quality: f32,
}

impl Default for EnvelopePlan {
    fn default() -> Self {
        Self {
            envelopes: vec![
                Envelope {
                    max_width: 1920,
                    max_height: 2560,
                    target_bytes: 2 * MIB + MIB / 2, // 2.5 MiB
                    initial_quality: 0.85,
                },
                Envelope {
                    max_width: 1600,
                    max_height: 2000,
                    target_bytes: 2 * MIB,
                    initial_quality: 0.70,
                },
                Envelope {
                    max_width: 1200,
                    max_height: 1600,
                    target_bytes: 9 * MIB / 5, // 1.8 MiB
                    initial_quality: 0.60,
                },
            ],
            ceiling_bytes: 2 * MIB + MIB / 2,
            min_quality: 0.3,
        }
    }
}

/// Errors from running an envelope plan.
#[derive(Debug, Error)]
pub enum FitError {
    /// A compression pass itself failed (bad input, bad config, encoder
    /// failure). Terminal; later envelopes would fail the same way.
    #[error(transparent)]
    Compress(#[from] CompressError),

    /// Every envelope was tried and none met the ceiling.
    #[error("Output is still too large: smallest pass produced {smallest} bytes against a {ceiling}-byte ceiling")]
    StillTooLarge { smallest: u64, ceiling: u64 },

    /// A caller-imposed timeout cancelled the sequence between attempts.
    #[error("Compression cancelled by caller-imposed timeout")]
    Timeout,

    /// The plan contains no envelopes.
    #[error("Envelope plan has no envelopes")]
    EmptyPlan,
}

/// Run an envelope plan to completion.
///
/// Envelopes are tried in order; the first result that fits under the plan's
/// ceiling is returned. Exhausting the plan yields
/// [`FitError::StillTooLarge`] carrying the smallest size any pass achieved,
/// so the caller can tell the user how far off the source was.
pub fn compress_to_fit(
    image: &SourceImage,
    plan: &EnvelopePlan,
) -> Result<CompressedImage, FitError> {
    compress_to_fit_with_cancel(image, plan, || false)
}

/// Run an envelope plan, polling `cancel` before each attempt.
///
/// The embedding application owns the wall clock; this function only observes
/// the flag. A true return abandons the sequence with [`FitError::Timeout`]
/// without starting another encode. An attempt already in progress runs to
/// completion; cancellation is only observed between envelopes.
pub fn compress_to_fit_with_cancel(
    image: &SourceImage,
    plan: &EnvelopePlan,
    cancel: impl Fn() -> bool,
) -> Result<CompressedImage, FitError> {
    if plan.envelopes.is_empty() {
        return Err(FitError::EmptyPlan);
    }

    let mut smallest = u64::MAX;
    for envelope in &plan.envelopes {
        if cancel() {
            return Err(FitError::Timeout);
        }

        let result = compress(image, &envelope.to_target(plan.min_quality))?;
        if result.fits(plan.ceiling_bytes) {
            return Ok(result);
        }
        smallest = smallest.min(result.byte_size());
    }

    Err(FitError::StillTooLarge {
        smallest,
        ceiling: plan.ceiling_bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn noise_image(width: u32, height: u32) -> SourceImage {
        let size = (width * height * 3) as usize;
        let pixels: Vec<u8> = (0..size).map(|i| ((i * 37 + i / 7) % 256) as u8).collect();
        SourceImage::new(width, height, pixels)
    }

    fn gradient_image(width: u32, height: u32) -> SourceImage {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(((x * 255) / width.max(1)) as u8);
                pixels.push(((y * 255) / height.max(1)) as u8);
                pixels.push(128);
            }
        }
        SourceImage::new(width, height, pixels)
    }

    /// Plan whose first envelope cannot meet the ceiling for noisy input but
    /// whose second can, by shrinking dimensions hard.
    fn two_step_plan() -> EnvelopePlan {
        EnvelopePlan {
            envelopes: vec![
                Envelope {
                    max_width: 256,
                    max_height: 256,
                    target_bytes: 4_096,
                    initial_quality: 0.7,
                },
                Envelope {
                    max_width: 16,
                    max_height: 16,
                    target_bytes: 4_096,
                    initial_quality: 0.6,
                },
            ],
            ceiling_bytes: 4_096,
            min_quality: 0.3,
        }
    }

    #[test]
    fn test_default_plan_tightens() {
        let plan = EnvelopePlan::default();
        assert_eq!(plan.envelopes.len(), 3);
        for pair in plan.envelopes.windows(2) {
            assert!(pair[1].max_width < pair[0].max_width);
            assert!(pair[1].max_height < pair[0].max_height);
            assert!(pair[1].target_bytes < pair[0].target_bytes);
            assert!(pair[1].initial_quality < pair[0].initial_quality);
        }
        assert_eq!(plan.ceiling_bytes, 2_621_440);
    }

    #[test]
    fn test_first_envelope_wins_for_easy_input() {
        let img = gradient_image(400, 300);
        let result = compress_to_fit(&img, &EnvelopePlan::default()).unwrap();

        assert!(result.fits(2_621_440));
        // First envelope never shrinks an already-fitting gradient
        assert_eq!(result.width, 400);
        assert_eq!(result.height, 300);
    }

    #[test]
    fn test_falls_through_to_tighter_envelope() {
        // 256x256 noise blows the 4 KiB ceiling even at the quality floor;
        // the 16x16 second envelope gets it under
        let img = noise_image(256, 256);
        let plan = two_step_plan();

        let result = compress_to_fit(&img, &plan).unwrap();

        assert!(result.fits(plan.ceiling_bytes));
        assert!(result.width <= 16);
        assert!(result.height <= 16);
    }

    #[test]
    fn test_exhausted_plan_reports_still_too_large() {
        let img = noise_image(128, 128);
        let plan = EnvelopePlan {
            envelopes: vec![Envelope {
                max_width: 128,
                max_height: 128,
                target_bytes: 10,
                initial_quality: 0.8,
            }],
            ceiling_bytes: 10,
            min_quality: 0.3,
        };

        match compress_to_fit(&img, &plan) {
            Err(FitError::StillTooLarge { smallest, ceiling }) => {
                assert!(smallest > ceiling);
                assert_eq!(ceiling, 10);
            }
            other => panic!("Expected StillTooLarge, got: {:?}", other),
        }
    }

    #[test]
    fn test_empty_plan_rejected() {
        let img = gradient_image(10, 10);
        let plan = EnvelopePlan {
            envelopes: vec![],
            ..Default::default()
        };

        assert!(matches!(
            compress_to_fit(&img, &plan),
            Err(FitError::EmptyPlan)
        ));
    }

    #[test]
    fn test_cancel_before_first_attempt() {
        let img = gradient_image(10, 10);
        let result = compress_to_fit_with_cancel(&img, &EnvelopePlan::default(), || true);

        assert!(matches!(result, Err(FitError::Timeout)));
    }

    #[test]
    fn test_cancel_between_envelopes() {
        let img = noise_image(256, 256);
        let plan = two_step_plan();

        // First poll passes, second fires: the fallback envelope is abandoned
        let polls = Cell::new(0u32);
        let result = compress_to_fit_with_cancel(&img, &plan, || {
            polls.set(polls.get() + 1);
            polls.get() > 1
        });

        assert!(matches!(result, Err(FitError::Timeout)));
        assert_eq!(polls.get(), 2);
    }

    #[test]
    fn test_compress_error_propagates() {
        let img = SourceImage::new(0, 0, vec![]);
        let result = compress_to_fit(&img, &EnvelopePlan::default());

        assert!(matches!(result, Err(FitError::Compress(_))));
    }

    #[test]
    fn test_plan_serde_accepts_partial_objects() {
        let plan: EnvelopePlan = serde_json::from_str(r#"{"ceilingBytes": 1048576}"#).unwrap();
        assert_eq!(plan.ceiling_bytes, 1_048_576);
        assert_eq!(plan.envelopes.len(), 3);
        assert_eq!(plan.min_quality, 0.3);
    }
}
