//! Mailfit Core - Adaptive image compression for upload pipelines
//!
//! This crate provides the image pipeline behind Mailfit's resume upload
//! flow: decoding, dimension clamping, quality-decaying JPEG compression,
//! the envelope retry policy, and the delivery payload budget.
//!
//! The pipeline's contract: given a source image and a byte ceiling, produce
//! an encoded image at or under the ceiling by trading spatial resolution
//! (once) and encode quality (iteratively, bounded), or report precisely why
//! it cannot.

pub mod compress;
pub mod decode;
pub mod delivery;
pub mod encode;

pub use compress::{
    compress, compress_bytes, compress_to_fit, compress_to_fit_with_cancel, quality_schedule,
    CompressError, CompressedImage, CompressionTarget, Envelope, EnvelopePlan, FitError,
    MAX_SOURCE_BYTES, QUALITY_DECAY,
};
pub use decode::{decode_image, is_supported_image, DecodeError, SourceImage};
pub use delivery::{
    build_payload, classify_failure, AttachmentMeta, AttachmentPayload, DeliveryError, FailureKind,
};
pub use encode::{encode_jpeg, EncodeError};
