//! Upload payload assembly and the delivery error taxonomy.
//!
//! The compressor's byte ceiling exists because the compressed image leaves
//! the browser as a base64 field in a JSON POST body, and the hosting
//! platform caps request bodies at 4.5 MiB. Base64 inflates the binary by a
//! third, so the pipeline budgets 2.5 MiB of binary / 3.5 MiB of base64 to
//! stay clear of the cap.
//!
//! Transport failures come back from the endpoint as free-form strings; this
//! module classifies them into a tagged [`FailureKind`] so callers can branch
//! on a kind instead of substring-matching messages.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Binary size the compression pipeline aims for.
pub const BINARY_TARGET_BYTES: u64 = 2_621_440; // 2.5 MiB

/// Budget for the base64-encoded image field.
pub const BASE64_BUDGET_BYTES: u64 = 3_670_016; // 3.5 MiB

/// The hosting platform's request body cap the budgets stay under.
pub const PLATFORM_BODY_LIMIT_BYTES: u64 = 4_718_592; // 4.5 MiB

/// Exact length of `binary_len` bytes after base64 encoding (with padding).
pub fn base64_len(binary_len: u64) -> u64 {
    binary_len.div_ceil(3) * 4
}

/// Submission metadata accompanying an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentMeta {
    /// Identifier of the submission record the attachment belongs to.
    pub submission_id: String,
    /// Email address the attachment is delivered to.
    pub recipient: String,
    /// Display name used in the delivery, when known.
    pub display_name: Option<String>,
    /// Attachment filename as shown to the recipient.
    pub file_name: String,
    /// MIME type of the attachment bytes.
    pub mime_type: String,
}

/// The POST body the upload endpoint reads.
///
/// Field names follow the endpoint's wire contract, hence the renames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentPayload {
    pub submission_id: String,
    pub image_base64: String,
    pub file_name: String,
    #[serde(rename = "fileType")]
    pub mime_type: String,
    #[serde(rename = "userEmail")]
    pub recipient: String,
    #[serde(rename = "userName", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// What went wrong at the delivery boundary, as a tag instead of the
/// transport's opaque strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    /// The body or attachment exceeded a size limit.
    SizeExceeded,
    /// The mail service rejected the sender's credentials or configuration.
    AuthFailure,
    /// A network-level failure that a later retry may clear.
    TransientNetwork,
    /// Anything the classifier could not place.
    Unknown,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::SizeExceeded => "size-exceeded",
            FailureKind::AuthFailure => "auth-failure",
            FailureKind::TransientNetwork => "transient-network",
            FailureKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Errors raised while assembling or delivering a payload.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The base64-encoded image would blow the body budget.
    #[error("Payload is too large: {size} bytes of base64 against a {limit}-byte budget")]
    PayloadTooLarge { size: u64, limit: u64 },

    /// A required metadata field is empty.
    #[error("Required field `{0}` is empty")]
    MissingField(&'static str),

    /// The transport reported a failure; classified by kind.
    #[error("Delivery failed ({kind}): {message}")]
    Failed { kind: FailureKind, message: String },
}

impl DeliveryError {
    /// Wrap a transport failure, classifying its opaque message.
    pub fn from_transport(status: Option<u16>, message: &str) -> Self {
        DeliveryError::Failed {
            kind: classify_failure(status, message),
            message: message.to_string(),
        }
    }
}

/// Build the upload POST body for compressed attachment bytes.
///
/// The base64 budget is checked from the binary length before any encoding
/// work happens.
///
/// # Errors
///
/// Returns `DeliveryError::MissingField` if the submission id or recipient is
/// empty, and `DeliveryError::PayloadTooLarge` if the encoded image would
/// exceed [`BASE64_BUDGET_BYTES`].
pub fn build_payload(
    bytes: &[u8],
    meta: &AttachmentMeta,
) -> Result<AttachmentPayload, DeliveryError> {
    if meta.submission_id.is_empty() {
        return Err(DeliveryError::MissingField("submissionId"));
    }
    if meta.recipient.is_empty() {
        return Err(DeliveryError::MissingField("userEmail"));
    }

    let inflated = base64_len(bytes.len() as u64);
    if inflated > BASE64_BUDGET_BYTES {
        return Err(DeliveryError::PayloadTooLarge {
            size: inflated,
            limit: BASE64_BUDGET_BYTES,
        });
    }

    Ok(AttachmentPayload {
        submission_id: meta.submission_id.clone(),
        image_base64: STANDARD.encode(bytes),
        file_name: meta.file_name.clone(),
        mime_type: meta.mime_type.clone(),
        recipient: meta.recipient.clone(),
        display_name: meta.display_name.clone(),
    })
}

/// Classify an opaque transport failure into a [`FailureKind`].
///
/// Matches the failure surface the upload endpoint actually produces: HTTP
/// 413 and "too large" wording for size, credential/configuration wording
/// for auth (Gmail app-password rejections included), gateway statuses and
/// connection wording for transient network trouble.
pub fn classify_failure(status: Option<u16>, message: &str) -> FailureKind {
    if let Some(code) = status {
        match code {
            413 => return FailureKind::SizeExceeded,
            401 | 403 => return FailureKind::AuthFailure,
            502 | 503 | 504 => return FailureKind::TransientNetwork,
            _ => {}
        }
    }

    let text = message.to_ascii_lowercase();

    if text.contains("too large") || text.contains("content too large") || text.contains("413") {
        return FailureKind::SizeExceeded;
    }
    if text.contains("app password")
        || text.contains("authentication")
        || text.contains("invalid login")
        || (text.contains("email") && text.contains("configuration"))
    {
        return FailureKind::AuthFailure;
    }
    if text.contains("network")
        || text.contains("timed out")
        || text.contains("timeout")
        || text.contains("connection")
        || text.contains("fetch failed")
    {
        return FailureKind::TransientNetwork;
    }

    FailureKind::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_meta() -> AttachmentMeta {
        AttachmentMeta {
            submission_id: "sub-123".to_string(),
            recipient: "applicant@example.com".to_string(),
            display_name: Some("Avery Example".to_string()),
            file_name: "resume.jpg".to_string(),
            mime_type: "image/jpeg".to_string(),
        }
    }

    #[test]
    fn test_base64_len_exact() {
        for n in [0u64, 1, 2, 3, 4, 5, 57, 100, 2048] {
            let bytes = vec![0xABu8; n as usize];
            assert_eq!(
                base64_len(n),
                STANDARD.encode(&bytes).len() as u64,
                "inflation mismatch for {} bytes",
                n
            );
        }
    }

    #[test]
    fn test_budgets_stay_under_platform_limit() {
        assert!(base64_len(BINARY_TARGET_BYTES) <= BASE64_BUDGET_BYTES);
        assert!(BASE64_BUDGET_BYTES < PLATFORM_BODY_LIMIT_BYTES);
    }

    #[test]
    fn test_build_payload_happy_path() {
        let payload = build_payload(b"fake jpeg bytes", &sample_meta()).unwrap();

        assert_eq!(payload.submission_id, "sub-123");
        assert_eq!(payload.recipient, "applicant@example.com");
        assert_eq!(
            STANDARD.decode(&payload.image_base64).unwrap(),
            b"fake jpeg bytes"
        );
    }

    #[test]
    fn test_build_payload_wire_field_names() {
        let payload = build_payload(b"x", &sample_meta()).unwrap();
        let json = serde_json::to_value(&payload).unwrap();

        // The endpoint reads these exact keys
        assert!(json.get("submissionId").is_some());
        assert!(json.get("imageBase64").is_some());
        assert!(json.get("fileName").is_some());
        assert!(json.get("fileType").is_some());
        assert!(json.get("userEmail").is_some());
        assert!(json.get("userName").is_some());
    }

    #[test]
    fn test_build_payload_omits_empty_display_name() {
        let mut meta = sample_meta();
        meta.display_name = None;

        let payload = build_payload(b"x", &meta).unwrap();
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("userName").is_none());
    }

    #[test]
    fn test_build_payload_missing_fields() {
        let mut meta = sample_meta();
        meta.submission_id.clear();
        assert!(matches!(
            build_payload(b"x", &meta),
            Err(DeliveryError::MissingField("submissionId"))
        ));

        let mut meta = sample_meta();
        meta.recipient.clear();
        assert!(matches!(
            build_payload(b"x", &meta),
            Err(DeliveryError::MissingField("userEmail"))
        ));
    }

    #[test]
    fn test_build_payload_rejects_oversized_image() {
        // Just over the binary size whose inflation hits the base64 budget
        let oversized = vec![0u8; 2_752_513];
        let result = build_payload(&oversized, &sample_meta());

        match result {
            Err(DeliveryError::PayloadTooLarge { size, limit }) => {
                assert!(size > limit);
                assert_eq!(limit, BASE64_BUDGET_BYTES);
            }
            other => panic!("Expected PayloadTooLarge, got: {:?}", other),
        }
    }

    #[test]
    fn test_classify_size_failures() {
        assert_eq!(classify_failure(Some(413), ""), FailureKind::SizeExceeded);
        assert_eq!(
            classify_failure(None, "Request Content Too Large"),
            FailureKind::SizeExceeded
        );
        assert_eq!(
            classify_failure(None, "attachment is too large to send"),
            FailureKind::SizeExceeded
        );
    }

    #[test]
    fn test_classify_auth_failures() {
        assert_eq!(classify_failure(Some(401), ""), FailureKind::AuthFailure);
        assert_eq!(
            classify_failure(None, "Invalid login: 535 authentication rejected"),
            FailureKind::AuthFailure
        );
        assert_eq!(
            classify_failure(None, "Gmail requires an App Password for this account"),
            FailureKind::AuthFailure
        );
        assert_eq!(
            classify_failure(None, "email service configuration missing"),
            FailureKind::AuthFailure
        );
    }

    #[test]
    fn test_classify_network_failures() {
        assert_eq!(
            classify_failure(Some(503), ""),
            FailureKind::TransientNetwork
        );
        assert_eq!(
            classify_failure(None, "fetch failed: network error"),
            FailureKind::TransientNetwork
        );
        assert_eq!(
            classify_failure(None, "connection reset by peer"),
            FailureKind::TransientNetwork
        );
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(classify_failure(None, "boom"), FailureKind::Unknown);
        assert_eq!(classify_failure(Some(500), "boom"), FailureKind::Unknown);
    }

    #[test]
    fn test_from_transport_keeps_message() {
        let err = DeliveryError::from_transport(Some(413), "body exceeded limit");
        match err {
            DeliveryError::Failed { kind, message } => {
                assert_eq!(kind, FailureKind::SizeExceeded);
                assert_eq!(message, "body exceeded limit");
            }
            other => panic!("Expected Failed, got: {:?}", other),
        }
    }

    #[test]
    fn test_failure_kind_display() {
        assert_eq!(FailureKind::SizeExceeded.to_string(), "size-exceeded");
        assert_eq!(FailureKind::AuthFailure.to_string(), "auth-failure");
        assert_eq!(
            FailureKind::TransientNetwork.to_string(),
            "transient-network"
        );
        assert_eq!(FailureKind::Unknown.to_string(), "unknown");
    }
}
