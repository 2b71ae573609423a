//! Upload payload WASM bindings.
//!
//! Builds the POST body the upload endpoint expects and exposes the size
//! budgets so the UI can warn before a doomed request is sent.
//!
//! # Example
//!
//! ```typescript
//! import { build_attachment_payload, base64_budget_bytes } from '@mailfit/wasm';
//!
//! const payload = build_attachment_payload(
//!   result.bytes, submission.id, submission.email,
//!   submission.fullName, file.name, 'image/jpeg',
//! );
//! await fetch('/api/upload-resume', {
//!   method: 'POST',
//!   headers: { 'Content-Type': 'application/json' },
//!   body: JSON.stringify(payload),
//! });
//! ```

use mailfit_core::delivery::{
    self, AttachmentMeta, BASE64_BUDGET_BYTES, BINARY_TARGET_BYTES,
};
use wasm_bindgen::prelude::*;

/// Build the upload POST body for compressed attachment bytes.
///
/// # Arguments
///
/// * `bytes` - The encoded attachment bytes
/// * `submission_id` - Identifier of the submission record
/// * `recipient` - Email address the attachment is delivered to
/// * `display_name` - Recipient display name, or `undefined`
/// * `file_name` - Attachment filename
/// * `mime_type` - MIME type of the attachment bytes
///
/// # Returns
///
/// A plain object with the endpoint's wire field names (`submissionId`,
/// `imageBase64`, `fileName`, `fileType`, `userEmail`, `userName`).
///
/// # Errors
///
/// Returns an error if the submission id or recipient is empty, or if the
/// base64-encoded image would exceed the body budget.
#[wasm_bindgen]
pub fn build_attachment_payload(
    bytes: &[u8],
    submission_id: &str,
    recipient: &str,
    display_name: Option<String>,
    file_name: &str,
    mime_type: &str,
) -> Result<JsValue, JsValue> {
    let meta = AttachmentMeta {
        submission_id: submission_id.to_string(),
        recipient: recipient.to_string(),
        display_name,
        file_name: file_name.to_string(),
        mime_type: mime_type.to_string(),
    };

    let payload =
        delivery::build_payload(bytes, &meta).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_wasm_bindgen::to_value(&payload).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Length of `binary_len` bytes after base64 encoding.
#[wasm_bindgen]
pub fn base64_len(binary_len: u32) -> u32 {
    delivery::base64_len(binary_len as u64) as u32
}

/// The binary size the compression pipeline aims for.
#[wasm_bindgen]
pub fn binary_target_bytes() -> u32 {
    BINARY_TARGET_BYTES as u32
}

/// The budget for the base64-encoded image field of the POST body.
#[wasm_bindgen]
pub fn base64_budget_bytes() -> u32 {
    BASE64_BUDGET_BYTES as u32
}
