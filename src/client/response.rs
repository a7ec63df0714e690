//! Generated-text parsing.
//!
//! The model is asked for JSON but frequently wraps it in a markdown code
//! fence. Stripping is purely local string inspection: remove the literal
//! opening fence line and the literal closing fence line when present, then
//! hand the rest to `serde_json`.

use crate::types::{Error, Result};

const FENCE_OPEN: &str = "```json\n";
const FENCE_CLOSE: &str = "\n```";

/// Strip a leading ```` ```json ```` line and a trailing ```` ``` ```` line.
/// Each marker is removed independently, and the operation is idempotent:
/// already-bare text passes through unchanged.
pub fn strip_code_fence(text: &str) -> &str {
    let text = text.strip_prefix(FENCE_OPEN).unwrap_or(text);
    text.strip_suffix(FENCE_CLOSE).unwrap_or(text)
}

/// Parse generated text into a JSON document.
///
/// A parse failure is a distinct, non-retryable error kind; it is never
/// swallowed or defaulted, because it means the model ignored the format
/// instructions and the caller should see that.
pub fn parse_document(text: &str) -> Result<serde_json::Value> {
    serde_json::from_str(strip_code_fence(text)).map_err(Error::MalformedResponse)
}
