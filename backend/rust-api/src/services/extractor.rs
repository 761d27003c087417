use serde_json::Value;

use crate::error::{QuizError, Result};

const CONTENT_POINTER: &str = "/choices/0/message/content";

/// Returns `choices[0].message.content` from a chat-completion response body.
pub fn extract_content(body: &[u8]) -> Result<String> {
    let envelope: Value = serde_json::from_slice(body)
        .map_err(|e| QuizError::MalformedResponse(format!("response is not valid JSON: {e}")))?;

    envelope
        .pointer(CONTENT_POINTER)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| {
            QuizError::MalformedResponse("choices[0].message.content is missing".to_string())
        })
}
