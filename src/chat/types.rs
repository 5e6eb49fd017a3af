//! Wire types for the chat endpoint

use super::ChatError;
use serde::Serialize;
use serde_json::Value;

/// Bot text used when a reply carries no usable `response`
pub const FALLBACK_REPLY: &str = "Sorry, something went wrong.";

/// Outbound request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>, session_id: Option<String>) -> Self {
        Self {
            message: message.into(),
            session_id: session_id.filter(|id| !id.is_empty()),
        }
    }
}

/// Validated reply from the chat endpoint.
///
/// Every field is optional from the client's point of view. Values that are
/// missing, empty, or not strings are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatReply {
    pub text: Option<String>,
    pub session_id: Option<String>,
    /// Diagnostic detail some services attach next to a friendly `response`
    pub service_error: Option<String>,
}

impl ChatReply {
    #[cfg(test)]
    pub fn new(text: impl Into<String>, session_id: Option<String>) -> Self {
        Self {
            text: Some(text.into()),
            session_id,
            service_error: None,
        }
    }

    /// Validate a decoded JSON body. A `null` body has no fields to read and
    /// counts as a failed request; any other shape is a reply.
    pub fn from_value(body: &Value) -> Result<Self, ChatError> {
        if body.is_null() {
            return Err(ChatError::invalid_body("Response body was null"));
        }
        Ok(Self {
            text: non_empty_string(body, "response"),
            session_id: non_empty_string(body, "session_id"),
            service_error: non_empty_string(body, "error"),
        })
    }

    /// Text to show and persist for this reply
    pub fn text_or_fallback(&self) -> &str {
        self.text.as_deref().unwrap_or(FALLBACK_REPLY)
    }
}

fn non_empty_string(body: &Value, field: &str) -> Option<String> {
    body.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(String::from)
}
