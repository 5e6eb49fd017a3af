//! Chat client error types

use thiserror::Error;

/// Transport failure talking to the chat endpoint
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ChatError {
    pub kind: ChatErrorKind,
    pub message: String,
}

impl ChatError {
    pub fn new(kind: ChatErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Network, message)
    }

    pub fn invalid_body(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::InvalidBody, message)
    }
}

/// Where the request broke down. Both kinds resolve the pending reply the same
/// way; the distinction only shows up in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatErrorKind {
    /// Request never completed (connection refused, reset, DNS)
    Network,
    /// Response arrived but its body was not JSON
    InvalidBody,
}

impl ChatErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ChatErrorKind::Network => "network",
            ChatErrorKind::InvalidBody => "invalid_body",
        }
    }
}
