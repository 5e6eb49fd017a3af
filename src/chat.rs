//! Remote chat service client
//!
//! Provides the wire types and a common interface for talking to the chat
//! endpoint.

mod error;
mod http;
mod types;

pub use error::{ChatError, ChatErrorKind};
pub use http::HttpChatService;
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for the remote chat endpoint
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Send one message and wait for the reply
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, ChatError>;

    /// Endpoint this service talks to
    fn endpoint(&self) -> &str;
}

#[async_trait]
impl<T: ChatService + ?Sized> ChatService for Arc<T> {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, ChatError> {
        (**self).send(request).await
    }

    fn endpoint(&self) -> &str {
        (**self).endpoint()
    }
}

/// Logging wrapper for chat services
pub struct LoggingService {
    inner: Arc<dyn ChatService>,
    endpoint: String,
}

impl LoggingService {
    pub fn new(inner: Arc<dyn ChatService>) -> Self {
        let endpoint = inner.endpoint().to_string();
        Self { inner, endpoint }
    }
}

#[async_trait]
impl ChatService for LoggingService {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, ChatError> {
        let start = std::time::Instant::now();
        let result = self.inner.send(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(reply) => {
                tracing::info!(
                    endpoint = %self.endpoint,
                    duration_ms = %duration.as_millis(),
                    has_text = reply.text.is_some(),
                    session_refreshed = reply.session_id.is_some(),
                    "Chat request completed"
                );
                if let Some(service_error) = &reply.service_error {
                    tracing::warn!(error = %service_error, "Chat service reported an error");
                }
            }
            Err(e) => {
                tracing::error!(
                    endpoint = %self.endpoint,
                    duration_ms = %duration.as_millis(),
                    kind = e.kind.as_str(),
                    error = %e.message,
                    "Chat request failed"
                );
            }
        }

        result
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
