//! HTTP implementation of the chat service

use super::types::{ChatReply, ChatRequest};
use super::{ChatError, ChatService};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

/// Talks JSON over HTTP POST to a single chat endpoint
pub struct HttpChatService {
    client: Client,
    endpoint: String,
}

impl HttpChatService {
    /// No client-side timeout is configured; the transport's own limits apply.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ChatError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ChatError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl ChatService for HttpChatService {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, ChatError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| ChatError::network(format!("Request failed: {e}")))?;

        // The status is informational only: any JSON body counts as a reply,
        // and error bodies simply lack a usable `response`.
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = %status, "Chat endpoint returned non-success status");
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ChatError::invalid_body(format!("Failed to parse response: {e}")))?;

        ChatReply::from_value(&body)
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
