//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the controller with mock implementations.

use crate::db::{Message, TranscriptStore};
use async_trait::async_trait;
use std::sync::Arc;

/// Storage for the transcript and session identifier
#[async_trait]
pub trait TranscriptStorage: Send + Sync {
    /// Load every persisted message in order
    async fn load_transcript(&self) -> Result<Vec<Message>, String>;

    /// Append one message to the persisted transcript
    async fn append_message(&self, message: &Message) -> Result<(), String>;

    /// Current session identifier, if one has been established
    async fn session_id(&self) -> Result<Option<String>, String>;

    /// Store a new or refreshed session identifier
    async fn set_session_id(&self, session_id: &str) -> Result<(), String>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: TranscriptStorage + ?Sized> TranscriptStorage for Arc<T> {
    async fn load_transcript(&self) -> Result<Vec<Message>, String> {
        (**self).load_transcript().await
    }

    async fn append_message(&self, message: &Message) -> Result<(), String> {
        (**self).append_message(message).await
    }

    async fn session_id(&self) -> Result<Option<String>, String> {
        (**self).session_id().await
    }

    async fn set_session_id(&self, session_id: &str) -> Result<(), String> {
        (**self).set_session_id(session_id).await
    }
}

// ============================================================================
// Production Adapters
// ============================================================================

#[async_trait]
impl TranscriptStorage for TranscriptStore {
    async fn load_transcript(&self) -> Result<Vec<Message>, String> {
        self.load().map_err(|e| e.to_string())
    }

    async fn append_message(&self, message: &Message) -> Result<(), String> {
        self.append(message.sender(), message.text())
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    async fn session_id(&self) -> Result<Option<String>, String> {
        TranscriptStore::session_id(self).map_err(|e| e.to_string())
    }

    async fn set_session_id(&self, session_id: &str) -> Result<(), String> {
        TranscriptStore::set_session_id(self, session_id).map_err(|e| e.to_string())
    }
}
