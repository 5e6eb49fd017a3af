//! Effects produced by state transitions

use super::state::PendingId;
use crate::db::Message;
use crate::view::Reaction;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Draw a finalized message on the surface
    RenderMessage { message: Message },

    /// Append a message to the persisted transcript
    PersistMessage { message: Message },

    /// Empty the input field
    ClearInput,

    /// Draw the typing placeholder
    ShowPending { pending: PendingId },

    /// Issue the outbound chat request
    RequestReply { pending: PendingId, text: String },

    /// Store a new or refreshed session identifier
    PersistSessionId { session_id: String },

    /// Replace the placeholder with its final message
    ResolvePending { pending: PendingId, message: Message },

    /// Select a reaction on a rendered entry
    ApplyReaction { target: usize, reaction: Reaction },
}

impl Effect {
    pub fn render(message: &Message) -> Self {
        Effect::RenderMessage {
            message: message.clone(),
        }
    }

    pub fn persist(message: &Message) -> Self {
        Effect::PersistMessage {
            message: message.clone(),
        }
    }
}
