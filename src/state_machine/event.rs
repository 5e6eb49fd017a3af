//! Events that can occur in a conversation

use super::state::PendingId;
use crate::chat::ChatReply;
use crate::view::Reaction;

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    UserSubmit {
        text: String,
        /// Handle to use if this submit starts a send cycle
        pending: PendingId,
    },
    FileSelected {
        file_name: String,
    },
    ReactionClicked {
        /// 1-based entry number as shown on the surface
        target: usize,
        reaction: Reaction,
    },

    // Request outcomes
    ReplyReceived {
        pending: PendingId,
        reply: ChatReply,
    },
    TransportFailed {
        pending: PendingId,
        error: String,
    },
}

impl Event {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Event::UserSubmit { .. } => "user_submit",
            Event::FileSelected { .. } => "file_selected",
            Event::ReactionClicked { .. } => "reaction_clicked",
            Event::ReplyReceived { .. } => "reply_received",
            Event::TransportFailed { .. } => "transport_failed",
        }
    }
}
