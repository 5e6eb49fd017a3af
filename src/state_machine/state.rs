//! Conversation state types

use std::fmt;

/// Handle for a pending reply placeholder.
///
/// Minted by the controller when a send starts and carried through the
/// request, its outcome, and the placeholder resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PendingId(u64);

impl PendingId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for PendingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pending-{}", self.0)
    }
}

/// Conversation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConvState {
    /// Ready for user input, no request in flight
    #[default]
    Idle,

    /// Request in flight; the placeholder is on screen
    AwaitingReply { pending: PendingId },
}

impl ConvState {
    pub fn is_awaiting(&self) -> bool {
        matches!(self, ConvState::AwaitingReply { .. })
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            ConvState::Idle => "idle",
            ConvState::AwaitingReply { .. } => "awaiting_reply",
        }
    }
}
