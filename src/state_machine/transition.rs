//! Pure state transition function

use super::{ConvState, Effect, Event, PendingId};
use crate::db::Message;
use thiserror::Error;

/// Bot text persisted when the request never completed
pub const UNREACHABLE_REPLY: &str = "Server unreachable. Please check your connection.";

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ConvState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ConvState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Still waiting for the previous reply, not sent: {text}")]
    ReplyPending { text: String },
    #[error("Reply for {got} does not match the pending request {expected}")]
    StaleReply { expected: PendingId, got: PendingId },
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Message appended when the user picks a file
pub fn attachment_text(file_name: &str) -> String {
    format!("📎 Uploaded: {file_name}")
}

/// Pure transition function
///
/// Given the same inputs this always produces the same outputs and performs
/// no I/O.
pub fn transition(state: &ConvState, event: Event) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // ============================================================
        // User input
        // ============================================================

        // Blank input is a no-op in every state
        (_, Event::UserSubmit { text, .. }) if text.trim().is_empty() => {
            Ok(TransitionResult::new(*state))
        }

        // Idle + UserSubmit -> AwaitingReply
        (ConvState::Idle, Event::UserSubmit { text, pending }) => {
            let text = text.trim().to_string();
            let message = Message::user(&text);
            Ok(TransitionResult::new(ConvState::AwaitingReply { pending })
                .with_effect(Effect::render(&message))
                .with_effect(Effect::persist(&message))
                .with_effect(Effect::ClearInput)
                .with_effect(Effect::ShowPending { pending })
                .with_effect(Effect::RequestReply { pending, text }))
        }

        (ConvState::AwaitingReply { .. }, Event::UserSubmit { text, .. }) => {
            Err(TransitionError::ReplyPending {
                text: text.trim().to_string(),
            })
        }

        // File selection announces the name only, in any state
        (_, Event::FileSelected { file_name }) => {
            let file_name = file_name.trim();
            if file_name.is_empty() {
                return Ok(TransitionResult::new(*state));
            }
            let message = Message::user(attachment_text(file_name));
            Ok(TransitionResult::new(*state)
                .with_effect(Effect::render(&message))
                .with_effect(Effect::persist(&message)))
        }

        // Reactions are purely presentational
        (_, Event::ReactionClicked { target, reaction }) => Ok(TransitionResult::new(*state)
            .with_effect(Effect::ApplyReaction { target, reaction })),

        // ============================================================
        // Request outcomes
        // ============================================================

        (ConvState::AwaitingReply { pending }, Event::ReplyReceived { pending: got, reply })
            if *pending == got =>
        {
            let message = Message::bot(reply.text_or_fallback());
            let session = reply
                .session_id
                .map(|session_id| Effect::PersistSessionId { session_id });
            Ok(TransitionResult::new(ConvState::Idle)
                .with_effects(session)
                .with_effect(Effect::ResolvePending {
                    pending: got,
                    message: message.clone(),
                })
                .with_effect(Effect::persist(&message)))
        }

        (ConvState::AwaitingReply { pending }, Event::TransportFailed { pending: got, .. })
            if *pending == got =>
        {
            let message = Message::bot(UNREACHABLE_REPLY);
            Ok(TransitionResult::new(ConvState::Idle)
                .with_effect(Effect::ResolvePending {
                    pending: got,
                    message: message.clone(),
                })
                .with_effect(Effect::persist(&message)))
        }

        (
            ConvState::AwaitingReply { pending },
            Event::ReplyReceived { pending: got, .. } | Event::TransportFailed { pending: got, .. },
        ) => Err(TransitionError::StaleReply {
            expected: *pending,
            got,
        }),

        (ConvState::Idle, event @ (Event::ReplyReceived { .. } | Event::TransportFailed { .. })) => {
            Err(TransitionError::InvalidTransition(format!(
                "{} while idle",
                event.name()
            )))
        }
    }
}
