//! Conversation controller executor

use super::traits::TranscriptStorage;
use crate::chat::{ChatRequest, ChatService};
use crate::state_machine::{transition, ConvState, Effect, Event, PendingId, TransitionError};
use crate::view::{ChatSurface, UserAction};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Drives send/receive cycles against any storage, chat service, and surface
pub struct ConversationController<S, C, V>
where
    S: TranscriptStorage + 'static,
    C: ChatService + 'static,
    V: ChatSurface,
{
    state: ConvState,
    storage: S,
    chat: Arc<C>,
    surface: V,
    /// Request outcomes come back on this channel
    event_rx: mpsc::Receiver<Event>,
    event_tx: mpsc::Sender<Event>,
    next_pending: PendingId,
}

impl<S, C, V> ConversationController<S, C, V>
where
    S: TranscriptStorage + 'static,
    C: ChatService + 'static,
    V: ChatSurface,
{
    pub fn new(storage: S, chat: C, surface: V) -> Self {
        let (event_tx, event_rx) = mpsc::channel(32);
        Self {
            state: ConvState::Idle,
            storage,
            chat: Arc::new(chat),
            surface,
            event_rx,
            event_tx,
            next_pending: PendingId::new(1),
        }
    }

    /// Render the persisted transcript. Returns the number of messages shown.
    pub async fn restore(&mut self) -> usize {
        match self.storage.load_transcript().await {
            Ok(messages) => {
                for message in &messages {
                    self.surface.render_message(message);
                }
                tracing::info!(count = messages.len(), "Transcript restored");
                messages.len()
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load transcript");
                self.surface.show_notice("Could not load chat history.");
                0
            }
        }
    }

    /// Restore the transcript, then process user actions until the input
    /// closes. An outstanding reply is still resolved before returning.
    pub async fn run(mut self, mut actions: mpsc::Receiver<UserAction>) {
        tracing::info!(endpoint = %self.chat.endpoint(), "Starting conversation controller");
        self.restore().await;

        loop {
            tokio::select! {
                action = actions.recv() => match action {
                    Some(action) => self.dispatch(action).await,
                    None => break,
                },
                Some(event) = self.event_rx.recv() => {
                    self.process_event(event).await;
                }
            }
        }

        self.settle().await;
        tracing::info!("Conversation controller stopped");
    }

    /// Turn a user action into an event and process it
    pub async fn dispatch(&mut self, action: UserAction) {
        let event = match action {
            UserAction::Submit(text) => {
                let pending = self.next_pending;
                self.next_pending = pending.next();
                Event::UserSubmit { text, pending }
            }
            UserAction::SelectFile(file_name) => Event::FileSelected { file_name },
            UserAction::React { target, reaction } => Event::ReactionClicked { target, reaction },
            UserAction::Invalid(hint) => {
                self.surface.show_notice(&hint);
                return;
            }
        };
        self.process_event(event).await;
    }

    /// Wait for the in-flight request, if any, and resolve it
    pub async fn settle(&mut self) {
        while self.state.is_awaiting() {
            match self.event_rx.recv().await {
                Some(event) => self.process_event(event).await,
                None => break,
            }
        }
    }

    async fn process_event(&mut self, event: Event) {
        let event_name = event.name();
        if let Event::TransportFailed { pending, error } = &event {
            tracing::warn!(%pending, error = %error, "Chat request did not complete");
        }
        let result = match transition(&self.state, event) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(
                    state = self.state.name(),
                    event = event_name,
                    error = %e,
                    "Transition rejected"
                );
                if matches!(e, TransitionError::ReplyPending { .. }) {
                    self.surface.show_notice(&e.to_string());
                }
                return;
            }
        };

        if result.new_state != self.state {
            tracing::debug!(
                from = self.state.name(),
                to = result.new_state.name(),
                event = event_name,
                "State changed"
            );
        }
        self.state = result.new_state;

        // A failed effect does not stop the rest; the view keeps updating
        for effect in result.effects {
            if let Err(e) = self.execute_effect(effect).await {
                tracing::error!(error = %e, "Failed to execute effect");
            }
        }
    }

    async fn execute_effect(&mut self, effect: Effect) -> Result<(), String> {
        match effect {
            Effect::RenderMessage { message } => {
                self.surface.render_message(&message);
                Ok(())
            }
            Effect::PersistMessage { message } => self.storage.append_message(&message).await,
            Effect::ClearInput => {
                self.surface.clear_input();
                Ok(())
            }
            Effect::ShowPending { pending } => {
                self.surface.show_pending(pending);
                Ok(())
            }
            Effect::RequestReply { pending, text } => {
                self.spawn_request(pending, text).await;
                Ok(())
            }
            Effect::PersistSessionId { session_id } => {
                self.storage.set_session_id(&session_id).await
            }
            Effect::ResolvePending { pending, message } => {
                self.surface.resolve_pending(pending, &message);
                Ok(())
            }
            Effect::ApplyReaction { target, reaction } => {
                match self.surface.apply_reaction(target, reaction) {
                    Some(text) => {
                        tracing::info!(reaction = reaction.icon(), text = %text, "Reaction");
                    }
                    None => {
                        self.surface
                            .show_notice(&format!("Message {target} has no reactions."));
                    }
                }
                Ok(())
            }
        }
    }

    /// Issue the chat request on a background task. The outcome comes back
    /// as an event so rendering and input keep running meanwhile.
    async fn spawn_request(&self, pending: PendingId, text: String) {
        let session_id = match self.storage.session_id().await {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read session id, sending without one");
                None
            }
        };

        let request = ChatRequest::new(text, session_id);
        let chat = Arc::clone(&self.chat);
        let event_tx = self.event_tx.clone();

        tracing::debug!(%pending, has_session = request.session_id.is_some(), "Sending chat request");
        tokio::spawn(async move {
            let event = match chat.send(&request).await {
                Ok(reply) => Event::ReplyReceived { pending, reply },
                Err(e) => Event::TransportFailed {
                    pending,
                    error: e.to_string(),
                },
            };
            // Receiver is gone only after the controller has stopped
            let _ = event_tx.send(event).await;
        });
    }

    #[cfg(test)]
    pub fn state(&self) -> ConvState {
        self.state
    }

    #[cfg(test)]
    pub fn surface(&self) -> &V {
        &self.surface
    }

    #[cfg(test)]
    pub fn storage(&self) -> &S {
        &self.storage
    }
}
