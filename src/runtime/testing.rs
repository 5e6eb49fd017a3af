//! Mock implementations for testing
//!
//! These mocks enable integration testing without real I/O.

use super::traits::*;
use crate::chat::{ChatError, ChatReply, ChatRequest, ChatService};
use crate::db::Message;
use crate::state_machine::PendingId;
use crate::view::{ChatSurface, Reaction};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

// ============================================================================
// Mock Chat Service
// ============================================================================

/// Mock chat service that returns queued outcomes
pub struct MockChatService {
    outcomes: Mutex<VecDeque<Result<ChatReply, ChatError>>>,
    /// Record of all requests made
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl MockChatService {
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful reply
    pub fn queue_reply(&self, reply: ChatReply) {
        self.outcomes.lock().unwrap().push_back(Ok(reply));
    }

    /// Queue a transport failure
    pub fn queue_error(&self, error: ChatError) {
        self.outcomes.lock().unwrap().push_back(Err(error));
    }

    pub fn with_reply(self, reply: ChatReply) -> Self {
        self.queue_reply(reply);
        self
    }

    pub fn with_error(self, error: ChatError) -> Self {
        self.queue_error(error);
        self
    }

    /// Get recorded requests
    pub fn recorded_requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatService for MockChatService {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, ChatError> {
        self.requests.lock().unwrap().push(request.clone());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ChatError::network("No mock outcome queued")))
    }

    fn endpoint(&self) -> &str {
        "mock://chat"
    }
}

// ============================================================================
// In-Memory Storage
// ============================================================================

/// In-memory transcript storage
#[derive(Default)]
pub struct InMemoryTranscript {
    messages: Mutex<Vec<Message>>,
    session_id: Mutex<Option<String>>,
    fail_writes: AtomicBool,
}

impl InMemoryTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_messages(messages: Vec<Message>) -> Self {
        Self {
            messages: Mutex::new(messages),
            ..Self::default()
        }
    }

    pub fn with_session_id(self, session_id: &str) -> Self {
        *self.session_id.lock().unwrap() = Some(session_id.to_string());
        self
    }

    /// Make every subsequent write fail
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    pub fn messages(&self) -> Vec<Message> {
        self.messages.lock().unwrap().clone()
    }

    pub fn current_session_id(&self) -> Option<String> {
        self.session_id.lock().unwrap().clone()
    }

    fn check_writable(&self) -> Result<(), String> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err("disk full".to_string())
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl TranscriptStorage for InMemoryTranscript {
    async fn load_transcript(&self) -> Result<Vec<Message>, String> {
        Ok(self.messages())
    }

    async fn append_message(&self, message: &Message) -> Result<(), String> {
        self.check_writable()?;
        self.messages.lock().unwrap().push(message.clone());
        Ok(())
    }

    async fn session_id(&self) -> Result<Option<String>, String> {
        Ok(self.current_session_id())
    }

    async fn set_session_id(&self, session_id: &str) -> Result<(), String> {
        self.check_writable()?;
        *self.session_id.lock().unwrap() = Some(session_id.to_string());
        Ok(())
    }
}

// ============================================================================
// Recording Surface
// ============================================================================

/// Everything the controller asked the surface to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceOp {
    Render(Message),
    ClearInput,
    ShowPending(PendingId),
    Resolve(PendingId, Message),
    Reaction {
        target: usize,
        text: Option<String>,
    },
    Notice(String),
}

#[derive(Debug, Clone)]
enum RecordedEntry {
    Pending(PendingId),
    Final(Message),
}

/// Surface that records operations and tracks entries like a real view
#[derive(Default)]
pub struct RecordingSurface {
    pub ops: Vec<SurfaceOp>,
    entries: Vec<RecordedEntry>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finalized messages in display order
    pub fn rendered(&self) -> Vec<Message> {
        self.entries
            .iter()
            .filter_map(|e| match e {
                RecordedEntry::Final(m) => Some(m.clone()),
                RecordedEntry::Pending(_) => None,
            })
            .collect()
    }

    pub fn pending_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, RecordedEntry::Pending(_)))
            .count()
    }

    pub fn notices(&self) -> Vec<String> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                SurfaceOp::Notice(n) => Some(n.clone()),
                _ => None,
            })
            .collect()
    }
}

impl ChatSurface for RecordingSurface {
    fn render_message(&mut self, message: &Message) {
        self.entries.push(RecordedEntry::Final(message.clone()));
        self.ops.push(SurfaceOp::Render(message.clone()));
    }

    fn clear_input(&mut self) {
        self.ops.push(SurfaceOp::ClearInput);
    }

    fn show_pending(&mut self, pending: PendingId) {
        self.entries.push(RecordedEntry::Pending(pending));
        self.ops.push(SurfaceOp::ShowPending(pending));
    }

    fn resolve_pending(&mut self, pending: PendingId, message: &Message) {
        for entry in &mut self.entries {
            if matches!(entry, RecordedEntry::Pending(p) if *p == pending) {
                *entry = RecordedEntry::Final(message.clone());
            }
        }
        self.ops.push(SurfaceOp::Resolve(pending, message.clone()));
    }

    fn apply_reaction(&mut self, target: usize, _reaction: Reaction) -> Option<String> {
        let text = target
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .and_then(|e| match e {
                RecordedEntry::Final(m) if m.accepts_reactions() => Some(m.text().to_string()),
                _ => None,
            });
        self.ops.push(SurfaceOp::Reaction {
            target,
            text: text.clone(),
        });
        text
    }

    fn show_notice(&mut self, notice: &str) {
        self.ops.push(SurfaceOp::Notice(notice.to_string()));
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::FALLBACK_REPLY;
    use crate::db::{Database, TranscriptStore};
    use crate::runtime::ConversationController;
    use crate::state_machine::transition::UNREACHABLE_REPLY;
    use crate::state_machine::ConvState;
    use crate::view::{read_actions, UserAction};
    use std::sync::Arc;
    use tokio::sync::mpsc;

    type TestController =
        ConversationController<Arc<InMemoryTranscript>, Arc<MockChatService>, RecordingSurface>;

    fn controller(
        storage: InMemoryTranscript,
        chat: MockChatService,
    ) -> (TestController, Arc<InMemoryTranscript>, Arc<MockChatService>) {
        let storage = Arc::new(storage);
        let chat = Arc::new(chat);
        let controller =
            ConversationController::new(storage.clone(), chat.clone(), RecordingSurface::new());
        (controller, storage, chat)
    }

    fn submit(text: &str) -> UserAction {
        UserAction::Submit(text.to_string())
    }

    #[tokio::test]
    async fn test_mock_chat_service() {
        let mock = MockChatService::new().with_reply(ChatReply::new("Hi", None));

        let reply = mock.send(&ChatRequest::new("Hello", None)).await.unwrap();
        assert_eq!(reply.text.as_deref(), Some("Hi"));

        // Second call should fail (nothing queued)
        assert!(mock.send(&ChatRequest::new("Hello", None)).await.is_err());
        assert_eq!(mock.recorded_requests().len(), 2);
    }

    #[tokio::test]
    async fn test_successful_exchange() {
        let (mut ctl, storage, chat) = controller(
            InMemoryTranscript::new(),
            MockChatService::new().with_reply(ChatReply::new("Hi", Some("abc".into()))),
        );

        ctl.dispatch(submit("Hello")).await;
        assert!(ctl.state().is_awaiting());
        ctl.settle().await;

        assert_eq!(ctl.state(), ConvState::Idle);
        assert_eq!(
            storage.messages(),
            vec![Message::user("Hello"), Message::bot("Hi")]
        );
        assert_eq!(storage.current_session_id().as_deref(), Some("abc"));
        assert_eq!(
            chat.recorded_requests(),
            vec![ChatRequest::new("Hello", None)]
        );
        assert_eq!(
            ctl.surface().rendered(),
            vec![Message::user("Hello"), Message::bot("Hi")]
        );
        assert_eq!(ctl.surface().pending_count(), 0);
    }

    #[tokio::test]
    async fn test_surface_order_within_cycle() {
        let (mut ctl, _storage, _chat) = controller(
            InMemoryTranscript::new(),
            MockChatService::new().with_reply(ChatReply::new("Hi", None)),
        );

        ctl.dispatch(submit("  Hello ")).await;
        ctl.settle().await;

        let ops = &ctl.surface().ops;
        assert_eq!(ops.len(), 4);
        assert_eq!(ops[0], SurfaceOp::Render(Message::user("Hello")));
        assert_eq!(ops[1], SurfaceOp::ClearInput);
        let SurfaceOp::ShowPending(pending) = ops[2] else {
            panic!("expected placeholder, got {:?}", ops[2]);
        };
        assert_eq!(ops[3], SurfaceOp::Resolve(pending, Message::bot("Hi")));
    }

    #[tokio::test]
    async fn test_transport_failure_exchange() {
        let (mut ctl, storage, _chat) = controller(
            InMemoryTranscript::new(),
            MockChatService::new().with_error(ChatError::network("connection refused")),
        );

        ctl.dispatch(submit("Hello")).await;
        ctl.settle().await;

        assert_eq!(
            storage.messages(),
            vec![
                Message::user("Hello"),
                Message::bot("Server unreachable. Please check your connection."),
            ]
        );
        assert_eq!(storage.current_session_id(), None);
        assert_eq!(ctl.surface().rendered()[1].text(), UNREACHABLE_REPLY);
    }

    #[tokio::test]
    async fn test_blank_submit_does_nothing() {
        let (mut ctl, storage, chat) =
            controller(InMemoryTranscript::new(), MockChatService::new());

        for text in ["", "   ", "\t"] {
            ctl.dispatch(submit(text)).await;
        }

        assert_eq!(ctl.state(), ConvState::Idle);
        assert!(storage.messages().is_empty());
        assert!(chat.recorded_requests().is_empty());
        assert!(ctl.surface().ops.is_empty());
    }

    #[tokio::test]
    async fn test_missing_response_and_session() {
        let (mut ctl, storage, chat) = controller(
            InMemoryTranscript::new().with_session_id("abc"),
            MockChatService::new().with_reply(ChatReply::default()),
        );

        ctl.dispatch(submit("Hello")).await;
        ctl.settle().await;

        assert_eq!(storage.messages()[1], Message::bot(FALLBACK_REPLY));
        assert_eq!(storage.current_session_id().as_deref(), Some("abc"));
        assert_eq!(
            chat.recorded_requests(),
            vec![ChatRequest::new("Hello", Some("abc".into()))]
        );
    }

    #[tokio::test]
    async fn test_session_id_refreshed_and_reused() {
        let (mut ctl, storage, chat) = controller(
            InMemoryTranscript::new(),
            MockChatService::new()
                .with_reply(ChatReply::new("Hi", Some("abc".into())))
                .with_reply(ChatReply::new("Again", Some("def".into()))),
        );

        ctl.dispatch(submit("Hello")).await;
        ctl.settle().await;
        ctl.dispatch(submit("Once more")).await;
        ctl.settle().await;

        let requests = chat.recorded_requests();
        assert_eq!(requests[0].session_id, None);
        assert_eq!(requests[1].session_id.as_deref(), Some("abc"));
        assert_eq!(storage.current_session_id().as_deref(), Some("def"));
        assert_eq!(storage.messages().len(), 4);
    }

    #[tokio::test]
    async fn test_second_send_while_pending_rejected() {
        let (mut ctl, storage, chat) = controller(
            InMemoryTranscript::new(),
            MockChatService::new()
                .with_reply(ChatReply::new("Hi", None))
                .with_reply(ChatReply::new("unused", None)),
        );

        ctl.dispatch(submit("Hello")).await;
        ctl.dispatch(submit("Are you there?")).await;
        // The consumed line is echoed back so it can be sent again
        assert_eq!(
            ctl.surface().notices(),
            vec!["Still waiting for the previous reply, not sent: Are you there?"]
        );
        ctl.settle().await;

        assert_eq!(
            storage.messages(),
            vec![Message::user("Hello"), Message::bot("Hi")]
        );
        assert_eq!(chat.recorded_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_slash_prefixed_text_is_sent() {
        let (mut ctl, storage, chat) = controller(
            InMemoryTranscript::new(),
            MockChatService::new().with_reply(ChatReply::new("Noted", None)),
        );

        let (tx, mut rx) = mpsc::channel(8);
        let input: &[u8] = b"/etc/hosts is the file I mean\n";
        read_actions(input, tx).await;
        while let Some(action) = rx.recv().await {
            ctl.dispatch(action).await;
        }
        ctl.settle().await;

        assert_eq!(
            storage.messages(),
            vec![
                Message::user("/etc/hosts is the file I mean"),
                Message::bot("Noted"),
            ]
        );
        assert_eq!(
            chat.recorded_requests(),
            vec![ChatRequest::new("/etc/hosts is the file I mean", None)]
        );
    }

    #[tokio::test]
    async fn test_restore_renders_history_without_requests() {
        let history = vec![
            Message::user("Hello"),
            Message::bot("Hi"),
            Message::user("📎 Uploaded: notes.txt"),
        ];
        let (mut ctl, storage, chat) = controller(
            InMemoryTranscript::with_messages(history.clone()),
            MockChatService::new(),
        );

        assert_eq!(ctl.restore().await, 3);
        assert_eq!(ctl.surface().rendered(), history);
        assert!(chat.recorded_requests().is_empty());
        assert_eq!(storage.messages(), history);
    }

    #[tokio::test]
    async fn test_file_selection_persists_announcement_only() {
        let (mut ctl, storage, chat) =
            controller(InMemoryTranscript::new(), MockChatService::new());

        ctl.dispatch(UserAction::SelectFile("report.pdf".to_string()))
            .await;

        assert_eq!(
            storage.messages(),
            vec![Message::user("📎 Uploaded: report.pdf")]
        );
        assert!(chat.recorded_requests().is_empty());
        assert_eq!(ctl.state(), ConvState::Idle);
    }

    #[tokio::test]
    async fn test_reactions_only_on_bot_messages() {
        let (mut ctl, storage, _chat) = controller(
            InMemoryTranscript::with_messages(vec![Message::user("Hello"), Message::bot("Hi")]),
            MockChatService::new(),
        );
        ctl.restore().await;

        ctl.dispatch(UserAction::React {
            target: 1,
            reaction: Reaction::ThumbsUp,
        })
        .await;
        ctl.dispatch(UserAction::React {
            target: 2,
            reaction: Reaction::ThumbsUp,
        })
        .await;

        let reactions: Vec<_> = ctl
            .surface()
            .ops
            .iter()
            .filter(|op| matches!(op, SurfaceOp::Reaction { .. }))
            .cloned()
            .collect();
        assert_eq!(
            reactions,
            vec![
                SurfaceOp::Reaction {
                    target: 1,
                    text: None
                },
                SurfaceOp::Reaction {
                    target: 2,
                    text: Some("Hi".to_string())
                },
            ]
        );
        // The user-message attempt surfaces a notice
        assert_eq!(ctl.surface().notices().len(), 1);
        // Reactions never touch the transcript
        assert_eq!(storage.messages().len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_action_shows_hint() {
        let (mut ctl, storage, _chat) =
            controller(InMemoryTranscript::new(), MockChatService::new());

        ctl.dispatch(UserAction::Invalid("Usage: /attach <path>".to_string()))
            .await;

        assert_eq!(ctl.surface().notices(), vec!["Usage: /attach <path>"]);
        assert!(storage.messages().is_empty());
    }

    #[tokio::test]
    async fn test_storage_failure_still_resolves_view() {
        let (mut ctl, storage, _chat) = controller(
            InMemoryTranscript::new(),
            MockChatService::new().with_reply(ChatReply::new("Hi", Some("abc".into()))),
        );
        storage.fail_writes();

        ctl.dispatch(submit("Hello")).await;
        ctl.settle().await;

        assert_eq!(ctl.state(), ConvState::Idle);
        assert!(storage.messages().is_empty());
        assert_eq!(
            ctl.surface().rendered(),
            vec![Message::user("Hello"), Message::bot("Hi")]
        );
    }

    #[tokio::test]
    async fn test_run_resolves_outstanding_reply_before_exit() {
        let storage = Arc::new(InMemoryTranscript::new());
        let chat = Arc::new(MockChatService::new().with_reply(ChatReply::new("Hi", None)));
        let ctl = ConversationController::new(storage.clone(), chat.clone(), RecordingSurface::new());

        let (tx, rx) = mpsc::channel(8);
        tx.send(submit("Hello")).await.unwrap();
        drop(tx);

        ctl.run(rx).await;

        assert_eq!(
            storage.messages(),
            vec![Message::user("Hello"), Message::bot("Hi")]
        );
        assert_eq!(chat.recorded_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_with_sqlite_transcript_store() {
        let store = TranscriptStore::new(Database::open_in_memory().unwrap());
        let chat = MockChatService::new().with_reply(ChatReply::new("Hi", Some("abc".into())));
        let mut ctl = ConversationController::new(store, chat, RecordingSurface::new());

        ctl.dispatch(submit("Hello")).await;
        ctl.settle().await;

        let store = ctl.storage();
        assert_eq!(
            store.load().unwrap(),
            vec![Message::user("Hello"), Message::bot("Hi")]
        );
        assert_eq!(store.session_id().unwrap().as_deref(), Some("abc"));
    }
}
