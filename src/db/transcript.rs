//! Persisted transcript and session identifier

use super::{Database, DbResult, Message, Sender, SESSION_ID_KEY, TRANSCRIPT_KEY};

/// Ordered message log backed by the key-value store.
///
/// The whole sequence is rewritten on every append; there is no incremental
/// diff and no pruning.
#[derive(Clone)]
pub struct TranscriptStore {
    db: Database,
}

impl TranscriptStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Load the transcript. Missing or unparseable data yields an empty log.
    pub fn load(&self) -> DbResult<Vec<Message>> {
        let Some(raw) = self.db.get(TRANSCRIPT_KEY)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<Message>>(&raw) {
            Ok(messages) => Ok(messages),
            Err(e) => {
                tracing::warn!(error = %e, "Stored transcript is malformed, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    /// Append one message and write the full sequence back
    pub fn append(&self, sender: Sender, text: &str) -> DbResult<Message> {
        let message = Message::new(sender, text);
        let mut messages = self.load()?;
        messages.push(message.clone());

        let encoded = serde_json::to_string(&messages)?;
        self.db.set(TRANSCRIPT_KEY, &encoded)?;

        tracing::debug!(sender = %sender, total = messages.len(), "Message persisted");
        Ok(message)
    }

    /// Current session identifier; an empty stored value counts as absent
    pub fn session_id(&self) -> DbResult<Option<String>> {
        Ok(self
            .db
            .get(SESSION_ID_KEY)?
            .filter(|id| !id.is_empty()))
    }

    pub fn set_session_id(&self, session_id: &str) -> DbResult<()> {
        self.db.set(SESSION_ID_KEY, session_id)
    }
}
