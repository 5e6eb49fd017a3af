//! Chat widget - terminal chat client
//!
//! Relays user text to a remote chat endpoint and keeps the conversation
//! transcript in a local `SQLite` key-value store.

mod chat;
mod config;
mod db;
mod runtime;
mod state_machine;
mod view;

use chat::{HttpChatService, LoggingService};
use config::Config;
use db::{Database, TranscriptStore};
use runtime::{ConversationController, ProductionController};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use view::TerminalSurface;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr; stdout is the chat view
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chat_widget=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = Config::from_env();

    // Ensure database directory exists
    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    tracing::info!(path = %config.db_path.display(), "Opening database");
    let db = Database::open(&config.db_path)?;
    let storage = TranscriptStore::new(db);

    let chat = LoggingService::new(Arc::new(HttpChatService::new(config.endpoint.clone())?));
    tracing::info!(endpoint = %config.endpoint, "Chat service configured");

    let (action_tx, action_rx) = mpsc::channel(32);
    tokio::spawn(view::read_actions(tokio::io::stdin(), action_tx));

    let controller: ProductionController =
        ConversationController::new(storage, chat, TerminalSurface::stdout());
    controller.run(action_rx).await;

    Ok(())
}
