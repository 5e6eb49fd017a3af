//! Runtime for the conversation controller
//!
//! Owns the state machine's current state and executes its effects against
//! injected storage, chat service, and rendering surface.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::ConversationController;
#[allow(unused_imports)] // Public API re-exports
pub use traits::*;

use crate::chat::LoggingService;
use crate::db::TranscriptStore;
use crate::view::TerminalSurface;
use std::io::Stdout;

/// Type alias for the production controller with concrete implementations
pub type ProductionController =
    ConversationController<TranscriptStore, LoggingService, TerminalSurface<Stdout>>;
