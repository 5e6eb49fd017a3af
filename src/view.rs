//! Rendering surface for the chat
//!
//! The controller draws through [`ChatSurface`]; the terminal implementation
//! lives in `terminal`, input handling in `input`.

mod input;
mod terminal;

pub use input::{read_actions, UserAction};
pub use terminal::TerminalSurface;

use crate::db::Message;
use crate::state_machine::PendingId;

/// Reaction icons offered on finalized bot messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reaction {
    ThumbsUp,
}

impl Reaction {
    /// Every reaction a message offers, in display order
    pub const ALL: [Reaction; 1] = [Reaction::ThumbsUp];

    pub fn icon(self) -> &'static str {
        match self {
            Reaction::ThumbsUp => "👍",
        }
    }
}

/// Visual state of one reaction icon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReactionMark {
    #[default]
    Unset,
    Selected,
}

/// The reaction icons attached to one message. A single icon is offered, so
/// a group has no siblings to dim when one is selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionGroup {
    marks: Vec<(Reaction, ReactionMark)>,
}

impl Default for ReactionGroup {
    fn default() -> Self {
        Self {
            marks: Reaction::ALL
                .iter()
                .map(|r| (*r, ReactionMark::Unset))
                .collect(),
        }
    }
}

impl ReactionGroup {
    /// Select `reaction`. Returns false if the group does not offer it.
    pub fn select(&mut self, reaction: Reaction) -> bool {
        let Some((_, mark)) = self.marks.iter_mut().find(|(r, _)| *r == reaction) else {
            return false;
        };
        *mark = ReactionMark::Selected;
        true
    }

    #[cfg(test)]
    pub fn mark(&self, reaction: Reaction) -> Option<ReactionMark> {
        self.marks
            .iter()
            .find(|(r, _)| *r == reaction)
            .map(|(_, mark)| *mark)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Reaction, ReactionMark)> + '_ {
        self.marks.iter().copied()
    }
}

/// Where the controller draws. Entries are numbered from 1 in the order
/// they were rendered; a placeholder takes its number when shown.
pub trait ChatSurface: Send {
    /// Draw a finalized message. Bot messages get a reaction group.
    fn render_message(&mut self, message: &Message);

    fn clear_input(&mut self);

    /// Draw the typing placeholder for `pending`
    fn show_pending(&mut self, pending: PendingId);

    /// Replace the placeholder with `message` and attach reactions
    fn resolve_pending(&mut self, pending: PendingId, message: &Message);

    /// Select a reaction on entry `target`. Returns the message text if the
    /// entry carries that reaction.
    fn apply_reaction(&mut self, target: usize, reaction: Reaction) -> Option<String>;

    /// Transient status line, never part of the transcript
    fn show_notice(&mut self, notice: &str);
}
