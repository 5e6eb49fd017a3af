//! Terminal rendering surface
//!
//! Keeps the numbered entries in memory and writes an append-only styled log.
//! A resolved placeholder is replaced in place and its final line printed
//! under the same number.

use super::{ChatSurface, Reaction, ReactionGroup, ReactionMark};
use crate::db::{Message, Sender};
use crate::state_machine::PendingId;
use crossterm::style::Stylize;
use std::borrow::Cow;
use std::fmt::Display;
use std::io::{self, Stdout, Write};

#[derive(Debug, Clone, PartialEq, Eq)]
enum EntryBody {
    Message(Message),
    Pending(PendingId),
}

#[derive(Debug, Clone)]
struct Entry {
    body: EntryBody,
    reactions: Option<ReactionGroup>,
}

impl Entry {
    fn finalized(message: &Message) -> Self {
        Self {
            reactions: message.accepts_reactions().then(ReactionGroup::default),
            body: EntryBody::Message(message.clone()),
        }
    }
}

pub struct TerminalSurface<W: Write + Send> {
    out: W,
    entries: Vec<Entry>,
}

impl TerminalSurface<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            entries: Vec::new(),
        }
    }

    fn emit(&mut self, line: impl Display) {
        if let Err(e) = writeln!(self.out, "{line}").and_then(|()| self.out.flush()) {
            tracing::debug!(error = %e, "Failed to write to terminal");
        }
    }

    fn draw_entry(&mut self, index: usize) {
        let Some(entry) = self.entries.get(index) else {
            return;
        };
        let number = format!("[{}]", index + 1).dark_grey();

        let line = match &entry.body {
            EntryBody::Pending(_) => format!("{number} {} {}", "bot ›".green(), "…".dim()),
            EntryBody::Message(message) => {
                let body = printable(message.text());
                let text = match message.sender() {
                    Sender::User => format!("{} {body}", "you ›".cyan()),
                    Sender::Bot => format!("{} {body}", "bot ›".green()),
                };
                match &entry.reactions {
                    Some(group) => format!("{number} {text}  {}", reaction_line(group)),
                    None => format!("{number} {text}"),
                }
            }
        };
        self.emit(line);
    }

    fn pending_index(&self, pending: PendingId) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.body == EntryBody::Pending(pending))
    }

    #[cfg(test)]
    fn output(&self) -> &W {
        &self.out
    }

    #[cfg(test)]
    fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

/// Text as it should appear on one line. Line breaks and tabs become spaces;
/// any other control character is shown escaped so it cannot drive the
/// terminal.
fn printable(text: &str) -> Cow<'_, str> {
    if !text.chars().any(char::is_control) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' | '\r' | '\t' => out.push(' '),
            c if c.is_control() => out.extend(c.escape_default()),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn reaction_line(group: &ReactionGroup) -> String {
    group
        .iter()
        .map(|(reaction, mark)| match mark {
            ReactionMark::Unset => reaction.icon().to_string(),
            ReactionMark::Selected => format!("[{}]", reaction.icon()).bold().to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl<W: Write + Send> ChatSurface for TerminalSurface<W> {
    fn render_message(&mut self, message: &Message) {
        self.entries.push(Entry::finalized(message));
        self.draw_entry(self.entries.len() - 1);
    }

    fn clear_input(&mut self) {
        // Line input is consumed on Enter; nothing stays in the field
        if let Err(e) = self.out.flush() {
            tracing::debug!(error = %e, "Failed to flush terminal");
        }
    }

    fn show_pending(&mut self, pending: PendingId) {
        self.entries.push(Entry {
            body: EntryBody::Pending(pending),
            reactions: None,
        });
        self.draw_entry(self.entries.len() - 1);
    }

    fn resolve_pending(&mut self, pending: PendingId, message: &Message) {
        let Some(index) = self.pending_index(pending) else {
            tracing::debug!(%pending, "Placeholder not found, rendering as new entry");
            self.render_message(message);
            return;
        };
        self.entries[index] = Entry::finalized(message);
        self.draw_entry(index);
    }

    fn apply_reaction(&mut self, target: usize, reaction: Reaction) -> Option<String> {
        let index = target.checked_sub(1)?;
        let entry = self.entries.get_mut(index)?;
        let EntryBody::Message(message) = &entry.body else {
            return None;
        };
        let text = message.text().to_string();
        if !entry.reactions.as_mut()?.select(reaction) {
            return None;
        }
        self.draw_entry(index);
        Some(text)
    }

    fn show_notice(&mut self, notice: &str) {
        let notice = printable(notice);
        self.emit(notice.as_ref().yellow());
    }
}
