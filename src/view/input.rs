//! Input line parsing
//!
//! Each submitted line is either chat text or one of the slash commands.
//! Anything that does not name a known command is sent as text; a leading
//! `//` sends a line that starts with a literal slash.

use super::Reaction;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;

pub const HELP: &str = "Commands: /attach <path>, /react <n>, /quit (start with // to send a leading /)";

/// Something the user did at the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    /// Send the line as a chat message (may be blank)
    Submit(String),
    /// Announce a file by name; its bytes are never read
    SelectFile(String),
    React { target: usize, reaction: Reaction },
    /// Unrecognized or malformed command, with a hint for the user
    Invalid(String),
}

/// Result of parsing one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputLine {
    Action(UserAction),
    Quit,
}

pub fn parse_line(line: &str) -> InputLine {
    let trimmed = line.trim();
    if let Some(escaped) = trimmed.strip_prefix("//") {
        return InputLine::Action(UserAction::Submit(format!("/{escaped}")));
    }
    let Some(command) = trimmed.strip_prefix('/') else {
        return InputLine::Action(UserAction::Submit(line.to_string()));
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    let action = match name {
        "quit" | "exit" => return InputLine::Quit,
        "attach" => match file_name(arg) {
            Some(name) => UserAction::SelectFile(name),
            None => UserAction::Invalid(format!("Usage: /attach <path>. {HELP}")),
        },
        "react" => match arg.parse::<usize>() {
            Ok(target) if target > 0 => UserAction::React {
                target,
                reaction: Reaction::ThumbsUp,
            },
            _ => UserAction::Invalid(format!("Usage: /react <message number>. {HELP}")),
        },
        // Not a command, e.g. a path like /etc/hosts
        _ => UserAction::Submit(line.to_string()),
    };
    InputLine::Action(action)
}

/// Final path component, which is all the attachment affordance uses
fn file_name(arg: &str) -> Option<String> {
    if arg.is_empty() {
        return None;
    }
    Path::new(arg)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
}

/// Forward parsed lines from `reader` until EOF or `/quit`
pub async fn read_actions<R>(reader: R, tx: mpsc::Sender<UserAction>)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read input");
                break;
            }
        };

        match parse_line(&line) {
            InputLine::Quit => break,
            InputLine::Action(action) => {
                if tx.send(action).await.is_err() {
                    break;
                }
            }
        }
    }
    tracing::debug!("Input closed");
}
