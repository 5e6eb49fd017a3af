//! Runtime configuration from the environment

use std::path::PathBuf;

/// Chat endpoint used when `CHAT_WIDGET_ENDPOINT` is unset
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/chat";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub endpoint: String,
    pub db_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let endpoint = lookup("CHAT_WIDGET_ENDPOINT")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let db_path = lookup("CHAT_WIDGET_DB_PATH")
            .filter(|v| !v.trim().is_empty())
            .map_or_else(
                || {
                    let home = lookup("HOME").unwrap_or_else(|| "/tmp".to_string());
                    PathBuf::from(home).join(".chat-widget").join("chat.db")
                },
                PathBuf::from,
            );

        Self { endpoint, db_path }
    }
}
