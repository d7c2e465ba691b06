//! Application settings types.
//!
//! Settings are persisted to `~/.config/breve/settings.json` (or the
//! platform equivalent) and loaded at startup.

use serde::{Deserialize, Serialize};

/// Top-level application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Mailbox fetch configuration.
    pub mailbox: MailboxSettings,
    /// AI summarization configuration.
    pub ai: AiSettings,
}

/// Mailbox fetch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailboxSettings {
    /// Cap on results per fetch page.
    pub page_size: u32,
}

impl Default for MailboxSettings {
    fn default() -> Self {
        Self { page_size: 100 }
    }
}

/// AI summarization configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiSettings {
    /// Text-generation server URL.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// Sampling temperature; backend default when unset.
    pub temperature: Option<f32>,
    /// Generation token cap; backend default when unset.
    pub max_tokens: Option<usize>,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3.2".to_string(),
            temperature: None,
            max_tokens: None,
        }
    }
}
