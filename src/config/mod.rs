//! Configuration and settings management.
//!
//! Settings live in the user's config directory as JSON. A missing or
//! unreadable file falls back to defaults rather than failing startup.

mod settings;

pub use settings::{AiSettings, MailboxSettings, Settings};

use anyhow::Context;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

impl Settings {
    /// Returns the platform-specific settings file path.
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "breve", "breve")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Loads settings from a specific file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("parsing settings from {}", path.display()))
    }

    /// Loads settings from the default location, falling back to defaults.
    pub fn load_or_default() -> Self {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load(&path).unwrap_or_else(|err| {
                tracing::warn!(error = %err, "failed to load settings, using defaults");
                Self::default()
            }),
            _ => Self::default(),
        }
    }

    /// Persists settings to a specific file, creating parent directories.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating settings directory {}", parent.display()))?;
        }
        let contents = serde_json::to_string_pretty(self).context("serializing settings")?;
        fs::write(path, contents)
            .with_context(|| format!("writing settings to {}", path.display()))
    }
}
