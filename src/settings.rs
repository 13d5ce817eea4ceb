use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Application color theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

/// User-facing settings persisted to config.json
///
/// Every field carries a serde default so a partially-written file still
/// loads; a file that is missing or fails to parse at all is replaced by
/// `Settings::default()` without surfacing an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_theme")]
    pub theme: Theme,

    #[serde(default = "default_auto_load")]
    pub auto_load_last_session: bool,

    /// Upper bound on commits included in a status snapshot
    #[serde(default = "default_max_log_entries")]
    pub max_log_entries: usize,

    #[serde(default = "default_font_size")]
    pub font_size: u32,
}

fn default_theme() -> Theme {
    Theme::Dark
}

fn default_auto_load() -> bool {
    true
}

fn default_max_log_entries() -> usize {
    100
}

fn default_font_size() -> u32 {
    12
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            theme: default_theme(),
            auto_load_last_session: default_auto_load(),
            max_log_entries: default_max_log_entries(),
            font_size: default_font_size(),
        }
    }
}

impl Settings {
    /// Load settings from the given file.
    ///
    /// Missing or malformed files yield the documented defaults. This never
    /// fails: a settings file should not be able to break startup.
    pub fn load(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => return Self::default(),
        };

        match serde_json::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                log::debug!(
                    "Malformed settings file {}, using defaults: {e}",
                    path.display()
                );
                Self::default()
            }
        }
    }

    /// Save settings to the given file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write settings file: {}", path.display()))?;

        Ok(())
    }
}
