use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Last-session record persisted to session.json
///
/// Overwritten after every successful state-changing operation so the next
/// launch can pick up where the previous one stopped. Like the settings
/// file, a missing or malformed session file never fails a load; the session
/// simply starts empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Working-tree path of the last opened repository
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_repo: Option<PathBuf>,

    /// Branch that was checked out when the session was last saved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_branch: Option<String>,
}

impl SessionState {
    /// Load session state from the given file, tolerating absence and damage
    pub fn load(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => return Self::default(),
        };

        match serde_json::from_str(&content) {
            Ok(state) => state,
            Err(e) => {
                log::debug!(
                    "Malformed session file {}, starting empty: {e}",
                    path.display()
                );
                Self::default()
            }
        }
    }

    /// Save session state to the given file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize session state")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write session file: {}", path.display()))?;

        Ok(())
    }
}
