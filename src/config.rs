use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Cross-platform configuration directory manager
pub struct ConfigManager;

impl ConfigManager {
    /// Get the main configuration directory path following platform conventions:
    /// - Linux: $XDG_CONFIG_HOME/git-assistant or ~/.config/git-assistant
    /// - macOS: ~/Library/Application Support/git-assistant
    /// - Windows: %APPDATA%\git-assistant
    pub fn config_dir() -> Result<PathBuf> {
        #[cfg(target_os = "linux")]
        {
            // Follow XDG Base Directory Specification
            if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
                Ok(PathBuf::from(xdg_config).join("git-assistant"))
            } else {
                let home = dirs::home_dir().context("Failed to get home directory")?;
                Ok(home.join(".config").join("git-assistant"))
            }
        }

        #[cfg(target_os = "macos")]
        {
            let home = dirs::home_dir().context("Failed to get home directory")?;
            Ok(home
                .join("Library")
                .join("Application Support")
                .join("git-assistant"))
        }

        #[cfg(target_os = "windows")]
        {
            Ok(dirs::config_dir()
                .context("Failed to get Windows config directory")?
                .join("git-assistant"))
        }

        #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
        {
            // Fallback for other platforms
            let home = dirs::home_dir().context("Failed to get home directory")?;
            Ok(home.join(".git-assistant"))
        }
    }

    /// Get the settings file path (config.json)
    pub fn settings_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Get the session file path (session.json)
    pub fn session_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("session.json"))
    }

    /// Get the log file path
    pub fn log_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("git-assistant.log"))
    }

    /// Ensure the configuration directory exists
    pub fn ensure_config_dir() -> Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir).with_context(|| {
            format!("Failed to create config directory: {}", config_dir.display())
        })?;
        Ok(config_dir)
    }
}

/// Locations of the two persisted session files.
///
/// A session is constructed from an explicit `SessionPaths` value, so tests
/// point it at a temp directory instead of the user's real configuration.
#[derive(Debug, Clone)]
pub struct SessionPaths {
    pub settings_file: PathBuf,
    pub session_file: PathBuf,
}

impl SessionPaths {
    /// The per-user default locations under the platform config directory
    pub fn default_locations() -> Result<Self> {
        Ok(SessionPaths {
            settings_file: ConfigManager::settings_file_path()?,
            session_file: ConfigManager::session_file_path()?,
        })
    }

    /// Both files under an arbitrary directory
    pub fn under(dir: &Path) -> Self {
        SessionPaths {
            settings_file: dir.join("config.json"),
            session_file: dir.join("session.json"),
        }
    }
}
