use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::protocol::command::SettingsValues;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvesterConfig {
    /// Command line that launches the tracker backend, e.g. "harvester-backend"
    #[serde(default = "default_backend_command")]
    pub backend_command: String,
    /// How long to wait for a command reply before giving up on it.
    #[serde(default = "default_reply_timeout_secs")]
    pub reply_timeout_secs: u64,
    /// Initial values for the settings form. Write-only: saving sends them
    /// to the backend, which owns the persisted copy.
    #[serde(default)]
    pub defaults: SettingsValues,
}

fn default_backend_command() -> String {
    "harvester-backend".to_string()
}

fn default_reply_timeout_secs() -> u64 {
    10
}

impl Default for HarvesterConfig {
    fn default() -> Self {
        Self {
            backend_command: default_backend_command(),
            reply_timeout_secs: default_reply_timeout_secs(),
            defaults: SettingsValues::default(),
        }
    }
}

impl HarvesterConfig {
    pub fn config_path() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Cannot determine config directory")?
            .join("harvester-tui")
            .join("config.toml"))
    }

    /// Load config from disk. Returns default config if file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        Ok(config)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)?;
        std::fs::write(&path, raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_falls_back_to_defaults() {
        let config: HarvesterConfig = toml::from_str("").unwrap();
        assert_eq!(config.backend_command, "harvester-backend");
        assert_eq!(config.reply_timeout_secs, 10);
        assert_eq!(config.defaults.jira.url, "");
    }

    #[test]
    fn partial_file_keeps_unset_defaults() {
        let config: HarvesterConfig = toml::from_str(
            r#"
            backend_command = "./tracker --stdio"

            [defaults.jira]
            url = "https://jira.example.com"
            "#,
        )
        .unwrap();
        assert_eq!(config.backend_command, "./tracker --stdio");
        assert_eq!(config.reply_timeout_secs, 10);
        assert_eq!(config.defaults.jira.url, "https://jira.example.com");
        assert_eq!(config.defaults.harvest.user, "");
    }
}
