//! Workbench configuration storage
//!
//! Handles loading and saving of model connection and pacing settings, plus
//! the presentation preferences the core needs passed in explicitly.

use std::path::Path;
use std::time::Duration;

use inference::ModelConfig;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::constants::{defaults, CONFIG_FILE};

/// Full workbench configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorkbenchConfig {
    /// Model connection settings
    pub model: ModelConfig,
    /// Pause after planning so pending highlights stay visible
    pub plan_pause_ms: u64,
    /// Temperature for surgical edits
    pub edit_temperature: f32,
    /// Temperature for variation generation
    pub variation_temperature: f32,
    /// Placeholder rotation period for hosts that drive the deck
    pub placeholder_interval_ms: u64,
    /// Number of fetched suggestions kept
    pub suggestion_sample: usize,
}

impl Default for WorkbenchConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            plan_pause_ms: defaults::PLAN_PAUSE_MS,
            edit_temperature: defaults::EDIT_TEMPERATURE,
            variation_temperature: defaults::VARIATION_TEMPERATURE,
            placeholder_interval_ms: defaults::PLACEHOLDER_INTERVAL_MS,
            suggestion_sample: defaults::SUGGESTION_SAMPLE,
        }
    }
}

impl WorkbenchConfig {
    /// Load configuration from `config.json` in `data_dir`
    ///
    /// A missing file yields the defaults.
    pub async fn load(data_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = data_dir.join(CONFIG_FILE);

        if !fs::try_exists(&config_path).await.map_err(ConfigError::Io)? {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_path)
            .await
            .map_err(ConfigError::Io)?;

        serde_json::from_str(&contents).map_err(ConfigError::Parse)
    }

    /// Save configuration to `config.json` in `data_dir`
    pub async fn save(&self, data_dir: &Path) -> Result<(), ConfigError> {
        fs::create_dir_all(data_dir).await.map_err(ConfigError::Io)?;

        let config_path = data_dir.join(CONFIG_FILE);
        let contents = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;

        fs::write(&config_path, contents)
            .await
            .map_err(ConfigError::Io)?;

        log::info!("Configuration saved to {:?}", config_path);
        Ok(())
    }

    pub fn plan_pause(&self) -> Duration {
        Duration::from_millis(self.plan_pause_ms)
    }

    pub fn placeholder_interval(&self) -> Duration {
        Duration::from_millis(self.placeholder_interval_ms)
    }
}

/// Presentation preferences consulted by core operations
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewPreferences {
    /// The instruction bar is visible while editing; gates input refocus
    pub show_ai_bar: bool,
    /// The live preview pane is visible
    pub show_preview: bool,
}

impl Default for ViewPreferences {
    fn default() -> Self {
        Self {
            show_ai_bar: true,
            show_preview: true,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(serde_json::Error),
    #[error("Failed to serialize config: {0}")]
    Serialize(serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = WorkbenchConfig::load(dir.path()).await.unwrap();
        assert_eq!(config, WorkbenchConfig::default());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let config = WorkbenchConfig {
            plan_pause_ms: 0,
            suggestion_sample: 4,
            ..Default::default()
        };
        config.save(&dir.path().join("nested")).await.unwrap();

        let loaded = WorkbenchConfig::load(&dir.path().join("nested")).await.unwrap();
        assert_eq!(loaded.plan_pause_ms, 0);
        assert_eq!(loaded.suggestion_sample, 4);
    }

    #[tokio::test]
    async fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join(CONFIG_FILE), "{not json").await.unwrap();
        assert!(matches!(
            WorkbenchConfig::load(dir.path()).await,
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: WorkbenchConfig = serde_json::from_str(r#"{"edit_temperature":0.5}"#).unwrap();
        assert_eq!(config.edit_temperature, 0.5);
        assert_eq!(config.plan_pause_ms, defaults::PLAN_PAUSE_MS);
    }
}
