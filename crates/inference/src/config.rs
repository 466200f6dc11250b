//! Configuration types for the inference library

use serde::{Deserialize, Serialize};

use crate::constants::{defaults, env};

/// Model connection configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
    /// Registry name of the backend (e.g., "gemini")
    pub backend: String,
    /// Model identifier (e.g., "gemini-3-flash-preview")
    pub model: String,
    /// API key; `None` means calls are rejected before they are attempted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Override for the API base URL
    pub base_url: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            backend: defaults::BACKEND.to_string(),
            model: defaults::MODEL.to_string(),
            api_key: None,
            base_url: defaults::GEMINI_BASE_URL.to_string(),
        }
    }
}

impl ModelConfig {
    /// Default configuration with the credential taken from the environment
    ///
    /// `API_KEY` wins over `GEMINI_API_KEY`. Empty values count as unset.
    pub fn from_env() -> Self {
        Self {
            api_key: Self::env_api_key(),
            ..Self::default()
        }
    }

    /// Fill in a missing credential from the environment
    pub fn with_env_fallback(mut self) -> Self {
        if !self.has_api_key() {
            self.api_key = Self::env_api_key();
        }
        self
    }

    /// Whether a non-empty API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    fn env_api_key() -> Option<String> {
        [env::API_KEY, env::GEMINI_API_KEY]
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|value| !value.trim().is_empty())
    }
}
