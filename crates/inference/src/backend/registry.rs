//! Backend registry for runtime backend discovery and instantiation
//!
//! The registry maps backend names to factories. Backends are registered at
//! compile time via feature flags; hosts may register additional factories.

use std::collections::HashMap;

use super::{BackendError, BackendInfo, GenerativeBackend};
use crate::config::ModelConfig;

#[cfg(feature = "backend-gemini")]
use super::GeminiBackend;

#[cfg(feature = "scripted")]
use super::ScriptedBackend;

/// Factory trait for creating backend instances
pub trait BackendFactory: Send + Sync {
    /// Create a new backend instance from the model configuration
    fn create(&self, config: &ModelConfig) -> Result<Box<dyn GenerativeBackend>, BackendError>;

    /// Get information about this backend
    fn info(&self) -> BackendInfo;
}

/// Factory for the Gemini backend
#[cfg(feature = "backend-gemini")]
pub struct GeminiFactory;

#[cfg(feature = "backend-gemini")]
impl BackendFactory for GeminiFactory {
    fn create(&self, config: &ModelConfig) -> Result<Box<dyn GenerativeBackend>, BackendError> {
        if config.model.trim().is_empty() {
            return Err(BackendError::Config("Model name is empty".to_string()));
        }
        Ok(Box::new(GeminiBackend::new(config)))
    }

    fn info(&self) -> BackendInfo {
        BackendInfo {
            name: "gemini".to_string(),
            description: "Google Gemini REST API".to_string(),
            capabilities: GeminiBackend::static_capabilities(),
        }
    }
}

/// Factory for an empty scripted backend
#[cfg(feature = "scripted")]
pub struct ScriptedFactory;

#[cfg(feature = "scripted")]
impl BackendFactory for ScriptedFactory {
    fn create(&self, _config: &ModelConfig) -> Result<Box<dyn GenerativeBackend>, BackendError> {
        Ok(Box::new(ScriptedBackend::new()))
    }

    fn info(&self) -> BackendInfo {
        let backend = ScriptedBackend::new();
        BackendInfo {
            name: "scripted".to_string(),
            description: "Offline replay of canned responses".to_string(),
            capabilities: backend.capabilities(),
        }
    }
}

/// Registry of available generative backends
pub struct BackendRegistry {
    factories: HashMap<String, Box<dyn BackendFactory>>,
}

impl BackendRegistry {
    /// Create a new registry with all compiled-in backends registered
    pub fn new() -> Self {
        #[allow(unused_mut)]
        let mut registry = Self {
            factories: HashMap::new(),
        };

        #[cfg(feature = "backend-gemini")]
        registry.register(crate::constants::backends::GEMINI, Box::new(GeminiFactory));

        #[cfg(feature = "scripted")]
        registry.register(crate::constants::backends::SCRIPTED, Box::new(ScriptedFactory));

        registry
    }

    /// Register a backend factory
    pub fn register(&mut self, name: &str, factory: Box<dyn BackendFactory>) {
        self.factories.insert(name.to_string(), factory);
    }

    /// List all available backend names
    pub fn available_names(&self) -> Vec<&str> {
        self.factories.keys().map(|s| s.as_str()).collect()
    }

    /// Get information about all registered backends
    pub fn list(&self) -> Vec<BackendInfo> {
        self.factories.values().map(|f| f.info()).collect()
    }

    /// Create the backend named in `config.backend`
    pub fn create(&self, config: &ModelConfig) -> Result<Box<dyn GenerativeBackend>, BackendError> {
        self.factories
            .get(&config.backend)
            .ok_or_else(|| BackendError::Config(format!("Unknown backend: {}", config.backend)))?
            .create(config)
    }

    /// Check if a backend is available
    pub fn is_available(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_backend_is_config_error() {
        let registry = BackendRegistry::new();
        let config = ModelConfig {
            backend: "nope".to_string(),
            ..Default::default()
        };
        assert!(matches!(registry.create(&config), Err(BackendError::Config(_))));
    }

    #[cfg(feature = "backend-gemini")]
    #[test]
    fn test_registry_has_gemini() {
        let registry = BackendRegistry::new();
        assert!(registry.is_available("gemini"));
        let backend = registry.create(&ModelConfig::default()).unwrap();
        assert_eq!(backend.name(), "Gemini");
    }
}
