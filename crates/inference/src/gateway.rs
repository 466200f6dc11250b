//! Model Gateway - Single entry point for all generation calls
//!
//! The gateway abstracts over the generative backends, providing a unified
//! interface for the rest of the application. It owns the active backend,
//! supports switching it at runtime, and refuses to contact a backend that
//! has no credential.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::backend::{
    BackendCapabilities, BackendError, BackendInfo, BackendRegistry, GenerationRequest,
    GenerativeBackend, TextStream,
};
use crate::config::ModelConfig;

/// Error types for gateway operations
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("API key is not configured")]
    MissingCredential,

    #[error("Backend switch failed: {0}")]
    SwitchFailed(String),
}

/// The single entry point for ALL generation calls.
///
/// Application code should only interact with ModelGateway, never with
/// backends directly.
pub struct ModelGateway {
    /// The currently active backend
    backend: Arc<RwLock<Box<dyn GenerativeBackend>>>,
    /// Registry of available backends
    registry: BackendRegistry,
    /// Name of the current backend
    current_backend_name: Arc<RwLock<String>>,
}

impl ModelGateway {
    /// Create a gateway with the backend named in the configuration
    pub fn from_config(config: &ModelConfig) -> Result<Self, GatewayError> {
        let registry = BackendRegistry::new();
        let backend = registry.create(config)?;
        Ok(Self {
            backend: Arc::new(RwLock::new(backend)),
            registry,
            current_backend_name: Arc::new(RwLock::new(config.backend.clone())),
        })
    }

    /// Create a new gateway with a specific backend
    pub fn with_backend(backend: Box<dyn GenerativeBackend>, name: &str) -> Self {
        Self {
            backend: Arc::new(RwLock::new(backend)),
            registry: BackendRegistry::new(),
            current_backend_name: Arc::new(RwLock::new(name.to_string())),
        }
    }

    /// Get the registry for backend information
    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    /// List all available backends with their info
    pub fn available_backends(&self) -> Vec<BackendInfo> {
        self.registry.list()
    }

    /// Get the name of the currently active backend
    pub async fn current_backend_name(&self) -> String {
        self.current_backend_name.read().await.clone()
    }

    /// Replace the active backend with the one named in `config`
    pub async fn switch_backend(&self, config: &ModelConfig) -> Result<(), GatewayError> {
        // Create new backend first to validate the name
        let new_backend = self
            .registry
            .create(config)
            .map_err(|e| GatewayError::SwitchFailed(e.to_string()))?;

        {
            let mut guard = self.backend.write().await;
            *guard = new_backend;
        }

        {
            let mut name_guard = self.current_backend_name.write().await;
            *name_guard = config.backend.clone();
        }

        log::info!("Switched to backend: {}", config.backend);
        Ok(())
    }

    /// Get capabilities of the current backend
    pub async fn capabilities(&self) -> BackendCapabilities {
        let guard = self.backend.read().await;
        guard.capabilities()
    }

    /// Whether the current backend has a credential
    pub async fn has_credentials(&self) -> bool {
        let guard = self.backend.read().await;
        guard.has_credentials()
    }

    /// Fail with `MissingCredential` unless a call could be attempted
    pub async fn ensure_credentials(&self) -> Result<(), GatewayError> {
        if self.has_credentials().await {
            Ok(())
        } else {
            Err(GatewayError::MissingCredential)
        }
    }

    // ─── GENERATION METHODS ─────────────────────────────────────────

    /// Generate a single complete text result
    pub async fn generate(&self, request: GenerationRequest) -> Result<String, GatewayError> {
        let guard = self.backend.read().await;
        if !guard.has_credentials() {
            return Err(GatewayError::MissingCredential);
        }
        log::debug!(
            "generate via {} ({} prompt chars, params {:?})",
            guard.name(),
            request.prompt.len(),
            request.params
        );
        guard.generate(request).await.map_err(GatewayError::Backend)
    }

    /// Generate text as a stream of fragments
    pub async fn generate_stream(&self, request: GenerationRequest) -> Result<TextStream, GatewayError> {
        let guard = self.backend.read().await;
        if !guard.has_credentials() {
            return Err(GatewayError::MissingCredential);
        }
        log::debug!(
            "generate_stream via {} ({} prompt chars, params {:?})",
            guard.name(),
            request.prompt.len(),
            request.params
        );
        guard
            .generate_stream(request)
            .await
            .map_err(GatewayError::Backend)
    }
}

/// Shared gateway type for application state
pub type SharedGateway = Arc<ModelGateway>;
