//! Pluggable generative backend abstraction
//!
//! This module provides a trait-based abstraction over the services that
//! generate text for the workbench. All backends implement the same interface,
//! so the gateway and everything above it are backend-agnostic.

pub mod registry;

#[cfg(feature = "backend-gemini")]
pub mod gemini;

#[cfg(feature = "scripted")]
pub mod scripted;

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;
use serde::{Deserialize, Serialize};

#[cfg(feature = "backend-gemini")]
pub use gemini::GeminiBackend;

#[cfg(feature = "scripted")]
pub use scripted::{ScriptedBackend, ScriptedReply};

pub use registry::{BackendFactory, BackendRegistry};

/// Error types for backend operations
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("API key is not configured")]
    MissingCredential,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// A lazy, finite, non-restartable sequence of generated text fragments
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, BackendError>> + Send>>;

/// Optional sampling hints forwarded to the model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Structured-output hint (e.g., "application/json")
    pub response_mime_type: Option<String>,
}

impl GenerationParams {
    /// Parameters with only a temperature set
    pub fn temperature(value: f32) -> Self {
        Self {
            temperature: Some(value),
            ..Default::default()
        }
    }

    /// Parameters asking for a JSON response body
    pub fn json() -> Self {
        Self {
            response_mime_type: Some("application/json".to_string()),
            ..Default::default()
        }
    }
}

/// A prompt plus its generation parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub params: GenerationParams,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            params: GenerationParams::default(),
        }
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }
}

/// Capabilities that a backend may or may not support
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BackendCapabilities {
    /// Supports streaming text output
    pub streaming: bool,
    /// Honours the structured-output (JSON) hint
    pub structured_output: bool,
    /// Reaches a remote service over the network
    pub remote: bool,
}

/// Backend information for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendInfo {
    /// Backend identifier (e.g., "gemini")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Backend capabilities
    pub capabilities: BackendCapabilities,
}

/// The core trait that all generative backends implement.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    // ─── IDENTITY ───────────────────────────────────────────────────

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Description of this backend
    fn description(&self) -> &'static str;

    /// What this backend supports
    fn capabilities(&self) -> BackendCapabilities;

    /// Whether a credential is available; calls are not attempted without one
    fn has_credentials(&self) -> bool;

    // ─── GENERATION ─────────────────────────────────────────────────

    /// Generate a single complete text result
    async fn generate(&self, request: GenerationRequest) -> Result<String, BackendError>;

    /// Generate text as a stream of fragments
    ///
    /// Fragments may split tokens, lines or characters at arbitrary points;
    /// their concatenation is the full response.
    async fn generate_stream(&self, request: GenerationRequest) -> Result<TextStream, BackendError>;
}
