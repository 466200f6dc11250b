//! Generative model client library
//!
//! This library provides a unified interface for the text generation calls the
//! Atelier workbench makes:
//! - **Plain generation**: a single text result (style names, plans, suggestions)
//! - **Streaming generation**: an async sequence of text fragments (markup,
//!   back-to-back JSON objects)
//!
//! Backends are pluggable behind [`GenerativeBackend`]; application code talks
//! to the [`ModelGateway`] only.
//!
//! # Example
//!
//! ```rust,ignore
//! use inference::{GenerationRequest, ModelConfig, ModelGateway};
//!
//! let gateway = ModelGateway::from_config(&ModelConfig::from_env())?;
//! let mut stream = gateway
//!     .generate_stream(GenerationRequest::new("A pricing card"))
//!     .await?;
//! ```

pub mod backend;
pub mod config;
pub mod constants;
pub mod gateway;
pub mod sse;
pub mod types;

// Re-exports for convenience
pub use backend::{
    BackendCapabilities, BackendError, BackendFactory, BackendInfo, BackendRegistry,
    GenerationParams, GenerationRequest, GenerativeBackend, TextStream,
};

#[cfg(feature = "backend-gemini")]
pub use backend::GeminiBackend;

#[cfg(feature = "scripted")]
pub use backend::{ScriptedBackend, ScriptedReply};

pub use config::ModelConfig;
pub use gateway::{GatewayError, ModelGateway, SharedGateway};
