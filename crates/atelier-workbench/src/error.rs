//! Error types for the workbench

use inference::{BackendError, GatewayError};
use thiserror::Error;

use crate::config::ConfigError;

/// Result type alias using WorkbenchError
pub type Result<T> = std::result::Result<T, WorkbenchError>;

/// Errors that can occur in the workbench
#[derive(Debug, Error)]
pub enum WorkbenchError {
    /// Gateway refused or failed the call (includes missing credentials)
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// A streamed fragment failed
    #[error("Stream error: {0}")]
    Stream(#[from] BackendError),

    /// Another generation or modification is still in flight
    #[error("A request is already in progress")]
    Busy,

    /// The submitted prompt or instruction was blank
    #[error("Prompt is empty")]
    EmptyPrompt,

    /// No session is selected
    #[error("No current session")]
    NoSession,

    /// The operation needs a focused artifact
    #[error("No artifact is focused")]
    NoFocusedArtifact,

    /// Lookup by identifier failed
    #[error("Unknown artifact '{artifact_id}' in session '{session_id}'")]
    UnknownArtifact {
        session_id: String,
        artifact_id: String,
    },

    /// Artifact index outside the current session
    #[error("Artifact index {0} is out of range")]
    ArtifactIndex(usize),

    /// Variation index outside the results panel
    #[error("Variation index {0} is out of range")]
    UnknownVariation(usize),

    /// The variations were generated for an artifact that is no longer focused
    #[error("Variations belong to artifact '{panel}', but '{focused}' is focused")]
    VariationTargetChanged { panel: String, focused: String },

    /// Configuration could not be loaded or saved
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl WorkbenchError {
    pub fn unknown_artifact(session_id: &str, artifact_id: &str) -> Self {
        Self::UnknownArtifact {
            session_id: session_id.to_string(),
            artifact_id: artifact_id.to_string(),
        }
    }

    /// Whether the failure was a missing API key
    pub fn is_missing_credential(&self) -> bool {
        matches!(
            self,
            Self::Gateway(GatewayError::MissingCredential)
                | Self::Gateway(GatewayError::Backend(BackendError::MissingCredential))
                | Self::Stream(BackendError::MissingCredential)
        )
    }
}
