//! Library-wide constants
//!
//! Single source of truth for endpoints, model names and environment keys.

/// Default values for model configuration
pub mod defaults {
    /// Backend used when none is configured
    pub const BACKEND: &str = "gemini";
    /// Model identifier passed to the backend
    pub const MODEL: &str = "gemini-3-flash-preview";
    /// Base URL of the Gemini REST API
    pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
}

/// Environment variables consulted for credentials
pub mod env {
    /// Primary credential variable
    pub const API_KEY: &str = "API_KEY";
    /// Fallback credential variable
    pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
}

/// Backend names as registered in the registry
pub mod backends {
    pub const GEMINI: &str = "gemini";
    pub const SCRIPTED: &str = "scripted";
}
