//! Workbench-wide constants
//!
//! Single source of truth for counts, labels, pacing and sampling defaults.

/// Shape of a generation session
pub mod session {
    /// Artifacts generated per prompt
    pub const ARTIFACTS_PER_SESSION: usize = 3;
    /// Label shown while style directions are being chosen
    pub const PENDING_LABEL: &str = "Designing...";
    /// Used when the model does not return enough style directions
    pub const FALLBACK_DIRECTIONS: [&str; ARTIFACTS_PER_SESSION] =
        ["Direction 1", "Direction 2", "Direction 3"];
}

/// Default values for workbench configuration
pub mod defaults {
    /// Pause between the planning and execution phases (milliseconds)
    pub const PLAN_PAUSE_MS: u64 = 800;
    /// Sampling temperature for surgical edits
    pub const EDIT_TEMPERATURE: f32 = 0.2;
    /// Sampling temperature for radical variations
    pub const VARIATION_TEMPERATURE: f32 = 1.2;
    /// Placeholder rotation period (milliseconds)
    pub const PLACEHOLDER_INTERVAL_MS: u64 = 3000;
    /// Fetched suggestions kept after shuffling
    pub const SUGGESTION_SAMPLE: usize = 10;
    /// Suggestions requested from the model
    pub const SUGGESTION_REQUEST: usize = 20;
}

/// Status labels for the presentation layer
pub mod labels {
    pub const PLANNING: &str = "Analyzing code structure...";
    pub const EXECUTING: &str = "Applying surgical changes...";
}

/// Prompt suggestions shown before any are fetched
pub const INITIAL_PLACEHOLDERS: &[&str] = &[
    "Design a glassmorphism music player card",
    "A pricing table with three tiers and a toggle",
    "Brutalist login form with oversized type",
    "Weather widget with animated gradient sky",
    "Kanban column with draggable task cards",
    "Retro terminal-style newsletter signup",
];

/// File name of the persisted workbench configuration
pub const CONFIG_FILE: &str = "config.json";
