//! Atelier Workbench - prompt-to-UI generation core
//!
//! A user prompt produces a session of alternative HTML/CSS components. Any
//! component can then be edited conversationally or explored through
//! variations. This crate holds everything below the view layer:
//!
//! - `JsonObjectScanner` / `json_objects`: incremental extraction of JSON
//!   objects from a stream of text fragments
//! - `changed_lines`: the line-diff heuristic behind editor highlights
//! - `Workbench`: session store, plan/apply modification, variation pipeline
//!   and placeholder suggestions, all reporting through an `EventSink`
//!
//! # Example
//!
//! ```ignore
//! use atelier_workbench::{ViewPreferences, Workbench, WorkbenchConfig};
//!
//! let bench = Workbench::from_config(WorkbenchConfig::default())?;
//! let prefs = ViewPreferences::default();
//!
//! bench.submit("A pricing card with a toggle", &prefs).await?;
//! bench.focus_artifact(0)?;
//! bench.submit("make the background red", &prefs).await?;
//! ```

pub mod config;
pub mod constants;
pub mod diff;
pub mod error;
pub mod events;
pub mod generation;
pub mod json_stream;
pub mod markup;
pub mod modify;
pub mod placeholders;
pub mod prompts;
pub mod store;
pub mod types;
pub mod variations;
pub mod workbench;

// Re-export key types
pub use config::{ConfigError, ViewPreferences, WorkbenchConfig};
pub use diff::changed_lines;
pub use error::{Result, WorkbenchError};
pub use events::{ChannelEventSink, EventError, EventSink, NullEventSink, VecEventSink, WorkbenchEvent};
pub use json_stream::{json_objects, JsonObjectScanner};
pub use modify::ModifyOutcome;
pub use placeholders::PlaceholderDeck;
pub use store::SessionStore;
pub use types::{
    Artifact, ArtifactId, ArtifactStatus, Highlights, Phase, Session, SessionId, Variation,
    VariationPanel,
};
pub use workbench::{SubmitOutcome, Workbench};
