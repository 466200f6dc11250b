//! Core data types: sessions, artifacts, variations and highlight state

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::session::PENDING_LABEL;

/// Opaque session identifier
pub type SessionId = String;

/// Opaque artifact identifier
pub type ArtifactId = String;

/// Lifecycle of a generated artifact
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactStatus {
    Streaming,
    Complete,
    Error,
}

/// One generated UI candidate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub id: ArtifactId,
    /// Style direction the artifact was generated under
    pub label: String,
    /// HTML document
    pub body: String,
    pub status: ArtifactStatus,
}

impl Artifact {
    /// An empty artifact waiting for its first fragment
    pub fn placeholder(id: impl Into<ArtifactId>) -> Self {
        Self {
            id: id.into(),
            label: PENDING_LABEL.to_string(),
            body: String::new(),
            status: ArtifactStatus::Streaming,
        }
    }
}

/// One user prompt and the artifacts it produced
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: SessionId,
    pub prompt: String,
    pub created_at: DateTime<Utc>,
    /// In generation order
    pub artifacts: Vec<Artifact>,
}

impl Session {
    /// New session with `count` placeholder artifacts (`{session}_{i}`)
    pub fn new(prompt: impl Into<String>, count: usize) -> Self {
        let id = uuid::Uuid::new_v4().simple().to_string();
        let artifacts = (0..count)
            .map(|i| Artifact::placeholder(format!("{}_{}", id, i)))
            .collect();
        Self {
            id,
            prompt: prompt.into(),
            created_at: Utc::now(),
            artifacts,
        }
    }

    pub fn artifact(&self, artifact_id: &str) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.id == artifact_id)
    }

    pub fn artifact_mut(&mut self, artifact_id: &str) -> Option<&mut Artifact> {
        self.artifacts.iter_mut().find(|a| a.id == artifact_id)
    }
}

/// A named alternative body for the focused artifact
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Variation {
    pub name: String,
    pub html: String,
}

impl Variation {
    /// Build from a streamed object; `None` unless both fields are non-empty strings
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        let name = value.get("name")?.as_str()?;
        let html = value.get("html")?.as_str()?;
        if name.is_empty() || html.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            html: html.to_string(),
        })
    }
}

/// Phase of the request currently in flight
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Planning,
    Executing,
}

/// Editor gutter highlights, 1-based line numbers
///
/// `pending` holds the lines the plan targets; `committed` holds the lines
/// that actually changed. Committing clears pending.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Highlights {
    pub pending: BTreeSet<usize>,
    pub committed: BTreeSet<usize>,
}

impl Highlights {
    pub fn clear(&mut self) {
        self.pending.clear();
        self.committed.clear();
    }

    pub fn set_pending(&mut self, lines: impl IntoIterator<Item = usize>) {
        self.pending = lines.into_iter().collect();
    }

    pub fn commit(&mut self, lines: impl IntoIterator<Item = usize>) {
        self.pending.clear();
        self.committed = lines.into_iter().collect();
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.committed.is_empty()
    }
}

/// Transient results panel for variations
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VariationPanel {
    pub open: bool,
    /// Artifact the variations were requested for
    pub artifact_id: Option<ArtifactId>,
    /// In arrival order
    pub variations: Vec<Variation>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_session_artifact_ids_derive_from_session() {
        let session = Session::new("a card", 3);
        let ids: Vec<_> = session.artifacts.iter().map(|a| a.id.clone()).collect();
        assert_eq!(
            ids,
            vec![
                format!("{}_0", session.id),
                format!("{}_1", session.id),
                format!("{}_2", session.id)
            ]
        );
        assert!(session
            .artifacts
            .iter()
            .all(|a| a.status == ArtifactStatus::Streaming && a.body.is_empty()));
    }

    #[test]
    fn test_variation_requires_both_fields() {
        assert!(Variation::from_value(&json!({"name": "Neon", "html": "<p/>"})).is_some());
        assert!(Variation::from_value(&json!({"name": "Neon"})).is_none());
        assert!(Variation::from_value(&json!({"name": "", "html": "<p/>"})).is_none());
        assert!(Variation::from_value(&json!({"name": 3, "html": "<p/>"})).is_none());
    }

    #[test]
    fn test_commit_replaces_pending() {
        let mut highlights = Highlights::default();
        highlights.set_pending([3, 4]);
        highlights.commit([4, 5]);
        assert!(highlights.pending.is_empty());
        assert_eq!(highlights.committed.iter().copied().collect::<Vec<_>>(), vec![4, 5]);
    }

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&ArtifactStatus::Complete).unwrap(), "\"complete\"");
    }
}
