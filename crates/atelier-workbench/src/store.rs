//! In-memory session store
//!
//! Owns every session for the lifetime of the workbench. Artifacts are
//! addressed by `(session_id, artifact_id)` so that concurrently streaming
//! artifacts only ever touch their own record. Nothing is persisted and there
//! is no deletion; dropping the store discards everything.

use crate::error::{Result, WorkbenchError};
use crate::types::{Artifact, ArtifactId, Session, SessionId};

#[derive(Debug, Default)]
pub struct SessionStore {
    /// In creation order
    sessions: Vec<Session>,
    /// Index of the session shown in the grid
    current: Option<usize>,
    /// Index of the artifact open in the workshop, within the current session
    focused: Option<usize>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Append a session, make it current and clear the focus
    pub fn push_session(&mut self, session: Session) -> usize {
        self.sessions.push(session);
        let index = self.sessions.len() - 1;
        self.current = Some(index);
        self.focused = None;
        index
    }

    pub fn session(&self, session_id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == session_id)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_session(&self) -> Option<&Session> {
        self.current.and_then(|i| self.sessions.get(i))
    }

    pub fn focused_index(&self) -> Option<usize> {
        self.focused
    }

    /// The current session and its focused artifact
    pub fn focused(&self) -> Option<(&Session, &Artifact)> {
        let session = self.current_session()?;
        let artifact = session.artifacts.get(self.focused?)?;
        Some((session, artifact))
    }

    /// Apply `update` to one artifact and return its new state
    pub fn update_artifact<F>(&mut self, session_id: &str, artifact_id: &str, update: F) -> Result<Artifact>
    where
        F: FnOnce(&mut Artifact),
    {
        let artifact = self
            .sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .and_then(|s| s.artifact_mut(artifact_id))
            .ok_or_else(|| WorkbenchError::unknown_artifact(session_id, artifact_id))?;
        update(artifact);
        Ok(artifact.clone())
    }

    /// Assign labels to a session's artifacts in order
    pub fn set_labels(&mut self, session_id: &str, labels: &[String]) -> Result<Vec<Artifact>> {
        let session = self
            .sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or(WorkbenchError::NoSession)?;
        for (artifact, label) in session.artifacts.iter_mut().zip(labels) {
            artifact.label = label.clone();
        }
        Ok(session.artifacts.clone())
    }

    // ─── SELECTION ──────────────────────────────────────────────────

    /// Open an artifact of the current session in the workshop
    pub fn focus(&mut self, artifact_index: usize) -> Result<()> {
        let session = self.current_session().ok_or(WorkbenchError::NoSession)?;
        if artifact_index >= session.artifacts.len() {
            return Err(WorkbenchError::ArtifactIndex(artifact_index));
        }
        self.focused = Some(artifact_index);
        Ok(())
    }

    /// Return to the grid
    pub fn unfocus(&mut self) {
        self.focused = None;
    }

    /// Move to the next session, if any; clears the focus
    pub fn next_session(&mut self) -> Option<usize> {
        let current = self.current?;
        if current + 1 < self.sessions.len() {
            self.current = Some(current + 1);
            self.focused = None;
        }
        self.current
    }

    /// Move to the previous session, if any; clears the focus
    pub fn previous_session(&mut self) -> Option<usize> {
        let current = self.current?;
        if current > 0 {
            self.current = Some(current - 1);
            self.focused = None;
        }
        self.current
    }

    /// Identifiers of the focused artifact
    pub fn focused_ids(&self) -> Option<(SessionId, ArtifactId)> {
        self.focused()
            .map(|(session, artifact)| (session.id.clone(), artifact.id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ArtifactStatus;

    fn store_with(count: usize) -> SessionStore {
        let mut store = SessionStore::new();
        for i in 0..count {
            store.push_session(Session::new(format!("prompt {}", i), 3));
        }
        store
    }

    #[test]
    fn test_push_makes_session_current() {
        let mut store = store_with(2);
        store.focus(1).unwrap();
        store.push_session(Session::new("third", 3));
        assert_eq!(store.current_index(), Some(2));
        assert_eq!(store.focused_index(), None);
    }

    #[test]
    fn test_update_touches_only_target_artifact() {
        let mut store = store_with(1);
        let session = store.current_session().unwrap().clone();
        let target = &session.artifacts[1];

        let updated = store
            .update_artifact(&session.id, &target.id, |a| {
                a.body = "<p/>".to_string();
                a.status = ArtifactStatus::Complete;
            })
            .unwrap();

        assert_eq!(updated.body, "<p/>");
        let after = store.session(&session.id).unwrap();
        assert_eq!(after.artifacts[0], session.artifacts[0]);
        assert_eq!(after.artifacts[2], session.artifacts[2]);
    }

    #[test]
    fn test_update_unknown_artifact() {
        let mut store = store_with(1);
        let session_id = store.current_session().unwrap().id.clone();
        assert!(matches!(
            store.update_artifact(&session_id, "missing", |_| {}),
            Err(WorkbenchError::UnknownArtifact { .. })
        ));
    }

    #[test]
    fn test_focus_bounds() {
        let mut store = SessionStore::new();
        assert!(matches!(store.focus(0), Err(WorkbenchError::NoSession)));
        store.push_session(Session::new("p", 3));
        assert!(matches!(store.focus(3), Err(WorkbenchError::ArtifactIndex(3))));
        store.focus(2).unwrap();
        assert_eq!(store.focused().unwrap().1.id, store.current_session().unwrap().artifacts[2].id);
    }

    #[test]
    fn test_navigation_is_clamped() {
        let mut store = store_with(3);
        assert_eq!(store.next_session(), Some(2));
        assert_eq!(store.previous_session(), Some(1));
        assert_eq!(store.previous_session(), Some(0));
        assert_eq!(store.previous_session(), Some(0));
        store.focus(0).unwrap();
        assert_eq!(store.next_session(), Some(1));
        assert!(store.focused().is_none());
    }

    #[test]
    fn test_labels_assigned_in_order() {
        let mut store = store_with(1);
        let session_id = store.current_session().unwrap().id.clone();
        let labels = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let artifacts = store.set_labels(&session_id, &labels).unwrap();
        assert_eq!(
            artifacts.iter().map(|a| a.label.as_str()).collect::<Vec<_>>(),
            vec!["A", "B", "C"]
        );
    }
}
