//! Workbench - top-level controller
//!
//! Owns the session store, highlight sets, variation panel and placeholder
//! deck, and is the only place they are mutated. Long-running operations live
//! in `generation`, `modify` and `variations`; this module holds construction,
//! selection, manual edits and the in-progress flag.
//!
//! State is guarded by `parking_lot` mutexes that are never held across an
//! await, so the async operations may be interleaved freely on one task.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use inference::{GenerationRequest, ModelGateway, SharedGateway};
use parking_lot::Mutex;
use serde::Serialize;
use tokio::time::MissedTickBehavior;

use crate::config::{ViewPreferences, WorkbenchConfig};
use crate::constants::labels;
use crate::error::{Result, WorkbenchError};
use crate::events::{EventSink, NullEventSink, WorkbenchEvent};
use crate::markup::extract_string_array;
use crate::modify::ModifyOutcome;
use crate::placeholders::PlaceholderDeck;
use crate::prompts;
use crate::store::SessionStore;
use crate::types::{Artifact, Highlights, Phase, Session, SessionId, VariationPanel};

/// Result of routing a submitted input
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SubmitOutcome {
    /// A new session was generated from the prompt
    #[serde(rename_all = "camelCase")]
    Generated { session_id: SessionId },
    /// The focused artifact was modified (or reverted)
    Modified { outcome: ModifyOutcome },
}

pub struct Workbench {
    pub(crate) gateway: SharedGateway,
    pub(crate) config: WorkbenchConfig,
    pub(crate) store: Mutex<SessionStore>,
    pub(crate) highlights: Mutex<Highlights>,
    pub(crate) panel: Mutex<VariationPanel>,
    pub(crate) placeholders: Mutex<PlaceholderDeck>,
    phase: Mutex<Phase>,
    busy: AtomicBool,
    events: Arc<dyn EventSink>,
}

/// Clears the in-progress flag and returns to `Idle` when dropped
pub(crate) struct BusyGuard<'a> {
    workbench: &'a Workbench,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.workbench.set_phase(Phase::Idle);
        self.workbench.busy.store(false, Ordering::Release);
    }
}

impl Workbench {
    /// Create a workbench over an existing gateway
    pub fn new(gateway: SharedGateway, config: WorkbenchConfig, events: Arc<dyn EventSink>) -> Self {
        Self {
            gateway,
            config,
            store: Mutex::new(SessionStore::new()),
            highlights: Mutex::new(Highlights::default()),
            panel: Mutex::new(VariationPanel::default()),
            placeholders: Mutex::new(PlaceholderDeck::default()),
            phase: Mutex::new(Phase::Idle),
            busy: AtomicBool::new(false),
            events,
        }
    }

    /// Build the gateway from configuration, taking the key from the environment if unset
    pub fn from_config(config: WorkbenchConfig) -> Result<Self> {
        let model = config.model.clone().with_env_fallback();
        let gateway = ModelGateway::from_config(&model)?;
        if !model.has_api_key() {
            log::warn!("No API key configured; generation requests will be rejected");
        }
        Ok(Self::new(Arc::new(gateway), config, Arc::new(NullEventSink)))
    }

    pub fn config(&self) -> &WorkbenchConfig {
        &self.config
    }

    pub fn gateway(&self) -> &SharedGateway {
        &self.gateway
    }

    // ─── IN-PROGRESS FLAG ───────────────────────────────────────────

    /// Claim the in-progress flag or fail with `Busy`
    pub(crate) fn begin(&self, phase: Phase) -> Result<BusyGuard<'_>> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(WorkbenchError::Busy);
        }
        self.set_phase(phase);
        Ok(BusyGuard { workbench: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn phase(&self) -> Phase {
        *self.phase.lock()
    }

    pub(crate) fn set_phase(&self, phase: Phase) {
        {
            let mut current = self.phase.lock();
            if *current == phase {
                return;
            }
            *current = phase;
        }
        self.emit(WorkbenchEvent::PhaseChanged { phase });
    }

    /// Status line for the header: the phase label while busy, else the prompt
    pub fn status_label(&self) -> Option<String> {
        match self.phase() {
            Phase::Planning => Some(labels::PLANNING.to_string()),
            Phase::Executing => Some(labels::EXECUTING.to_string()),
            Phase::Idle => self.current_session().map(|s| s.prompt),
        }
    }

    // ─── EVENTS ─────────────────────────────────────────────────────

    pub(crate) fn emit(&self, event: WorkbenchEvent) {
        if let Err(e) = self.events.send(event) {
            log::warn!("Dropped workbench event: {}", e);
        }
    }

    /// Mutate one artifact and report the new state
    pub(crate) fn write_artifact<F>(&self, session_id: &str, artifact_id: &str, update: F) -> Result<Artifact>
    where
        F: FnOnce(&mut Artifact),
    {
        let artifact = self.store.lock().update_artifact(session_id, artifact_id, update)?;
        self.emit(WorkbenchEvent::ArtifactUpdated {
            session_id: session_id.to_string(),
            artifact: artifact.clone(),
        });
        Ok(artifact)
    }

    pub(crate) fn update_highlights<F>(&self, update: F)
    where
        F: FnOnce(&mut Highlights),
    {
        let snapshot = {
            let mut highlights = self.highlights.lock();
            update(&mut highlights);
            highlights.clone()
        };
        self.emit(WorkbenchEvent::HighlightsChanged {
            pending: snapshot.pending.into_iter().collect(),
            committed: snapshot.committed.into_iter().collect(),
        });
    }

    fn emit_selection(&self) {
        let (session_index, artifact_index) = {
            let store = self.store.lock();
            (store.current_index(), store.focused_index())
        };
        self.emit(WorkbenchEvent::SelectionChanged {
            session_index,
            artifact_index,
        });
    }

    // ─── SNAPSHOTS ──────────────────────────────────────────────────

    pub fn sessions(&self) -> Vec<Session> {
        self.store.lock().sessions().to_vec()
    }

    pub fn session(&self, session_id: &str) -> Option<Session> {
        self.store.lock().session(session_id).cloned()
    }

    pub fn current_session(&self) -> Option<Session> {
        self.store.lock().current_session().cloned()
    }

    pub fn focused_artifact(&self) -> Option<Artifact> {
        self.store.lock().focused().map(|(_, a)| a.clone())
    }

    pub fn highlights(&self) -> Highlights {
        self.highlights.lock().clone()
    }

    pub fn variation_panel(&self) -> VariationPanel {
        self.panel.lock().clone()
    }

    // ─── INPUT ──────────────────────────────────────────────────────

    /// Route an input: modify the focused artifact, or start a new session
    pub async fn submit(&self, input: &str, prefs: &ViewPreferences) -> Result<SubmitOutcome> {
        let input = input.trim();
        if input.is_empty() {
            return Err(WorkbenchError::EmptyPrompt);
        }
        if self.is_busy() {
            return Err(WorkbenchError::Busy);
        }

        let focused = self.store.lock().focused_ids().is_some();
        if focused {
            let outcome = self.modify_focused(input, prefs).await?;
            Ok(SubmitOutcome::Modified { outcome })
        } else {
            let session_id = self.generate_session(input).await?;
            Ok(SubmitOutcome::Generated { session_id })
        }
    }

    /// Submit the suggestion currently shown in the input placeholder
    pub async fn surprise_me(&self, prefs: &ViewPreferences) -> Result<SubmitOutcome> {
        let prompt = self
            .current_placeholder()
            .ok_or(WorkbenchError::EmptyPrompt)?;
        self.submit(&prompt, prefs).await
    }

    // ─── SELECTION ──────────────────────────────────────────────────

    /// Open an artifact of the current session in the workshop
    pub fn focus_artifact(&self, artifact_index: usize) -> Result<()> {
        self.store.lock().focus(artifact_index)?;
        self.update_highlights(Highlights::clear);
        self.emit_selection();
        Ok(())
    }

    /// Return to the grid
    pub fn unfocus(&self) {
        self.store.lock().unfocus();
        self.update_highlights(Highlights::clear);
        self.emit_selection();
        self.emit(WorkbenchEvent::InputFocusRequested);
    }

    pub fn next_session(&self) -> Option<usize> {
        let index = self.store.lock().next_session();
        self.emit_selection();
        index
    }

    pub fn previous_session(&self) -> Option<usize> {
        let index = self.store.lock().previous_session();
        self.emit_selection();
        index
    }

    /// Overwrite the focused artifact's body from the code editor
    pub fn edit_focused_body(&self, body: impl Into<String>) -> Result<Artifact> {
        let (session_id, artifact_id) = self
            .store
            .lock()
            .focused_ids()
            .ok_or(WorkbenchError::NoFocusedArtifact)?;
        let body = body.into();
        self.write_artifact(&session_id, &artifact_id, |a| a.body = body)
    }

    // ─── PLACEHOLDERS ───────────────────────────────────────────────

    pub fn current_placeholder(&self) -> Option<String> {
        self.placeholders.lock().current().map(str::to_string)
    }

    /// Rotate the placeholder once
    pub fn advance_placeholder(&self) -> Option<String> {
        let next = self.placeholders.lock().advance().map(str::to_string);
        if let Some(placeholder) = &next {
            self.emit(WorkbenchEvent::PlaceholderChanged {
                placeholder: placeholder.clone(),
            });
        }
        next
    }

    /// Advance the placeholder every `placeholder_interval`
    ///
    /// Stops after `rounds` advances, or runs until dropped when `None`.
    pub async fn rotate_placeholders(&self, rounds: Option<usize>) {
        let period = self.config.placeholder_interval().max(Duration::from_millis(1));
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately
        ticker.tick().await;

        let mut advanced = 0;
        while rounds.map_or(true, |limit| advanced < limit) {
            ticker.tick().await;
            self.advance_placeholder();
            advanced += 1;
        }
    }

    /// Fetch model-written suggestions and append a shuffled sample
    ///
    /// Never fails: every error is logged and leaves the deck unchanged.
    pub async fn refresh_placeholders(&self) -> usize {
        let text = match self
            .gateway
            .generate(GenerationRequest::new(prompts::suggestions()))
            .await
        {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Failed to fetch prompt suggestions: {}", e);
                return 0;
            }
        };

        let suggestions = extract_string_array(&text);
        if suggestions.is_empty() {
            log::warn!("Prompt suggestions response held no usable array");
            return 0;
        }

        let added = self
            .placeholders
            .lock()
            .extend_shuffled(suggestions, self.config.suggestion_sample);
        log::info!("Added {} prompt suggestions", added);
        added
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::workbench;
    use super::*;
    use inference::{ScriptedBackend, ScriptedReply};

    #[tokio::test]
    async fn test_blank_input_is_rejected() {
        let (bench, _) = workbench(ScriptedBackend::new());
        let err = bench.submit("   ", &ViewPreferences::default()).await.unwrap_err();
        assert!(matches!(err, WorkbenchError::EmptyPrompt));
    }

    #[tokio::test]
    async fn test_busy_flag_blocks_second_claim() {
        let (bench, _) = workbench(ScriptedBackend::new());
        let guard = bench.begin(Phase::Planning).unwrap();
        assert!(bench.is_busy());
        assert!(matches!(bench.begin(Phase::Executing), Err(WorkbenchError::Busy)));
        assert!(matches!(
            bench.submit("hello", &ViewPreferences::default()).await,
            Err(WorkbenchError::Busy)
        ));
        drop(guard);
        assert!(!bench.is_busy());
        assert_eq!(bench.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_refresh_placeholders_appends_sample() {
        let names: Vec<String> = (0..20).map(|i| format!("\"idea {}\"", i)).collect();
        let reply = format!("Here:\n[{}]", names.join(","));
        let (bench, _) = workbench(ScriptedBackend::new().then(ScriptedReply::text(reply)));

        let before = bench.placeholders.lock().len();
        assert_eq!(bench.refresh_placeholders().await, 10);
        assert_eq!(bench.placeholders.lock().len(), before + 10);
    }

    #[tokio::test]
    async fn test_refresh_placeholders_swallows_failures() {
        let (bench, _) = workbench(ScriptedBackend::new().then(ScriptedReply::error("offline")));
        let before = bench.placeholders.lock().len();
        assert_eq!(bench.refresh_placeholders().await, 0);
        assert_eq!(bench.placeholders.lock().len(), before);
    }

    #[test]
    fn test_advance_placeholder_emits_event() {
        let (bench, sink) = workbench(ScriptedBackend::new());
        let next = bench.advance_placeholder().unwrap();
        assert!(sink
            .events()
            .contains(&WorkbenchEvent::PlaceholderChanged { placeholder: next }));
    }

    #[tokio::test]
    async fn test_rotation_advances_each_period() {
        let (mut bench, sink) = workbench(ScriptedBackend::new());
        bench.config.placeholder_interval_ms = 0;

        bench.rotate_placeholders(Some(3)).await;

        let shown: Vec<String> = sink
            .events()
            .into_iter()
            .filter_map(|e| match e {
                WorkbenchEvent::PlaceholderChanged { placeholder } => Some(placeholder),
                _ => None,
            })
            .collect();
        let expected: Vec<String> = crate::constants::INITIAL_PLACEHOLDERS[1..4]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(shown, expected);
        assert_eq!(bench.current_placeholder().as_deref(), Some(crate::constants::INITIAL_PLACEHOLDERS[3]));
    }

    #[test]
    fn test_edit_requires_focus() {
        let (bench, _) = workbench(ScriptedBackend::new());
        assert!(matches!(
            bench.edit_focused_body("<p/>"),
            Err(WorkbenchError::NoFocusedArtifact)
        ));
    }
}
