//! Plan/apply modification of the focused artifact
//!
//! Two sequential model calls per instruction:
//!
//! 1. **Planning** - a non-streamed JSON call naming the target line numbers,
//!    shown as pending highlights. A plan that does not parse is ignored.
//! 2. **Executing** - a streamed call returning the whole replacement
//!    document, written into the artifact as it grows.
//!
//! On success the pending set is replaced by the lines that actually changed.
//! Any error in either phase restores the original body and clears the
//! highlights.

use futures_util::StreamExt;
use inference::{GenerationParams, GenerationRequest};
use serde::Serialize;
use serde_json::Value;

use crate::config::ViewPreferences;
use crate::diff::changed_lines;
use crate::error::{Result, WorkbenchError};
use crate::events::WorkbenchEvent;
use crate::markup::strip_code_fences;
use crate::prompts;
use crate::types::{ArtifactStatus, Highlights, Phase};
use crate::workbench::Workbench;

/// How a modification ended
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum ModifyOutcome {
    /// The new document was committed
    #[serde(rename_all = "camelCase")]
    Applied { changed_lines: Vec<usize> },
    /// The original document was restored
    Reverted { reason: String },
}

/// Target lines of a planning response
///
/// `None` unless the text is a JSON object with a `lines` array. Entries that
/// are not positive integers are dropped.
pub fn parse_plan(text: &str) -> Option<Vec<usize>> {
    let value: Value = match serde_json::from_str(text.trim()) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Ignoring unparsable plan: {}", e);
            return None;
        }
    };
    let lines = value.get("lines")?.as_array()?;
    Some(
        lines
            .iter()
            .filter_map(Value::as_u64)
            .filter(|n| *n > 0)
            .map(|n| n as usize)
            .collect(),
    )
}

impl Workbench {
    /// Apply an instruction to the focused artifact
    ///
    /// Fails only when nothing could start (blank instruction, no focus,
    /// another request in flight). Model failures end in
    /// [`ModifyOutcome::Reverted`] and are logged.
    pub async fn modify_focused(&self, instruction: &str, prefs: &ViewPreferences) -> Result<ModifyOutcome> {
        let instruction = instruction.trim();
        if instruction.is_empty() {
            return Err(WorkbenchError::EmptyPrompt);
        }

        let (session_id, artifact) = {
            let store = self.store.lock();
            let (session, artifact) = store.focused().ok_or(WorkbenchError::NoFocusedArtifact)?;
            (session.id.clone(), artifact.clone())
        };

        let busy = self.begin(Phase::Planning)?;
        self.update_highlights(Highlights::clear);

        let original = artifact.body;
        let outcome = match self
            .plan_and_apply(&session_id, &artifact.id, &original, instruction)
            .await
        {
            Ok(changed_lines) => {
                log::info!(
                    "Modified artifact {} ({} lines changed)",
                    artifact.id,
                    changed_lines.len()
                );
                ModifyOutcome::Applied { changed_lines }
            }
            Err(e) => {
                log::error!("Modification failed: {}", e);
                self.update_highlights(Highlights::clear);
                let restored = self.write_artifact(&session_id, &artifact.id, |a| {
                    a.body = original.clone();
                    a.status = ArtifactStatus::Complete;
                });
                if let Err(restore_err) = restored {
                    log::error!("Failed to restore artifact {}: {}", artifact.id, restore_err);
                }
                ModifyOutcome::Reverted {
                    reason: e.to_string(),
                }
            }
        };
        drop(busy);

        if prefs.show_ai_bar {
            self.emit(WorkbenchEvent::InputFocusRequested);
        }
        Ok(outcome)
    }

    async fn plan_and_apply(
        &self,
        session_id: &str,
        artifact_id: &str,
        original: &str,
        instruction: &str,
    ) -> Result<Vec<usize>> {
        // ─── PLANNING ───────────────────────────────────────────────
        self.set_phase(Phase::Planning);

        let plan_request = GenerationRequest::new(prompts::plan(original, instruction))
            .with_params(GenerationParams::json());
        let plan_text = self.gateway.generate(plan_request).await?;

        if let Some(lines) = parse_plan(&plan_text) {
            self.update_highlights(|h| h.set_pending(lines));
        }

        tokio::time::sleep(self.config.plan_pause()).await;

        // ─── EXECUTING ──────────────────────────────────────────────
        self.set_phase(Phase::Executing);

        let apply_request = GenerationRequest::new(prompts::apply(original, instruction))
            .with_params(GenerationParams::temperature(self.config.edit_temperature));
        let mut fragments = self.gateway.generate_stream(apply_request).await?;

        let mut accumulated = String::new();
        while let Some(fragment) = fragments.next().await {
            accumulated.push_str(&fragment?);
            self.write_artifact(session_id, artifact_id, |a| {
                a.body = accumulated.clone();
                a.status = ArtifactStatus::Streaming;
            })?;
        }

        let final_body = strip_code_fences(&accumulated);
        let changed = changed_lines(original, &final_body);

        self.update_highlights(|h| h.commit(changed.iter().copied()));
        self.write_artifact(session_id, artifact_id, |a| {
            a.body = final_body;
            a.status = ArtifactStatus::Complete;
        })?;

        Ok(changed)
    }
}
