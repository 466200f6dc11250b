//! Initial multi-artifact generation
//!
//! One prompt produces a session of three artifacts. Style directions are
//! requested first (best-effort), then the three artifacts stream
//! concurrently. Each stream writes only to its own artifact, and a failure
//! marks only that artifact as `error`.

use futures_util::future::join_all;
use futures_util::StreamExt;
use inference::GenerationRequest;

use crate::constants::session::{ARTIFACTS_PER_SESSION, FALLBACK_DIRECTIONS};
use crate::error::{Result, WorkbenchError};
use crate::events::WorkbenchEvent;
use crate::markup::{extract_string_array, strip_code_fences};
use crate::prompts;
use crate::types::{ArtifactStatus, Phase, Session, SessionId};
use crate::workbench::Workbench;

/// Style directions from a model response, or the fallback names
///
/// At least `ARTIFACTS_PER_SESSION` string entries are required; extras are
/// ignored.
pub fn directions_from_response(text: &str) -> Vec<String> {
    let mut names = extract_string_array(text);
    if names.len() < ARTIFACTS_PER_SESSION {
        log::warn!(
            "Expected {} style directions, got {}; using fallback names",
            ARTIFACTS_PER_SESSION,
            names.len()
        );
        return fallback_directions();
    }
    names.truncate(ARTIFACTS_PER_SESSION);
    names
}

fn fallback_directions() -> Vec<String> {
    FALLBACK_DIRECTIONS.iter().map(|s| s.to_string()).collect()
}

impl Workbench {
    /// Create a session for `prompt` and stream its artifacts to completion
    ///
    /// Fails before creating anything when the prompt is blank, another
    /// request is in flight, or no credential is configured. Once the session
    /// exists, per-artifact failures are recorded on the artifacts instead.
    pub async fn generate_session(&self, prompt: &str) -> Result<SessionId> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(WorkbenchError::EmptyPrompt);
        }

        let _busy = self.begin(Phase::Executing)?;
        self.gateway.ensure_credentials().await?;

        let session = Session::new(prompt, ARTIFACTS_PER_SESSION);
        let session_id = session.id.clone();
        let artifact_ids: Vec<String> = session.artifacts.iter().map(|a| a.id.clone()).collect();

        self.store.lock().push_session(session);
        self.emit(WorkbenchEvent::SessionCreated {
            session_id: session_id.clone(),
            prompt: prompt.to_string(),
        });
        log::info!("Started session {} for {:?}", session_id, prompt);

        let directions = self.style_directions(prompt).await;
        let labelled = self.store.lock().set_labels(&session_id, &directions)?;
        for artifact in labelled {
            self.emit(WorkbenchEvent::ArtifactUpdated {
                session_id: session_id.clone(),
                artifact,
            });
        }

        let streams = artifact_ids
            .iter()
            .zip(&directions)
            .map(|(artifact_id, direction)| self.stream_artifact(&session_id, artifact_id, prompt, direction));
        join_all(streams).await;

        self.emit(WorkbenchEvent::InputFocusRequested);
        Ok(session_id)
    }

    /// Ask for style direction names; any failure yields the fallback names
    async fn style_directions(&self, prompt: &str) -> Vec<String> {
        match self
            .gateway
            .generate(GenerationRequest::new(prompts::style_directions(prompt)))
            .await
        {
            Ok(text) => directions_from_response(&text),
            Err(e) => {
                log::warn!("Style direction request failed, using fallback names: {}", e);
                fallback_directions()
            }
        }
    }

    /// Stream one artifact; never fails, errors land on the artifact itself
    async fn stream_artifact(&self, session_id: &str, artifact_id: &str, prompt: &str, direction: &str) {
        let result = self
            .stream_artifact_body(session_id, artifact_id, prompt, direction)
            .await;

        let written = match result {
            Ok(accumulated) => {
                let body = strip_code_fences(&accumulated);
                let status = if body.is_empty() {
                    ArtifactStatus::Error
                } else {
                    ArtifactStatus::Complete
                };
                self.write_artifact(session_id, artifact_id, |a| {
                    a.body = body;
                    a.status = status;
                })
            }
            Err(e) => {
                log::warn!("Artifact {} failed: {}", artifact_id, e);
                self.write_artifact(session_id, artifact_id, |a| {
                    a.body = format!("Error: {}", e);
                    a.status = ArtifactStatus::Error;
                })
            }
        };

        if let Err(e) = written {
            log::error!("Could not record result for artifact {}: {}", artifact_id, e);
        }
    }

    async fn stream_artifact_body(
        &self,
        session_id: &str,
        artifact_id: &str,
        prompt: &str,
        direction: &str,
    ) -> Result<String> {
        let request = GenerationRequest::new(prompts::artifact(prompt, direction));
        let mut fragments = self.gateway.generate_stream(request).await?;

        let mut accumulated = String::new();
        while let Some(fragment) = fragments.next().await {
            accumulated.push_str(&fragment?);
            self.write_artifact(session_id, artifact_id, |a| a.body = accumulated.clone())?;
        }
        Ok(accumulated)
    }
}
