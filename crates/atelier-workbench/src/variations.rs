//! Variation generation for the focused artifact
//!
//! A single streamed call returns back-to-back `{name, html}` objects. Each
//! complete object is added to the results panel as soon as it is extracted;
//! objects missing either field are skipped.

use futures_util::StreamExt;
use inference::{GenerationParams, GenerationRequest};

use crate::error::{Result, WorkbenchError};
use crate::events::WorkbenchEvent;
use crate::json_stream::json_objects;
use crate::prompts;
use crate::types::{ArtifactStatus, Phase, Variation, VariationPanel};
use crate::workbench::Workbench;

impl Workbench {
    /// Open the results panel and stream variations of the session prompt
    ///
    /// Returns the number of variations collected. Model failures are logged
    /// and end the stream early; whatever arrived before stays in the panel.
    pub async fn generate_variations(&self) -> Result<usize> {
        let (prompt, artifact_id) = {
            let store = self.store.lock();
            let (session, artifact) = store.focused().ok_or(WorkbenchError::NoFocusedArtifact)?;
            (session.prompt.clone(), artifact.id.clone())
        };

        let _busy = self.begin(Phase::Executing)?;

        *self.panel.lock() = VariationPanel {
            open: true,
            artifact_id: Some(artifact_id.clone()),
            variations: Vec::new(),
        };
        self.emit(WorkbenchEvent::VariationsOpened {
            artifact_id: artifact_id.clone(),
        });

        if let Err(e) = self.stream_variations(&prompt, &artifact_id).await {
            log::error!("Error generating variations: {}", e);
        }

        Ok(self.panel.lock().variations.len())
    }

    async fn stream_variations(&self, prompt: &str, artifact_id: &str) -> Result<()> {
        let request = GenerationRequest::new(prompts::variations(prompt))
            .with_params(GenerationParams::temperature(self.config.variation_temperature));
        let fragments = self.gateway.generate_stream(request).await?;

        let objects = json_objects(fragments);
        futures_util::pin_mut!(objects);

        while let Some(object) = objects.next().await {
            let object = object?;
            let Some(variation) = Variation::from_value(&object) else {
                log::debug!("Skipping variation without name and html");
                continue;
            };

            self.panel.lock().variations.push(variation.clone());
            self.emit(WorkbenchEvent::VariationAdded {
                artifact_id: artifact_id.to_string(),
                variation,
            });
        }
        Ok(())
    }

    /// Replace the focused artifact's body with a variation and close the panel
    pub fn apply_variation(&self, index: usize) -> Result<()> {
        let (target, html) = {
            let panel = self.panel.lock();
            let html = panel
                .variations
                .get(index)
                .map(|v| v.html.clone())
                .ok_or(WorkbenchError::UnknownVariation(index))?;
            (panel.artifact_id.clone(), html)
        };

        let (session_id, artifact_id) = self
            .store
            .lock()
            .focused_ids()
            .ok_or(WorkbenchError::NoFocusedArtifact)?;

        if let Some(panel_artifact) = target.filter(|id| *id != artifact_id) {
            log::warn!(
                "Refusing to apply variation of {} to {}",
                panel_artifact,
                artifact_id
            );
            return Err(WorkbenchError::VariationTargetChanged {
                panel: panel_artifact,
                focused: artifact_id,
            });
        }

        self.write_artifact(&session_id, &artifact_id, |a| {
            a.body = html;
            a.status = ArtifactStatus::Complete;
        })?;
        self.close_variations();
        Ok(())
    }

    /// Hide the results panel; its contents are discarded on the next request
    pub fn close_variations(&self) {
        self.panel.lock().open = false;
        self.emit(WorkbenchEvent::VariationsClosed);
    }
}
