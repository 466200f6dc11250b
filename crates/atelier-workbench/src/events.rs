//! Event types for the presentation layer
//!
//! Every mutation of session, highlight, phase or variation state is reported
//! as a [`WorkbenchEvent`] so a view can re-render without polling.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::types::{Artifact, ArtifactId, Phase, SessionId, Variation};

/// Trait for delivering workbench events
///
/// This abstracts over the transport (UI bridge, channel, test collector).
pub trait EventSink: Send + Sync {
    /// Send an event
    ///
    /// Returns an error if the event could not be delivered (e.g., channel closed)
    fn send(&self, event: WorkbenchEvent) -> Result<(), EventError>;
}

/// Error when sending events fails
#[derive(Debug, Clone, thiserror::Error)]
#[error("Event error: {message}")]
pub struct EventError {
    pub message: String,
}

impl EventError {
    pub fn channel_closed() -> Self {
        Self {
            message: "Channel closed".to_string(),
        }
    }
}

/// Events emitted by the workbench
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WorkbenchEvent {
    /// A new session was created and made current
    #[serde(rename_all = "camelCase")]
    SessionCreated { session_id: SessionId, prompt: String },

    /// An artifact's label, body or status changed
    #[serde(rename_all = "camelCase")]
    ArtifactUpdated {
        session_id: SessionId,
        artifact: Artifact,
    },

    /// The in-flight request moved to another phase
    #[serde(rename_all = "camelCase")]
    PhaseChanged { phase: Phase },

    /// Editor highlight sets changed
    #[serde(rename_all = "camelCase")]
    HighlightsChanged {
        pending: Vec<usize>,
        committed: Vec<usize>,
    },

    /// Current session or focused artifact changed
    #[serde(rename_all = "camelCase")]
    SelectionChanged {
        session_index: Option<usize>,
        artifact_index: Option<usize>,
    },

    /// The variations panel opened for an artifact
    #[serde(rename_all = "camelCase")]
    VariationsOpened { artifact_id: ArtifactId },

    /// A variation arrived
    #[serde(rename_all = "camelCase")]
    VariationAdded {
        artifact_id: ArtifactId,
        variation: Variation,
    },

    /// The variations panel closed
    VariationsClosed,

    /// Placeholder suggestions changed
    #[serde(rename_all = "camelCase")]
    PlaceholderChanged { placeholder: String },

    /// The host should return keyboard focus to the prompt input
    InputFocusRequested,
}

/// A no-op event sink that discards all events
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn send(&self, _event: WorkbenchEvent) -> Result<(), EventError> {
        Ok(())
    }
}

/// A vector-based event sink that collects events
///
/// Useful for testing to verify events were emitted correctly.
pub struct VecEventSink {
    events: parking_lot::Mutex<Vec<WorkbenchEvent>>,
}

impl VecEventSink {
    pub fn new() -> Self {
        Self {
            events: parking_lot::Mutex::new(Vec::new()),
        }
    }

    /// Get all collected events
    pub fn events(&self) -> Vec<WorkbenchEvent> {
        self.events.lock().clone()
    }

    /// Clear all collected events
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl Default for VecEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for VecEventSink {
    fn send(&self, event: WorkbenchEvent) -> Result<(), EventError> {
        self.events.lock().push(event);
        Ok(())
    }
}

/// Forwards events into an unbounded tokio channel
pub struct ChannelEventSink {
    sender: mpsc::UnboundedSender<WorkbenchEvent>,
}

impl ChannelEventSink {
    /// Create a sink and the receiver the host drains
    pub fn new() -> (Self, mpsc::UnboundedReceiver<WorkbenchEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl EventSink for ChannelEventSink {
    fn send(&self, event: WorkbenchEvent) -> Result<(), EventError> {
        self.sender
            .send(event)
            .map_err(|_| EventError::channel_closed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_event_sink() {
        let sink = VecEventSink::new();
        sink.send(WorkbenchEvent::PhaseChanged {
            phase: Phase::Planning,
        })
        .unwrap();

        let events = sink.events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            WorkbenchEvent::PhaseChanged { phase } => assert_eq!(*phase, Phase::Planning),
            _ => panic!("Expected PhaseChanged event"),
        }

        sink.clear();
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_channel_sink_reports_closed_receiver() {
        let (sink, receiver) = ChannelEventSink::new();
        sink.send(WorkbenchEvent::InputFocusRequested).unwrap();
        drop(receiver);
        assert!(sink.send(WorkbenchEvent::VariationsClosed).is_err());
    }

    #[test]
    fn test_event_wire_format() {
        let json = serde_json::to_value(WorkbenchEvent::HighlightsChanged {
            pending: vec![2],
            committed: vec![],
        })
        .unwrap();
        assert_eq!(json["type"], "highlightsChanged");
        assert_eq!(json["pending"][0], 2);
    }
}
