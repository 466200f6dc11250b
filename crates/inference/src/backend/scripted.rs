//! Scripted backend implementation
//!
//! Replays canned responses without touching the network. Replies are chosen
//! by prompt-substring rules first, then taken from a FIFO queue. Every request
//! is recorded so callers can assert on prompts and parameters.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::stream;
use parking_lot::Mutex;

use super::{
    BackendCapabilities, BackendError, GenerationRequest, GenerativeBackend, TextStream,
};

/// A canned reply
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptedReply {
    /// Whole response text (streamed as a single fragment)
    Text(String),
    /// Response streamed fragment by fragment
    Fragments(Vec<String>),
    /// Fragments followed by a mid-stream failure
    FailAfter {
        fragments: Vec<String>,
        message: String,
    },
    /// The call itself fails
    Error(String),
}

impl ScriptedReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn fragments<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Fragments(fragments.into_iter().map(Into::into).collect())
    }

    pub fn fail_after<I, S>(fragments: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::FailAfter {
            fragments: fragments.into_iter().map(Into::into).collect(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }
}

/// Deterministic replay backend
///
/// Clones share the same script and request log, so a caller can keep a
/// handle after boxing one into a gateway.
#[derive(Clone)]
pub struct ScriptedBackend {
    credentials: bool,
    script: Arc<Script>,
}

#[derive(Default)]
struct Script {
    rules: Mutex<Vec<(String, ScriptedReply)>>,
    queue: Mutex<VecDeque<ScriptedReply>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedBackend {
    /// Create an empty backend that reports credentials as present
    pub fn new() -> Self {
        Self {
            credentials: true,
            script: Arc::new(Script::default()),
        }
    }

    /// Simulate a missing API key
    pub fn without_credentials(mut self) -> Self {
        self.credentials = false;
        self
    }

    /// Answer every prompt containing `needle` with `reply`
    pub fn on_prompt(self, needle: impl Into<String>, reply: ScriptedReply) -> Self {
        self.script.rules.lock().push((needle.into(), reply));
        self
    }

    /// Queue a reply for the next prompt no rule matches
    pub fn then(self, reply: ScriptedReply) -> Self {
        self.script.queue.lock().push_back(reply);
        self
    }

    /// All requests received so far, in arrival order
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.script.requests.lock().clone()
    }

    fn next_reply(&self, request: &GenerationRequest) -> Result<ScriptedReply, BackendError> {
        self.script.requests.lock().push(request.clone());

        let matched = self
            .script
            .rules
            .lock()
            .iter()
            .find(|(needle, _)| request.prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone());

        matched
            .or_else(|| self.script.queue.lock().pop_front())
            .ok_or_else(|| BackendError::Inference("No scripted reply left".to_string()))
    }
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerativeBackend for ScriptedBackend {
    fn name(&self) -> &'static str {
        "Scripted"
    }

    fn description(&self) -> &'static str {
        "Replays canned responses without network access."
    }

    fn capabilities(&self) -> BackendCapabilities {
        BackendCapabilities {
            streaming: true,
            structured_output: true,
            remote: false,
        }
    }

    fn has_credentials(&self) -> bool {
        self.credentials
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String, BackendError> {
        match self.next_reply(&request)? {
            ScriptedReply::Text(text) => Ok(text),
            ScriptedReply::Fragments(fragments) => Ok(fragments.concat()),
            ScriptedReply::FailAfter { message, .. } | ScriptedReply::Error(message) => {
                Err(BackendError::Inference(message))
            }
        }
    }

    async fn generate_stream(&self, request: GenerationRequest) -> Result<TextStream, BackendError> {
        let (fragments, failure) = match self.next_reply(&request)? {
            ScriptedReply::Text(text) => (vec![text], None),
            ScriptedReply::Fragments(fragments) => (fragments, None),
            ScriptedReply::FailAfter { fragments, message } => (fragments, Some(message)),
            ScriptedReply::Error(message) => return Err(BackendError::Inference(message)),
        };

        let items: VecDeque<Result<String, BackendError>> = fragments
            .into_iter()
            .map(Ok)
            .chain(failure.map(|m| Err(BackendError::Inference(m))))
            .collect();

        // Yield between fragments so concurrently streaming callers interleave
        let stream = stream::unfold(items, |mut items| async move {
            let item = items.pop_front()?;
            tokio::task::yield_now().await;
            Some((item, items))
        });

        Ok(Box::pin(stream))
    }
}
