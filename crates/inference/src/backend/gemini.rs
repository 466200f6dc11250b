//! Gemini backend implementation
//!
//! This backend talks to the Google Gemini REST API. Plain generation uses
//! `generateContent`; streaming uses `streamGenerateContent?alt=sse`, whose
//! server-sent events each carry a partial `GenerateContentResponse`.

use std::collections::VecDeque;
use std::pin::Pin;

use async_trait::async_trait;
use futures_util::{stream, Stream, StreamExt};

use super::{
    BackendCapabilities, BackendError, GenerationRequest, GenerativeBackend, TextStream,
};
use crate::config::ModelConfig;
use crate::sse::SseDecoder;
use crate::types::{GenerateContentRequest, GenerateContentResponse};

/// Header carrying the API key
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini backend using the public REST API
pub struct GeminiBackend {
    /// HTTP client for API requests
    http_client: reqwest::Client,
    /// Base URL, e.g. `https://generativelanguage.googleapis.com/v1beta`
    base_url: String,
    /// Model identifier
    model: String,
    /// API key, if configured
    api_key: Option<String>,
}

impl GeminiBackend {
    /// Create a backend from a model configuration
    pub fn new(config: &ModelConfig) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
        }
    }

    /// Get static capabilities (for registry info before instantiation)
    pub fn static_capabilities() -> BackendCapabilities {
        BackendCapabilities {
            streaming: true,
            structured_output: true,
            remote: true,
        }
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, self.model, method)
    }

    async fn post(
        &self,
        url: &str,
        request: &GenerationRequest,
    ) -> Result<reqwest::Response, BackendError> {
        let api_key = self.api_key.as_ref().ok_or(BackendError::MissingCredential)?;
        let body = GenerateContentRequest::from(request);

        let response = self
            .http_client
            .post(url)
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await
            .map_err(BackendError::Http)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Inference(format!("API error {}: {}", status, body)));
        }

        Ok(response)
    }
}

#[async_trait]
impl GenerativeBackend for GeminiBackend {
    fn name(&self) -> &'static str {
        "Gemini"
    }

    fn description(&self) -> &'static str {
        "Google Gemini REST API with server-sent-event streaming."
    }

    fn capabilities(&self) -> BackendCapabilities {
        Self::static_capabilities()
    }

    fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String, BackendError> {
        let url = self.endpoint("generateContent");
        let response = self.post(&url, &request).await?;

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Decode(format!("Failed to parse response: {}", e)))?;

        Ok(body.text().unwrap_or_default())
    }

    async fn generate_stream(&self, request: GenerationRequest) -> Result<TextStream, BackendError> {
        let url = format!("{}?alt=sse", self.endpoint("streamGenerateContent"));
        let response = self.post(&url, &request).await?;

        Ok(decode_sse_stream(response.bytes_stream()))
    }
}

/// State threaded through the SSE unfold
struct SseState<B> {
    bytes: Pin<Box<dyn Stream<Item = Result<B, BackendError>> + Send>>,
    decoder: SseDecoder,
    ready: VecDeque<Result<String, BackendError>>,
    finished: bool,
}

impl<B> SseState<B> {
    fn enqueue(&mut self, payload: &str) {
        if let Some(item) = decode_event(payload) {
            self.ready.push_back(item);
        }
    }
}

/// Turn a raw byte stream of SSE events into a stream of text fragments
///
/// A transport error ends the stream after it has been yielded.
pub fn decode_sse_stream<S, B, E>(bytes: S) -> TextStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Into<BackendError> + 'static,
{
    let state = SseState {
        bytes: Box::pin(bytes.map(|r| r.map_err(Into::<BackendError>::into))),
        decoder: SseDecoder::new(),
        ready: VecDeque::new(),
        finished: false,
    };

    let stream = stream::unfold(state, |mut state| async move {
        loop {
            if let Some(item) = state.ready.pop_front() {
                return Some((item, state));
            }
            if state.finished {
                return None;
            }
            match state.bytes.next().await {
                Some(Ok(chunk)) => {
                    for payload in state.decoder.push(chunk.as_ref()) {
                        state.enqueue(&payload);
                    }
                }
                Some(Err(e)) => {
                    state.finished = true;
                    state.ready.push_back(Err(e));
                }
                None => {
                    state.finished = true;
                    if let Some(payload) = state.decoder.finish() {
                        state.enqueue(&payload);
                    }
                }
            }
        }
    });

    Box::pin(stream)
}

/// Decode one SSE payload; `None` for events without text
fn decode_event(payload: &str) -> Option<Result<String, BackendError>> {
    if payload.trim() == "[DONE]" {
        return None;
    }

    let json: serde_json::Value = match serde_json::from_str(payload) {
        Ok(json) => json,
        Err(e) => return Some(Err(BackendError::Decode(format!("Invalid event JSON: {}", e)))),
    };

    if let Some(message) = json
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
    {
        return Some(Err(BackendError::Inference(message.to_string())));
    }

    match serde_json::from_value::<GenerateContentResponse>(json) {
        Ok(response) => response.text().filter(|t| !t.is_empty()).map(Ok),
        Err(e) => Some(Err(BackendError::Decode(e.to_string()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_logging() {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
            .is_test(true)
            .try_init();
    }

    fn event(text: &str) -> String {
        format!(
            "data: {{\"candidates\":[{{\"content\":{{\"parts\":[{{\"text\":{}}}]}}}}]}}\r\n\r\n",
            serde_json::to_string(text).unwrap()
        )
    }

    async fn collect(chunks: Vec<Vec<u8>>) -> Vec<Result<String, BackendError>> {
        init_logging();
        let source = stream::iter(chunks.into_iter().map(Ok::<_, BackendError>));
        decode_sse_stream(source).collect().await
    }

    #[test]
    fn test_backend_name() {
        let backend = GeminiBackend::new(&ModelConfig::default());
        assert_eq!(backend.name(), "Gemini");
    }

    #[test]
    fn test_credentials_follow_config() {
        assert!(!GeminiBackend::new(&ModelConfig::default()).has_credentials());
        let config = ModelConfig {
            api_key: Some("secret".to_string()),
            ..Default::default()
        };
        assert!(GeminiBackend::new(&config).has_credentials());
    }

    #[test]
    fn test_endpoint_format() {
        let config = ModelConfig {
            base_url: "http://localhost:9000/v1beta/".to_string(),
            model: "m".to_string(),
            ..Default::default()
        };
        let backend = GeminiBackend::new(&config);
        assert_eq!(backend.endpoint("generateContent"), "http://localhost:9000/v1beta/models/m:generateContent");
    }

    #[tokio::test]
    async fn test_missing_key_is_rejected_before_sending() {
        init_logging();
        let backend = GeminiBackend::new(&ModelConfig::default());
        let err = backend.generate(GenerationRequest::new("hi")).await.unwrap_err();
        assert!(matches!(err, BackendError::MissingCredential));
    }

    #[tokio::test]
    async fn test_stream_reassembles_split_events() {
        let raw = format!("{}{}", event("<div>"), event("</div>"));
        let bytes = raw.into_bytes();
        let chunks: Vec<Vec<u8>> = bytes.chunks(7).map(|c| c.to_vec()).collect();

        let fragments: Vec<String> = collect(chunks).await.into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(fragments, vec!["<div>".to_string(), "</div>".to_string()]);
    }

    #[tokio::test]
    async fn test_stream_surfaces_error_events() {
        let raw = format!("{}data: {{\"error\":{{\"message\":\"quota\"}}}}\n\n", event("a"));
        let items = collect(vec![raw.into_bytes()]).await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_deref().unwrap(), "a");
        assert!(matches!(&items[1], Err(BackendError::Inference(m)) if m == "quota"));
    }

    #[tokio::test]
    async fn test_stream_flushes_trailing_event() {
        let raw = "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"end\"}]}}]}";
        let items = collect(vec![raw.as_bytes().to_vec()]).await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].as_deref().unwrap(), "end");
    }
}
