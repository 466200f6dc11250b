//! Incremental extraction of JSON objects from a fragment stream
//!
//! Models stream back-to-back JSON objects with arbitrary prose around them,
//! and the transport splits that text at arbitrary points. The scanner keeps a
//! growing buffer and emits each object as soon as its brace-matched span is
//! complete and parses.
//!
//! Brace matching is a plain depth counter with no awareness of string
//! literals, so a `{` or `}` inside a JSON string can desynchronise it. When a
//! balanced span fails to parse, the scan retries from the next `{` after the
//! failed start without discarding buffered text, so a later object is not
//! lost.

use std::collections::VecDeque;

use futures_util::stream::{self, Stream, StreamExt};
use serde_json::Value;

/// Push-based scanner for top-level JSON objects
#[derive(Debug, Default)]
pub struct JsonObjectScanner {
    buffer: String,
}

impl JsonObjectScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment and return every object it completed, in stream order
    pub fn push(&mut self, fragment: &str) -> Vec<Value> {
        self.buffer.push_str(fragment);
        self.drain_objects()
    }

    /// Text not yet consumed by an emitted object
    pub fn buffered(&self) -> &str {
        &self.buffer
    }

    fn drain_objects(&mut self) -> Vec<Value> {
        let mut objects = Vec::new();
        let mut start = self.buffer.find('{');

        while let Some(open) = start {
            let Some(close) = matching_close(&self.buffer, open) else {
                // Partial object; wait for more input
                break;
            };

            match serde_json::from_str::<Value>(&self.buffer[open..=close]) {
                Ok(value) => {
                    objects.push(value);
                    self.buffer.drain(..=close);
                    start = self.buffer.find('{');
                }
                Err(e) => {
                    log::debug!("Skipping unparsable span at byte {}: {}", open, e);
                    start = self.buffer[open + 1..].find('{').map(|i| open + 1 + i);
                }
            }
        }

        objects
    }
}

/// Byte offset of the `}` closing the `{` at `open`, if it is buffered
fn matching_close(buffer: &str, open: usize) -> Option<usize> {
    let mut depth: usize = 0;
    for (offset, byte) in buffer.as_bytes()[open..].iter().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }
    None
}

struct ExtractState<S, E> {
    fragments: S,
    scanner: JsonObjectScanner,
    ready: VecDeque<Result<Value, E>>,
    finished: bool,
}

/// Transform a stream of text fragments into a stream of parsed objects
///
/// Fragment errors are passed through and end the stream. A trailing partial
/// object is dropped silently when the input ends.
pub fn json_objects<S, E>(fragments: S) -> impl Stream<Item = Result<Value, E>>
where
    S: Stream<Item = Result<String, E>> + Unpin,
{
    let state = ExtractState {
        fragments,
        scanner: JsonObjectScanner::new(),
        ready: VecDeque::new(),
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(item) = state.ready.pop_front() {
                return Some((item, state));
            }
            if state.finished {
                return None;
            }
            match state.fragments.next().await {
                Some(Ok(fragment)) => {
                    state
                        .ready
                        .extend(state.scanner.push(&fragment).into_iter().map(Ok));
                }
                Some(Err(e)) => {
                    state.finished = true;
                    state.ready.push_back(Err(e));
                }
                None => {
                    if !state.scanner.buffered().trim().is_empty() {
                        log::debug!(
                            "Discarding {} unconsumed bytes at end of stream",
                            state.scanner.buffered().len()
                        );
                    }
                    state.finished = true;
                }
            }
        }
    })
}
