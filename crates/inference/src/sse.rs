//! Incremental server-sent-events decoder
//!
//! Network chunks arrive at arbitrary byte boundaries, so lines (and UTF-8
//! sequences) can be split between two chunks. The decoder keeps the
//! unterminated tail and only yields the `data` payload of complete events.

/// Buffers raw bytes and yields complete SSE `data` payloads
#[derive(Debug, Default)]
pub struct SseDecoder {
    /// Bytes after the last line terminator seen so far
    pending: Vec<u8>,
    /// `data:` lines of the event currently being assembled
    data_lines: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a network chunk, returning the payloads of every event it completed
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(bytes);

        let mut events = Vec::new();
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            let line = line.trim_end_matches(['\n', '\r']);
            if let Some(payload) = self.accept_line(line) {
                events.push(payload);
            }
        }
        events
    }

    /// Flush an event left open when the stream ended without a blank line
    pub fn finish(&mut self) -> Option<String> {
        if !self.pending.is_empty() {
            let line = String::from_utf8_lossy(&std::mem::take(&mut self.pending)).into_owned();
            let line = line.trim_end_matches('\r').to_string();
            if let Some(payload) = self.accept_line(&line) {
                return Some(payload);
            }
        }
        self.take_event()
    }

    fn accept_line(&mut self, line: &str) -> Option<String> {
        if line.is_empty() {
            return self.take_event();
        }
        if let Some(data) = line.strip_prefix("data:") {
            self.data_lines
                .push(data.strip_prefix(' ').unwrap_or(data).to_string());
        }
        // Comments, `event:`, `id:` and `retry:` lines carry nothing we use
        None
    }

    fn take_event(&mut self) -> Option<String> {
        if self.data_lines.is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.data_lines).join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_event() {
        let mut decoder = SseDecoder::new();
        let events = decoder.push(b"data: {\"a\":1}\r\n\r\n");
        assert_eq!(events, vec!["{\"a\":1}".to_string()]);
    }

    #[test]
    fn test_event_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: {\"te").is_empty());
        assert!(decoder.push(b"xt\":\"hi\"}\n").is_empty());
        let events = decoder.push(b"\ndata: [DONE]\n\n");
        assert_eq!(events, vec!["{\"text\":\"hi\"}".to_string(), "[DONE]".to_string()]);
    }

    #[test]
    fn test_multibyte_char_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        let payload = "data: é\n\n".as_bytes();
        // 'é' is two bytes; split between them
        let split = payload.iter().position(|b| *b == 0xC3).unwrap() + 1;
        assert!(decoder.push(&payload[..split]).is_empty());
        assert_eq!(decoder.push(&payload[split..]), vec!["é".to_string()]);
    }

    #[test]
    fn test_finish_flushes_unterminated_event() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b": keep-alive\ndata: tail").is_empty());
        assert_eq!(decoder.finish().as_deref(), Some("tail"));
        assert!(decoder.finish().is_none());
    }
}
