use std::time::Duration;

use bytes::{Buf, BytesMut};

const DEFAULT_EVENT: &str = "message";
const BOM: char = '\u{feff}';

/// One dispatched server-sent event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    pub event: String,
    pub data: String,
    pub id: Option<String>,
}

/// Incremental `text/event-stream` parser.
///
/// Bytes may arrive split at arbitrary points; frames are returned once their
/// terminating blank line has been seen.
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: BytesMut,
    skip_lf: bool,
    started: bool,
    event: Option<String>,
    data: String,
    has_data: bool,
    last_event_id: Option<String>,
    retry: Option<Duration>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.buffer.extend_from_slice(chunk);
        let mut frames = Vec::new();

        loop {
            if self.skip_lf && !self.buffer.is_empty() {
                if self.buffer[0] == b'\n' {
                    self.buffer.advance(1);
                }
                self.skip_lf = false;
            }

            let Some(end) = self
                .buffer
                .iter()
                .position(|byte| *byte == b'\n' || *byte == b'\r')
            else {
                break;
            };

            let line = self.buffer.split_to(end);
            let separator = self.buffer[0];
            self.buffer.advance(1);
            if separator == b'\r' {
                if self.buffer.is_empty() {
                    self.skip_lf = true;
                } else if self.buffer[0] == b'\n' {
                    self.buffer.advance(1);
                }
            }

            let line = String::from_utf8_lossy(&line);
            if let Some(frame) = self.process_line(&line) {
                frames.push(frame);
            }
        }

        frames
    }

    /// Id of the most recent event that carried one; sent back on reconnect.
    pub fn last_event_id(&self) -> Option<&str> {
        self.last_event_id.as_deref()
    }

    /// Reconnection delay requested by the server, if any.
    pub fn retry(&self) -> Option<Duration> {
        self.retry
    }

    /// Drops any partially received event, keeping the id and retry state.
    pub fn reset_pending(&mut self) {
        self.buffer.clear();
        self.skip_lf = false;
        self.started = false;
        self.event = None;
        self.data.clear();
        self.has_data = false;
    }

    fn process_line(&mut self, line: &str) -> Option<SseFrame> {
        let line = if self.started {
            line
        } else {
            self.started = true;
            line.strip_prefix(BOM).unwrap_or(line)
        };

        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => {
                self.data.push_str(value);
                self.data.push('\n');
                self.has_data = true;
            }
            "id" if !value.contains('\0') => self.last_event_id = Some(value.to_string()),
            "retry" if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) => {
                if let Ok(ms) = value.parse::<u64>() {
                    self.retry = Some(Duration::from_millis(ms));
                }
            }
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseFrame> {
        let event = self.event.take();
        if !self.has_data {
            return None;
        }
        self.has_data = false;

        let mut data = std::mem::take(&mut self.data);
        if data.ends_with('\n') {
            data.pop();
        }
        Some(SseFrame {
            event: event
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| DEFAULT_EVENT.to_string()),
            data,
            id: self.last_event_id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{SseFrame, SseParser};

    fn frame(event: &str, data: &str) -> SseFrame {
        SseFrame {
            event: event.to_string(),
            data: data.to_string(),
            id: None,
        }
    }

    #[test]
    fn parses_named_event() {
        let mut parser = SseParser::new();
        let frames = parser.feed(b"event: open\ndata: {\"client_id\":\"c1\"}\n\n");
        assert_eq!(frames, vec![frame("open", "{\"client_id\":\"c1\"}")]);
    }

    #[test]
    fn unnamed_event_defaults_to_message() {
        let mut parser = SseParser::new();
        let frames = parser.feed(b"data: hello\n\n");
        assert_eq!(frames, vec![frame("message", "hello")]);
    }

    #[test]
    fn joins_multiline_data() {
        let mut parser = SseParser::new();
        let frames = parser.feed(b"data: first\ndata:second\ndata\n\n");
        assert_eq!(frames, vec![frame("message", "first\nsecond\n")]);
    }

    #[test]
    fn handles_chunks_split_mid_line() {
        let mut parser = SseParser::new();
        assert!(parser.feed(b"event: prog").is_empty());
        assert!(parser.feed(b"ress\ndata: {\"progress\":").is_empty());
        let frames = parser.feed(b"0.5}\n\n");
        assert_eq!(frames, vec![frame("progress", "{\"progress\":0.5}")]);
    }

    #[test]
    fn handles_crlf_split_across_chunks() {
        let mut parser = SseParser::new();
        assert!(parser.feed(b"data: a\r").is_empty());
        assert_eq!(parser.feed(b"\n\r"), vec![frame("message", "a")]);
        let frames = parser.feed(b"\ndata: b\r\r");
        assert_eq!(frames, vec![frame("message", "b")]);
    }

    #[test]
    fn ignores_comments_and_empty_events() {
        let mut parser = SseParser::new();
        let frames = parser.feed(b": keep-alive\n\nevent: open\n\nevent: x\ndata: y\n\n");
        assert_eq!(frames, vec![frame("x", "y")]);
    }

    #[test]
    fn tracks_last_event_id_and_retry() {
        let mut parser = SseParser::new();
        let frames = parser.feed(b"id: 7\nretry: 1500\ndata: a\n\nretry: soon\ndata: b\n\n");
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].id.as_deref(), Some("7"));
        assert_eq!(frames[1].id.as_deref(), Some("7"));
        assert_eq!(parser.last_event_id(), Some("7"));
        assert_eq!(parser.retry(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn strips_leading_bom() {
        let mut parser = SseParser::new();
        let frames = parser.feed("\u{feff}data: x\n\n".as_bytes());
        assert_eq!(frames, vec![frame("message", "x")]);
    }

    #[test]
    fn reset_drops_partial_event_but_keeps_id() {
        let mut parser = SseParser::new();
        parser.feed(b"id: 3\ndata: done\n\nevent: assistant\ndata: half");
        parser.reset_pending();
        let frames = parser.feed(b"data: fresh\n\n");
        assert_eq!(
            frames,
            vec![SseFrame {
                event: "message".to_string(),
                data: "fresh".to_string(),
                id: Some("3".to_string()),
            }]
        );
    }
}
