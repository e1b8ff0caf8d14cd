// shared-types-rs/src/stream.rs
// Caller-facing framing of a streamed answer.

use serde::{Deserialize, Serialize};

/// One frame delivered to the caller while streaming.
///
/// Fragments go out as `{"chunk": "...", "done": false}`, the stream closes
/// with `{"chunk": "", "done": true}`, and a failure ends it with
/// `{"error": "...", "done": true}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StreamEvent {
    Chunk { chunk: String, done: bool },
    Error { error: String, done: bool },
}

impl StreamEvent {
    pub fn fragment(text: impl Into<String>) -> Self {
        StreamEvent::Chunk { chunk: text.into(), done: false }
    }

    pub fn finished() -> Self {
        StreamEvent::Chunk { chunk: String::new(), done: true }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        StreamEvent::Error { error: error.into(), done: true }
    }

    pub fn is_terminal(&self) -> bool {
        match self {
            StreamEvent::Chunk { done, .. } | StreamEvent::Error { done, .. } => *done,
        }
    }

    /// Serialized as a single line, suitable for NDJSON output
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
