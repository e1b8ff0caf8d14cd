// generation-gateway-rs/src/stream.rs
// Incremental delivery of generated text.
//
// The backend answers a streaming request with newline-delimited JSON units.
// Units are decoded lazily as the consumer polls; at most one partial line
// is held in the buffer.

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::stream::{self, FusedStream, Stream, StreamExt};
use shared_types_rs::{DiagnosticError, Result};
use tracing::{debug, warn};

use crate::models::StreamUnit;

/// Longest unit accepted without a newline
pub const MAX_LINE_BYTES: usize = 1024 * 1024;

type BoxedFragments = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Pull-based sequence of text fragments.
///
/// Ends after the backend's final unit, the first error, or [`close`]. Once
/// ended it never yields again. Dropping it or calling [`close`] releases
/// the underlying HTTP response.
///
/// [`close`]: FragmentStream::close
pub struct FragmentStream {
    inner: Option<BoxedFragments>,
}

impl FragmentStream {
    pub fn new<S>(fragments: S) -> Self
    where
        S: Stream<Item = Result<String>> + Send + 'static,
    {
        Self { inner: Some(Box::pin(fragments)) }
    }

    /// A stream that is already finished
    pub fn empty() -> Self {
        Self { inner: None }
    }

    /// Stop consuming and drop the connection now
    pub fn close(&mut self) {
        if self.inner.take().is_some() {
            debug!("Fragment stream closed by consumer");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_none()
    }

    /// Drain the stream into one string, stopping at the first error
    pub async fn collect_text(mut self) -> Result<String> {
        let mut text = String::new();
        while let Some(fragment) = self.next().await {
            text.push_str(&fragment?);
        }
        Ok(text)
    }
}

impl Stream for FragmentStream {
    type Item = Result<String>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let Some(inner) = self.inner.as_mut() else {
            return Poll::Ready(None);
        };

        match inner.as_mut().poll_next(cx) {
            Poll::Ready(None) => {
                self.inner = None;
                Poll::Ready(None)
            }
            Poll::Ready(Some(Err(err))) => {
                self.inner = None;
                Poll::Ready(Some(Err(err)))
            }
            other => other,
        }
    }
}

impl FusedStream for FragmentStream {
    fn is_terminated(&self) -> bool {
        self.inner.is_none()
    }
}

impl fmt::Debug for FragmentStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FragmentStream")
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// What one decoded line contributes to the sequence
#[derive(Debug, PartialEq)]
enum Decoded {
    Skip,
    Fragment { text: String, last: bool },
    Finished,
    Failed(String),
}

fn decode_line(line: &[u8]) -> Decoded {
    let line = line.trim_ascii();
    if line.is_empty() {
        return Decoded::Skip;
    }

    let unit: StreamUnit = match serde_json::from_slice(line) {
        Ok(unit) => unit,
        Err(e) => {
            warn!(
                "Skipping malformed stream unit ({} bytes): {}",
                line.len(),
                e
            );
            return Decoded::Skip;
        }
    };

    if let Some(error) = unit.error {
        return Decoded::Failed(error);
    }

    match unit.response.filter(|text| !text.is_empty()) {
        Some(text) => Decoded::Fragment { text, last: unit.done },
        None if unit.done => Decoded::Finished,
        None => Decoded::Skip,
    }
}

struct DecoderState<S> {
    body: Pin<Box<S>>,
    buffer: Vec<u8>,
    finished: bool,
}

/// Turn a newline-delimited JSON byte stream into text fragments.
///
/// Empty fragments are skipped, malformed units are skipped with a warning,
/// a unit carrying `error` or a transport failure yields one
/// `StreamInterrupted` and ends the sequence, and `done: true` ends it. A
/// partial line longer than [`MAX_LINE_BYTES`] also interrupts the stream.
pub fn decode_ndjson<S, B, E>(body: S) -> impl Stream<Item = Result<String>> + Send
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send,
    E: fmt::Display + Send,
{
    let state = DecoderState {
        body: Box::pin(body),
        buffer: Vec::new(),
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if state.finished {
                return None;
            }

            if let Some(newline) = state.buffer.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = state.buffer.drain(..=newline).collect();
                match decode_line(&line) {
                    Decoded::Skip => continue,
                    Decoded::Fragment { text, last } => {
                        state.finished = last;
                        return Some((Ok(text), state));
                    }
                    Decoded::Finished => {
                        debug!("Backend signalled end of stream");
                        return None;
                    }
                    Decoded::Failed(reason) => {
                        state.finished = true;
                        warn!("Backend reported an error mid-stream: {}", reason);
                        return Some((Err(DiagnosticError::stream_interrupted(reason)), state));
                    }
                }
            }

            if state.buffer.len() > MAX_LINE_BYTES {
                state.finished = true;
                state.buffer = Vec::new();
                warn!("Stream unit exceeds {} bytes without a newline", MAX_LINE_BYTES);
                return Some((
                    Err(DiagnosticError::stream_interrupted(format!(
                        "stream unit exceeds {} bytes",
                        MAX_LINE_BYTES
                    ))),
                    state,
                ));
            }

            match state.body.next().await {
                Some(Ok(chunk)) => state.buffer.extend_from_slice(chunk.as_ref()),
                Some(Err(e)) => {
                    state.finished = true;
                    warn!("Stream transport failed: {}", e);
                    return Some((Err(DiagnosticError::stream_interrupted(e.to_string())), state));
                }
                None => {
                    // Connection ended; a final unit may lack its newline
                    state.finished = true;
                    let rest = std::mem::take(&mut state.buffer);
                    return match decode_line(&rest) {
                        Decoded::Fragment { text, .. } => Some((Ok(text), state)),
                        Decoded::Failed(reason) => {
                            Some((Err(DiagnosticError::stream_interrupted(reason)), state))
                        }
                        Decoded::Skip | Decoded::Finished => None,
                    };
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn chunks(parts: &[&'static str]) -> impl Stream<Item = std::result::Result<&'static [u8], String>> {
        stream::iter(parts.iter().map(|p| Ok(p.as_bytes())).collect::<Vec<_>>())
    }

    async fn collect_all(s: impl Stream<Item = Result<String>>) -> Vec<Result<String>> {
        s.collect().await
    }

    #[tokio::test]
    async fn test_fragments_until_done() {
        let body = chunks(&[
            "{\"response\":\"Pod \",\"done\":false}\n{\"response\":\"is \",\"done\":false}\n",
            "{\"response\":\"pending\",\"done\":false}\n{\"response\":\"\",\"done\":true}\n",
            "{\"response\":\"ignored\",\"done\":false}\n",
        ]);
        let out = collect_all(decode_ndjson(body)).await;
        assert_eq!(
            out,
            vec![Ok("Pod ".to_string()), Ok("is ".to_string()), Ok("pending".to_string())]
        );
    }

    #[tokio::test]
    async fn test_unit_split_across_chunks() {
        let body = chunks(&["{\"respo", "nse\":\"Під\",\"do", "ne\":false}\n{\"done\":true}\n"]);
        let out = collect_all(decode_ndjson(body)).await;
        assert_eq!(out, vec![Ok("Під".to_string())]);
    }

    #[tokio::test]
    async fn test_multibyte_char_split_across_chunks() {
        // "ї" is 0xD1 0x97
        let first: &'static [u8] = b"{\"response\":\"\xD1";
        let second: &'static [u8] = b"\x97\"}\n";
        let body = stream::iter(vec![Ok::<_, String>(first), Ok(second)]);
        let out = collect_all(decode_ndjson(body)).await;
        assert_eq!(out, vec![Ok("ї".to_string())]);
    }

    #[tokio::test]
    async fn test_malformed_and_empty_units_skipped() {
        let body = chunks(&[
            "not json\n\n{\"response\":\"\"}\n{\"response\":\"ok\"}\n{\"done\":true}\n",
        ]);
        let out = collect_all(decode_ndjson(body)).await;
        assert_eq!(out, vec![Ok("ok".to_string())]);
    }

    #[tokio::test]
    async fn test_error_unit_interrupts() {
        let body = chunks(&[
            "{\"response\":\"partial\"}\n{\"error\":\"model crashed\"}\n{\"response\":\"never\"}\n",
        ]);
        let out = collect_all(decode_ndjson(body)).await;
        assert_eq!(
            out,
            vec![
                Ok("partial".to_string()),
                Err(DiagnosticError::stream_interrupted("model crashed"))
            ]
        );
    }

    #[tokio::test]
    async fn test_transport_error_interrupts_once() {
        let body = stream::iter(vec![
            Ok::<&'static [u8], String>(b"{\"response\":\"a\"}\n"),
            Err("connection reset".to_string()),
            Ok(&b"{\"response\":\"b\"}\n"[..]),
        ]);
        let out = collect_all(decode_ndjson(body)).await;
        assert_eq!(
            out,
            vec![
                Ok("a".to_string()),
                Err(DiagnosticError::stream_interrupted("connection reset"))
            ]
        );
    }

    #[tokio::test]
    async fn test_trailing_unit_without_newline() {
        let body = chunks(&["{\"response\":\"a\"}\n{\"response\":\"b\"}"]);
        let out = collect_all(decode_ndjson(body)).await;
        assert_eq!(out, vec![Ok("a".to_string()), Ok("b".to_string())]);
    }

    #[tokio::test]
    async fn test_oversized_unit_interrupts() {
        let filler = vec![b'x'; 256 * 1024];
        let mut parts: Vec<std::result::Result<Vec<u8>, String>> =
            vec![Ok(b"{\"response\":\"a\"}\n".to_vec())];
        // Five chunks with no newline, then a unit that must never be read
        parts.extend((0..5).map(|_| Ok(filler.clone())));
        parts.push(Ok(b"\n{\"response\":\"b\"}\n".to_vec()));

        let out = collect_all(decode_ndjson(stream::iter(parts))).await;
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], Ok("a".to_string()));
        assert!(matches!(out[1], Err(DiagnosticError::StreamInterrupted(_))));
    }

    #[tokio::test]
    async fn test_unit_at_cap_still_decoded() {
        let text = "y".repeat(MAX_LINE_BYTES - 64);
        let unit = format!("{{\"response\":\"{}\"}}\n", text);
        let parts: Vec<std::result::Result<Vec<u8>, String>> = unit
            .into_bytes()
            .chunks(100 * 1024)
            .map(|c| Ok(c.to_vec()))
            .collect();

        let out = collect_all(decode_ndjson(stream::iter(parts))).await;
        assert_eq!(out, vec![Ok(text)]);
    }

    #[tokio::test]
    async fn test_done_unit_with_text_is_last() {
        let body = chunks(&["{\"response\":\"all\",\"done\":true}\n{\"response\":\"x\"}\n"]);
        let out = collect_all(decode_ndjson(body)).await;
        assert_eq!(out, vec![Ok("all".to_string())]);
    }

    #[tokio::test]
    async fn test_fragment_stream_fused_after_error() {
        let mut fragments = FragmentStream::new(stream::iter(vec![
            Ok("a".to_string()),
            Err(DiagnosticError::stream_interrupted("boom")),
            Ok("b".to_string()),
        ]));
        assert_eq!(fragments.next().await, Some(Ok("a".to_string())));
        assert!(fragments.next().await.unwrap().is_err());
        assert!(fragments.is_terminated());
        assert_eq!(fragments.next().await, None);
    }

    #[tokio::test]
    async fn test_close_ends_stream() {
        let mut fragments =
            FragmentStream::new(stream::iter(vec![Ok("a".to_string()), Ok("b".to_string())]));
        assert_eq!(fragments.next().await, Some(Ok("a".to_string())));
        fragments.close();
        assert!(fragments.is_closed());
        assert_eq!(fragments.next().await, None);
    }

    #[tokio::test]
    async fn test_collect_text() {
        let fragments =
            FragmentStream::new(stream::iter(vec![Ok("Hello, ".to_string()), Ok("world".to_string())]));
        assert_eq!(fragments.collect_text().await.unwrap(), "Hello, world");
        assert_eq!(FragmentStream::empty().collect_text().await.unwrap(), "");
    }
}
