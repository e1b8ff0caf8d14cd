// diagnostic-orchestrator-rs/src/framing.rs
// Caller-facing frames for a streamed diagnosis.

use futures::stream::{self, Stream, StreamExt};
use shared_types_rs::{Result, StreamEvent};

/// One `chunk` event per fragment, then exactly one terminal event: the
/// final `done` frame when the fragments end, or an error frame on the
/// first failure. Nothing follows the terminal event.
pub fn frame_events<S>(fragments: S) -> impl Stream<Item = StreamEvent>
where
    S: Stream<Item = Result<String>> + Unpin,
{
    stream::unfold(Some(fragments), |state| async move {
        let Some(mut fragments) = state else {
            return None;
        };
        match fragments.next().await {
            Some(Ok(text)) => Some((StreamEvent::fragment(text), Some(fragments))),
            Some(Err(e)) => {
                tracing::debug!(kind = e.kind(), "Stream ended with an error frame");
                Some((StreamEvent::failed(e.to_string()), None))
            }
            None => Some((StreamEvent::finished(), None)),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types_rs::DiagnosticError;

    #[tokio::test]
    async fn test_fragments_then_done() {
        let fragments = stream::iter(vec![Ok("a".to_string()), Ok("b".to_string())]);
        let events: Vec<_> = frame_events(fragments).collect().await;
        assert_eq!(
            events,
            vec![
                StreamEvent::fragment("a"),
                StreamEvent::fragment("b"),
                StreamEvent::finished()
            ]
        );
    }

    #[tokio::test]
    async fn test_error_is_terminal() {
        let fragments = stream::iter(vec![
            Ok("partial".to_string()),
            Err(DiagnosticError::stream_interrupted("reset")),
            Ok("never".to_string()),
        ]);
        let events: Vec<_> = frame_events(fragments).collect().await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], StreamEvent::failed("Stream interrupted: reset"));
        assert!(events[1].is_terminal());
    }

    #[tokio::test]
    async fn test_empty_stream_still_finishes() {
        let events: Vec<_> = frame_events(stream::empty::<Result<String>>()).collect().await;
        assert_eq!(events, vec![StreamEvent::finished()]);
    }

    #[tokio::test]
    async fn test_wire_lines() {
        let fragments = stream::iter(vec![Ok("Під".to_string())]);
        let lines: Vec<String> = frame_events(fragments)
            .map(|e| e.to_json_line().unwrap())
            .collect()
            .await;
        assert_eq!(lines[0], r#"{"chunk":"Під","done":false}"#);
        assert_eq!(lines[1], r#"{"chunk":"","done":true}"#);
    }
}
