//! Mock tests for streaming generation
//!
//! The mock backend answers with newline-delimited JSON the way Ollama does
//! for `stream: true`.

#[cfg(test)]
mod tests {
    use futures::StreamExt;
    use serde_json::json;
    use shared_types_rs::{DiagnosticError, GenerationOptions};
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::backend::GenerationBackend;
    use crate::client::OllamaClient;

    const MODEL: &str = "llama3.2:3b-instruct";

    fn create_test_client(mock_server: &MockServer) -> OllamaClient {
        OllamaClient::builder()
            .base_url(mock_server.uri())
            .model(MODEL)
            .build()
            .expect("Failed to build Ollama client")
    }

    fn ndjson(units: &[serde_json::Value]) -> String {
        units.iter().map(|u| format!("{}\n", u)).collect()
    }

    async fn mount_stream(mock_server: &MockServer, body: String) {
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_partial_json(json!({ "model": MODEL, "stream": true })))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/x-ndjson"))
            .expect(1)
            .mount(mock_server)
            .await;
    }

    #[tokio::test]
    async fn test_three_fragments_then_done() {
        let mock_server = MockServer::start().await;
        mount_stream(
            &mock_server,
            ndjson(&[
                json!({ "model": MODEL, "response": "Check ", "done": false }),
                json!({ "model": MODEL, "response": "the ", "done": false }),
                json!({ "model": MODEL, "response": "events.", "done": false }),
                json!({ "model": MODEL, "response": "", "done": true, "eval_count": 3 }),
                json!({ "model": MODEL, "response": "after done", "done": false }),
            ]),
        )
        .await;

        let client = create_test_client(&mock_server);
        let mut fragments = client
            .stream("Why?", &GenerationOptions::default())
            .await
            .unwrap();

        let mut received = Vec::new();
        while let Some(fragment) = fragments.next().await {
            received.push(fragment.unwrap());
        }
        assert_eq!(received, vec!["Check ", "the ", "events."]);
        assert!(fragments.next().await.is_none());
    }

    #[tokio::test]
    async fn test_stream_concatenation_equals_complete() {
        let mock_server = MockServer::start().await;
        let answer = "Pod is Pending: 0/3 nodes are available.";

        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_partial_json(json!({ "stream": false })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": MODEL,
                "response": answer,
                "done": true
            })))
            .mount(&mock_server)
            .await;

        let pieces = ["Pod is ", "Pending: ", "0/3 nodes ", "are available."];
        let mut units: Vec<_> = pieces
            .iter()
            .map(|p| json!({ "response": p, "done": false }))
            .collect();
        units.push(json!({ "response": "", "done": true }));
        mount_stream(&mock_server, ndjson(&units)).await;

        let client = create_test_client(&mock_server);
        let options = GenerationOptions::default();
        let complete = client.complete("Why?", &options).await.unwrap();
        let streamed = client
            .stream("Why?", &options)
            .await
            .unwrap()
            .collect_text()
            .await
            .unwrap();

        assert_eq!(streamed, complete.text);
    }

    #[tokio::test]
    async fn test_error_unit_interrupts_stream() {
        let mock_server = MockServer::start().await;
        mount_stream(
            &mock_server,
            ndjson(&[
                json!({ "response": "Partial", "done": false }),
                json!({ "error": "llama runner process has terminated" }),
            ]),
        )
        .await;

        let mut fragments = create_test_client(&mock_server)
            .stream("Why?", &GenerationOptions::default())
            .await
            .unwrap();

        assert_eq!(fragments.next().await, Some(Ok("Partial".to_string())));
        assert_eq!(
            fragments.next().await,
            Some(Err(DiagnosticError::stream_interrupted(
                "llama runner process has terminated"
            )))
        );
        assert_eq!(fragments.next().await, None);
    }

    #[tokio::test]
    async fn test_stream_model_not_found_before_first_fragment() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "model not found" })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let err = create_test_client(&mock_server)
            .stream("Why?", &GenerationOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err, DiagnosticError::model_not_found(MODEL));
    }

    #[tokio::test]
    async fn test_close_stops_delivery() {
        let mock_server = MockServer::start().await;
        mount_stream(
            &mock_server,
            ndjson(&[
                json!({ "response": "one ", "done": false }),
                json!({ "response": "two ", "done": false }),
                json!({ "response": "", "done": true }),
            ]),
        )
        .await;

        let mut fragments = create_test_client(&mock_server)
            .stream("Why?", &GenerationOptions::default())
            .await
            .unwrap();

        assert_eq!(fragments.next().await, Some(Ok("one ".to_string())));
        fragments.close();
        assert!(fragments.is_closed());
        assert_eq!(fragments.next().await, None);
    }

    #[tokio::test]
    async fn test_stream_connection_refused() {
        let client = OllamaClient::builder()
            .base_url("http://127.0.0.1:9")
            .build()
            .unwrap();
        let err = client
            .stream("Why?", &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DiagnosticError::BackendUnavailable(_)), "{:?}", err);
    }
}
