// generation-gateway-rs/src/backend.rs
// The seam between the orchestrator and whatever serves generations.

use async_trait::async_trait;
use shared_types_rs::{BackendStatus, ChatMessage, GenerationOptions, GenerationResult, Result};

use crate::stream::FragmentStream;

/// Text-generation backend.
///
/// Implementations must be safe to share between concurrent requests.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Model every call is served by
    fn model(&self) -> &str;

    /// One complete answer for `prompt`
    async fn complete(&self, prompt: &str, options: &GenerationOptions) -> Result<GenerationResult>;

    /// Incremental answer for `prompt`. Errors establishing the stream are
    /// returned here; errors after that arrive through the stream.
    async fn stream(&self, prompt: &str, options: &GenerationOptions) -> Result<FragmentStream>;

    /// Multi-turn conversation
    async fn chat(&self, messages: &[ChatMessage], options: &GenerationOptions) -> Result<GenerationResult>;

    /// Whether the backend answers at all. Never fails.
    async fn health(&self) -> bool;

    async fn list_models(&self) -> Result<Vec<String>>;

    /// Reachability plus whether the configured model is installed
    async fn status(&self) -> BackendStatus {
        let reachable = self.health().await;
        let installed_models = if reachable {
            match self.list_models().await {
                Ok(models) => models,
                Err(e) => {
                    tracing::warn!("Failed to list installed models: {}", e);
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        let model = self.model().to_string();
        let model_installed = installed_models.iter().any(|m| is_same_model(m, &model));
        BackendStatus {
            reachable,
            model,
            model_installed,
            installed_models,
        }
    }
}

/// Ollama reports untagged models as `name:latest`
pub fn is_same_model(installed: &str, configured: &str) -> bool {
    let normalize = |name: &str| {
        if name.contains(':') {
            name.to_string()
        } else {
            format!("{}:latest", name)
        }
    };
    normalize(installed) == normalize(configured)
}
