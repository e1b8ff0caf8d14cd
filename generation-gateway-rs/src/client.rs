// generation-gateway-rs/src/client.rs
//
// HTTP client for an Ollama-compatible generation backend
//
// This module provides:
// - Completion and chat calls retried on timeout with exponential backoff
// - Streaming completion decoded from newline-delimited JSON
// - Health, model listing and model metadata lookups
//
// Configuration comes from `config_rs::Settings` (OLLAMA_URL, OLLAMA_MODEL,
// OLLAMA_TIMEOUT, LLM_MAX_RETRIES, LLM_RETRY_BASE_MS) or the builder.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use config_rs::Settings;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types_rs::{ChatMessage, DiagnosticError, GenerationOptions, GenerationResult, Result};
use tracing::{debug, error, info, warn};

use crate::backend::GenerationBackend;
use crate::models::{
    ChatRequest, ChatResponse, ErrorBody, GenerateRequest, GenerateResponse, ModelInfo,
    ShowRequest, TagsResponse, VersionResponse,
};
use crate::retry::RetryPolicy;
use crate::stream::{decode_ndjson, FragmentStream};

const GENERATE_PATH: &str = "/api/generate";
const CHAT_PATH: &str = "/api/chat";
const TAGS_PATH: &str = "/api/tags";
const SHOW_PATH: &str = "/api/show";
const VERSION_PATH: &str = "/api/version";

#[derive(Debug, Clone, PartialEq)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
    /// Deadline for one non-streaming attempt
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub health_timeout: Duration,
    pub list_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl OllamaConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            base_url: settings.backend_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            request_timeout: settings.request_timeout,
            connect_timeout: Duration::from_secs(10),
            health_timeout: Duration::from_secs(5),
            list_timeout: Duration::from_secs(10),
            retry: RetryPolicy::new(settings.max_retries, settings.retry_base_delay),
        }
    }

    fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(DiagnosticError::configuration(format!(
                "Backend URL '{}' must start with http:// or https://",
                self.base_url
            )));
        }
        if self.model.trim().is_empty() {
            return Err(DiagnosticError::configuration("Model name is required"));
        }
        Ok(())
    }
}

/// Cheap to clone; clones share one connection pool
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: Client,
    config: Arc<OllamaConfig>,
}

impl OllamaClient {
    pub fn new(config: OllamaConfig) -> Result<Self> {
        config.validate()?;

        let http = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| DiagnosticError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        info!(
            base_url = %config.base_url,
            model = %config.model,
            max_attempts = config.retry.max_attempts(),
            "Ollama client initialized"
        );

        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(OllamaConfig::from_settings(settings))
    }

    pub fn builder() -> OllamaClientBuilder {
        OllamaClientBuilder::new()
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Map a non-success response onto the error taxonomy. A 404, or a body
    /// saying the model is missing, becomes `ModelNotFound` when a model
    /// name is known.
    async fn error_for_status(response: Response, model: Option<&str>) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or(text);

        if let Some(model) = model {
            if status == StatusCode::NOT_FOUND || is_model_missing(&message) {
                return Err(DiagnosticError::model_not_found(model));
            }
        }

        Err(DiagnosticError::Backend {
            status: status.as_u16(),
            message,
        })
    }

    // One attempt; the retry policy decides whether to call again
    async fn post_json<T, R>(&self, path: &str, body: &T, model: &str) -> Result<R>
    where
        T: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .http
            .post(self.endpoint(path))
            .timeout(self.config.request_timeout)
            .json(body)
            .send()
            .await?;
        let response = Self::error_for_status(response, Some(model)).await?;
        Ok(response.json::<R>().await?)
    }

    /// Backend version string from `/api/version`
    pub async fn version(&self) -> Result<String> {
        let response = self
            .http
            .get(self.endpoint(VERSION_PATH))
            .timeout(self.config.health_timeout)
            .send()
            .await?;
        let response = Self::error_for_status(response, None).await?;
        Ok(response.json::<VersionResponse>().await?.version)
    }

    /// Metadata for an installed model
    pub async fn model_info(&self, name: &str) -> Result<ModelInfo> {
        let request = ShowRequest { model: name, name };
        let response = self
            .http
            .post(self.endpoint(SHOW_PATH))
            .timeout(self.config.list_timeout)
            .json(&request)
            .send()
            .await?;
        let response = Self::error_for_status(response, Some(name)).await?;
        Ok(response.json::<ModelInfo>().await?)
    }
}

fn is_model_missing(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("model") && message.contains("not found")
}

#[async_trait]
impl GenerationBackend for OllamaClient {
    fn model(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, prompt: &str, options: &GenerationOptions) -> Result<GenerationResult> {
        let model = self.config.model.as_str();
        let request = GenerateRequest {
            model,
            prompt,
            stream: false,
            options: options.into(),
        };

        debug!(
            model,
            prompt_chars = prompt.chars().count(),
            max_tokens = options.max_tokens,
            "Sending generation request"
        );

        let started = Instant::now();
        let response: GenerateResponse = self
            .config
            .retry
            .run("generate", |attempt| {
                if attempt > 1 {
                    info!("Retry attempt {} for generation request", attempt);
                }
                self.post_json(GENERATE_PATH, &request, model)
            })
            .await?;
        let elapsed = started.elapsed().as_secs_f64();

        let result = GenerationResult {
            text: response.response,
            backend_model_id: response.model.unwrap_or_else(|| model.to_string()),
            tokens_generated: response.eval_count.unwrap_or(0),
            generation_time_seconds: elapsed,
            prompt_tokens: response.prompt_eval_count.unwrap_or(0),
            served_from_cache: false,
        };

        info!(
            model = %result.backend_model_id,
            tokens = result.tokens_generated,
            prompt_tokens = result.prompt_tokens,
            elapsed_s = elapsed,
            "Generation completed"
        );
        Ok(result)
    }

    async fn stream(&self, prompt: &str, options: &GenerationOptions) -> Result<FragmentStream> {
        let model = self.config.model.as_str();
        let request = GenerateRequest {
            model,
            prompt,
            stream: true,
            options: options.into(),
        };

        debug!(model, prompt_chars = prompt.chars().count(), "Opening generation stream");

        // No total deadline: the body stays open for the whole generation
        let response = self
            .http
            .post(self.endpoint(GENERATE_PATH))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                let err = DiagnosticError::from(e);
                error!(kind = err.kind(), "Failed to open generation stream: {}", err);
                err
            })?;
        let response = Self::error_for_status(response, Some(model)).await?;

        Ok(FragmentStream::new(decode_ndjson(response.bytes_stream())))
    }

    async fn chat(&self, messages: &[ChatMessage], options: &GenerationOptions) -> Result<GenerationResult> {
        if messages.is_empty() {
            return Err(DiagnosticError::invalid_request("Chat needs at least one message"));
        }

        let model = self.config.model.as_str();
        let request = ChatRequest {
            model,
            messages,
            stream: false,
            options: options.into(),
        };

        debug!(model, messages = messages.len(), "Sending chat request");

        let started = Instant::now();
        let response: ChatResponse = self
            .config
            .retry
            .run("chat", |attempt| {
                if attempt > 1 {
                    info!("Retry attempt {} for chat request", attempt);
                }
                self.post_json(CHAT_PATH, &request, model)
            })
            .await?;
        let elapsed = started.elapsed().as_secs_f64();

        info!(
            tokens = response.eval_count.unwrap_or(0),
            elapsed_s = elapsed,
            "Chat completed"
        );

        Ok(GenerationResult {
            text: response.message.content,
            backend_model_id: response.model.unwrap_or_else(|| model.to_string()),
            tokens_generated: response.eval_count.unwrap_or(0),
            generation_time_seconds: elapsed,
            prompt_tokens: response.prompt_eval_count.unwrap_or(0),
            served_from_cache: false,
        })
    }

    async fn health(&self) -> bool {
        match self.version().await {
            Ok(version) => {
                debug!(version = %version, "Backend reachable");
                true
            }
            Err(e) => {
                warn!("Backend health check failed: {}", e);
                false
            }
        }
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        let response = self
            .http
            .get(self.endpoint(TAGS_PATH))
            .timeout(self.config.list_timeout)
            .send()
            .await?;
        let response = Self::error_for_status(response, None).await?;
        let tags = response.json::<TagsResponse>().await?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}

/// Builder starting from [`OllamaConfig::default`]
#[derive(Debug, Default)]
pub struct OllamaClientBuilder {
    base_url: Option<String>,
    model: Option<String>,
    request_timeout: Option<Duration>,
    health_timeout: Option<Duration>,
    list_timeout: Option<Duration>,
    retry: Option<RetryPolicy>,
}

impl OllamaClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Deadline for one non-streaming attempt
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = Some(timeout);
        self
    }

    pub fn list_timeout(mut self, timeout: Duration) -> Self {
        self.list_timeout = Some(timeout);
        self
    }

    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }

    pub fn build(self) -> Result<OllamaClient> {
        let mut config = OllamaConfig::default();

        if let Some(base_url) = self.base_url {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(model) = self.model {
            config.model = model;
        }
        if let Some(timeout) = self.request_timeout {
            config.request_timeout = timeout;
        }
        if let Some(timeout) = self.health_timeout {
            config.health_timeout = timeout;
        }
        if let Some(timeout) = self.list_timeout {
            config.list_timeout = timeout;
        }
        if let Some(retry) = self.retry {
            config.retry = retry;
        }

        OllamaClient::new(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_settings() {
        let settings = Settings {
            backend_url: "http://gpu:11434/".to_string(),
            max_retries: 5,
            retry_base_delay: Duration::from_millis(250),
            ..Settings::default()
        };
        let config = OllamaConfig::from_settings(&settings);
        assert_eq!(config.base_url, "http://gpu:11434");
        assert_eq!(config.retry, RetryPolicy::new(5, Duration::from_millis(250)));
        assert_eq!(config.health_timeout, Duration::from_secs(5));
        assert_eq!(config.list_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_builder_rejects_bad_url() {
        let err = OllamaClient::builder().base_url("localhost:11434").build().unwrap_err();
        assert!(matches!(err, DiagnosticError::Configuration(_)));
    }

    #[test]
    fn test_builder_rejects_empty_model() {
        let err = OllamaClient::builder().model("  ").build().unwrap_err();
        assert!(matches!(err, DiagnosticError::Configuration(_)));
    }

    #[test]
    fn test_model_missing_message() {
        assert!(is_model_missing("model 'llama3' not found, try pulling it first"));
        assert!(!is_model_missing("invalid options"));
    }

    #[test]
    fn test_client_is_shareable() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<OllamaClient>();
    }
}
