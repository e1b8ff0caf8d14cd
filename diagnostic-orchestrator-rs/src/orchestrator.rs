// diagnostic-orchestrator-rs/src/orchestrator.rs
//
// Per request:
//   received -> language-resolved -> prompt-composed -> dispatched
//            -> (streaming) -> completed | failed
//
// Nothing here validates the request; callers run the safety gate first
// when they want it. Raw prompts are never logged, only redacted previews.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use config_rs::Settings;
use futures::future;
use futures::stream::{self, StreamExt, TryStreamExt};
use generation_gateway_rs::{FragmentStream, GenerationBackend, OllamaClient};
use prompt_engine_rs::{LanguageDetector, PromptComposer};
use prompt_safety_rs::preview;
use shared_types_rs::{
    BackendStatus, ChatMessage, DiagnosticRequest, GenerationOptions, GenerationResult, Language,
    Result,
};
use tracing::{debug, info, warn};

use crate::stage::DiagnosisStage;

const PREVIEW_CHARS: usize = 200;

/// Shared between a diagnosis stream and its completion log
#[derive(Debug, Default)]
struct StreamProgress {
    dispatched_at: OnceLock<Instant>,
    fragments: AtomicUsize,
}

impl StreamProgress {
    fn latency_ms(&self) -> u64 {
        self.dispatched_at
            .get()
            .map(|at| at.elapsed().as_millis() as u64)
            .unwrap_or_default()
    }
}

/// A composed prompt and the language it was composed in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedPrompt {
    pub language: Language,
    pub prompt: String,
}

/// Entry point for diagnoses. Construct once and share; clones are cheap
/// and use the same backend connection pool.
#[derive(Clone)]
pub struct DiagnosticOrchestrator {
    backend: Arc<dyn GenerationBackend>,
    composer: Arc<PromptComposer>,
    detector: LanguageDetector,
    options: GenerationOptions,
    default_language: Language,
}

impl DiagnosticOrchestrator {
    pub fn new(
        backend: Arc<dyn GenerationBackend>,
        composer: PromptComposer,
        detector: LanguageDetector,
        options: GenerationOptions,
    ) -> Self {
        Self {
            backend,
            composer: Arc::new(composer),
            detector,
            options,
            default_language: Language::default(),
        }
    }

    /// Ollama backend, built-in layer catalog, and limits from `settings`
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let backend = OllamaClient::from_settings(settings)?;
        let composer = PromptComposer::with_builtin(settings.cloud_provider)?
            .with_command_output_limit(settings.max_command_output_chars);

        info!(
            model = %settings.model,
            provider = %settings.cloud_provider,
            "Diagnostic orchestrator ready"
        );

        Ok(Self::new(
            Arc::new(backend),
            composer,
            LanguageDetector::default(),
            settings.generation_options(),
        )
        .with_default_language(settings.default_language))
    }

    /// Language for chat calls that do not name one
    pub fn with_default_language(mut self, language: Language) -> Self {
        self.default_language = language;
        self
    }

    pub fn backend(&self) -> &Arc<dyn GenerationBackend> {
        &self.backend
    }

    pub fn composer(&self) -> &PromptComposer {
        &self.composer
    }

    pub fn options(&self) -> GenerationOptions {
        self.options
    }

    /// Explicit request language wins over detection
    pub fn resolve_language(&self, request: &DiagnosticRequest) -> Language {
        request
            .language()
            .unwrap_or_else(|| self.detector.detect(request.user_message()))
    }

    pub fn prepare(&self, request: &DiagnosticRequest) -> PreparedPrompt {
        debug!(
            stage = %DiagnosisStage::Received,
            message_chars = request.user_message().chars().count(),
            has_command_output = request.raw_command_output().is_some(),
            resource_type = request.resource_type().unwrap_or("-"),
            namespace = request.namespace(),
            "Diagnosis request received"
        );

        let language = self.resolve_language(request);
        debug!(
            stage = %DiagnosisStage::LanguageResolved,
            language = language.code(),
            explicit = request.language().is_some(),
            "Language resolved"
        );

        let prompt = self.composer.compose(request, language);
        debug!(
            stage = %DiagnosisStage::PromptComposed,
            prompt_chars = prompt.chars().count(),
            preview = %preview(&prompt, PREVIEW_CHARS),
            "Prompt composed"
        );

        PreparedPrompt { language, prompt }
    }

    /// Complete answer for one request
    pub async fn diagnose(&self, request: &DiagnosticRequest) -> Result<GenerationResult> {
        let prepared = self.prepare(request);

        info!(
            stage = %DiagnosisStage::Dispatched,
            language = prepared.language.code(),
            model = self.backend.model(),
            "Dispatching diagnosis"
        );

        let started = Instant::now();
        match self.backend.complete(&prepared.prompt, &self.options).await {
            Ok(result) => {
                info!(
                    stage = %DiagnosisStage::Completed,
                    tokens = result.tokens_generated,
                    prompt_tokens = result.prompt_tokens,
                    elapsed_s = result.generation_time_seconds,
                    latency_ms = started.elapsed().as_millis() as u64,
                    "Diagnosis completed"
                );
                Ok(result)
            }
            Err(e) => {
                warn!(
                    stage = %DiagnosisStage::Failed,
                    kind = e.kind(),
                    latency_ms = started.elapsed().as_millis() as u64,
                    "Diagnosis failed: {}",
                    e
                );
                Err(e)
            }
        }
    }

    /// Incremental answer for one request.
    ///
    /// The prompt is composed now; the backend is not contacted until the
    /// returned stream is first polled. Failures to open the stream arrive
    /// as its first and only item.
    pub fn diagnose_stream(&self, request: &DiagnosticRequest) -> FragmentStream {
        let prepared = self.prepare(request);
        let backend = Arc::clone(&self.backend);
        let options = self.options;
        let language = prepared.language;
        let progress = Arc::new(StreamProgress::default());

        let opening = Arc::clone(&progress);
        let counting = Arc::clone(&progress);
        let failing = Arc::clone(&progress);

        let fragments = stream::once(async move {
            opening.dispatched_at.get_or_init(Instant::now);
            info!(
                stage = %DiagnosisStage::Dispatched,
                language = language.code(),
                model = backend.model(),
                "Opening diagnosis stream"
            );
            let opened = backend.stream(&prepared.prompt, &options).await;
            if opened.is_ok() {
                debug!(
                    stage = %DiagnosisStage::Streaming,
                    latency_ms = opening.latency_ms(),
                    "Diagnosis stream open"
                );
            }
            opened
        })
        .try_flatten()
        .inspect_ok(move |_| {
            counting.fragments.fetch_add(1, Ordering::Relaxed);
        })
        .inspect_err(move |e| {
            warn!(
                stage = %DiagnosisStage::Failed,
                kind = e.kind(),
                fragments = failing.fragments.load(Ordering::Relaxed),
                latency_ms = failing.latency_ms(),
                "Diagnosis stream failed: {}",
                e
            );
        })
        // FragmentStream stops at the first error, so this runs only after a
        // clean end of the backend stream
        .chain(
            stream::once(async move {
                info!(
                    stage = %DiagnosisStage::Completed,
                    fragments = progress.fragments.load(Ordering::Relaxed),
                    latency_ms = progress.latency_ms(),
                    "Diagnosis stream completed"
                );
            })
            .filter_map(|()| future::ready(None::<Result<String>>)),
        );

        FragmentStream::new(fragments)
    }

    /// Multi-turn conversation. The persona and platform layers for
    /// `language` (or the default language) go first as the system message.
    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        language: Option<Language>,
    ) -> Result<GenerationResult> {
        let language = language.unwrap_or(self.default_language);
        let mut conversation = Vec::with_capacity(messages.len() + 1);
        conversation.push(ChatMessage::system(self.composer.system_prompt(language, true)));
        conversation.extend_from_slice(messages);

        info!(
            stage = %DiagnosisStage::Dispatched,
            language = language.code(),
            turns = messages.len(),
            "Dispatching chat"
        );

        let started = Instant::now();
        let result = self.backend.chat(&conversation, &self.options).await;
        let latency_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(r) => info!(
                stage = %DiagnosisStage::Completed,
                tokens = r.tokens_generated,
                latency_ms,
                "Chat completed"
            ),
            Err(e) => warn!(
                stage = %DiagnosisStage::Failed,
                kind = e.kind(),
                latency_ms,
                "Chat failed: {}",
                e
            ),
        }
        result
    }

    pub async fn backend_status(&self) -> BackendStatus {
        let status = self.backend.status().await;
        info!(
            status = status.status_label(),
            model = %status.model,
            installed = status.installed_models.len(),
            "Backend status checked"
        );
        status
    }
}
