//! config-rs/lib.rs
//! Settings for the diagnostic pipeline, read from the environment
//! (and a `.env` file when present) with typed defaults.

use std::cell::RefCell;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use shared_types_rs::{CloudProvider, GenerationOptions, Language};
use thiserror::Error;

pub const DEFAULT_BACKEND_HOST: &str = "localhost";
pub const DEFAULT_BACKEND_PORT: u16 = 11434;
pub const DEFAULT_MODEL: &str = "llama3.2:3b-instruct";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid { key, reason: reason.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Typed reads over a key lookup. Unparsable values fall back to their
/// defaults and the fallback is remembered as a warning.
struct EnvReader<F> {
    lookup: F,
    warnings: RefCell<Vec<String>>,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn new(lookup: F) -> Self {
        Self { lookup, warnings: RefCell::new(Vec::new()) }
    }

    fn non_empty(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.trim().is_empty())
    }

    fn parse_or<T: FromStr>(&self, key: &str, default: T) -> T {
        match (self.lookup)(key) {
            Some(value) => value.trim().parse::<T>().unwrap_or_else(|_| {
                self.warnings
                    .borrow_mut()
                    .push(format!("Invalid value '{}' in {}, using default", value, key));
                default
            }),
            None => default,
        }
    }

    /// Base URL of the generation backend.
    ///
    /// `OLLAMA_URL` wins when set; otherwise the URL is built from
    /// `OLLAMA_HOST` (default "localhost") and `OLLAMA_PORT` (default 11434).
    fn backend_url(&self) -> String {
        if let Some(url) = self.non_empty("OLLAMA_URL") {
            return url.trim().trim_end_matches('/').to_string();
        }

        let host = self
            .non_empty("OLLAMA_HOST")
            .unwrap_or_else(|| DEFAULT_BACKEND_HOST.to_string());
        let port = self.parse_or("OLLAMA_PORT", DEFAULT_BACKEND_PORT);
        format!("http://{}:{}", host, port)
    }

    fn into_warnings(self) -> Vec<String> {
        self.warnings.into_inner()
    }
}

/// Complete runtime configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub backend_url: String,
    pub model: String,
    /// Deadline for one non-streaming backend call
    pub request_timeout: Duration,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Attempt cap for timed-out calls, the first attempt included
    pub max_retries: u32,
    pub retry_base_delay: Duration,
    pub default_language: Language,
    pub cloud_provider: CloudProvider,
    pub max_prompt_length: usize,
    pub max_command_output_chars: usize,
    pub namespace: String,
    pub cluster_name: Option<String>,
    pub region: Option<String>,
    pub log_level: String,
    pub log_format: LogFormat,
    pub log_dir: Option<PathBuf>,
    /// Fallbacks taken while reading the environment. Logging is usually not
    /// up yet at that point; see [`Settings::report_warnings`].
    pub warnings: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: format!("http://{}:{}", DEFAULT_BACKEND_HOST, DEFAULT_BACKEND_PORT),
            model: DEFAULT_MODEL.to_string(),
            request_timeout: Duration::from_secs(120),
            temperature: 0.7,
            max_tokens: 2000,
            max_retries: 3,
            retry_base_delay: Duration::from_millis(1000),
            default_language: Language::Ukrainian,
            cloud_provider: CloudProvider::AwsEc2,
            max_prompt_length: 8000,
            max_command_output_chars: 4000,
            namespace: "default".to_string(),
            cluster_name: None,
            region: None,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            log_dir: None,
            warnings: Vec::new(),
        }
    }
}

impl Settings {
    /// Load `.env` if present, read the environment and validate the result
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        let settings = Self::from_env();
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup. Unparsable values fall
    /// back to their defaults and are recorded in `warnings`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Settings::default();
        let vars = EnvReader::new(lookup);

        let mut settings = Self {
            backend_url: vars.backend_url(),
            model: vars.non_empty("OLLAMA_MODEL").unwrap_or(d.model),
            request_timeout: Duration::from_secs(
                vars.parse_or("OLLAMA_TIMEOUT", d.request_timeout.as_secs()),
            ),
            temperature: vars.parse_or("LLM_TEMPERATURE", d.temperature),
            max_tokens: vars.parse_or("LLM_MAX_TOKENS", d.max_tokens),
            max_retries: vars.parse_or("LLM_MAX_RETRIES", d.max_retries),
            retry_base_delay: Duration::from_millis(
                vars.parse_or("LLM_RETRY_BASE_MS", d.retry_base_delay.as_millis() as u64),
            ),
            default_language: vars.parse_or("DEFAULT_LANGUAGE", d.default_language),
            cloud_provider: vars.parse_or("CLOUD_PROVIDER", d.cloud_provider),
            max_prompt_length: vars.parse_or("MAX_PROMPT_LENGTH", d.max_prompt_length),
            max_command_output_chars: vars
                .parse_or("MAX_COMMAND_OUTPUT_CHARS", d.max_command_output_chars),
            namespace: vars.non_empty("K8S_NAMESPACE").unwrap_or(d.namespace),
            cluster_name: vars
                .non_empty("CLUSTER_NAME")
                .or_else(|| vars.non_empty("EKS_CLUSTER_NAME")),
            region: vars
                .non_empty("CLUSTER_REGION")
                .or_else(|| vars.non_empty("AWS_REGION")),
            log_level: vars
                .non_empty("LOG_LEVEL")
                .map(|l| l.to_lowercase())
                .unwrap_or(d.log_level),
            log_format: vars.parse_or("LOG_FORMAT", d.log_format),
            log_dir: vars.non_empty("LOG_DIR").map(PathBuf::from),
            warnings: Vec::new(),
        };
        settings.warnings = vars.into_warnings();
        settings
    }

    /// Emit the fallbacks taken while loading. Call once logging is set up.
    pub fn report_warnings(&self) {
        for warning in &self.warnings {
            log::warn!("{}", warning);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.backend_url.starts_with("http://") || self.backend_url.starts_with("https://")) {
            return Err(ConfigError::invalid(
                "OLLAMA_URL",
                format!("'{}' must start with http:// or https://", self.backend_url),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::invalid("OLLAMA_MODEL", "must not be empty"));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::invalid("OLLAMA_TIMEOUT", "must be greater than zero"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::invalid(
                "LLM_TEMPERATURE",
                format!("{} is outside 0.0..=2.0", self.temperature),
            ));
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::invalid("LLM_MAX_TOKENS", "must be greater than zero"));
        }
        if self.max_prompt_length == 0 {
            return Err(ConfigError::invalid("MAX_PROMPT_LENGTH", "must be greater than zero"));
        }
        Ok(())
    }

    pub fn generation_options(&self) -> GenerationOptions {
        GenerationOptions {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}
