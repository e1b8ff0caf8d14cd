//! Error taxonomy for the diagnostic pipeline
//!
//! Every fallible operation in the workspace returns [`DiagnosticError`].
//! Variants are split into client-side failures (never retried) and
//! backend-side failures; only a single timed-out attempt is retryable.

use thiserror::Error;

/// Result type for diagnostic operations
pub type Result<T> = std::result::Result<T, DiagnosticError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiagnosticError {
    /// Malformed request, e.g. an empty message
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The safety gate refused the text
    #[error("Validation rejected: {0}")]
    ValidationRejected(String),

    /// Backend refused the connection or kept timing out
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// One attempt exceeded its deadline
    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Model '{model}' not found. Install it with `ollama pull {model}` and check `ollama list`")]
    ModelNotFound { model: String },

    /// Streaming connection failed after it was established
    #[error("Stream interrupted: {0}")]
    StreamInterrupted(String),

    /// Any other non-success HTTP status
    #[error("Backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    #[error("Parsing error: {0}")]
    Parsing(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Startup check found a missing prompt layer
    #[error("Layer catalog incomplete: {0}")]
    CatalogIncomplete(String),
}

impl DiagnosticError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        DiagnosticError::InvalidRequest(message.into())
    }

    pub fn validation_rejected(message: impl Into<String>) -> Self {
        DiagnosticError::ValidationRejected(message.into())
    }

    pub fn backend_unavailable(message: impl Into<String>) -> Self {
        DiagnosticError::BackendUnavailable(message.into())
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        DiagnosticError::Timeout(message.into())
    }

    pub fn model_not_found(model: impl Into<String>) -> Self {
        DiagnosticError::ModelNotFound { model: model.into() }
    }

    pub fn stream_interrupted(message: impl Into<String>) -> Self {
        DiagnosticError::StreamInterrupted(message.into())
    }

    pub fn parsing(message: impl Into<String>) -> Self {
        DiagnosticError::Parsing(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        DiagnosticError::Configuration(message.into())
    }

    /// Only timeouts are worth another attempt. Everything else either needs
    /// operator intervention or already failed fast.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DiagnosticError::Timeout(_))
    }

    /// Errors caused by the caller's input rather than the backend
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DiagnosticError::InvalidRequest(_)
                | DiagnosticError::ValidationRejected(_)
                | DiagnosticError::ModelNotFound { .. }
        )
    }

    /// Short machine-readable name, used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            DiagnosticError::InvalidRequest(_) => "invalid_request",
            DiagnosticError::ValidationRejected(_) => "validation_rejected",
            DiagnosticError::BackendUnavailable(_) => "backend_unavailable",
            DiagnosticError::Timeout(_) => "timeout",
            DiagnosticError::ModelNotFound { .. } => "model_not_found",
            DiagnosticError::StreamInterrupted(_) => "stream_interrupted",
            DiagnosticError::Backend { .. } => "backend",
            DiagnosticError::Parsing(_) => "parsing",
            DiagnosticError::Configuration(_) => "configuration",
            DiagnosticError::CatalogIncomplete(_) => "catalog_incomplete",
        }
    }
}

impl From<reqwest::Error> for DiagnosticError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DiagnosticError::Timeout(err.to_string())
        } else if err.is_connect() {
            DiagnosticError::BackendUnavailable(format!("Connection failed: {}", err))
        } else if err.is_decode() {
            DiagnosticError::Parsing(err.to_string())
        } else if let Some(status) = err.status() {
            DiagnosticError::Backend {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            DiagnosticError::BackendUnavailable(err.to_string())
        }
    }
}

impl From<serde_json::Error> for DiagnosticError {
    fn from(err: serde_json::Error) -> Self {
        DiagnosticError::Parsing(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_timeouts_are_retryable() {
        assert!(DiagnosticError::timeout("slow").is_retryable());
        assert!(!DiagnosticError::backend_unavailable("refused").is_retryable());
        assert!(!DiagnosticError::model_not_found("llama3").is_retryable());
        assert!(!DiagnosticError::Backend { status: 500, message: "boom".into() }.is_retryable());
    }

    #[test]
    fn test_client_errors() {
        assert!(DiagnosticError::invalid_request("empty").is_client_error());
        assert!(DiagnosticError::validation_rejected("rm -rf").is_client_error());
        assert!(!DiagnosticError::stream_interrupted("eof").is_client_error());
    }

    #[test]
    fn test_model_not_found_tells_operator_what_to_do() {
        let msg = DiagnosticError::model_not_found("llama3.2:3b-instruct").to_string();
        assert!(msg.contains("'llama3.2:3b-instruct'"));
        assert!(msg.contains("ollama pull llama3.2:3b-instruct"));
    }

    #[tokio::test]
    async fn test_connection_refused_maps_to_unavailable() {
        // Port 9 (discard) is closed on CI hosts
        let err = reqwest::Client::new()
            .get("http://127.0.0.1:9/api/version")
            .send()
            .await
            .unwrap_err();
        let mapped = DiagnosticError::from(err);
        assert_eq!(mapped.kind(), "backend_unavailable");
    }
}
