// shared-types-rs/src/generation.rs
// Generation parameters and results exchanged with the backend.

use serde::{Deserialize, Serialize};

/// Sampling parameters sent with every generation call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 2000,
        }
    }
}

/// A complete (non-streamed) answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub text: String,
    pub backend_model_id: String,
    pub tokens_generated: u64,
    pub generation_time_seconds: f64,
    pub prompt_tokens: u64,
    /// Nothing is cached in this pipeline, so this is always false
    pub served_from_cache: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: ChatRole::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: ChatRole::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: ChatRole::Assistant, content: content.into() }
    }
}

/// Snapshot of the backend as seen by a health check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendStatus {
    pub reachable: bool,
    pub model: String,
    pub model_installed: bool,
    pub installed_models: Vec<String>,
}

impl BackendStatus {
    pub fn is_ready(&self) -> bool {
        self.reachable && self.model_installed
    }

    pub fn status_label(&self) -> &'static str {
        match (self.reachable, self.model_installed) {
            (true, true) => "healthy",
            (true, false) => "degraded",
            (false, _) => "unhealthy",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_roles_serialize_lowercase() {
        let json = serde_json::to_value(ChatMessage::system("be brief")).unwrap();
        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "be brief");
    }

    #[test]
    fn test_status_label() {
        let mut status = BackendStatus {
            reachable: true,
            model: "llama3.2:3b-instruct".into(),
            model_installed: true,
            installed_models: vec!["llama3.2:3b-instruct".into()],
        };
        assert_eq!(status.status_label(), "healthy");
        status.model_installed = false;
        assert_eq!(status.status_label(), "degraded");
        status.reachable = false;
        assert_eq!(status.status_label(), "unhealthy");
        assert!(!status.is_ready());
    }
}
