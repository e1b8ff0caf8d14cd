//! generation-gateway-rs/lib.rs
//! Gateway to the text-generation backend.
//!
//! [`OllamaClient`] implements [`GenerationBackend`], the trait the
//! orchestrator is written against. Non-streaming calls retry timeouts with
//! exponential backoff; streaming calls hand back a [`FragmentStream`].

pub mod backend;
pub mod client;
pub mod models;
pub mod retry;
pub mod stream;

#[cfg(test)]
mod tests;

pub use backend::{is_same_model, GenerationBackend};
pub use client::{OllamaClient, OllamaClientBuilder, OllamaConfig};
pub use models::{ModelDetails, ModelInfo};
pub use retry::RetryPolicy;
pub use stream::{decode_ndjson, FragmentStream};
