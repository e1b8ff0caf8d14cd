//! shared-types-rs/lib.rs
//! Data model shared across the diagnostic pipeline: requests, languages,
//! generation results, stream framing and the error taxonomy.

pub mod command;
pub mod error;
pub mod generation;
pub mod language;
pub mod request;
pub mod security;
pub mod stream;

pub use command::CommandOutput;
pub use error::{DiagnosticError, Result};
pub use generation::{BackendStatus, ChatMessage, ChatRole, GenerationOptions, GenerationResult};
pub use language::{CloudProvider, Language};
pub use request::{ClusterContext, DiagnosticRequest, DEFAULT_NAMESPACE};
pub use security::SecurityClassification;
pub use stream::StreamEvent;
