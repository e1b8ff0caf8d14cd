//! diagnostic-orchestrator-rs/lib.rs
//! The façade callers use to get a diagnosis.
//!
//! [`DiagnosticOrchestrator`] resolves the request language, composes the
//! layered prompt and dispatches it to a [`GenerationBackend`], either for a
//! complete answer or as a stream. [`frame_events`] turns a fragment stream
//! into the frames sent to streaming callers.
//!
//! [`GenerationBackend`]: generation_gateway_rs::GenerationBackend

pub mod framing;
pub mod orchestrator;
pub mod stage;

pub use framing::frame_events;
pub use orchestrator::{DiagnosticOrchestrator, PreparedPrompt};
pub use stage::DiagnosisStage;
