// prompt-safety-rs/src/lib.rs
// Safety gate for diagnostic prompts. Runs before any backend call when the
// caller opts in; redaction is used for logging only.

pub mod redact;
pub mod rules;
pub mod validator;

pub use redact::{preview, redact};
pub use rules::{RuleCategory, SafetyRule};
pub use validator::{PromptValidator, Validation, DEFAULT_MAX_LENGTH};
