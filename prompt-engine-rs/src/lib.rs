//! prompt-engine-rs/lib.rs
//! Language detection and layered prompt composition.
//!
//! A composed prompt is built from a validated [`LayerCatalog`]; the
//! [`PromptComposer`] picks one persona, platform and resource layer per
//! request and appends the cluster context and the user's message.

pub mod catalog;
pub mod composer;
pub mod detector;
pub mod resource;
pub mod templates;

pub use catalog::{LayerCatalog, LayerKey, LayerKind};
pub use composer::{truncate_middle, PromptComposer, PromptLayers};
pub use detector::LanguageDetector;
pub use resource::ResourceKind;
