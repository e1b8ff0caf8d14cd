// prompt-engine-rs/src/catalog.rs
// Layer texts addressed by (language, layer kind, tag).

use std::collections::{BTreeMap, BTreeSet};

use shared_types_rs::{CloudProvider, DiagnosticError, Language, Result};

use crate::resource::ResourceKind;
use crate::templates::{en, uk};

/// Tag of the single persona layer per language
pub const PERSONA_TAG: &str = "base";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerKind {
    Persona,
    Platform,
    Resource,
}

impl LayerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerKind::Persona => "persona",
            LayerKind::Platform => "platform",
            LayerKind::Resource => "resource",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerKey {
    pub language: Language,
    pub kind: LayerKind,
    pub tag: String,
}

impl LayerKey {
    pub fn new(language: Language, kind: LayerKind, tag: impl Into<String>) -> Self {
        Self { language, kind, tag: tag.into() }
    }
}

/// Registry of every layer text the composer can select.
///
/// Lookups never invent text: a missing entry is reported by
/// [`LayerCatalog::validate`] at startup instead of silently becoming empty.
#[derive(Debug, Clone, Default)]
pub struct LayerCatalog {
    layers: BTreeMap<LayerKey, String>,
}

impl LayerCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// All shipped texts: one persona per language, every cloud provider
    /// except `none`, and every [`ResourceKind`].
    pub fn builtin() -> Self {
        use Language::{English as En, Ukrainian as Uk};
        use LayerKind::{Persona, Platform, Resource};

        let entries: [(Language, LayerKind, &str, &str); 22] = [
            (Uk, Persona, PERSONA_TAG, uk::PERSONA),
            (En, Persona, PERSONA_TAG, en::PERSONA),
            (Uk, Platform, CloudProvider::AwsEks.tag(), uk::PLATFORM_AWS_EKS),
            (En, Platform, CloudProvider::AwsEks.tag(), en::PLATFORM_AWS_EKS),
            (Uk, Platform, CloudProvider::AwsEc2.tag(), uk::PLATFORM_AWS_EC2),
            (En, Platform, CloudProvider::AwsEc2.tag(), en::PLATFORM_AWS_EC2),
            (Uk, Platform, CloudProvider::GcpGke.tag(), uk::PLATFORM_GCP_GKE),
            (En, Platform, CloudProvider::GcpGke.tag(), en::PLATFORM_GCP_GKE),
            (Uk, Platform, CloudProvider::AzureAks.tag(), uk::PLATFORM_AZURE_AKS),
            (En, Platform, CloudProvider::AzureAks.tag(), en::PLATFORM_AZURE_AKS),
            (Uk, Platform, CloudProvider::BareMetal.tag(), uk::PLATFORM_BARE_METAL),
            (En, Platform, CloudProvider::BareMetal.tag(), en::PLATFORM_BARE_METAL),
            (Uk, Resource, ResourceKind::Pod.tag(), uk::RESOURCE_POD),
            (En, Resource, ResourceKind::Pod.tag(), en::RESOURCE_POD),
            (Uk, Resource, ResourceKind::Network.tag(), uk::RESOURCE_NETWORK),
            (En, Resource, ResourceKind::Network.tag(), en::RESOURCE_NETWORK),
            (Uk, Resource, ResourceKind::Node.tag(), uk::RESOURCE_NODE),
            (En, Resource, ResourceKind::Node.tag(), en::RESOURCE_NODE),
            (Uk, Resource, ResourceKind::Deployment.tag(), uk::RESOURCE_DEPLOYMENT),
            (En, Resource, ResourceKind::Deployment.tag(), en::RESOURCE_DEPLOYMENT),
            (Uk, Resource, ResourceKind::Performance.tag(), uk::RESOURCE_PERFORMANCE),
            (En, Resource, ResourceKind::Performance.tag(), en::RESOURCE_PERFORMANCE),
        ];

        let mut catalog = Self::empty();
        for (language, kind, tag, text) in entries {
            catalog.insert(language, kind, tag, text);
        }
        catalog
    }

    /// Register or replace one layer text
    pub fn insert(
        &mut self,
        language: Language,
        kind: LayerKind,
        tag: impl Into<String>,
        text: impl Into<String>,
    ) -> &mut Self {
        self.layers.insert(LayerKey::new(language, kind, tag), text.into());
        self
    }

    pub fn get(&self, language: Language, kind: LayerKind, tag: &str) -> Option<&str> {
        self.layers
            .get(&LayerKey::new(language, kind, tag))
            .map(String::as_str)
    }

    pub fn persona(&self, language: Language) -> Option<&str> {
        self.get(language, LayerKind::Persona, PERSONA_TAG)
    }

    /// Tags registered for a kind in any language
    pub fn tags(&self, kind: LayerKind) -> BTreeSet<&str> {
        self.layers
            .keys()
            .filter(|k| k.kind == kind)
            .map(|k| k.tag.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Every language has a persona, and every registered platform or
    /// resource tag has non-empty text in every language.
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();

        for language in Language::ALL {
            if self.persona(language).map_or(true, |t| t.trim().is_empty()) {
                missing.push(format!("{}/{}/{}", language, LayerKind::Persona.as_str(), PERSONA_TAG));
            }
        }

        for kind in [LayerKind::Platform, LayerKind::Resource] {
            for tag in self.tags(kind) {
                for language in Language::ALL {
                    if self.get(language, kind, tag).map_or(true, |t| t.trim().is_empty()) {
                        missing.push(format!("{}/{}/{}", language, kind.as_str(), tag));
                    }
                }
            }
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(DiagnosticError::CatalogIncomplete(format!(
                "missing layers: {}",
                missing.join(", ")
            )))
        }
    }

    /// Platform tags that must exist for the given provider
    pub fn require_platform(&self, provider: CloudProvider) -> Result<()> {
        if provider == CloudProvider::None {
            return Ok(());
        }
        for language in Language::ALL {
            if self.get(language, LayerKind::Platform, provider.tag()).is_none() {
                return Err(DiagnosticError::CatalogIncomplete(format!(
                    "no platform layer for {} in {}",
                    provider, language
                )));
            }
        }
        Ok(())
    }
}
