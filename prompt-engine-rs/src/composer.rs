// prompt-engine-rs/src/composer.rs
//
// Deterministic prompt assembly.
//
// The final prompt is always five layers joined in a fixed order:
//   persona -> platform -> resource -> cluster context -> user message
// A layer that does not apply renders as an empty string; it is never
// dropped or moved.

use std::borrow::Cow;

use shared_types_rs::{CloudProvider, ClusterContext, DiagnosticRequest, Language, Result};

use crate::catalog::{LayerCatalog, LayerKind};
use crate::resource::ResourceKind;
use crate::templates::{phrases, Phrases, TRUNCATION_MARKER, UNKNOWN};

const LAYER_SEPARATOR: &str = "\n\n";

pub const DEFAULT_MAX_COMMAND_OUTPUT_CHARS: usize = 4000;

/// The five rendered layers of one prompt, in composition order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptLayers {
    pub persona: String,
    pub platform: String,
    pub resource: String,
    pub cluster_context: String,
    pub user_message: String,
}

impl PromptLayers {
    pub fn in_order(&self) -> [&str; 5] {
        [
            &self.persona,
            &self.platform,
            &self.resource,
            &self.cluster_context,
            &self.user_message,
        ]
    }

    pub fn render(&self) -> String {
        self.in_order().join(LAYER_SEPARATOR)
    }
}

#[derive(Debug, Clone)]
pub struct PromptComposer {
    catalog: LayerCatalog,
    provider: CloudProvider,
    max_command_output_chars: usize,
}

impl PromptComposer {
    /// Fails with `CatalogIncomplete` if the catalog cannot serve every
    /// language for the configured provider.
    pub fn new(catalog: LayerCatalog, provider: CloudProvider) -> Result<Self> {
        catalog.validate()?;
        catalog.require_platform(provider)?;
        tracing::debug!(
            layers = catalog.len(),
            provider = %provider,
            "Prompt layer catalog validated"
        );
        Ok(Self {
            catalog,
            provider,
            max_command_output_chars: DEFAULT_MAX_COMMAND_OUTPUT_CHARS,
        })
    }

    pub fn with_builtin(provider: CloudProvider) -> Result<Self> {
        Self::new(LayerCatalog::builtin(), provider)
    }

    /// Command output above this many characters keeps only its head and tail
    pub fn with_command_output_limit(mut self, max_chars: usize) -> Self {
        self.max_command_output_chars = max_chars;
        self
    }

    pub fn provider(&self) -> CloudProvider {
        self.provider
    }

    pub fn catalog(&self) -> &LayerCatalog {
        &self.catalog
    }

    pub fn compose(&self, request: &DiagnosticRequest, language: Language) -> String {
        self.layers(request, language).render()
    }

    pub fn layers(&self, request: &DiagnosticRequest, language: Language) -> PromptLayers {
        let phrases = phrases(language);
        PromptLayers {
            persona: self.persona_layer(language),
            platform: self.platform_layer(language),
            resource: self.resource_layer(request.resource_type(), language),
            cluster_context: request
                .cluster_context()
                .map(|ctx| cluster_context_layer(ctx, phrases))
                .unwrap_or_default(),
            user_message: self.user_message_layer(request, phrases),
        }
    }

    /// Persona plus, optionally, the platform layer. Used as the system
    /// message for multi-turn chat.
    pub fn system_prompt(&self, language: Language, include_platform: bool) -> String {
        let persona = self.persona_layer(language);
        if !include_platform {
            return persona;
        }
        let platform = self.platform_layer(language);
        if platform.is_empty() {
            persona
        } else {
            format!("{}{}{}", persona, LAYER_SEPARATOR, platform)
        }
    }

    fn persona_layer(&self, language: Language) -> String {
        self.catalog.persona(language).unwrap_or_default().to_string()
    }

    fn platform_layer(&self, language: Language) -> String {
        if self.provider == CloudProvider::None {
            return String::new();
        }
        self.catalog
            .get(language, LayerKind::Platform, self.provider.tag())
            .unwrap_or_default()
            .to_string()
    }

    fn resource_layer(&self, resource_type: Option<&str>, language: Language) -> String {
        resource_type
            .and_then(ResourceKind::from_tag)
            .and_then(|kind| self.catalog.get(language, LayerKind::Resource, kind.tag()))
            .unwrap_or_default()
            .to_string()
    }

    fn user_message_layer(&self, request: &DiagnosticRequest, phrases: &Phrases) -> String {
        let mut layer = format!("{}\n{}", phrases.request_header, request.user_message());

        layer.push_str(&format!("\n\n{}: {}", phrases.namespace, request.namespace()));
        if let Some(resource) = request.resource_type() {
            layer.push_str(&format!("\n{}: {}", phrases.resource_type, resource));
        }

        if let Some(output) = request.raw_command_output().filter(|o| !o.trim().is_empty()) {
            let output = truncate_middle(output.trim_end(), self.max_command_output_chars);
            layer.push_str(&format!(
                "\n\n{}\n```\n{}\n```",
                phrases.command_output_header, output
            ));
        }

        layer.push_str("\n\n");
        layer.push_str(phrases.closing_instruction);
        layer
    }
}

fn cluster_context_layer(ctx: &ClusterContext, phrases: &Phrases) -> String {
    let known = [
        (phrases.cluster_name, ClusterContext::CLUSTER_NAME),
        (phrases.region, ClusterContext::REGION),
        (phrases.k8s_version, ClusterContext::K8S_VERSION),
        (phrases.node_type, ClusterContext::NODE_TYPE),
    ];

    let mut lines = vec![phrases.cluster_header.to_string()];
    for (label, key) in known {
        let value = ctx.get(key).filter(|v| !v.trim().is_empty()).unwrap_or(UNKNOWN);
        lines.push(format!("- {}: {}", label, value));
    }
    for (key, value) in ctx.extra_entries() {
        lines.push(format!("- {}: {}", key, value));
    }
    lines.join("\n")
}

/// Keep the head and tail of `text` when it exceeds `max_chars` characters.
/// Cuts on character boundaries, so multi-byte text is safe.
pub fn truncate_middle(text: &str, max_chars: usize) -> Cow<'_, str> {
    let total = text.chars().count();
    if total <= max_chars {
        return Cow::Borrowed(text);
    }

    let head_chars = max_chars / 2;
    let tail_chars = max_chars - head_chars;
    let head_end = text
        .char_indices()
        .nth(head_chars)
        .map_or(text.len(), |(i, _)| i);
    let tail_start = text
        .char_indices()
        .nth(total - tail_chars)
        .map_or(text.len(), |(i, _)| i);

    Cow::Owned(format!(
        "{}\n{}\n{}",
        &text[..head_end],
        TRUNCATION_MARKER,
        &text[tail_start..]
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn composer() -> PromptComposer {
        PromptComposer::with_builtin(CloudProvider::AwsEc2).unwrap()
    }

    #[test]
    fn test_compose_contains_message_verbatim() {
        let message = "Мій pod в CrashLoopBackOff\n  (restarts: 12) & \"quotes\"";
        let request = DiagnosticRequest::new(message).unwrap();
        let prompt = composer().compose(&request, Language::Ukrainian);
        assert!(prompt.contains(message));
    }

    #[test]
    fn test_layer_order_is_fixed() {
        let request = DiagnosticRequest::new("Pod keeps restarting")
            .unwrap()
            .with_resource_type("pod")
            .with_cluster_context(ClusterContext::new().with("cluster_name", "prod-eu"));
        let prompt = composer().compose(&request, Language::English);

        let persona = prompt.find("## 1. Quick Summary").unwrap();
        let platform = prompt.find("# Kubernetes on AWS EC2").unwrap();
        let resource = prompt.find("You are diagnosing a Kubernetes Pod issue").unwrap();
        let cluster = prompt.find("# Kubernetes Cluster Information:").unwrap();
        let user = prompt.find("# User Request:").unwrap();
        assert!(persona < platform && platform < resource && resource < cluster && cluster < user);
    }

    #[test]
    fn test_empty_layers_still_emitted() {
        let composer = PromptComposer::with_builtin(CloudProvider::None).unwrap();
        let request = DiagnosticRequest::new("What is wrong?").unwrap();
        let layers = composer.layers(&request, Language::English);
        assert!(layers.platform.is_empty());
        assert!(layers.resource.is_empty());
        assert!(layers.cluster_context.is_empty());

        let expected = format!(
            "{}{sep}{sep}{sep}{sep}{}",
            layers.persona,
            layers.user_message,
            sep = LAYER_SEPARATOR
        );
        assert_eq!(layers.render(), expected);
    }

    #[test]
    fn test_unknown_resource_contributes_nothing() {
        let request = DiagnosticRequest::new("x").unwrap().with_resource_type("configmap");
        assert!(composer().layers(&request, Language::English).resource.is_empty());
    }

    #[test]
    fn test_resource_alias_selects_family() {
        let request = DiagnosticRequest::new("x").unwrap().with_resource_type("ingress");
        let layers = composer().layers(&request, Language::English);
        assert!(layers.resource.starts_with("You are diagnosing Kubernetes networking issues"));
    }

    #[test]
    fn test_cluster_context_defaults_to_unknown() {
        let ctx = ClusterContext::new()
            .with("cluster_name", "prod-eks-cluster")
            .with("vpc_id", "vpc-12345678");
        let request = DiagnosticRequest::new("x").unwrap().with_cluster_context(ctx);
        let layer = composer().layers(&request, Language::Ukrainian).cluster_context;
        assert!(layer.contains("- Назва кластера: prod-eks-cluster"));
        assert!(layer.contains("- Регіон: Unknown"));
        assert!(layer.contains("- Версія Kubernetes: Unknown"));
        assert!(layer.contains("- Тип нод: Unknown"));
        assert!(layer.ends_with("- vpc_id: vpc-12345678"));
    }

    #[test]
    fn test_closing_instruction_in_resolved_language() {
        let request = DiagnosticRequest::new("x").unwrap();
        let uk = composer().compose(&request, Language::Ukrainian);
        assert!(uk.ends_with(phrases(Language::Ukrainian).closing_instruction));
        let en = composer().compose(&request, Language::English);
        assert!(en.ends_with(phrases(Language::English).closing_instruction));
    }

    #[test]
    fn test_command_output_is_fenced_and_truncated() {
        let output = format!("{}{}", "a".repeat(300), "z".repeat(300));
        let request = DiagnosticRequest::new("x").unwrap().with_command_output(output);
        let composer = composer().with_command_output_limit(100);
        let layer = composer.layers(&request, Language::English).user_message;
        assert!(layer.contains("# Command Output:\n```\n"));
        assert!(layer.contains(TRUNCATION_MARKER));
        assert!(!layer.contains(&"a".repeat(51)));
        assert!(layer.contains(&"z".repeat(50)));
    }

    #[test]
    fn test_composition_is_deterministic() {
        let request = DiagnosticRequest::new("Node NotReady").unwrap().with_resource_type("node");
        let c = composer();
        assert_eq!(
            c.compose(&request, Language::English),
            c.compose(&request, Language::English)
        );
    }

    #[test]
    fn test_system_prompt_includes_platform_on_request() {
        let c = composer();
        let with = c.system_prompt(Language::English, true);
        let without = c.system_prompt(Language::English, false);
        assert!(with.contains("# Kubernetes on AWS EC2"));
        assert!(!without.contains("# Kubernetes on AWS EC2"));
        assert!(with.starts_with(&without));
    }

    #[test]
    fn test_truncate_middle_multibyte() {
        let text = "привіт світе, під впав";
        assert_eq!(truncate_middle(text, 100), text);
        let cut = truncate_middle(text, 6);
        assert!(cut.starts_with("при"));
        assert!(cut.ends_with("пав"));
        assert!(cut.contains(TRUNCATION_MARKER));
    }
}
