// prompt-engine-rs/src/templates/mod.rs
// Built-in layer texts and the per-language phrases the composer stitches
// around them.

pub mod en;
pub mod uk;

use shared_types_rs::Language;

/// Fixed wording used by the cluster-context and user-message layers
#[derive(Debug)]
pub struct Phrases {
    pub cluster_header: &'static str,
    pub cluster_name: &'static str,
    pub region: &'static str,
    pub k8s_version: &'static str,
    pub node_type: &'static str,
    pub request_header: &'static str,
    pub namespace: &'static str,
    pub resource_type: &'static str,
    pub command_output_header: &'static str,
    pub closing_instruction: &'static str,
}

/// Placeholder for cluster facts the caller did not supply
pub const UNKNOWN: &str = "Unknown";

pub const TRUNCATION_MARKER: &str = "... [truncated] ...";

static UKRAINIAN: Phrases = Phrases {
    cluster_header: "# Інформація про Kubernetes кластер:",
    cluster_name: "Назва кластера",
    region: "Регіон",
    k8s_version: "Версія Kubernetes",
    node_type: "Тип нод",
    request_header: "# Запит користувача:",
    namespace: "Namespace",
    resource_type: "Тип ресурсу",
    command_output_header: "# Вивід команд:",
    closing_instruction: "Відповідай українською мовою, структуровано, строго за обов'язковим форматом із семи розділів, з конкретними kubectl командами.",
};

static ENGLISH: Phrases = Phrases {
    cluster_header: "# Kubernetes Cluster Information:",
    cluster_name: "Cluster name",
    region: "Region",
    k8s_version: "Kubernetes version",
    node_type: "Node type",
    request_header: "# User Request:",
    namespace: "Namespace",
    resource_type: "Resource type",
    command_output_header: "# Command Output:",
    closing_instruction: "Answer in English, strictly following the mandatory seven-section response format, with concrete kubectl commands.",
};

pub fn phrases(language: Language) -> &'static Phrases {
    match language {
        Language::Ukrainian => &UKRAINIAN,
        Language::English => &ENGLISH,
    }
}
