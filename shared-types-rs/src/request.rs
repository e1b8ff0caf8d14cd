// shared-types-rs/src/request.rs
// Inbound diagnostic request. Validated at construction and immutable after.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{DiagnosticError, Result};
use crate::language::Language;

pub const DEFAULT_NAMESPACE: &str = "default";

/// Descriptive facts about the cluster, keyed by name.
///
/// The well-known keys (`cluster_name`, `region`, `k8s_version`,
/// `node_type`) are rendered first by the composer; anything else follows
/// in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterContext(BTreeMap<String, String>);

impl ClusterContext {
    pub const CLUSTER_NAME: &'static str = "cluster_name";
    pub const REGION: &'static str = "region";
    pub const K8S_VERSION: &'static str = "k8s_version";
    pub const NODE_TYPE: &'static str = "node_type";

    pub const WELL_KNOWN: [&'static str; 4] = [
        Self::CLUSTER_NAME,
        Self::REGION,
        Self::K8S_VERSION,
        Self::NODE_TYPE,
    ];

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Entries outside the well-known set, in key order
    pub fn extra_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .filter(|(k, _)| !Self::WELL_KNOWN.contains(&k.as_str()))
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ClusterContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Wire shape of a request before validation
#[derive(Debug, Deserialize)]
struct RawDiagnosticRequest {
    message: String,
    #[serde(default)]
    resource_type: Option<String>,
    #[serde(default)]
    namespace: Option<String>,
    #[serde(default, alias = "kubectl_output")]
    command_output: Option<String>,
    #[serde(default)]
    language: Option<Language>,
    #[serde(default, alias = "eks_context")]
    cluster_context: Option<ClusterContext>,
}

impl TryFrom<RawDiagnosticRequest> for DiagnosticRequest {
    type Error = DiagnosticError;

    fn try_from(raw: RawDiagnosticRequest) -> Result<Self> {
        let mut request = DiagnosticRequest::new(raw.message)?;
        request.resource_type = raw.resource_type.filter(|r| !r.trim().is_empty());
        if let Some(ns) = raw.namespace.filter(|ns| !ns.trim().is_empty()) {
            request.namespace = ns;
        }
        request.raw_command_output = raw.command_output;
        request.language = raw.language;
        request.cluster_context = raw.cluster_context;
        Ok(request)
    }
}

/// A single troubleshooting question plus whatever context the caller has.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDiagnosticRequest")]
pub struct DiagnosticRequest {
    #[serde(rename = "message")]
    user_message: String,
    resource_type: Option<String>,
    namespace: String,
    #[serde(rename = "command_output")]
    raw_command_output: Option<String>,
    language: Option<Language>,
    cluster_context: Option<ClusterContext>,
}

impl DiagnosticRequest {
    /// Fails with `InvalidRequest` when the message is empty or blank.
    pub fn new(user_message: impl Into<String>) -> Result<Self> {
        let user_message = user_message.into();
        if user_message.trim().is_empty() {
            return Err(DiagnosticError::invalid_request("Message must not be empty"));
        }
        Ok(Self {
            user_message,
            resource_type: None,
            namespace: DEFAULT_NAMESPACE.to_string(),
            raw_command_output: None,
            language: None,
            cluster_context: None,
        })
    }

    pub fn with_resource_type(mut self, resource_type: impl Into<String>) -> Self {
        let resource_type = resource_type.into();
        self.resource_type = (!resource_type.trim().is_empty()).then_some(resource_type);
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        if !namespace.trim().is_empty() {
            self.namespace = namespace;
        }
        self
    }

    pub fn with_command_output(mut self, output: impl Into<String>) -> Self {
        self.raw_command_output = Some(output.into());
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    pub fn with_cluster_context(mut self, context: ClusterContext) -> Self {
        self.cluster_context = Some(context);
        self
    }

    pub fn user_message(&self) -> &str {
        &self.user_message
    }

    pub fn resource_type(&self) -> Option<&str> {
        self.resource_type.as_deref()
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn raw_command_output(&self) -> Option<&str> {
        self.raw_command_output.as_deref()
    }

    pub fn language(&self) -> Option<Language> {
        self.language
    }

    pub fn cluster_context(&self) -> Option<&ClusterContext> {
        self.cluster_context.as_ref()
    }
}
