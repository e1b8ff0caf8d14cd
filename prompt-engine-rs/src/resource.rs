// prompt-engine-rs/src/resource.rs
// Maps free-text resource tags onto the specialised resource families.

use std::fmt;

/// Resource families that have a dedicated specialisation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Pod,
    Network,
    Node,
    Deployment,
    Performance,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Pod,
        ResourceKind::Network,
        ResourceKind::Node,
        ResourceKind::Deployment,
        ResourceKind::Performance,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            ResourceKind::Pod => "pod",
            ResourceKind::Network => "network",
            ResourceKind::Node => "node",
            ResourceKind::Deployment => "deployment",
            ResourceKind::Performance => "performance",
        }
    }

    /// Resolve a caller-supplied tag. Unknown tags have no specialisation.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim().to_lowercase();
        let kind = match tag.as_str() {
            "pod" | "pods" | "po" | "container" | "job" | "cronjob" => ResourceKind::Pod,
            "network" | "service" | "svc" | "services" | "ingress" | "ing" | "dns"
            | "networkpolicy" | "netpol" | "endpoints" => ResourceKind::Network,
            "node" | "nodes" | "no" | "kubelet" => ResourceKind::Node,
            "deployment" | "deploy" | "deployments" | "replicaset" | "rs" | "statefulset"
            | "sts" | "daemonset" | "ds" | "rollout" => ResourceKind::Deployment,
            "performance" | "perf" | "hpa" | "cpu" | "memory" | "resources" | "latency" => {
                ResourceKind::Performance
            }
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("pod", Some(ResourceKind::Pod))]
    #[test_case("Service", Some(ResourceKind::Network))]
    #[test_case("ingress", Some(ResourceKind::Network))]
    #[test_case("statefulset", Some(ResourceKind::Deployment))]
    #[test_case(" node ", Some(ResourceKind::Node))]
    #[test_case("hpa", Some(ResourceKind::Performance))]
    #[test_case("configmap", None)]
    fn test_from_tag(tag: &str, expected: Option<ResourceKind>) {
        assert_eq!(ResourceKind::from_tag(tag), expected);
    }

    #[test]
    fn test_canonical_tags_round_trip() {
        for kind in ResourceKind::ALL {
            assert_eq!(ResourceKind::from_tag(kind.tag()), Some(kind));
        }
    }
}
