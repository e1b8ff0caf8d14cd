// shared-types-rs/src/language.rs
// Closed enumerations bound before prompt composition.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DiagnosticError;

/// Response language. Ukrainian is primary, English is the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "uk")]
    Ukrainian,
    #[serde(rename = "en")]
    English,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Ukrainian, Language::English];

    pub fn code(&self) -> &'static str {
        match self {
            Language::Ukrainian => "uk",
            Language::English => "en",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Ukrainian => "Українська",
            Language::English => "English",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = DiagnosticError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "uk" | "ua" | "ukrainian" => Ok(Language::Ukrainian),
            "en" | "english" => Ok(Language::English),
            other => Err(DiagnosticError::invalid_request(format!(
                "Unsupported language '{}', expected 'uk' or 'en'",
                other
            ))),
        }
    }
}

/// Platform the cluster runs on; selects the platform prompt layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloudProvider {
    AwsEks,
    #[default]
    AwsEc2,
    GcpGke,
    AzureAks,
    BareMetal,
    /// No platform layer at all
    None,
}

impl CloudProvider {
    pub const ALL: [CloudProvider; 6] = [
        CloudProvider::AwsEks,
        CloudProvider::AwsEc2,
        CloudProvider::GcpGke,
        CloudProvider::AzureAks,
        CloudProvider::BareMetal,
        CloudProvider::None,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            CloudProvider::AwsEks => "aws_eks",
            CloudProvider::AwsEc2 => "aws_ec2",
            CloudProvider::GcpGke => "gcp_gke",
            CloudProvider::AzureAks => "azure_aks",
            CloudProvider::BareMetal => "bare_metal",
            CloudProvider::None => "none",
        }
    }
}

impl fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for CloudProvider {
    type Err = DiagnosticError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        CloudProvider::ALL
            .into_iter()
            .find(|p| p.tag() == normalized)
            .ok_or_else(|| {
                DiagnosticError::configuration(format!("Unknown cloud provider '{}'", s))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_codes_round_trip() {
        for lang in Language::ALL {
            assert_eq!(lang.code().parse::<Language>().unwrap(), lang);
        }
        assert_eq!("UA".parse::<Language>().unwrap(), Language::Ukrainian);
        assert!("de".parse::<Language>().is_err());
    }

    #[test]
    fn test_language_serde_uses_codes() {
        assert_eq!(serde_json::to_string(&Language::English).unwrap(), "\"en\"");
        let lang: Language = serde_json::from_str("\"uk\"").unwrap();
        assert_eq!(lang, Language::Ukrainian);
    }

    #[test]
    fn test_cloud_provider_parsing() {
        assert_eq!("aws-eks".parse::<CloudProvider>().unwrap(), CloudProvider::AwsEks);
        assert_eq!("GCP_GKE".parse::<CloudProvider>().unwrap(), CloudProvider::GcpGke);
        assert_eq!(CloudProvider::default(), CloudProvider::AwsEc2);
        assert!("openstack".parse::<CloudProvider>().is_err());
    }
}
