// shared-types-rs/src/security.rs

use std::fmt;

use serde::{Deserialize, Serialize};

/// Advisory risk level of the commands found in a text.
/// Ordered so the most severe classification wins with `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecurityClassification {
    #[default]
    Safe,
    Moderate,
    Destructive,
}

impl SecurityClassification {
    pub fn as_str(&self) -> &'static str {
        match self {
            SecurityClassification::Safe => "safe",
            SecurityClassification::Moderate => "moderate",
            SecurityClassification::Destructive => "destructive",
        }
    }
}

impl fmt::Display for SecurityClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
