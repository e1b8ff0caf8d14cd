// shared-types-rs/src/command.rs
// Shape of the result produced by the external kubectl runner. The pipeline
// never executes commands; it only reads this text into the prompt.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommandOutput {
    pub success: bool,
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,
    #[serde(default)]
    pub returncode: Option<i32>,
    /// Set instead of stdout/stderr when the runner itself failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandOutput {
    /// Text suitable for the prompt: stdout, then stderr, or the runner error
    pub fn text(&self) -> String {
        if let Some(err) = &self.error {
            return format!("Error: {}", err);
        }
        match (self.stdout.trim().is_empty(), self.stderr.trim().is_empty()) {
            (false, true) => self.stdout.clone(),
            (true, false) => self.stderr.clone(),
            (false, false) => format!("{}\n{}", self.stdout, self.stderr),
            (true, true) => String::new(),
        }
    }
}
