// diagnostic-orchestrator-rs/src/stage.rs

use std::fmt;

/// Where a request is in its lifecycle; logged as the `stage` field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosisStage {
    Received,
    LanguageResolved,
    PromptComposed,
    Dispatched,
    Streaming,
    Completed,
    Failed,
}

impl DiagnosisStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosisStage::Received => "received",
            DiagnosisStage::LanguageResolved => "language-resolved",
            DiagnosisStage::PromptComposed => "prompt-composed",
            DiagnosisStage::Dispatched => "dispatched",
            DiagnosisStage::Streaming => "streaming",
            DiagnosisStage::Completed => "completed",
            DiagnosisStage::Failed => "failed",
        }
    }
}

impl fmt::Display for DiagnosisStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
