// diag-cli-rs/src/cli.rs
// Command-line surface of kube-diag.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use config_rs::Settings;
use shared_types_rs::{CloudProvider, ClusterContext, CommandOutput, DiagnosticRequest, Language};

#[derive(Debug, Parser)]
#[command(name = "kube-diag")]
#[command(version, about = "Kubernetes troubleshooting assistant backed by a local LLM")]
pub struct Cli {
    /// Backend URL, overrides OLLAMA_URL
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Model name, overrides OLLAMA_MODEL
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Platform layer, overrides CLOUD_PROVIDER (aws_eks, aws_ec2, gcp_gke, azure_aks, bare_metal, none)
    #[arg(long, global = true)]
    pub provider: Option<CloudProvider>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Ask one diagnostic question
    Ask(AskArgs),
    /// Ask questions line by line until exit, quit, q or end of input
    Interactive(InteractiveArgs),
    /// Run the safety gate on a piece of text
    Validate(ValidateArgs),
    /// Check backend reachability and the configured model
    Health(OutputArgs),
    /// List installed models
    Models(OutputArgs),
}

/// Facts about the cluster added to the prompt. Name and region default to
/// `CLUSTER_NAME`/`EKS_CLUSTER_NAME` and `CLUSTER_REGION`/`AWS_REGION`.
#[derive(Debug, Clone, Default, Args)]
pub struct ClusterArgs {
    #[arg(long)]
    pub cluster_name: Option<String>,

    #[arg(long)]
    pub region: Option<String>,

    #[arg(long)]
    pub k8s_version: Option<String>,

    #[arg(long)]
    pub node_type: Option<String>,
}

impl ClusterArgs {
    /// Fill facts not given on the command line from the settings
    pub fn with_defaults(mut self, settings: &Settings) -> Self {
        self.cluster_name = self.cluster_name.or_else(|| settings.cluster_name.clone());
        self.region = self.region.or_else(|| settings.region.clone());
        self
    }

    /// `None` when no fact was given
    pub fn to_context(&self) -> Option<ClusterContext> {
        let context: ClusterContext = [
            (ClusterContext::CLUSTER_NAME, &self.cluster_name),
            (ClusterContext::REGION, &self.region),
            (ClusterContext::K8S_VERSION, &self.k8s_version),
            (ClusterContext::NODE_TYPE, &self.node_type),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_ref().map(|v| (key.to_string(), v.clone())))
        .collect();

        (!context.is_empty()).then_some(context)
    }
}

#[derive(Debug, Clone, Args)]
pub struct AskArgs {
    /// The question
    #[arg(short, long)]
    pub message: String,

    /// Resource focus: pod, network, node, deployment, performance
    #[arg(short = 't', long)]
    pub resource_type: Option<String>,

    /// Defaults to K8S_NAMESPACE, then "default"
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Command output to include
    #[arg(short = 'k', long, conflicts_with = "command_output_file")]
    pub command_output: Option<String>,

    /// Read command output from a file. A JSON result of the kubectl runner
    /// (`{"success", "stdout", "stderr", "returncode"}`) is reduced to its text.
    #[arg(long)]
    pub command_output_file: Option<PathBuf>,

    /// Answer language (uk, en); detected from the message when omitted
    #[arg(short, long)]
    pub language: Option<Language>,

    #[command(flatten)]
    pub cluster: ClusterArgs,

    /// Wait for the complete answer instead of streaming
    #[arg(long)]
    pub no_stream: bool,

    /// Print machine-readable output
    #[arg(long)]
    pub json: bool,

    /// Run the safety gate before sending
    #[arg(long)]
    pub check: bool,

    /// With --check, accept destructive commands
    #[arg(long)]
    pub allow_destructive: bool,
}

impl AskArgs {
    pub fn with_defaults(mut self, settings: &Settings) -> Self {
        self.namespace = self.namespace.or_else(|| Some(settings.namespace.clone()));
        self.cluster = self.cluster.with_defaults(settings);
        self
    }

    pub fn to_request(&self) -> Result<DiagnosticRequest> {
        let mut request = DiagnosticRequest::new(self.message.as_str())?;
        if let Some(namespace) = &self.namespace {
            request = request.with_namespace(namespace.as_str());
        }

        if let Some(resource_type) = &self.resource_type {
            request = request.with_resource_type(resource_type.as_str());
        }

        let output = match (&self.command_output, &self.command_output_file) {
            (Some(output), _) => Some(output.clone()),
            (None, Some(path)) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read command output from {}", path.display()))?;
                Some(command_output_text(text))
            }
            (None, None) => None,
        };
        if let Some(output) = output {
            request = request.with_command_output(output);
        }

        if let Some(language) = self.language {
            request = request.with_language(language);
        }
        if let Some(context) = self.cluster.to_context() {
            request = request.with_cluster_context(context);
        }
        Ok(request)
    }
}

/// Runner results are unwrapped; anything else is taken as is
fn command_output_text(text: String) -> String {
    match serde_json::from_str::<CommandOutput>(&text) {
        Ok(result) => result.text(),
        Err(_) => text,
    }
}

#[derive(Debug, Clone, Args)]
pub struct InteractiveArgs {
    /// Defaults to K8S_NAMESPACE, then "default"
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Answer language for every question; detected per question when omitted
    #[arg(short, long)]
    pub language: Option<Language>,

    #[command(flatten)]
    pub cluster: ClusterArgs,

    /// Keep the conversation history and send it with every question
    #[arg(long)]
    pub chat: bool,
}

impl InteractiveArgs {
    pub fn with_defaults(mut self, settings: &Settings) -> Self {
        self.namespace = self.namespace.or_else(|| Some(settings.namespace.clone()));
        self.cluster = self.cluster.with_defaults(settings);
        self
    }
}

#[derive(Debug, Clone, Args)]
pub struct ValidateArgs {
    /// Text to check
    pub text: String,

    #[arg(long)]
    pub allow_destructive: bool,

    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, Default, Args)]
pub struct OutputArgs {
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask() {
        let cli = Cli::try_parse_from([
            "kube-diag",
            "--model",
            "mistral:7b",
            "ask",
            "-m",
            "Pod is Pending",
            "-t",
            "pod",
            "-n",
            "payments",
            "-l",
            "en",
            "--cluster-name",
            "prod-eu",
            "--no-stream",
        ])
        .unwrap();

        assert_eq!(cli.model.as_deref(), Some("mistral:7b"));
        let Command::Ask(args) = cli.command else {
            panic!("expected ask");
        };
        assert!(args.no_stream);

        let request = args.to_request().unwrap();
        assert_eq!(request.user_message(), "Pod is Pending");
        assert_eq!(request.resource_type(), Some("pod"));
        assert_eq!(request.namespace(), "payments");
        assert_eq!(request.language(), Some(Language::English));
        assert_eq!(
            request.cluster_context().unwrap().get(ClusterContext::CLUSTER_NAME),
            Some("prod-eu")
        );
    }

    #[test]
    fn test_provider_flag_parses() {
        let cli = Cli::try_parse_from(["kube-diag", "--provider", "gcp-gke", "health"]).unwrap();
        assert_eq!(cli.provider, Some(CloudProvider::GcpGke));
        assert!(Cli::try_parse_from(["kube-diag", "--provider", "openstack", "health"]).is_err());
    }

    #[test]
    fn test_blank_message_rejected() {
        let cli = Cli::try_parse_from(["kube-diag", "ask", "-m", "   "]).unwrap();
        let Command::Ask(args) = cli.command else {
            panic!("expected ask");
        };
        assert!(args.to_request().is_err());
    }

    #[test]
    fn test_command_output_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "NAME   READY   STATUS").unwrap();
        writeln!(file, "web-0  0/1     CrashLoopBackOff").unwrap();

        let cli = Cli::try_parse_from([
            "kube-diag",
            "ask",
            "-m",
            "why?",
            "--command-output-file",
            file.path().to_str().unwrap(),
        ])
        .unwrap();
        let Command::Ask(args) = cli.command else {
            panic!("expected ask");
        };
        let request = args.to_request().unwrap();
        assert!(request.raw_command_output().unwrap().contains("CrashLoopBackOff"));
    }

    #[test]
    fn test_runner_result_file_reduced_to_text() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"success": false, "stdout": "", "stderr": "Error from server (NotFound)", "returncode": 1}}"#
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "kube-diag",
            "ask",
            "-m",
            "why?",
            "--command-output-file",
            file.path().to_str().unwrap(),
        ])
        .unwrap();
        let Command::Ask(args) = cli.command else {
            panic!("expected ask");
        };
        let request = args.to_request().unwrap();
        assert_eq!(request.raw_command_output(), Some("Error from server (NotFound)"));
    }

    #[test]
    fn test_settings_fill_missing_flags() {
        let settings = Settings {
            namespace: "payments".to_string(),
            cluster_name: Some("prod-eu".to_string()),
            region: Some("eu-central-1".to_string()),
            ..Settings::default()
        };
        let cli = Cli::try_parse_from(["kube-diag", "ask", "-m", "why?", "--region", "us-east-1"]).unwrap();
        let Command::Ask(args) = cli.command else {
            panic!("expected ask");
        };

        let request = args.with_defaults(&settings).to_request().unwrap();
        assert_eq!(request.namespace(), "payments");
        let context = request.cluster_context().unwrap();
        assert_eq!(context.get(ClusterContext::CLUSTER_NAME), Some("prod-eu"));
        assert_eq!(context.get(ClusterContext::REGION), Some("us-east-1"));
    }

    #[test]
    fn test_interactive_defaults_from_settings() {
        let settings = Settings {
            cluster_name: Some("prod-eu".to_string()),
            ..Settings::default()
        };
        let cli = Cli::try_parse_from(["kube-diag", "interactive", "-n", "kube-system"]).unwrap();
        let Command::Interactive(args) = cli.command else {
            panic!("expected interactive");
        };

        let args = args.with_defaults(&settings);
        assert_eq!(args.namespace.as_deref(), Some("kube-system"));
        assert_eq!(args.cluster.cluster_name.as_deref(), Some("prod-eu"));
    }

    #[test]
    fn test_no_cluster_facts_means_no_context() {
        assert!(ClusterArgs::default().to_context().is_none());
    }
}
