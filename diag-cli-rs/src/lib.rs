//! kube-diag: ask a local model about Kubernetes problems.
//!
//! The binary in `main.rs` parses arguments, loads settings and hands over
//! to [`run`]. Subcommands live in [`commands`] and write to any
//! `std::io::Write` so they can be exercised without a terminal.

pub mod cli;
pub mod commands;
pub mod logging;


use std::process::ExitCode;

use anyhow::{Context, Result};
use config_rs::Settings;
use diagnostic_orchestrator_rs::DiagnosticOrchestrator;
use prompt_safety_rs::PromptValidator;
use tokio::io::BufReader;

use crate::cli::{Cli, Command};

/// Apply command-line overrides on top of the environment settings
pub fn apply_overrides(mut settings: Settings, cli: &Cli) -> Result<Settings> {
    if let Some(url) = &cli.url {
        settings.backend_url = url.trim_end_matches('/').to_string();
    }
    if let Some(model) = &cli.model {
        settings.model = model.clone();
    }
    if let Some(provider) = cli.provider {
        settings.cloud_provider = provider;
    }
    settings.validate().context("Invalid settings")?;
    Ok(settings)
}

pub async fn run(cli: Cli, settings: &Settings) -> Result<ExitCode> {
    let orchestrator =
        DiagnosticOrchestrator::from_settings(settings).context("Failed to set up the diagnostic pipeline")?;
    let validator = PromptValidator::new(settings.max_prompt_length);
    let mut out = std::io::stdout();

    match cli.command {
        Command::Ask(args) => {
            let args = args.with_defaults(settings);
            commands::ask(&orchestrator, &validator, &args, &mut out).await
        }
        Command::Interactive(args) => {
            let args = args.with_defaults(settings);
            let input = BufReader::new(tokio::io::stdin());
            commands::interactive(&orchestrator, &args, input, &mut out).await
        }
        Command::Validate(args) => commands::validate(&validator, &args, &mut out),
        Command::Health(args) => commands::health(&orchestrator, args, &mut out).await,
        Command::Models(args) => commands::models(&orchestrator, args, &mut out).await,
    }
}
