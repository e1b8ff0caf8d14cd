// diag-cli-rs/src/main.rs

use std::process::ExitCode;

use clap::Parser;
use config_rs::Settings;
use diag_cli::cli::Cli;
use diag_cli::logging::init_logging;
use diag_cli::{apply_overrides, run};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match Settings::load()
        .map_err(anyhow::Error::from)
        .and_then(|settings| apply_overrides(settings, &cli))
    {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::from(2);
        }
    };

    let _guard = match init_logging(&settings, cli.verbose) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::from(2);
        }
    };

    settings.report_warnings();
    tracing::info!(url = %settings.backend_url, model = %settings.model, "kube-diag starting");

    match run(cli, &settings).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("Command failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
