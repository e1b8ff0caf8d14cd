//! # Structured Logging
//!
//! One global subscriber per process. Console output goes to stderr so
//! answers on stdout stay clean; `LOG_DIR` adds a daily-rotated file.

use anyhow::{anyhow, Result};
use config_rs::{LogFormat, Settings};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

const LOG_FILE_PREFIX: &str = "kube-diag.log";

/// Workspace crates that follow the configured level; everything else
/// stays at warn.
const OWN_TARGETS: [&str; 7] = [
    "kube_diag",
    "diag_cli",
    "diagnostic_orchestrator_rs",
    "generation_gateway_rs",
    "prompt_engine_rs",
    "prompt_safety_rs",
    "config_rs",
];

/// Default filter directive when `RUST_LOG` is unset
pub fn default_directive(level: &str) -> String {
    std::iter::once("warn".to_string())
        .chain(OWN_TARGETS.iter().map(|target| format!("{}={}", target, level)))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initializes logging. Keep the returned guard alive until exit or
/// buffered file output is lost.
pub fn init_logging(settings: &Settings, verbose: bool) -> Result<Option<WorkerGuard>> {
    let level = if verbose { "debug" } else { settings.log_level.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(level)))
        .map_err(|e| anyhow!("Invalid log level '{}': {}", level, e))?;

    let (json_layer, text_layer) = match settings.log_format {
        LogFormat::Json => (
            Some(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_target(true)
                    .with_writer(std::io::stderr),
            ),
            None,
        ),
        LogFormat::Text => (
            None,
            Some(fmt::layer().with_target(true).with_writer(std::io::stderr)),
        ),
    };

    let (file_layer, guard) = match &settings.log_dir {
        Some(dir) => {
            let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().flatten_event(true).with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    Registry::default()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("Failed to set global subscriber: {}", e))?;

    tracing::debug!(
        level,
        json = settings.log_format == LogFormat::Json,
        file = settings.log_dir.is_some(),
        "Structured logging initialized"
    );

    Ok(guard)
}
