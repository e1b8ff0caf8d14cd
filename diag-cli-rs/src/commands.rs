// diag-cli-rs/src/commands.rs
// One function per subcommand. Output goes to the writer passed in so the
// commands can be driven from tests.

use std::io::Write;
use std::process::ExitCode;

use anyhow::{anyhow, Result};
use diagnostic_orchestrator_rs::{frame_events, DiagnosticOrchestrator};
use futures::StreamExt;
use generation_gateway_rs::FragmentStream;
use prompt_safety_rs::PromptValidator;
use serde::Serialize;
use shared_types_rs::{ChatMessage, DiagnosticError, DiagnosticRequest, SecurityClassification, StreamEvent};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

use crate::cli::{AskArgs, InteractiveArgs, OutputArgs, ValidateArgs};

const EXIT_WORDS: [&str; 3] = ["exit", "quit", "q"];

/// How a streamed answer ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOutcome {
    Finished,
    Interrupted,
}

/// Write fragments as they arrive. Ctrl-C closes the stream and returns
/// `Interrupted`; a stream error is returned after the partial answer.
pub async fn print_stream<W: Write>(
    out: &mut W,
    mut fragments: FragmentStream,
    json: bool,
) -> Result<StreamOutcome> {
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut failure = None;
    let mut interrupted = false;
    {
        let events = frame_events(&mut fragments);
        tokio::pin!(events);

        loop {
            tokio::select! {
                _ = &mut ctrl_c => {
                    interrupted = true;
                    break;
                }
                event = events.next() => {
                    let Some(event) = event else { break };
                    if json {
                        writeln!(out, "{}", event.to_json_line()?)?;
                    } else if let StreamEvent::Chunk { chunk, .. } = &event {
                        write!(out, "{}", chunk)?;
                    }
                    out.flush()?;
                    if let StreamEvent::Error { error, .. } = event {
                        failure = Some(error);
                    }
                }
            }
        }
    }

    if !json {
        writeln!(out)?;
    }

    if interrupted {
        fragments.close();
        warn!("Interrupted, stream closed");
        return Ok(StreamOutcome::Interrupted);
    }
    match failure {
        Some(error) => Err(anyhow!(error)),
        None => Ok(StreamOutcome::Finished),
    }
}

/// Reject the request when the safety gate refuses it
pub fn check_request(validator: &PromptValidator, request: &DiagnosticRequest, allow_destructive: bool) -> Result<()> {
    let verdict = validator.validate_request(request, allow_destructive);
    verdict.into_result().map_err(anyhow::Error::from)
}

pub async fn ask<W: Write>(
    orchestrator: &DiagnosticOrchestrator,
    validator: &PromptValidator,
    args: &AskArgs,
    out: &mut W,
) -> Result<ExitCode> {
    let request = args.to_request()?;
    if args.check {
        check_request(validator, &request, args.allow_destructive)?;
    }

    if args.no_stream {
        let result = orchestrator.diagnose(&request).await?;
        if args.json {
            writeln!(out, "{}", serde_json::to_string(&result)?)?;
        } else {
            writeln!(out, "{}", result.text)?;
        }
        return Ok(ExitCode::SUCCESS);
    }

    print_stream(out, orchestrator.diagnose_stream(&request), args.json).await?;
    Ok(ExitCode::SUCCESS)
}

/// Read questions until an exit word or end of input. A failed question is
/// reported and the session continues.
pub async fn interactive<R, W>(
    orchestrator: &DiagnosticOrchestrator,
    args: &InteractiveArgs,
    input: R,
    out: &mut W,
) -> Result<ExitCode>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut history: Vec<ChatMessage> = Vec::new();

    writeln!(
        out,
        "Kubernetes troubleshooting assistant. Type 'exit', 'quit' or 'q' to leave."
    )?;

    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if EXIT_WORDS.contains(&question.to_lowercase().as_str()) {
            break;
        }

        let outcome = if args.chat {
            chat_turn(orchestrator, args, question, &mut history, out).await
        } else {
            single_question(orchestrator, args, question, out).await
        };

        if let Err(e) = outcome {
            warn!("Question failed: {}", e);
            writeln!(out, "Error: {}", e)?;
        }
    }

    info!("Interactive session ended");
    Ok(ExitCode::SUCCESS)
}

async fn single_question<W: Write>(
    orchestrator: &DiagnosticOrchestrator,
    args: &InteractiveArgs,
    question: &str,
    out: &mut W,
) -> Result<()> {
    let mut request = DiagnosticRequest::new(question)?;
    if let Some(namespace) = &args.namespace {
        request = request.with_namespace(namespace.as_str());
    }
    if let Some(language) = args.language {
        request = request.with_language(language);
    }
    if let Some(context) = args.cluster.to_context() {
        request = request.with_cluster_context(context);
    }
    print_stream(out, orchestrator.diagnose_stream(&request), false).await?;
    Ok(())
}

async fn chat_turn<W: Write>(
    orchestrator: &DiagnosticOrchestrator,
    args: &InteractiveArgs,
    question: &str,
    history: &mut Vec<ChatMessage>,
    out: &mut W,
) -> Result<()> {
    history.push(ChatMessage::user(question));
    match orchestrator.chat(history, args.language).await {
        Ok(result) => {
            writeln!(out, "{}", result.text)?;
            history.push(ChatMessage::assistant(result.text));
            Ok(())
        }
        Err(e) => {
            // Unanswered questions are not kept in the history
            history.pop();
            Err(e.into())
        }
    }
}

#[derive(Debug, Serialize)]
struct ValidationReport<'a> {
    accepted: bool,
    reason: Option<&'a str>,
    rule: Option<&'static str>,
    classification: SecurityClassification,
    commands: Vec<String>,
}

/// Exit code is failure when the text is rejected
pub fn validate<W: Write>(validator: &PromptValidator, args: &ValidateArgs, out: &mut W) -> Result<ExitCode> {
    let verdict = validator.validate(&args.text, args.allow_destructive);
    let report = ValidationReport {
        accepted: verdict.accepted,
        reason: verdict.reason.as_deref(),
        rule: verdict.rule,
        classification: validator.classify(&args.text),
        commands: validator.extract_commands(&args.text),
    };

    if args.json {
        writeln!(out, "{}", serde_json::to_string(&report)?)?;
    } else {
        writeln!(out, "Accepted:       {}", if report.accepted { "yes" } else { "no" })?;
        if let Some(reason) = report.reason {
            writeln!(out, "Reason:         {}", reason)?;
        }
        writeln!(out, "Classification: {}", report.classification)?;
        for command in &report.commands {
            writeln!(out, "Command:        {}", command)?;
        }
    }

    Ok(if report.accepted { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Exit code is failure unless the backend is reachable and has the model
pub async fn health<W: Write>(
    orchestrator: &DiagnosticOrchestrator,
    args: OutputArgs,
    out: &mut W,
) -> Result<ExitCode> {
    let status = orchestrator.backend_status().await;

    if args.json {
        let report = serde_json::json!({
            "status": status.status_label(),
            "reachable": status.reachable,
            "model": status.model,
            "model_installed": status.model_installed,
            "installed_models": status.installed_models,
        });
        writeln!(out, "{}", report)?;
    } else {
        writeln!(out, "Status:    {}", status.status_label())?;
        writeln!(out, "Reachable: {}", status.reachable)?;
        writeln!(out, "Model:     {}", status.model)?;
        writeln!(out, "Installed: {}", status.model_installed)?;
        if status.reachable && !status.model_installed {
            writeln!(out, "{}", DiagnosticError::model_not_found(status.model.as_str()))?;
        }
    }

    Ok(if status.is_ready() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

pub async fn models<W: Write>(
    orchestrator: &DiagnosticOrchestrator,
    args: OutputArgs,
    out: &mut W,
) -> Result<ExitCode> {
    let models = orchestrator.backend().list_models().await?;
    if args.json {
        writeln!(out, "{}", serde_json::to_string(&models)?)?;
    } else {
        for model in &models {
            writeln!(out, "{}", model)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}
