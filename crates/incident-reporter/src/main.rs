//! Incident reporter binary.
//!
//! Serves Lambda invocations by default. With `--event <file>` it runs the
//! handler once against a local event and prints the response.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use lambda_runtime::{service_fn, LambdaEvent};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

use incident_reporter::{AwsSecretsStore, Config, HandlerResponse, IncidentReporter};

/// Files incidents for AWS infrastructure change events.
#[derive(Parser)]
#[command(name = "incident-reporter")]
#[command(about = "Generate a runbook, alert Slack and file an incident for an infra change event")]
#[command(version)]
struct Cli {
    /// Invoke the handler once with the event stored in this JSON file
    #[arg(long, value_name = "FILE")]
    event: Option<PathBuf>,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_parser = ["json", "text"])]
    log_format: Option<String>,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("incident_reporter=info,notify=info,warn"));

    if json {
        // CloudWatch stamps ingestion time itself.
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_target(false)
            .without_time()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let on_lambda = std::env::var_os("AWS_LAMBDA_FUNCTION_NAME").is_some();
    let json_logs = cli
        .log_format
        .as_deref()
        .map_or(on_lambda, |format| format == "json");
    init_tracing(json_logs);

    let config = Config::from_env().context("Invalid configuration")?;
    info!(
        secret_id = %config.secret_id,
        model = %config.openai_model,
        idempotency = %config.idempotency,
        "Starting incident reporter"
    );

    let http = config
        .http_client()
        .context("Failed to build HTTP client")?;
    let store = Arc::new(AwsSecretsStore::from_env().await);
    let reporter = IncidentReporter::new(config, http, store);

    if let Some(path) = cli.event {
        return invoke_once(&reporter, &path).await;
    }

    let reporter = &reporter;
    if let Err(e) = lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        Ok::<HandlerResponse, lambda_runtime::Error>(reporter.handle(event.payload).await)
    }))
    .await
    {
        bail!("lambda_runtime::run error: {e:?}");
    }

    Ok(())
}

async fn invoke_once(reporter: &IncidentReporter, path: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read event file {}", path.display()))?;
    let event: Value = serde_json::from_str(&raw)
        .with_context(|| format!("Event file {} is not valid JSON", path.display()))?;

    let response = reporter.handle(event).await;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
