//! forkpr CLI entry point.
//!
//! This binary is the composition root for the entire system. Responsibilities:
//!
//! 1. **Parse configuration**: flags and environment variables via `clap`,
//!    validated into a [`pipeline::ForkPrConfig`].
//! 2. **Wire observability**: configure `tracing-subscriber` (text or JSON on
//!    stderr) and, when an endpoint is given, an OpenTelemetry OTLP exporter.
//! 3. **Construct infrastructure**: build the [`github::GithubClient`] and
//!    inject it into a [`nodes::PipelineExecutor`].
//! 4. **Run one push event**: print the pull request URL on stdout, or the
//!    failure on stderr.
//!
//! The exit status is non-zero only when the run cannot start (bad
//! configuration or payload). A run that starts always exits 0; its outcome is
//! what it prints.

mod args;
mod telemetry;

use std::sync::Arc;

use clap::Parser;
use github::GithubClient;
use nodes::PipelineExecutor;
use pipeline::{ContentEncoding, PipelineOutcome};
use tracing::warn;

use crate::args::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let telemetry = telemetry::init(cli.json, cli.otlp_endpoint.as_deref())?;
    let result = run(&cli).await;
    telemetry.shutdown();
    result
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.to_config()?;
    let event = cli.load_event()?;

    if config.content_encoding == ContentEncoding::Plain {
        warn!(
            "File content is submitted as plain text; the GitHub contents API documents \
             base64. Use --encoding base64 once the expected behaviour is confirmed."
        );
    }

    let client = GithubClient::new(&config)?;
    let executor = PipelineExecutor::new(Arc::new(client), config);
    let report = executor.handle_push_event(&event).await;

    match &report.outcome {
        PipelineOutcome::PullRequestOpened { url } => println!("{url}"),
        PipelineOutcome::Failed { step, reason } => eprintln!("forkpr: {step} failed: {reason}"),
    }
    Ok(())
}
