//! ingest-trigger — run the knowledge-base ingestion trigger on one S3 event.
//!
//! Reads an S3 event notification document (`{"Records": [...]}`) from
//! `--event` or stdin and prints the `{statusCode, body}` result to stdout.
//! Exits with status 1 when the invocation fails.

use std::io::Read;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use autoingest_core::config::{load_dotenv, Config};
use autoingest_trigger::{BedrockIngestionService, IngestionTarget, IngestionTrigger};

// ── CLI ─────────────────────────────────────────────────────────────

/// Start a Bedrock knowledge-base ingestion job for S3 object changes.
#[derive(Parser, Debug)]
#[command(name = "ingest-trigger", version, about)]
struct Cli {
    /// Path to an S3 event JSON document (reads stdin when omitted).
    #[arg(long, env = "INGEST_TRIGGER_EVENT")]
    event: Option<String>,

    /// Config profile (overrides AUTOINGEST_PROFILE).
    #[arg(long)]
    profile: Option<String>,
}

fn read_event(path: Option<&str>) -> anyhow::Result<serde_json::Value> {
    let raw = match path {
        Some(p) => std::fs::read_to_string(p).with_context(|| format!("reading event file {p}"))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading event from stdin")?;
            buf
        }
    };
    serde_json::from_str(&raw).context("event is not valid JSON")
}

// ── main ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    load_dotenv();
    let cli = Cli::parse();

    let config = match cli.profile.as_deref() {
        Some(p) => Config::for_profile(p),
        None => Config::from_env(),
    };
    config.log_summary();

    let (kb_id, ds_id) = config.knowledge_base.require()?;
    let target = IngestionTarget::new(kb_id, ds_id);

    let event = read_event(cli.event.as_deref())?;

    let service = Arc::new(BedrockIngestionService::new(&config.aws).await);
    let trigger = IngestionTrigger::new(service, target);

    let result = trigger.handle_event(&event).await;
    info!(
        status = result.status_code,
        processed = result.outcomes.len(),
        started = result.started_count(),
        "ingest-trigger finished"
    );

    println!("{}", serde_json::to_string_pretty(&result)?);

    if !result.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
