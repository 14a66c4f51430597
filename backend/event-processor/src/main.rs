//! Event processor - main entry point
//!
//! # Modes
//! - `consumer` (default): poll Kafka and process records as they arrive
//! - `batch`: process a JSON batch of records from `--input` or stdin

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use event_processor::{handle_batch_payload, Config, ConsumerLoop, KafkaRecordSource};
use std::io::Read;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RunMode {
    Consumer,
    Batch,
}

#[derive(Debug, Parser)]
#[command(name = "event-processor", about = "Consume and log time events")]
struct Cli {
    #[arg(long, value_enum, default_value_t = RunMode::Consumer)]
    mode: RunMode,

    /// Batch file for `--mode batch`; stdin when omitted
    #[arg(long)]
    input: Option<PathBuf>,
}

fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_filter()));
    let registry = tracing_subscriber::registry().with(filter);

    if config.json_logs() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = Config::from_env().context("Failed to load configuration")?;
    init_tracing(&config);

    match cli.mode {
        RunMode::Consumer => run_consumer_mode(config).await,
        RunMode::Batch => run_batch_mode(cli.input),
    }
}

async fn run_consumer_mode(config: Config) -> Result<()> {
    let source = KafkaRecordSource::new(&config).context("Failed to create Kafka consumer")?;

    let stats = ConsumerLoop::new(source, config.poll_timeout())
        .run(shutdown_signal())
        .await;

    info!(
        received = stats.received,
        processed = stats.processed,
        skipped = stats.skipped,
        errors = stats.errors,
        "Consumer stopped"
    );
    Ok(())
}

fn run_batch_mode(input: Option<PathBuf>) -> Result<()> {
    let raw = match &input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read batch file {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read batch from stdin")?;
            buf
        }
    };

    let report = handle_batch_payload(&raw);
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
