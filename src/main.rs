//! pg-dynatrace-relay - Azure PostgreSQL to Dynatrace metrics relay
//!
//! Runs the discover/probe/fetch/publish pipeline on a timer, or once with `--once`.

#![allow(missing_docs)]

use anyhow::Context;
use clap::Parser;
use pg_dynatrace_relay::utils::{LogFormat, init_logging};
use pg_dynatrace_relay::{ProcessEnv, Relay, RelayConfig, Scheduler, SharedSource, build_info};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "relay", version, about = "Ship Azure PostgreSQL metrics to Dynatrace")]
struct Cli {
    /// YAML configuration file; defaults apply when omitted
    #[arg(short, long, env = "RELAY_CONFIG")]
    config: Option<PathBuf>,

    /// Run a single tick and exit
    #[arg(long)]
    once: bool,

    /// Seconds between ticks
    #[arg(long)]
    interval: Option<u64>,

    /// Instances processed concurrently within a tick
    #[arg(long)]
    max_concurrency: Option<usize>,

    /// Log level or filter directive, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log output format: plain or json
    #[arg(long, default_value = "plain")]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is normal in deployed environments
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    if let Err(e) = init_logging(&cli.log_level, cli.log_format) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let info = build_info();
    info!(
        "Starting relay {} (git {}, built {}, {})",
        info.version, info.git_hash, info.build_time, info.rust_version
    );

    let source: SharedSource = Arc::new(ProcessEnv);
    let config = load_config(&cli, source.as_ref()).await?;
    let relay = Relay::azure(&config, source).context("failed to build relay")?;

    if cli.once {
        relay.run_tick().await;
        return Ok(());
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown requested, finishing current tick"),
            Err(e) => error!("Failed to listen for Ctrl-C: {}", e),
        }
        let _ = shutdown_tx.send(true);
    });

    Scheduler::new(relay, &config.schedule)
        .run(shutdown_rx)
        .await;
    Ok(())
}

async fn load_config(
    cli: &Cli,
    source: &dyn pg_dynatrace_relay::ConfigSource,
) -> anyhow::Result<RelayConfig> {
    let config = match &cli.config {
        Some(path) => RelayConfig::from_file(path)
            .await
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => RelayConfig::default(),
    };

    let mut config = config
        .with_overrides(source)
        .context("invalid environment override")?;

    if let Some(interval) = cli.interval {
        config.schedule.interval_secs = interval;
    }
    if let Some(max_concurrency) = cli.max_concurrency {
        config.schedule.max_concurrency = max_concurrency;
    }
    config.validate().context("invalid configuration")?;

    Ok(config)
}
