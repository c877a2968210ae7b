//! Catalog Server - HTTP API server binary.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::signal;
use tokio::sync::Notify;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use catalog_server::{ServerConfig, run_with_shutdown};

/// Product catalog API server
#[derive(Parser)]
#[command(name = "catalog-server")]
#[command(about = "Product catalog REST API with JSON, XML and table output")]
#[command(version)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<String>,

    /// Listen address (overrides config and environment)
    #[arg(short, long)]
    listen: Option<String>,

    /// Directory holding downloadable files
    #[arg(long)]
    files_dir: Option<PathBuf>,

    /// Start with an empty catalog
    #[arg(long)]
    no_seed: bool,

    /// Log level (overrides config)
    #[arg(long)]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long)]
    json_logs: bool,
}

fn setup_logging(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

fn load_config(args: &Args) -> anyhow::Result<ServerConfig> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)
            .map_err(|e| anyhow::anyhow!("failed to load config from {path}: {e}"))?,
        None => ServerConfig::from_env()
            .map_err(|e| anyhow::anyhow!("failed to load config from environment: {e}"))?,
    };

    if let Some(listen) = &args.listen {
        config.listen_addr = listen.clone();
    }
    if let Some(dir) = &args.files_dir {
        config.files_dir = dir.clone();
    }
    if args.no_seed {
        config.seed_data = false;
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    if args.json_logs {
        config.logging.format = "json".to_string();
    }

    Ok(config)
}

async fn shutdown_signal(timeout: u64) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown (timeout: {}s)...", timeout);
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown (timeout: {}s)...", timeout);
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let loaded = load_config(&args);

    let (level, json) = match &loaded {
        Ok(config) => (config.logging.level.clone(), config.logging.format == "json"),
        Err(_) => (
            args.log_level.clone().unwrap_or_else(|| "info".to_string()),
            args.json_logs,
        ),
    };
    setup_logging(&level, json);

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Graceful shutdown timeout: {}s", config.shutdown_timeout);
    info!("Press Ctrl+C to stop");

    let shutdown_timeout = config.shutdown_timeout;
    let stopping = Arc::new(Notify::new());
    let shutdown = {
        let stopping = Arc::clone(&stopping);
        async move {
            shutdown_signal(shutdown_timeout).await;
            stopping.notify_one();
        }
    };

    // Give in-flight requests the configured grace period once shutdown starts.
    let deadline = async {
        stopping.notified().await;
        tokio::time::sleep(Duration::from_secs(shutdown_timeout)).await;
    };

    tokio::select! {
        result = run_with_shutdown(config, shutdown) => {
            if let Err(e) = result {
                error!("Server error: {}", e);
                return ExitCode::FAILURE;
            }
        }
        _ = deadline => {
            warn!("In-flight requests did not finish within {}s", shutdown_timeout);
        }
    }

    info!("Server stopped");
    ExitCode::SUCCESS
}
