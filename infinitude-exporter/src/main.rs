//! Prometheus exporter for Infinitude.

use std::time::Duration;

use clap::Parser;
use tokio::sync::watch;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

use infinitude_exporter::config::LogFormat;
use infinitude_exporter::{ExporterConfig, HttpServer, build_registry};

/// Prometheus exporter for Infinitude thermostat data.
#[derive(Parser, Debug)]
#[command(name = "infinitude-exporter")]
#[command(about = "Export Infinitude status and energy data as Prometheus metrics")]
#[command(version)]
struct Args {
    /// Path to configuration file (JSON5 format).
    #[arg(short, long)]
    config: Option<String>,

    /// Infinitude base URL (overrides config).
    #[arg(long, env = "INFINITUDE_BASE_URL")]
    base_url: Option<String>,

    /// HTTP listen address (overrides config).
    #[arg(long)]
    listen: Option<String>,

    /// Log level (trace, debug, info, warn, error; overrides config).
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = if let Some(config_path) = &args.config {
        ExporterConfig::load_from_file(config_path)?
    } else {
        ExporterConfig::default()
    };

    // Override from CLI / environment
    if let Some(base_url) = args.base_url {
        config.infinitude.base_url = base_url;
    }
    if let Some(listen) = args.listen {
        config.prometheus.listen = listen;
    }
    if let Some(log_level) = args.log_level {
        config.logging.level = log_level;
    }
    config.validate()?;

    // Initialize logging
    let log_level = config.logging.level.parse().unwrap_or(Level::INFO);
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("infinitude_exporter={}", log_level).parse()?)
        .add_directive(format!("hyper={}", Level::WARN).parse()?)
        .add_directive(format!("reqwest={}", Level::WARN).parse()?);

    match config.logging.format {
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }

    info!(
        base_url = %config.infinitude.base_url,
        timeout_secs = config.infinitude.timeout_secs,
        "Starting Infinitude exporter"
    );

    // Create shutdown signal
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let registry = build_registry(&config)?;

    // Parse listen address
    let listen_addr = config
        .prometheus
        .listen
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid listen address: {}", e))?;

    let http_server = HttpServer::new(
        registry.clone(),
        listen_addr,
        config.prometheus.path.clone(),
    );

    // Start HTTP server
    let http_task = tokio::spawn(async move {
        if let Err(e) = http_server.run(shutdown_rx).await {
            error!("HTTP server error: {}", e);
        }
    });

    // Wait for shutdown signal
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate() => {
            info!("Received SIGTERM, shutting down...");
        }
    }

    // Signal shutdown
    shutdown_tx.send(true)?;

    // Wait for the server to drain
    let _ = tokio::time::timeout(Duration::from_secs(5), http_task).await;

    let stats = registry.stats();
    info!(
        scrapes = stats.scrapes,
        collection_failures = stats.collection_failures,
        "Final statistics"
    );

    info!("Exporter stopped");
    Ok(())
}

#[cfg(unix)]
async fn terminate() {
    match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            error!("Failed to install SIGTERM handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}
