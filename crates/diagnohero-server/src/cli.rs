//! CLI module for diagnohero-server.
//!
//! This module provides the command-line interface that can be used either
//! as a standalone binary or as a subcommand of the main diagnohero CLI.

use std::io;
use std::path::PathBuf;

use clap::Parser;
use diagnohero_config::{
    CliOverrides, Config, LoggingConfig, apply_overrides, load_config, validate_config,
};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{CancellationToken, open_store, run_with_shutdown};

/// DiagnoHero server CLI arguments.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "diagnohero-server",
    version,
    about = "DiagnoHero hearts and study service"
)]
pub struct ServerArgs {
    /// Config file path (json/yaml/toml); built-in defaults when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: CliOverrides,
}

/// Run the server with the given arguments.
///
/// This is the main entry point for the server CLI, used by both the
/// standalone binary and the unified diagnohero CLI.
pub async fn run(args: ServerArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    apply_overrides(&mut config, &args.overrides);
    validate_config(&config)?;

    init_tracing(&config.logging);

    if let Some(listen) = &config.metrics.listen {
        match diagnohero_metrics::init_prometheus(listen) {
            Ok(()) => info!("metrics exporter listening on {}", listen),
            Err(e) => warn!("failed to start metrics exporter: {}", e),
        }
    }

    if config.auth.sessions.is_empty() {
        warn!("no sessions configured, every /api request will be rejected");
    }

    // Set up graceful shutdown on SIGTERM/SIGINT
    let shutdown = CancellationToken::new();
    let shutdown_signal = shutdown.clone();

    tokio::spawn(async move {
        shutdown_signal_handler().await;
        info!("shutdown signal received");
        shutdown_signal.cancel();
    });

    let store = open_store(&config.store).await?;
    run_with_shutdown(config, store, shutdown).await?;
    Ok(())
}

/// Wait for shutdown signals (SIGTERM, SIGINT).
async fn shutdown_signal_handler() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

/// Build the filter directive from the base level and per-module overrides.
fn filter_directive(config: &LoggingConfig) -> String {
    let mut directive = config.level.as_deref().unwrap_or("info").to_string();

    let mut filters: Vec<_> = config.filters.iter().collect();
    filters.sort();
    for (module, level) in filters {
        directive.push(',');
        directive.push_str(module);
        directive.push('=');
        directive.push_str(level);
    }
    directive
}

/// Initialize tracing subscriber with the given logging configuration.
///
/// Supports:
/// - `level`: Base log level (trace, debug, info, warn, error)
/// - `format`: Output format (json, pretty, compact). Default: pretty
/// - `output`: Output target (stdout, stderr). Default: stderr
/// - `filters`: Per-module log level overrides
fn init_tracing(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_new(filter_directive(config)).unwrap_or_else(|_| EnvFilter::new("info"));

    let format = config.format.as_deref().unwrap_or("pretty");
    let output = config.output.as_deref().unwrap_or("stderr");

    match (format, output) {
        ("json", "stdout") => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(io::stdout))
                .init();
        }
        ("json", _) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(io::stderr))
                .init();
        }
        ("compact", "stdout") => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().compact().with_writer(io::stdout))
                .init();
        }
        ("compact", _) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().compact().with_writer(io::stderr))
                .init();
        }
        (_, "stdout") => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(io::stdout))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(io::stderr))
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        ServerArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_overrides() {
        let args = ServerArgs::try_parse_from([
            "diagnohero-server",
            "-c",
            "diagnohero.toml",
            "--listen",
            "0.0.0.0:9000",
            "--max-hearts",
            "3",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("diagnohero.toml")));
        assert_eq!(args.overrides.listen.as_deref(), Some("0.0.0.0:9000"));
        assert_eq!(args.overrides.max_hearts, Some(3));
    }

    #[test]
    fn test_filter_directive() {
        let mut config = LoggingConfig {
            level: Some("debug".into()),
            ..Default::default()
        };
        assert_eq!(filter_directive(&config), "debug");

        config.filters.insert("sqlx".into(), "warn".into());
        config.filters.insert("axum".into(), "info".into());
        assert_eq!(filter_directive(&config), "debug,axum=info,sqlx=warn");
    }
}
