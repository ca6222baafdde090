//! Fyyur booking directory (fyyur-web) - Main entry point
//!
//! Serves the venue, artist and show directory over HTTP.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fyyur_common::config::{default_config_path, BootstrapConfig, ConfigOverrides};
use fyyur_web::{build_router, AppState};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for fyyur-web
#[derive(Parser, Debug)]
#[command(name = "fyyur-web")]
#[command(about = "Venue and artist booking directory")]
#[command(version)]
struct Args {
    /// TOML bootstrap config file
    #[arg(short, long, env = "FYYUR_CONFIG")]
    config: Option<PathBuf>,

    /// SQLite database file
    #[arg(short, long, env = "FYYUR_DATABASE")]
    database: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "FYYUR_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "FYYUR_PORT")]
    port: Option<u16>,

    /// Log level when RUST_LOG is unset
    #[arg(long, env = "FYYUR_LOG_LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let explicit_config = args.config.is_some();
    let config_path = args.config.or_else(default_config_path);
    let overrides = ConfigOverrides {
        database_path: args.database,
        host: args.host,
        port: args.port,
        log_level: args.log_level,
    };
    let config = BootstrapConfig::resolve(config_path.as_deref(), overrides)
        .context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("fyyur_web={0},fyyur_common={0},tower_http={0}", config.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Fyyur v{}", env!("CARGO_PKG_VERSION"));
    match (&config.config_file, &config_path) {
        (Some(path), _) => info!("Loaded configuration from {}", path.display()),
        (None, Some(path)) if explicit_config => {
            warn!("Config file {} not found, using defaults", path.display())
        }
        _ => info!("No config file, using defaults"),
    }
    info!("Database: {}", config.database_path.display());

    let pool = fyyur_common::db::init_database(&config.database_path)
        .await
        .context("Failed to initialize database")?;

    let app = build_router(AppState::new(pool.clone()));

    let addr = format!("{}:{}", config.host, config.port);
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    pool.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
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
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
