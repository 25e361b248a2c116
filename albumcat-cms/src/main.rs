//! albumcat-cms - album catalog host with the Local CMS API
//!
//! Development mode: serves the public directory, `/covers/*`, and the album
//! CRUD + cover upload API over a JSON catalog file.
//! Production mode: static files only.

use std::path::PathBuf;

use albumcat_common::config::{
    locate_config_file, load_toml_config, AppMode, ConfigOverrides, ServerConfig,
};
use albumcat_cms::{build_router, AppState};
use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for albumcat-cms
#[derive(Parser, Debug)]
#[command(name = "albumcat-cms")]
#[command(about = "Album catalog host with local content editing API")]
#[command(version)]
struct Args {
    /// TOML config file (falls back to ALBUMCAT_CONFIG, ./albumcat.toml, user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Interface to bind
    #[arg(long, env = "ALBUMCAT_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "ALBUMCAT_PORT")]
    port: Option<u16>,

    /// development (CMS API mounted) or production (read-only)
    #[arg(short, long, env = "ALBUMCAT_MODE")]
    mode: Option<AppMode>,

    /// Catalog JSON file
    #[arg(long, env = "ALBUMCAT_CATALOG")]
    catalog: Option<PathBuf>,

    /// Directory uploaded covers are written to
    #[arg(long, env = "ALBUMCAT_COVERS_DIR")]
    covers_dir: Option<PathBuf>,

    /// Directory served for every other path
    #[arg(long, env = "ALBUMCAT_PUBLIC_DIR")]
    public_dir: Option<PathBuf>,

    /// Largest accepted request body in bytes
    #[arg(long, env = "ALBUMCAT_MAX_BODY_BYTES")]
    max_body_bytes: Option<usize>,

    /// Log level when RUST_LOG is unset
    #[arg(long, env = "ALBUMCAT_LOG")]
    log_level: Option<String>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            host: self.host.clone(),
            port: self.port,
            mode: self.mode,
            catalog_path: self.catalog.clone(),
            covers_dir: self.covers_dir.clone(),
            public_dir: self.public_dir.clone(),
            max_body_bytes: self.max_body_bytes,
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is resolved before tracing so the file can set the log level
    let config_file = locate_config_file(args.config.as_deref())?;
    let file_config = config_file
        .as_deref()
        .map(load_toml_config)
        .transpose()?;
    let config = ServerConfig::resolve(&args.overrides(), file_config.as_ref());

    let level = &config.log_level;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("albumcat_cms={level},albumcat_common={level},tower_http={level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting albumcat-cms v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    match &config_file {
        Some(path) => info!("Config file: {}", path.display()),
        None => info!("No config file found, using defaults"),
    }
    info!("Mode: {}", config.mode);
    info!("Public directory: {}", config.public_dir.display());

    let bind_address = config.bind_address();
    if config.mode.is_dev() && config.host != "127.0.0.1" && config.host != "localhost" {
        warn!(
            "Local CMS API bound to {}: it has no authentication and echoes internal errors",
            config.host
        );
    }

    let state = AppState::init(config)
        .await
        .context("Failed to initialize catalog storage")?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_address))?;
    info!("Listening on http://{}", bind_address);
    info!("Health check: http://{}/health", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
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
