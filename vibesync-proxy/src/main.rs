//! vibesync-proxy - HTTP proxy for the VibeSync client
//!
//! Serves:
//! - POST /api/analyze       (vision model tagging)
//! - GET  /api/weather       (current weather by coordinates)
//! - GET  /api/music/search  (catalog song search)
//! - GET  /health

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vibesync_common::config::{default_config_path, load_toml_config, read_toml_config};
use vibesync_proxy::{build_router, AppState, ProxyConfig};

/// Command-line arguments for vibesync-proxy
#[derive(Parser, Debug)]
#[command(name = "vibesync-proxy")]
#[command(about = "Tagging, weather and music-search proxy for VibeSync")]
#[command(version)]
struct Args {
    /// Address to bind
    #[arg(long, env = "VIBESYNC_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "VIBESYNC_PORT")]
    port: Option<u16>,

    /// TOML bootstrap config file
    #[arg(short, long, env = "VIBESYNC_CONFIG")]
    config: Option<PathBuf>,
}

fn init_tracing(toml_level: Option<&str>) {
    let fallback = format!(
        "vibesync_proxy={level},vibesync_common={level},tower_http={level}",
        level = toml_level.unwrap_or("info")
    );
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args
        .config
        .clone()
        .or_else(|| default_config_path("vibesync-proxy"));

    // Logging level may come from the TOML file, so peek at it before tracing starts
    let toml_level = config_path
        .as_deref()
        .and_then(|p| read_toml_config(p).ok())
        .map(|c| c.logging.level);
    init_tracing(toml_level.as_deref());

    // Log build identification immediately after tracing init
    info!(
        "Starting VibeSync proxy v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let toml_config = load_toml_config(config_path.as_deref());
    let config = ProxyConfig::resolve(args.host, args.port, toml_config);

    let state = AppState::new(&config).context("Failed to initialize upstream clients")?;
    let app = build_router(state, config.max_body_bytes);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("vibesync-proxy listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

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
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
