//! Game Analytics Gateway
//!
//! HTTP API exposing population-level game metrics, delegating the actual
//! computation to an external export pipeline.
//!
//! # Usage
//!
//! ```bash
//! # Defaults: ./gateway_config.toml or built-in defaults, bind 0.0.0.0:8080
//! cargo run --release
//!
//! # Explicit config file and bind address
//! ./gamedata-gateway --config /etc/gateway/gateway_config.toml --addr 127.0.0.1:9000
//! ```
//!
//! # Environment Variables
//!
//! - `GATEWAY_CONFIG`: Path to the TOML config (when `--config` is not given)
//! - `GATEWAY_LOG_FILE`: Extra log file to append to
//! - `GATEWAY_CORS_ORIGINS`: Comma-separated allowed CORS origins
//! - `RUST_LOG`: Logging filter (default: `logging.level`, then info)

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use gamedata_gateway::api::{create_app, GatewayState};
use gamedata_gateway::config::GatewayConfig;
use gamedata_gateway::export::{DisabledExportManager, ExportManager, HttpExportManager};
use gamedata_gateway::logging;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "gamedata-gateway")]
#[command(about = "Game analytics API gateway")]
#[command(version)]
struct CliArgs {
    /// Path to the gateway TOML config. Fails hard if it cannot be loaded.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the server address (default: server.addr from config)
    #[arg(short, long)]
    addr: Option<String>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

// ============================================================================
// Bootstrap
// ============================================================================

fn load_config(args: &CliArgs) -> Result<GatewayConfig> {
    match &args.config {
        Some(path) => GatewayConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(GatewayConfig::load()),
    }
}

fn build_export_manager(config: &GatewayConfig) -> Result<Arc<dyn ExportManager>> {
    match &config.export.endpoint {
        Some(endpoint) => {
            let timeout = config.export.timeout_secs.map(Duration::from_secs);
            let manager = HttpExportManager::new(endpoint, timeout)
                .context("Failed to build export pipeline client")?;
            info!(endpoint = %endpoint, ?timeout, "Export pipeline configured");
            Ok(Arc::new(manager))
        }
        None => {
            warn!("No export.endpoint configured, population requests will fail with a server error");
            Ok(Arc::new(DisabledExportManager))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let args = CliArgs::parse();

    // Config decides the final log setup, so loading logs through a
    // temporary stderr subscriber.
    let config =
        tracing::subscriber::with_default(logging::bootstrap_subscriber(), || load_config(&args))?;
    logging::init(&config.logging)?;

    if args.print_config {
        println!("{}", config.to_toml()?);
        return Ok(());
    }

    let server_addr = args.addr.clone().unwrap_or_else(|| config.server.addr.clone());
    let export_manager = build_export_manager(&config)?;

    info!(games = config.games.len(), "Source mapping loaded");
    for (game_id, mapping) in &config.games {
        info!(game_id = %game_id, interface = %mapping.interface, "Mapped game");
    }

    let state = GatewayState::new(Arc::new(config), export_manager);
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&server_addr)
        .await
        .with_context(|| format!("Failed to bind to {server_addr}"))?;
    info!("HTTP server listening on {}", server_addr);

    // Graceful shutdown via Ctrl+C
    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, initiating shutdown...");
            shutdown_token.cancel();
        }
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel_token.cancelled().await })
        .await
        .context("HTTP server error")?;

    info!("Gateway shutdown complete");
    Ok(())
}
