//! legacy-bridge demo server.
//!
//! Serves the demo legacy handlers (`/hello`, `/echo`) through the adapter.
//!
//! ```text
//! client ─▶ TraceLayer ─▶ request ID ─▶ timeout ─▶ LegacyService ─▶ legacy handler
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use legacy_bridge::config::{load_config, validate_config, BridgeConfig, ConfigError};
use legacy_bridge::http::{demo_routes, BridgeServer};
use legacy_bridge::lifecycle::Shutdown;
use legacy_bridge::observability::logging;

#[derive(Parser)]
#[command(name = "legacy-bridge")]
#[command(about = "Serve legacy request/response-writer handlers on Axum", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => BridgeConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    logging::init(&config.observability);

    tracing::info!("legacy-bridge v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        config_file = ?cli.config,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = BridgeServer::new(config, demo_routes());
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
