//! Crop Recommendation Server
//!
//! HTTP server exposing the bundled random-forest crop recommender.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use crop_recommender::server::browser::{spawn_open_browser, BROWSER_DELAY};
use crop_recommender::utils::{format_duration, init_logging, LogConfig};
use crop_recommender::{build_router, prepare_state, ServerConfig};

/// Crop Recommendation Server
#[derive(Parser, Debug)]
#[command(name = "crop-recommender")]
#[command(version)]
#[command(about = "HTTP server recommending a crop from soil and climate features")]
struct Cli {
    /// Port to listen on
    #[arg(short, long, env = "CROP_PORT", default_value = "5000")]
    port: u16,

    /// Host to bind to
    #[arg(long, env = "CROP_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Path to the model artifact (defaults to the bundled model)
    #[arg(long, env = "CROP_MODEL_PATH")]
    model: Option<PathBuf>,

    /// Load the model before accepting requests
    #[arg(long, env = "CROP_PRELOAD")]
    preload: bool,

    /// Open the home page in a browser once the server is up
    #[arg(long, env = "CROP_OPEN_BROWSER")]
    open_browser: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "CROP_LOG_LEVEL")]
    log_level: Option<String>,

    /// Debug logging with module targets and thread IDs
    #[arg(short, long)]
    verbose: bool,

    /// Plain log output without colors, for log collectors
    #[arg(long, env = "CROP_LOG_PRODUCTION")]
    production_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_config =
        LogConfig::from_flags(cli.log_level.as_deref(), cli.verbose, cli.production_logs);
    init_logging(&log_config).map_err(anyhow::Error::msg)?;

    // Build configuration
    let mut config = ServerConfig {
        host: cli.host,
        port: cli.port,
        preload_model: cli.preload,
        open_browser: cli.open_browser,
        ..ServerConfig::default()
    };
    if let Some(model) = cli.model {
        config.model_path = model;
    }

    info!("Crop Recommendation Server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  Model path: {:?}", config.model_path);
    info!("  Preload:    {}", config.preload_model);

    // Refuse to start without the model artifact
    let state = prepare_state(config.clone()).map_err(|e| {
        error!("Critical error: {}", e);
        e
    })?;

    let app = build_router(state.clone());

    // Start server
    let addr: SocketAddr = config.bind_address().parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Starting server on http://{}", addr);

    if config.open_browser {
        spawn_open_browser(config.home_url(), BROWSER_DELAY);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!(
        "Server stopped after {}",
        format_duration(state.started_at.elapsed().as_secs_f64())
    );
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
