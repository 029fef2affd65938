//! Salecast Server - sales forecasting HTTP API
//!
//! Holds one in-memory model, trained through `POST /ml/train` and queried
//! through `POST /ml/predict`. State is lost on restart.
//!
//! # Usage
//! ```sh
//! FORECAST_REGRESSOR=random_forest PORT=5000 cargo run --bin server
//! ```
//!
//! # Environment Variables
//! - `HOST` / `PORT` - Bind address (default: 0.0.0.0:5000)
//! - `FORECAST_REGRESSOR` - `random_forest` or `linear` (default: random_forest)
//! - `FORECAST_FEATURE_MODE` - `trend` or `calendar` (default: trend)
//! - `RUST_LOG` - Log filter (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use salecast::application::system::forecast_service::ForecastService;
use salecast::config::Config;
use salecast::interfaces::http;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Override the HOST environment variable
    #[arg(long)]
    host: Option<String>,

    /// Override the PORT environment variable
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!("Salecast Server {} starting...", env!("CARGO_PKG_VERSION"));

    let mut config = Config::from_env()?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    info!(
        "Configuration loaded: Regressor={}, Features={}, Scaling={}",
        config.model.regressor, config.model.feature_mode, config.model.scale_features
    );

    let service = ForecastService::shared(config.model.clone());
    let app = http::router(service, &config.server);

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutdown signal received. Exiting...");
            }
        })
        .await
        .context("Server error")?;

    Ok(())
}
