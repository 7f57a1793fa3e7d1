//! Savings Service - HTTP API over device energy-saving data.
//!
//! Run with: `cargo run -p savings-service`

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use savings_service::{AppState, Config, api};
use savings_store::DatasetStore;

/// Savings Service - HTTP REST API over device energy-saving data.
#[derive(Parser, Debug)]
#[command(name = "savings-service")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to listen on (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides config).
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Device metadata CSV file (overrides config).
    #[arg(long)]
    devices: Option<PathBuf>,

    /// Savings CSV file (overrides config).
    #[arg(long)]
    savings: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("savings_service=info".parse()?)
                .add_directive("savings_store=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    // Load configuration
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };

    // Override config with CLI args
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(devices) = args.devices {
        config.data.devices = devices;
    }
    if let Some(savings) = args.savings {
        config.data.savings = savings;
    }
    config.validate()?;

    let state = AppState::new(DatasetStore::new(), config.clone());

    // Load the dataset before accepting connections
    if let Err(e) = state.store.load(&config.data.sources()).await {
        error!("Refusing to start without a complete dataset: {}", e);
        return Err(e.into());
    }

    let app = api::app(state);

    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
