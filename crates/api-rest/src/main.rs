//! Gala Catalog API server

use anyhow::{Context, Result};
use clap::Parser;
use gala_api_rest::{create_app, ApiConfig, AppState};
use gala_common::{init_tracing, AppConfig, StoreProvider};
use std::path::PathBuf;
use tokio::signal;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "gala-api")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding default.toml and {APP_ENV}.toml
    #[arg(short, long, env = "GALA_CONFIG_DIR", default_value = "config")]
    config_dir: PathBuf,

    /// Host to bind to
    #[arg(long, env = "GALA_HOST")]
    host: Option<String>,

    /// Port to bind to
    #[arg(short, long, env = "GALA_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load_from(&args.config_dir)?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    init_tracing(&config.telemetry)?;

    info!(
        config_dir = %args.config_dir.display(),
        provider = ?config.store.provider,
        "Starting Gala Catalog API"
    );

    let api_config = ApiConfig::from(&config);
    let state = match config.store.provider {
        StoreProvider::Memory => AppState::in_memory(api_config)?,
        #[cfg(feature = "dynamodb")]
        StoreProvider::Dynamodb => {
            let store = gala_infrastructure::DynamoDbDocumentStore::new(&config.store).await?;
            AppState::new(api_config, std::sync::Arc::new(store))?
        }
        #[cfg(not(feature = "dynamodb"))]
        StoreProvider::Dynamodb => {
            anyhow::bail!("The dynamodb store provider requires the `dynamodb` feature")
        }
    };

    let address = config.server_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;

    info!(%address, "Listening");

    axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
