//! Product review service (v1)
//!
//! CRUD API for customer product reviews, built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                          ┌───────────────────────────────────────────────────┐
//!                          │                  REVIEW SERVICE                   │
//!                          │                                                   │
//!     Client Request       │  ┌──────────┐    ┌─────────────┐    ┌──────────┐  │
//!     ─────────────────────┼─▶│   http   │───▶│ client_auth │───▶│ handlers │  │
//!                          │  │  server  │    │ (deletes)   │    │          │  │
//!                          │  └──────────┘    └─────────────┘    └────┬─────┘  │
//!                          │                                          │        │
//!                          │                                          ▼        │
//!                          │                 ┌────────────┐    ┌───────────┐   │
//!                          │                 │ low_rating │◀───│  service  │   │
//!                          │                 │   stream   │    │ reviews / │   │
//!                          │                 └────────────┘    │  clients  │   │
//!                          │                                   └─────┬─────┘   │
//!                          │                                         │         │
//!                          │                                         ▼         │
//!                          │                        ┌──────────────────────┐   │
//!                          │                        │ store: memory|sqlite │   │
//!                          │                        └──────────────────────┘   │
//!                          │                                                   │
//!                          │  Cross-cutting: config, observability, lifecycle  │
//!                          └───────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use review_service::config::{load_config, ServiceConfig};
use review_service::lifecycle::{open_store, Shutdown};
use review_service::observability::{logging, metrics};
use review_service::HttpServer;

#[derive(Parser)]
#[command(name = "review-service")]
#[command(about = "CRUD API for customer product reviews", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };

    logging::init_logging(&config.observability, &config.low_rating)?;

    tracing::info!("review-service v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend = ?config.storage.backend,
        collection = %config.storage.collection_name,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let store = open_store(&config.storage)?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, store);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
