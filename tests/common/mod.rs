//! Shared utilities for integration and load testing.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use review_service::config::ServiceConfig;
use review_service::lifecycle::Shutdown;
use review_service::store::{DocumentStore, MemoryStore};
use review_service::HttpServer;
use tokio::net::TcpListener;

/// A server bound to an ephemeral port. Dropping it stops the server.
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Config suited to tests: no metrics exporter, auth as requested.
#[allow(dead_code)]
pub fn test_config(auth_enabled: bool) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.observability.metrics_enabled = false;
    config.auth.enabled = auth_enabled;
    config
}

/// Start a server over a fresh in-memory store.
pub async fn start_server(config: ServiceConfig) -> TestServer {
    start_server_with_store(config, Arc::new(MemoryStore::new())).await
}

pub async fn start_server_with_store(
    config: ServiceConfig,
    store: Arc<dyn DocumentStore>,
) -> TestServer {
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, store);
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // Give the accept loop a moment to start.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    TestServer {
        addr,
        client,
        shutdown,
    }
}
