//! Startup orchestration.
//!
//! # Responsibilities
//! - Open the configured document store
//! - Wire services onto the store
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently

use std::sync::Arc;

use crate::config::{ServiceConfig, StorageBackend, StorageConfig};
use crate::service::{ClientService, LowRatingLog, ReviewService};
use crate::store::{DocumentStore, MemoryStore, SqliteStore, StoreResult};

/// Open the document store selected in the configuration.
pub fn open_store(config: &StorageConfig) -> StoreResult<Arc<dyn DocumentStore>> {
    let store: Arc<dyn DocumentStore> = match config.backend {
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
        StorageBackend::Sqlite => Arc::new(SqliteStore::open(&config.sqlite_path)?),
    };
    tracing::info!(
        backend = store.backend_name(),
        collection = %config.collection_name,
        "Document store opened"
    );
    Ok(store)
}

/// Review and client services sharing one store.
#[derive(Clone)]
pub struct Services {
    pub reviews: ReviewService,
    pub clients: ClientService,
}

impl Services {
    pub fn new(config: &ServiceConfig, store: Arc<dyn DocumentStore>) -> Self {
        let clients = ClientService::new(store.clone(), config.storage.client_collection.clone());
        let reviews = ReviewService::new(
            store,
            clients.clone(),
            LowRatingLog::new(&config.low_rating),
            config.storage.collection_name.clone(),
        );
        Self { reviews, clients }
    }
}
