//! Document store subsystem.
//!
//! # Data Flow
//! ```text
//! service layer
//!     → DocumentStore trait (collections of JSON documents keyed by id)
//!     → memory.rs  (DashMap, non-durable)
//!     → sqlite.rs  (rusqlite, single file, JSON text bodies)
//! ```
//!
//! # Design Decisions
//! - Documents are plain `serde_json::Value`; typing happens in the service layer
//! - Reading a missing collection yields no documents, writing creates it
//! - Filtering, sorting and limiting share one implementation (query.rs)
//! - Identifier sequences are atomic per counter name

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

pub mod memory;
pub mod query;
pub mod sqlite;

pub use memory::MemoryStore;
pub use query::{Direction, Query};
pub use sqlite::SqliteStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create an empty collection. Fails with `Conflict` if it exists.
    async fn create_collection(&self, name: &str) -> StoreResult<()>;

    /// Drop a collection with its documents and id counter.
    /// Returns `false` when there was nothing to drop.
    async fn drop_collection(&self, name: &str) -> StoreResult<bool>;

    async fn collection_names(&self) -> StoreResult<Vec<String>>;

    async fn insert(&self, collection: &str, id: &str, doc: Value) -> StoreResult<()>;
    async fn replace(&self, collection: &str, id: &str, doc: Value) -> StoreResult<()>;
    async fn find(&self, collection: &str, query: &Query) -> StoreResult<Vec<Value>>;
    async fn find_one(&self, collection: &str, id: &str) -> StoreResult<Option<Value>>;
    async fn delete_one(&self, collection: &str, id: &str) -> StoreResult<bool>;

    /// Remove every document matching the query filter. Sort and limit are ignored.
    async fn delete_many(&self, collection: &str, query: &Query) -> StoreResult<u64>;

    /// Atomically advance `counter` to `max(current, floor) + 1` and return it.
    async fn next_sequence(&self, counter: &str, floor: u64) -> StoreResult<u64>;

    async fn health_check(&self) -> StoreResult<()>;
    fn backend_name(&self) -> &'static str;
}

/// Serialize a typed document for storage.
pub fn encode<T: Serialize>(value: &T) -> StoreResult<Value> {
    Ok(serde_json::to_value(value)?)
}

/// Deserialize a stored document.
pub fn decode<T: DeserializeOwned>(value: Value) -> StoreResult<T> {
    Ok(serde_json::from_value(value)?)
}
