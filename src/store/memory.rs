//! In-memory document store.
//!
//! Collections live in a `DashMap` keyed by name, each holding a `BTreeMap`
//! of id → document. Nothing survives a restart; this backend exists for
//! local development and tests.
//!
//! Each operation touches one shard guard at a time and never awaits while
//! holding it.

use std::collections::BTreeMap;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde_json::Value;

use super::{DocumentStore, Query, StoreError, StoreResult};

#[derive(Default)]
pub struct MemoryStore {
    collections: DashMap<String, BTreeMap<String, Value>>,
    counters: DashMap<String, u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create_collection(&self, name: &str) -> StoreResult<()> {
        match self.collections.entry(name.to_string()) {
            Entry::Occupied(_) => Err(StoreError::Conflict(format!(
                "collection '{}' already exists",
                name
            ))),
            Entry::Vacant(slot) => {
                slot.insert(BTreeMap::new());
                Ok(())
            }
        }
    }

    async fn drop_collection(&self, name: &str) -> StoreResult<bool> {
        let removed = self.collections.remove(name).is_some();
        self.counters.remove(name);
        Ok(removed)
    }

    async fn collection_names(&self) -> StoreResult<Vec<String>> {
        let mut names: Vec<String> = self.collections.iter().map(|r| r.key().clone()).collect();
        names.sort();
        Ok(names)
    }

    async fn insert(&self, collection: &str, id: &str, doc: Value) -> StoreResult<()> {
        let mut docs = self.collections.entry(collection.to_string()).or_default();
        if docs.contains_key(id) {
            return Err(StoreError::Conflict(format!(
                "document '{}' already exists in '{}'",
                id, collection
            )));
        }
        docs.insert(id.to_string(), doc);
        Ok(())
    }

    async fn replace(&self, collection: &str, id: &str, doc: Value) -> StoreResult<()> {
        let mut docs = self
            .collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::NotFound(format!("collection '{}'", collection)))?;
        match docs.get_mut(id) {
            Some(slot) => {
                *slot = doc;
                Ok(())
            }
            None => Err(StoreError::NotFound(format!(
                "document '{}' in '{}'",
                id, collection
            ))),
        }
    }

    async fn find(&self, collection: &str, query: &Query) -> StoreResult<Vec<Value>> {
        Ok(self
            .collections
            .get(collection)
            .map(|docs| query.apply(docs.values().cloned()))
            .unwrap_or_default())
    }

    async fn find_one(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        Ok(self
            .collections
            .get(collection)
            .and_then(|docs| docs.get(id).cloned()))
    }

    async fn delete_one(&self, collection: &str, id: &str) -> StoreResult<bool> {
        Ok(self
            .collections
            .get_mut(collection)
            .map(|mut docs| docs.remove(id).is_some())
            .unwrap_or(false))
    }

    async fn delete_many(&self, collection: &str, query: &Query) -> StoreResult<u64> {
        let Some(mut docs) = self.collections.get_mut(collection) else {
            return Ok(0);
        };
        let before = docs.len();
        docs.retain(|_, doc| !query.matches(doc));
        Ok((before - docs.len()) as u64)
    }

    async fn next_sequence(&self, counter: &str, floor: u64) -> StoreResult<u64> {
        let mut current = self.counters.entry(counter.to_string()).or_insert(0);
        let next = (*current).max(floor) + 1;
        *current = next;
        Ok(next)
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
