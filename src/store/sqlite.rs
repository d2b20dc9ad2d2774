//! SQLite-backed document store.
//!
//! Documents are stored as JSON text in a single `documents` table keyed by
//! `(collection, id)`. Collections are registered in `collections` so empty
//! ones survive, and identifier sequences live in `counters`.
//!
//! The connection sits behind a tokio `Mutex`; every operation runs to
//! completion while holding it, so counter updates are serialized.

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use tokio::sync::Mutex;

use super::{DocumentStore, Query, StoreError, StoreResult};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS collections (
        name TEXT PRIMARY KEY
    );
    CREATE TABLE IF NOT EXISTS documents (
        collection TEXT NOT NULL,
        id TEXT NOT NULL,
        body TEXT NOT NULL,
        PRIMARY KEY (collection, id)
    );
    CREATE TABLE IF NOT EXISTS counters (
        name TEXT PRIMARY KEY,
        value INTEGER NOT NULL
    );
";

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}

pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) a database file and ensure the schema exists.
    pub fn open(path: &str) -> StoreResult<Self> {
        Self::with_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

fn parse_body(body: &str) -> StoreResult<Value> {
    Ok(serde_json::from_str(body)?)
}

fn to_i64(value: u64) -> StoreResult<i64> {
    i64::try_from(value).map_err(|_| StoreError::Backend(format!("sequence overflow: {}", value)))
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn create_collection(&self, name: &str) -> StoreResult<()> {
        let conn = self.conn.lock().await;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO collections (name) VALUES (?1)",
            params![name],
        )?;
        if inserted == 0 {
            return Err(StoreError::Conflict(format!(
                "collection '{}' already exists",
                name
            )));
        }
        Ok(())
    }

    async fn drop_collection(&self, name: &str) -> StoreResult<bool> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM documents WHERE collection = ?1", params![name])?;
        tx.execute("DELETE FROM counters WHERE name = ?1", params![name])?;
        let removed = tx.execute("DELETE FROM collections WHERE name = ?1", params![name])?;
        tx.commit()?;
        Ok(removed > 0)
    }

    async fn collection_names(&self) -> StoreResult<Vec<String>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare("SELECT name FROM collections ORDER BY name")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }

    async fn insert(&self, collection: &str, id: &str, doc: Value) -> StoreResult<()> {
        let body = serde_json::to_string(&doc)?;
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT OR IGNORE INTO collections (name) VALUES (?1)",
            params![collection],
        )?;
        let inserted = tx.execute(
            "INSERT OR IGNORE INTO documents (collection, id, body) VALUES (?1, ?2, ?3)",
            params![collection, id, body],
        )?;
        if inserted == 0 {
            return Err(StoreError::Conflict(format!(
                "document '{}' already exists in '{}'",
                id, collection
            )));
        }
        tx.commit()?;
        Ok(())
    }

    async fn replace(&self, collection: &str, id: &str, doc: Value) -> StoreResult<()> {
        let body = serde_json::to_string(&doc)?;
        let conn = self.conn.lock().await;
        let updated = conn.execute(
            "UPDATE documents SET body = ?3 WHERE collection = ?1 AND id = ?2",
            params![collection, id, body],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound(format!(
                "document '{}' in '{}'",
                id, collection
            )));
        }
        Ok(())
    }

    async fn find(&self, collection: &str, query: &Query) -> StoreResult<Vec<Value>> {
        let conn = self.conn.lock().await;
        let mut stmt =
            conn.prepare("SELECT body FROM documents WHERE collection = ?1 ORDER BY id")?;
        let bodies = stmt
            .query_map(params![collection], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        let docs = bodies
            .iter()
            .map(|b| parse_body(b))
            .collect::<StoreResult<Vec<_>>>()?;
        Ok(query.apply(docs))
    }

    async fn find_one(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        let conn = self.conn.lock().await;
        let body: Option<String> = conn
            .query_row(
                "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection, id],
                |row| row.get(0),
            )
            .optional()?;
        body.as_deref().map(parse_body).transpose()
    }

    async fn delete_one(&self, collection: &str, id: &str) -> StoreResult<bool> {
        let conn = self.conn.lock().await;
        let removed = conn.execute(
            "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
            params![collection, id],
        )?;
        Ok(removed > 0)
    }

    async fn delete_many(&self, collection: &str, query: &Query) -> StoreResult<u64> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        let rows = {
            let mut stmt = tx.prepare("SELECT id, body FROM documents WHERE collection = ?1")?;
            let rows = stmt
                .query_map(params![collection], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                })?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        };

        let mut removed = 0u64;
        for (id, body) in rows {
            if query.matches(&parse_body(&body)?) {
                removed += tx.execute(
                    "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
                    params![collection, id],
                )? as u64;
            }
        }
        tx.commit()?;
        Ok(removed)
    }

    async fn next_sequence(&self, counter: &str, floor: u64) -> StoreResult<u64> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        let current: Option<i64> = tx
            .query_row(
                "SELECT value FROM counters WHERE name = ?1",
                params![counter],
                |row| row.get(0),
            )
            .optional()?;
        let next = (current.unwrap_or(0).max(0) as u64).max(floor) + 1;
        tx.execute(
            "INSERT INTO counters (name, value) VALUES (?1, ?2)
             ON CONFLICT(name) DO UPDATE SET value = excluded.value",
            params![counter, to_i64(next)?],
        )?;
        tx.commit()?;
        Ok(next)
    }

    async fn health_check(&self) -> StoreResult<()> {
        let conn = self.conn.lock().await;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Direction;
    use serde_json::json;

    #[tokio::test]
    async fn test_schema_and_collections() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.create_collection("reviews").await.unwrap();
        assert!(matches!(
            store.create_collection("reviews").await,
            Err(StoreError::Conflict(_))
        ));

        // Inserting registers the collection implicitly.
        store.insert("clients", "1", json!({"clientId": "1"})).await.unwrap();
        assert_eq!(
            store.collection_names().await.unwrap(),
            vec!["clients", "reviews"]
        );

        assert!(store.drop_collection("clients").await.unwrap());
        assert!(store.find_one("clients", "1").await.unwrap().is_none());
        assert!(!store.drop_collection("clients").await.unwrap());
    }

    #[tokio::test]
    async fn test_documents_round_trip_through_json_text() {
        let store = SqliteStore::open_in_memory().unwrap();
        for (id, rate) in [("9", 2), ("10", 4), ("11", 2)] {
            store
                .insert("r", id, json!({"reviewId": id, "rateCode": rate}))
                .await
                .unwrap();
        }

        let latest = store
            .find("r", &Query::new().sort("reviewId", Direction::Desc).limit(1))
            .await
            .unwrap();
        assert_eq!(latest[0]["reviewId"], "11");

        let low = store.find("r", &Query::new().eq("rateCode", 2)).await.unwrap();
        assert_eq!(low.len(), 2);

        store
            .replace("r", "10", json!({"reviewId": "10", "rateCode": 2}))
            .await
            .unwrap();
        assert_eq!(store.delete_many("r", &Query::new().eq("rateCode", 2)).await.unwrap(), 3);
        assert!(store.find("r", &Query::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sequence_persists_in_table() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.next_sequence("reviews", 0).await.unwrap(), 1);
        assert_eq!(store.next_sequence("reviews", 5).await.unwrap(), 6);
        assert_eq!(store.next_sequence("reviews", 0).await.unwrap(), 7);
        store.drop_collection("reviews").await.unwrap();
        assert_eq!(store.next_sequence("reviews", 0).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_health_check() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.health_check().await.unwrap();
        assert_eq!(store.backend_name(), "sqlite");
    }
}
