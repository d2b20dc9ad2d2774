//! Client provisioning and lookup.

use std::sync::Arc;

use crate::model::Client;
use crate::store::{decode, encode, Direction, DocumentStore, Query};

use super::ServiceResult;

#[derive(Clone)]
pub struct ClientService {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl ClientService {
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Provision a client with the next sequential id. A blank secret is
    /// replaced by a random one.
    pub async fn create_client(&self, secret: &str) -> ServiceResult<Client> {
        let secret = match secret.trim() {
            "" => uuid::Uuid::new_v4().to_string(),
            s => s.to_string(),
        };

        let floor = self
            .most_recent_client()
            .await?
            .and_then(|c| c.client_id.parse::<u64>().ok())
            .unwrap_or(0);
        let id = self.store.next_sequence(&self.collection, floor).await?;

        let client = Client {
            client_id: id.to_string(),
            secret,
        };
        self.store
            .insert(&self.collection, &client.client_id, encode(&client)?)
            .await?;

        tracing::info!(client_id = %client.client_id, "Client created");
        Ok(client)
    }

    /// The client with the highest id, if any.
    pub async fn most_recent_client(&self) -> ServiceResult<Option<Client>> {
        let query = Query::new().sort("clientId", Direction::Desc).limit(1);
        let docs = self.store.find(&self.collection, &query).await?;
        match docs.into_iter().next() {
            Some(doc) => Ok(Some(decode(doc)?)),
            None => Ok(None),
        }
    }

    /// Check a client id / secret pair.
    pub async fn verify(&self, client_id: &str, secret: &str) -> ServiceResult<bool> {
        let Some(doc) = self.store.find_one(&self.collection, client_id).await? else {
            return Ok(false);
        };
        let client: Client = decode(doc)?;
        Ok(client.secret == secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn service() -> ClientService {
        ClientService::new(Arc::new(MemoryStore::new()), "clients")
    }

    #[tokio::test]
    async fn test_sequential_clients() {
        let clients = service();
        assert!(clients.most_recent_client().await.unwrap().is_none());

        let first = clients.create_client("s1").await.unwrap();
        let second = clients.create_client("s2").await.unwrap();
        assert_eq!(first.client_id, "1");
        assert_eq!(second.client_id, "2");

        let latest = clients.most_recent_client().await.unwrap().unwrap();
        assert_eq!(latest.client_id, "2");
    }

    #[tokio::test]
    async fn test_blank_secret_is_generated() {
        let clients = service();
        let client = clients.create_client("  ").await.unwrap();
        assert!(uuid::Uuid::parse_str(&client.secret).is_ok());
    }

    #[tokio::test]
    async fn test_verify() {
        let clients = service();
        let client = clients.create_client("hunter2").await.unwrap();
        assert!(clients.verify(&client.client_id, "hunter2").await.unwrap());
        assert!(!clients.verify(&client.client_id, "wrong").await.unwrap());
        assert!(!clients.verify("404", "hunter2").await.unwrap());
    }
}
