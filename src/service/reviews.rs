//! Review submission, lookup, update-with-history and deletion.
//!
//! # Identifier assignment
//! New reviews take the next value of the store's per-collection sequence. The
//! highest stored `reviewId` is passed as the sequence floor, so ids always
//! exceed every stored id. Concurrent submissions never receive the same id and
//! ids are never reused after a delete. Dropping the collection resets the
//! sequence.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use crate::model::{Review, ReviewPayload};
use crate::observability::metrics;
use crate::store::{decode, encode, Direction, DocumentStore, Query};

use super::{ClientService, LowRatingLog, ServiceError, ServiceResult};

#[derive(Clone)]
pub struct ReviewService {
    store: Arc<dyn DocumentStore>,
    clients: ClientService,
    low_rating: LowRatingLog,
    collection: String,
}

impl ReviewService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        clients: ClientService,
        low_rating: LowRatingLog,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            store,
            clients,
            low_rating,
            collection: collection.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Create a collection, defaulting to the configured review collection.
    /// Returns the name that was created.
    pub async fn create_collection(&self, name: Option<&str>) -> ServiceResult<String> {
        let name = name.filter(|n| !n.is_empty()).unwrap_or(self.collection.as_str());
        self.store.create_collection(name).await?;
        tracing::info!(collection = %name, "Created collection");
        Ok(name.to_string())
    }

    pub async fn delete_collection(&self, name: &str) -> ServiceResult<()> {
        if !self.store.drop_collection(name).await? {
            return Err(ServiceError::NotFound(format!("collection '{}'", name)));
        }
        tracing::info!(collection = %name, "Deleted collection");
        Ok(())
    }

    /// Reviews from every collection except the client collection.
    /// Collections that fail to load are logged and skipped.
    pub async fn view_all_reviews(&self) -> ServiceResult<Vec<Review>> {
        let mut result = Vec::new();
        for name in self.store.collection_names().await? {
            if name == self.clients.collection() {
                continue;
            }
            tracing::debug!(collection = %name, "Fetching data from collection");
            match self.store.find(&name, &Query::new()).await {
                Ok(docs) => result.extend(decode_reviews(&name, docs)),
                Err(e) => {
                    tracing::error!(collection = %name, error = %e, "Error fetching data from collection");
                }
            }
        }
        Ok(result)
    }

    /// All reviews of a named collection; failures are logged and yield nothing.
    pub async fn view_reviews_in_collection(&self, name: &str) -> Vec<Review> {
        match self.store.find(name, &Query::new()).await {
            Ok(docs) => decode_reviews(name, docs),
            Err(e) => {
                tracing::error!(collection = %name, error = %e, "Error fetching data from collection");
                Vec::new()
            }
        }
    }

    /// The first `limit` reviews ordered by ascending id. Zero means all.
    pub async fn latest_reviews(&self, limit: usize) -> ServiceResult<Vec<Review>> {
        let query = Query::new().sort("reviewId", Direction::Asc).limit(limit);
        let docs = self.store.find(&self.collection, &query).await?;
        Ok(decode_reviews(&self.collection, docs))
    }

    pub async fn reviews_by_rate_code(&self, rate_code: i32) -> ServiceResult<Vec<Review>> {
        let query = Query::new().eq("rateCode", rate_code);
        let docs = self.store.find(&self.collection, &query).await?;
        Ok(decode_reviews(&self.collection, docs))
    }

    /// Store a new review stamped with the most recent client and the next id.
    ///
    /// `fallback_client_id` is used only when no client has been provisioned.
    pub async fn add_review(
        &self,
        payload: ReviewPayload,
        fallback_client_id: Option<&str>,
    ) -> ServiceResult<Review> {
        let client_id = match self.clients.most_recent_client().await? {
            Some(client) => client.client_id,
            None => {
                tracing::warn!("No clients found, using the request clientId for the review");
                fallback_client_id.unwrap_or_default().to_string()
            }
        };

        let floor = self.highest_review_id().await?;
        let id = self.store.next_sequence(&self.collection, floor).await?;

        let review = Review::from_payload(id.to_string(), client_id, payload, Utc::now());
        self.store
            .insert(&self.collection, &review.review_id, encode(&review)?)
            .await?;

        metrics::record_review_created();
        tracing::info!(
            review_id = %review.review_id,
            client_id = %review.client_id,
            rate_code = review.rate_code,
            "Review added"
        );
        self.low_rating.record(&review);
        Ok(review)
    }

    /// Move the current state into the history list, then overwrite the
    /// mutable fields from `update`.
    pub async fn update_review(&self, id: &str, update: ReviewPayload) -> ServiceResult<Review> {
        let doc = self
            .store
            .find_one(&self.collection, id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("review '{}'", id)))?;
        let mut review: Review = decode(doc)?;

        tracing::info!(review_id = %id, "Updating review");
        review.apply_update(update, Utc::now());

        self.store
            .replace(&self.collection, id, encode(&review)?)
            .await?;
        tracing::info!(
            review_id = %id,
            versions = review.history_list.len(),
            "Review updated"
        );
        self.low_rating.record(&review);
        Ok(review)
    }

    /// Returns `false` when no review has this id.
    pub async fn delete_review(&self, id: &str) -> ServiceResult<bool> {
        let removed = self.store.delete_one(&self.collection, id).await?;
        if removed {
            tracing::info!(review_id = %id, "Deleted review");
        }
        Ok(removed)
    }

    /// Returns `false` when the client has no reviews.
    pub async fn delete_reviews_by_client(&self, client_id: &str) -> ServiceResult<bool> {
        let query = Query::new().eq("clientId", client_id);
        let removed = self.store.delete_many(&self.collection, &query).await?;
        tracing::info!(client_id = %client_id, removed, "Deleted reviews by client");
        Ok(removed > 0)
    }

    /// Write to the low-rating stream if the review's rate code is low.
    pub fn log_low_rating(&self, review: &Review) -> bool {
        self.low_rating.record(review)
    }

    async fn highest_review_id(&self) -> ServiceResult<u64> {
        let query = Query::new().sort("reviewId", Direction::Desc).limit(1);
        let docs = self.store.find(&self.collection, &query).await?;
        let Some(last) = docs.first() else {
            return Ok(0);
        };
        match last.get("reviewId").and_then(Value::as_str).map(str::parse::<u64>) {
            Some(Ok(id)) => Ok(id),
            _ => {
                tracing::warn!(collection = %self.collection, "Highest reviewId is not numeric, starting from 0");
                Ok(0)
            }
        }
    }
}

fn decode_reviews(collection: &str, docs: Vec<Value>) -> Vec<Review> {
    docs.into_iter()
        .filter_map(|doc| match decode::<Review>(doc) {
            Ok(review) => Some(review),
            Err(e) => {
                tracing::warn!(collection = %collection, error = %e, "Skipping undecodable review document");
                None
            }
        })
        .collect()
}
