//! Review documents and request payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored customer review.
///
/// `history_list` holds prior versions, oldest first. Snapshots are taken with
/// [`Review::snapshot`] so they never carry a history of their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub review_id: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub zip_code: String,
    pub rate_code: i32,
    #[serde(default)]
    pub comments: String,
    pub date_time: DateTime<Utc>,
    #[serde(default)]
    pub history_list: Vec<Review>,
}

impl Review {
    /// Build a new review from a submission.
    pub fn from_payload(
        review_id: String,
        client_id: String,
        payload: ReviewPayload,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            review_id,
            client_id,
            product_name: payload.product_name,
            first_name: payload.first_name,
            last_name: payload.last_name,
            zip_code: payload.zip_code,
            rate_code: payload.rate_code,
            comments: payload.comments,
            date_time: payload.date_time.unwrap_or(now),
            history_list: Vec::new(),
        }
    }

    /// Owned copy of the current state without its history.
    pub fn snapshot(&self) -> Self {
        Self {
            history_list: Vec::new(),
            ..self.clone()
        }
    }

    /// Record the current state in the history list, then overwrite the
    /// mutable fields from `update`.
    pub fn apply_update(&mut self, update: ReviewPayload, now: DateTime<Utc>) {
        let previous = self.snapshot();
        self.history_list.push(previous);

        self.product_name = update.product_name;
        self.first_name = update.first_name;
        self.last_name = update.last_name;
        self.zip_code = update.zip_code;
        self.rate_code = update.rate_code;
        self.comments = update.comments;
        self.date_time = update.date_time.unwrap_or(now);
    }
}

/// Body of an insert or update request.
///
/// Identifiers are assigned by the service, so a client-supplied
/// `reviewId`/`clientId` is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPayload {
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub zip_code: String,
    pub rate_code: i32,
    #[serde(default)]
    pub comments: String,
    #[serde(default)]
    pub date_time: Option<DateTime<Utc>>,
}
