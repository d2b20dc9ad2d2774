//! Review business logic.
//!
//! # Data Flow
//! ```text
//! http handlers
//!     → reviews.rs (id assignment, history on update, reads, deletes)
//!     → clients.rs (client provisioning, most recent client, secret checks)
//!     → low_rating.rs (side-channel log for rate codes under the threshold)
//!     → store (DocumentStore)
//! ```

use thiserror::Error;

use crate::store::StoreError;

pub mod clients;
pub mod low_rating;
pub mod reviews;

pub use clients::ClientService;
pub use low_rating::{LowRatingLog, LOW_RATING_TARGET};
pub use reviews::ReviewService;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Persistence(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(msg) => ServiceError::Conflict(msg),
            other => ServiceError::Persistence(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
