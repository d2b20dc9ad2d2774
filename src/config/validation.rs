//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Detect conflicting collection names
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{ServiceConfig, StorageBackend};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("storage.collection_name and storage.client_collection must differ")]
    CollectionClash,

    #[error("low_rating.threshold must be between 1 and 10, got {0}")]
    ThresholdOutOfRange(i32),
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    let storage = &config.storage;
    if storage.collection_name.trim().is_empty() {
        errors.push(ValidationError::Empty("storage.collection_name"));
    }
    if storage.client_collection.trim().is_empty() {
        errors.push(ValidationError::Empty("storage.client_collection"));
    }
    if !storage.collection_name.is_empty() && storage.collection_name == storage.client_collection {
        errors.push(ValidationError::CollectionClash);
    }
    if storage.backend == StorageBackend::Sqlite && storage.sqlite_path.trim().is_empty() {
        errors.push(ValidationError::Empty("storage.sqlite_path"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }
    if config.security.max_body_size == 0 {
        errors.push(ValidationError::Zero("security.max_body_size"));
    }

    if !(1..=10).contains(&config.low_rating.threshold) {
        errors.push(ValidationError::ThresholdOutOfRange(config.low_rating.threshold));
    }
    if config.low_rating.message_format.trim().is_empty() {
        errors.push(ValidationError::Empty("low_rating.message_format"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
