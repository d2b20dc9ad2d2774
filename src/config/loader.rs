//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<ServiceConfig, ConfigError> {
    let config: ServiceConfig = toml::from_str(content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::StorageBackend;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.collection_name, "reviews");
        assert_eq!(config.low_rating.threshold, 3);
    }

    #[test]
    fn test_partial_config_overrides() {
        let content = r#"
            [storage]
            backend = "sqlite"
            sqlite_path = "/tmp/reviews.db"
            collection_name = "ratings"

            [low_rating]
            threshold = 2
        "#;
        let config = parse_config(content).unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert_eq!(config.storage.collection_name, "ratings");
        assert_eq!(config.storage.client_collection, "clients");
        assert_eq!(config.low_rating.threshold, 2);
    }

    #[test]
    fn test_invalid_config_reports_all_errors() {
        let content = r#"
            [listener]
            bind_address = "not-an-address"

            [timeouts]
            request_secs = 0
        "#;
        match parse_config(content) {
            Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_backend_is_parse_error() {
        let content = r#"
            [storage]
            backend = "mongo"
        "#;
        assert!(matches!(parse_config(content), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/review-service.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
