//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Apply the configured timestamp format
//! - Route the low-rating stream to its own file when configured
//!
//! # Design Decisions
//! - `RUST_LOG` overrides the configured level
//! - The `low_reviews` target is always enabled at info, whatever the base level

use std::fs::OpenOptions;
use std::sync::Mutex;

use thiserror::Error;
use tracing::{Level, Subscriber};
use tracing_subscriber::filter::Targets;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use crate::config::{LowRatingConfig, ObservabilityConfig};
use crate::service::LOW_RATING_TARGET;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to open low-rating log '{path}': {source}")]
    LowRatingFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to install subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Base filter directives: configured level plus the low-rating target.
pub fn filter_directives(log_level: &str) -> String {
    format!(
        "{level},review_service={level},tower_http={level},{target}=info",
        level = log_level,
        target = LOW_RATING_TARGET
    )
}

/// File layer that receives only the low-rating stream.
pub fn low_rating_layer<S>(path: &str, date_format: &str) -> Result<impl Layer<S>, LoggingError>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggingError::LowRatingFile {
            path: path.to_string(),
            source,
        })?;
    Ok(fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_timer(ChronoLocal::new(date_format.to_string()))
        .with_writer(Mutex::new(file))
        .with_filter(Targets::new().with_target(LOW_RATING_TARGET, Level::INFO)))
}

/// Install the global subscriber.
pub fn init_logging(
    observability: &ObservabilityConfig,
    low_rating: &LowRatingConfig,
) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(&observability.log_level)));

    let console = fmt::layer().with_timer(ChronoLocal::new(observability.log_date_format.clone()));

    let low_rating_file = match &low_rating.log_path {
        Some(path) => Some(low_rating_layer::<Registry>(path, &observability.log_date_format)?),
        None => None,
    };

    tracing_subscriber::registry()
        .with(low_rating_file)
        .with(filter)
        .with(console)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directives_parse() {
        let directives = filter_directives("warn");
        assert!(directives.ends_with("low_reviews=info"));
        assert!(EnvFilter::try_new(directives).is_ok());
    }

    #[test]
    fn test_unwritable_low_rating_path() {
        let low_rating = LowRatingConfig {
            log_path: Some("/nonexistent-dir/low.log".into()),
            ..Default::default()
        };
        let err = init_logging(&ObservabilityConfig::default(), &low_rating).unwrap_err();
        assert!(matches!(err, LoggingError::LowRatingFile { .. }));
    }

    #[test]
    fn test_low_rating_file_receives_only_low_reviews() {
        use crate::model::{Review, ReviewPayload};
        use crate::service::LowRatingLog;

        let path = std::env::temp_dir().join(format!("low-reviews-{}.log", uuid::Uuid::new_v4()));
        let path_str = path.to_string_lossy().to_string();
        let layer = low_rating_layer::<Registry>(&path_str, "%Y-%m-%d").unwrap();
        let subscriber = tracing_subscriber::registry().with(layer);

        let log = LowRatingLog::new(&LowRatingConfig::default());
        let review = |id: &str, rate_code| {
            let payload = ReviewPayload {
                product_name: "Vacuum".into(),
                rate_code,
                ..Default::default()
            };
            Review::from_payload(id.into(), "1".into(), payload, chrono::Utc::now())
        };

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("unrelated event");
            log.record(&review("7", 1));
            log.record(&review("8", 5));
        });

        let contents = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert!(contents.contains("Low-rated review 7 for Vacuum with rating code: 1"));
        assert!(!contents.contains("review 8"));
        assert!(!contents.contains("unrelated event"));
        assert_eq!(contents.lines().count(), 1);
    }
}
