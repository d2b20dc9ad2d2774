//! Low-rating log stream.
//!
//! Reviews whose rate code falls under the configured threshold are written to
//! the `low_reviews` tracing target, which the logging setup can route to its
//! own file. The log is best-effort and unordered relative to the store write.

use crate::config::LowRatingConfig;
use crate::model::Review;
use crate::observability::metrics;

/// Tracing target of the low-rating stream.
pub const LOW_RATING_TARGET: &str = "low_reviews";

#[derive(Debug, Clone)]
pub struct LowRatingLog {
    threshold: i32,
    message_format: String,
}

impl LowRatingLog {
    pub fn new(config: &LowRatingConfig) -> Self {
        Self {
            threshold: config.threshold,
            message_format: config.message_format.clone(),
        }
    }

    pub fn is_low(&self, rate_code: i32) -> bool {
        rate_code < self.threshold
    }

    pub fn render(&self, review: &Review) -> String {
        self.message_format
            .replace("{review_id}", &review.review_id)
            .replace("{client_id}", &review.client_id)
            .replace("{product}", &review.product_name)
            .replace("{rate_code}", &review.rate_code.to_string())
            .replace("{comments}", &review.comments)
    }

    /// Log the review if its rating is low. Returns whether it was logged.
    pub fn record(&self, review: &Review) -> bool {
        if !self.is_low(review.rate_code) {
            return false;
        }
        let message = self.render(review);
        tracing::info!(
            target: LOW_RATING_TARGET,
            review_id = %review.review_id,
            rate_code = review.rate_code,
            "{}",
            message
        );
        metrics::record_low_rating();
        true
    }
}
