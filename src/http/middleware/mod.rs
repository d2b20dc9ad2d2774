pub mod client_auth;
pub mod metrics;

pub use client_auth::{client_auth_middleware, ClientContext};
pub use metrics::track_metrics;
