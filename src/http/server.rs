//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with all review endpoints
//! - Wire up middleware (request ID, tracing, timeout, body limit, metrics)
//! - Guard delete routes with client authentication
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::http::handlers;
use crate::http::middleware::{client_auth_middleware, track_metrics};
use crate::http::request::make_request_span;
use crate::lifecycle::signals::shutdown_signal;
use crate::lifecycle::Services;
use crate::store::DocumentStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    pub store: Arc<dyn DocumentStore>,
    pub config: Arc<ServiceConfig>,
}

/// HTTP server for the review API.
pub struct HttpServer {
    router: Router,
    config: Arc<ServiceConfig>,
}

impl HttpServer {
    /// Create a new HTTP server over an opened store.
    pub fn new(config: ServiceConfig, store: Arc<dyn DocumentStore>) -> Self {
        let config = Arc::new(config);
        let state = AppState {
            services: Services::new(&config, store.clone()),
            store,
            config: config.clone(),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        let protected = Router::new()
            .route("/reviews/deleteReview/{id}", delete(handlers::delete_review))
            .route("/reviews/deleteReview", delete(handlers::delete_reviews_by_client))
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                client_auth_middleware,
            ));

        Router::new()
            .route("/health", get(handlers::health))
            .route("/reviews/createCollection", post(handlers::create_collection))
            .route(
                "/reviews/deleteCollection/{name}",
                delete(handlers::delete_collection),
            )
            .route("/reviews/viewAllReviews", get(handlers::view_all_reviews))
            .route(
                "/reviews/viewReviews/{collection_name}",
                get(handlers::view_reviews_in_collection),
            )
            .route("/reviews/viewLatestReviews", get(handlers::view_latest_reviews))
            .route("/reviews/viewByRateCode", get(handlers::view_by_rate_code))
            .route("/reviews/insertReview", post(handlers::insert_review))
            .route("/reviews/updateReview/{id}", put(handlers::update_review))
            .route("/reviews/newClient", post(handlers::new_client))
            .merge(protected)
            .route_layer(middleware::from_fn(track_metrics))
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<Body>))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The configured router, for driving the service without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server on `listener` until a signal or `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            collection = %self.config.storage.collection_name,
            auth = self.config.auth.enabled,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}
