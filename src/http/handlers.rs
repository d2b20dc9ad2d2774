//! Review API handlers.
//!
//! Read endpoints answer 404 when the result is empty. Write endpoints answer
//! with plain-text confirmations, except update which returns the stored review.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::http::error::ApiError;
use crate::http::middleware::ClientContext;
use crate::http::request::{header_str, CLIENT_ID_HEADER};
use crate::http::server::AppState;
use crate::model::{Review, ReviewPayload};

const DEFAULT_LATEST_LIMIT: usize = 10;

#[derive(Debug, Deserialize)]
pub struct CollectionParams {
    #[serde(rename = "collectionName")]
    pub collection_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LatestParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct RateCodeParams {
    #[serde(rename = "rateCode")]
    pub rate_code: i32,
}

#[derive(Serialize)]
pub struct HealthStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub store: &'static str,
}

fn non_empty(reviews: Vec<Review>) -> Result<Json<Vec<Review>>, ApiError> {
    if reviews.is_empty() {
        Err(ApiError::NotFound("No reviews found".to_string()))
    } else {
        Ok(Json(reviews))
    }
}

pub async fn create_collection(
    State(state): State<AppState>,
    Query(params): Query<CollectionParams>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .reviews
        .create_collection(params.collection_name.as_deref())
        .await
        .map_err(|e| ApiError::from_service("Error creating collection", e))?;
    Ok((StatusCode::CREATED, "Collection created successfully"))
}

pub async fn delete_collection(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .reviews
        .delete_collection(&name)
        .await
        .map_err(|e| ApiError::from_service("Error deleting collection", e))?;
    Ok("Collection deleted successfully")
}

pub async fn view_all_reviews(
    State(state): State<AppState>,
) -> Result<Json<Vec<Review>>, ApiError> {
    let reviews = state
        .services
        .reviews
        .view_all_reviews()
        .await
        .map_err(|e| ApiError::from_service("Error listing collections", e))?;
    non_empty(reviews)
}

pub async fn view_reviews_in_collection(
    State(state): State<AppState>,
    Path(collection_name): Path<String>,
) -> Result<Json<Vec<Review>>, ApiError> {
    non_empty(
        state
            .services
            .reviews
            .view_reviews_in_collection(&collection_name)
            .await,
    )
}

pub async fn view_latest_reviews(
    State(state): State<AppState>,
    Query(params): Query<LatestParams>,
) -> Result<Json<Vec<Review>>, ApiError> {
    let limit = params.limit.unwrap_or(DEFAULT_LATEST_LIMIT);
    let reviews = state
        .services
        .reviews
        .latest_reviews(limit)
        .await
        .map_err(|e| ApiError::from_service("Error fetching latest reviews", e))?;
    non_empty(reviews)
}

pub async fn view_by_rate_code(
    State(state): State<AppState>,
    Query(params): Query<RateCodeParams>,
) -> Result<Json<Vec<Review>>, ApiError> {
    let reviews = state
        .services
        .reviews
        .reviews_by_rate_code(params.rate_code)
        .await
        .map_err(|e| ApiError::from_service("Error fetching reviews by rate code", e))?;
    non_empty(reviews)
}

pub async fn insert_review(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ReviewPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let review = state
        .services
        .reviews
        .add_review(payload, header_str(&headers, CLIENT_ID_HEADER))
        .await
        .map_err(|e| ApiError::from_service("Failed to insert review", e))?;
    Ok((
        StatusCode::CREATED,
        format!("Review added successfully with reviewId: {}", review.review_id),
    ))
}

pub async fn update_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<ReviewPayload>,
) -> Result<Json<Review>, ApiError> {
    let review = state
        .services
        .reviews
        .update_review(&id, update)
        .await
        .map_err(|e| ApiError::from_service("Error updating review", e))?;
    Ok(Json(review))
}

pub async fn delete_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state
        .services
        .reviews
        .delete_review(&id)
        .await
        .map_err(|e| ApiError::from_service("Error deleting review", e))?;
    if !deleted {
        return Err(ApiError::NotFound(format!("Review {} not found", id)));
    }
    Ok(format!("Deleted review with ID: {}", id))
}

/// Deletes the authenticated client's reviews. With auth disabled the
/// `clientId` header names the client instead.
pub async fn delete_reviews_by_client(
    State(state): State<AppState>,
    context: Option<Extension<ClientContext>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let client_id = match &context {
        Some(Extension(ctx)) => ctx.client_id.as_str(),
        None => header_str(&headers, CLIENT_ID_HEADER)
            .ok_or_else(|| ApiError::BadRequest("Missing clientId header".to_string()))?,
    };
    let deleted = state
        .services
        .reviews
        .delete_reviews_by_client(client_id)
        .await
        .map_err(|e| ApiError::from_service("Error deleting reviews", e))?;
    if !deleted {
        return Err(ApiError::NotFound(format!(
            "No reviews found for client ID: {}",
            client_id
        )));
    }
    Ok(format!("Deleted reviews with client ID: {}", client_id))
}

/// Body is the raw client secret. A blank body gets a generated secret, which
/// is returned once in the response.
pub async fn new_client(
    State(state): State<AppState>,
    secret: String,
) -> Result<impl IntoResponse, ApiError> {
    let client = state
        .services
        .clients
        .create_client(&secret)
        .await
        .map_err(|e| ApiError::from_service("Failed to create client", e))?;

    let body = if secret.trim().is_empty() {
        format!(
            "Client created with clientId: {}, secret: {}",
            client.client_id, client.secret
        )
    } else {
        format!("Client created with clientId: {}", client.client_id)
    };
    Ok((StatusCode::CREATED, body))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.store.backend_name();
    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthStatus {
                version: env!("CARGO_PKG_VERSION"),
                status: "operational",
                store,
            }),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Store health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthStatus {
                    version: env!("CARGO_PKG_VERSION"),
                    status: "degraded",
                    store,
                }),
            )
        }
    }
}
