//! Client authentication middleware.
//! Guards destructive routes with a `clientId` header and a bearer secret.

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::request::{header_str, CLIENT_ID_HEADER};
use crate::http::server::AppState;

/// Identity of the caller, attached to authenticated requests.
#[derive(Clone, Debug)]
pub struct ClientContext {
    pub client_id: String,
}

pub async fn client_auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // Passthrough when auth is disabled.
    if !state.config.auth.enabled {
        return next.run(req).await;
    }

    let Some(client_id) = header_str(req.headers(), CLIENT_ID_HEADER).map(str::to_string) else {
        return (StatusCode::UNAUTHORIZED, "Missing clientId header").into_response();
    };

    let Some(secret) = header_str(req.headers(), AUTHORIZATION.as_str())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
    else {
        return (StatusCode::UNAUTHORIZED, "Missing bearer token").into_response();
    };

    match state.services.clients.verify(&client_id, &secret).await {
        Ok(true) => {
            req.extensions_mut().insert(ClientContext { client_id });
            next.run(req).await
        }
        Ok(false) => {
            tracing::warn!(client_id = %client_id, "Rejected client credentials");
            (StatusCode::FORBIDDEN, "Invalid client credentials").into_response()
        }
        Err(e) => {
            tracing::error!(client_id = %client_id, error = %e, "Failed to verify client");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to verify client").into_response()
        }
    }
}
