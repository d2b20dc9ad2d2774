//! Request identification and header helpers.
//!
//! # Responsibilities
//! - Name the headers the service reads (`x-request-id`, `clientId`)
//! - Build the per-request tracing span
//!
//! # Design Decisions
//! - Request ID is assigned by `SetRequestIdLayer` before tracing starts, so
//!   every log line of a request carries it
//! - Header names are matched case-insensitively

use axum::http::{HeaderMap, Request};
use tracing::Span;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Header carrying the caller's client identifier.
pub const CLIENT_ID_HEADER: &str = "clientid";

/// Read a header as a trimmed, non-empty string.
pub fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Span wrapping a whole request.
pub fn make_request_span<B>(request: &Request<B>) -> Span {
    let request_id = header_str(request.headers(), X_REQUEST_ID).unwrap_or("unknown");
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderName, HeaderValue};

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_bytes(b"ClientId").unwrap(),
            HeaderValue::from_static(" 12 "),
        );
        assert_eq!(header_str(&headers, CLIENT_ID_HEADER), Some("12"));

        headers.insert("clientid", HeaderValue::from_static("   "));
        assert_eq!(header_str(&headers, CLIENT_ID_HEADER), None);
    }
}
