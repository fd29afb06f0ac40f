//! Request ID middleware for request tracing and correlation.
//!
//! Reuses an upstream `x-request-id` when it looks sane, otherwise generates
//! a UUID v4. The ID is recorded in the current span and the Sentry scope,
//! then echoed in the response headers.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream request ID we accept.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Pick the request ID for an incoming header value.
fn resolve_request_id(upstream: Option<&HeaderValue>) -> String {
    upstream
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|id| {
            !id.is_empty()
                && id.len() <= MAX_REQUEST_ID_LEN
                && id.chars().all(|c| c.is_ascii_graphic())
        })
        .map_or_else(|| Uuid::new_v4().to_string(), String::from)
}

/// Middleware that ensures every request has a request ID.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = resolve_request_id(request.headers().get(REQUEST_ID_HEADER));

    Span::current().record("request_id", &request_id);

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_id_is_kept() {
        let header = HeaderValue::from_static("cf-ray-8a1b2c");
        assert_eq!(resolve_request_id(Some(&header)), "cf-ray-8a1b2c");
    }

    #[test]
    fn test_missing_id_generates_uuid() {
        let id = resolve_request_id(None);
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn test_oversized_id_is_replaced() {
        let long = "a".repeat(MAX_REQUEST_ID_LEN + 1);
        let header = HeaderValue::from_str(&long).unwrap();
        let id = resolve_request_id(Some(&header));
        assert!(Uuid::parse_str(&id).is_ok());
    }
}
