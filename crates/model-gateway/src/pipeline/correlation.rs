//! Correlation id assignment for request tracing.

use axum::extract::{MatchedPath, Request};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use super::context::RequestContext;

/// Header used to propagate the correlation id, inbound and outbound.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Generate a new correlation id (UUID v4).
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Resolve the correlation id for a request: reuse a non-blank inbound
/// `x-request-id` (trimmed), otherwise generate a fresh one.
pub fn resolve_id(inbound: Option<&str>) -> String {
    match inbound.map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => generate_id(),
    }
}

/// Pipeline entry stage: attach a [`RequestContext`] to the request and
/// stamp the resolved id on the response, error responses included.
pub async fn assign_request_id(mut request: Request, next: Next) -> Response {
    let inbound = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok());
    let correlation_id = resolve_id(inbound);

    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    tracing::info!(
        correlation_id = %correlation_id,
        method = %request.method(),
        path = %request.uri().path(),
        "Incoming request"
    );

    request.extensions_mut().insert(RequestContext {
        correlation_id: correlation_id.clone(),
        route,
        supplied_key: None,
    });

    let mut response = next.run(request).await;

    response.headers_mut().insert(
        REQUEST_ID_HEADER,
        HeaderValue::from_str(&correlation_id)
            .unwrap_or_else(|_| HeaderValue::from_static("unknown")),
    );

    response
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_inbound_id_reused_trimmed() {
        assert_eq!(resolve_id(Some("  abc-123  ")), "abc-123");
        assert_eq!(resolve_id(Some("abc-123")), "abc-123");
    }

    #[test]
    fn test_blank_inbound_id_replaced() {
        assert!(!resolve_id(Some("   ")).is_empty());
        assert!(!resolve_id(Some("")).is_empty());
        assert!(!resolve_id(None).is_empty());
    }

    #[test]
    fn test_generated_ids_unique() {
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            let id = generate_id();
            assert!(!id.is_empty());
            assert!(seen.insert(id), "generated correlation id collided");
        }
    }
}
