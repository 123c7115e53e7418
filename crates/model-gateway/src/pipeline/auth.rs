//! API key gate for protected routes.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::error::GatewayError;
use crate::pipeline::context::RequestContext;
use crate::server::AppState;

/// Header carrying the caller's API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Access policy for a declared route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutePolicy {
    Public,
    Protected,
}

/// Route-to-policy table, fixed at deployment by code change. Routes not
/// listed here are not gated; the router itself answers 404 for unknown
/// paths.
const ROUTE_POLICIES: &[(&str, RoutePolicy)] = &[
    ("/health", RoutePolicy::Public),
    ("/predict", RoutePolicy::Protected),
    ("/admin/models", RoutePolicy::Protected),
    ("/admin/models/latest", RoutePolicy::Protected),
];

/// Look up the policy for a matched route.
pub fn route_policy(route: &str) -> Option<RoutePolicy> {
    ROUTE_POLICIES
        .iter()
        .find(|(path, _)| *path == route)
        .map(|(_, policy)| *policy)
}

/// Pre-handler stage: enforce the key policy for the matched route.
///
/// Runs after correlation assignment and before any handler body. Public
/// and undeclared routes pass through untouched. Protected routes fail
/// closed when no keys are configured.
pub async fn enforce_route_policy(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(ctx) = request.extensions().get::<RequestContext>().cloned() else {
        return GatewayError::Internal(anyhow::anyhow!(
            "request context missing; correlation stage did not run"
        ))
        .respond("unknown");
    };

    match route_policy(&ctx.route) {
        Some(RoutePolicy::Protected) => {}
        _ => return next.run(request).await,
    }

    if state.keys.is_empty() {
        tracing::warn!(
            correlation_id = %ctx.correlation_id,
            route = %ctx.route,
            "Request to protected route but no API keys are configured"
        );
        return GatewayError::ServerMisconfigured.respond(&ctx.correlation_id);
    }

    let supplied = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|k| !k.is_empty());

    match supplied {
        Some(key) if state.keys.contains(&key) => {
            tracing::info!(
                correlation_id = %ctx.correlation_id,
                route = %ctx.route,
                "API key validated"
            );
            if let Some(ctx) = request.extensions_mut().get_mut::<RequestContext>() {
                ctx.supplied_key = Some(key);
            }
            next.run(request).await
        }
        other => {
            tracing::warn!(
                correlation_id = %ctx.correlation_id,
                route = %ctx.route,
                provided = if other.is_some() { "present" } else { "missing" },
                "Invalid or missing API key"
            );
            GatewayError::Unauthorized.respond(&ctx.correlation_id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_is_public() {
        assert_eq!(route_policy("/health"), Some(RoutePolicy::Public));
    }

    #[test]
    fn test_protected_routes() {
        assert_eq!(route_policy("/predict"), Some(RoutePolicy::Protected));
        assert_eq!(route_policy("/admin/models"), Some(RoutePolicy::Protected));
        assert_eq!(
            route_policy("/admin/models/latest"),
            Some(RoutePolicy::Protected)
        );
    }

    #[test]
    fn test_unknown_routes_are_not_gated() {
        assert_eq!(route_policy("/nope"), None);
        assert_eq!(route_policy(""), None);
        // Prefixes of protected paths are not protected themselves.
        assert_eq!(route_policy("/admin"), None);
    }
}
