//! Gateway error taxonomy and response rendering.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Every way a request can fail inside the gateway.
///
/// Upstream-originating failures are funneled through
/// [`ProxyOutcome`](crate::upstream::ProxyOutcome) into the last two
/// variants; handlers never inspect raw transport errors directly.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Malformed or missing request fields, detected locally.
    #[error("invalid request: {0}")]
    InvalidInput(String),

    /// Missing or unrecognized API key on a protected route.
    #[error("invalid or missing API key")]
    Unauthorized,

    /// A protected route was hit while no API keys are configured.
    #[error("server configuration error: no API keys configured")]
    ServerMisconfigured,

    /// The upstream answered outside the 2xx range.
    #[error("upstream error (status {status})")]
    Upstream { status: u16, body: String },

    /// Transport failure or malformed upstream payload.
    #[error("internal gateway error")]
    Internal(#[source] anyhow::Error),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            GatewayError::Unauthorized => StatusCode::UNAUTHORIZED,
            GatewayError::ServerMisconfigured => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Render the client-facing JSON response, tagged with the request's
    /// correlation id. Internal causes are logged here and never echoed.
    pub fn respond(self, correlation_id: &str) -> Response {
        let status = self.status();
        let body = match &self {
            GatewayError::Upstream { status, body } => json!({
                "error": "upstream error",
                "status": status,
                "body": body,
                "correlationId": correlation_id,
            }),
            GatewayError::Internal(cause) => {
                tracing::error!(
                    correlation_id = %correlation_id,
                    error = %cause,
                    "Internal gateway error"
                );
                json!({
                    "error": "internal gateway error",
                    "correlationId": correlation_id,
                })
            }
            other => json!({
                "error": other.to_string(),
                "correlationId": correlation_id,
            }),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            GatewayError::InvalidInput("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(GatewayError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            GatewayError::ServerMisconfigured.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            GatewayError::Upstream {
                status: 503,
                body: "overloaded".into()
            }
            .status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            GatewayError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_cause_not_echoed() {
        let response =
            GatewayError::Internal(anyhow::anyhow!("connection refused")).respond("cid-1");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        // The cause only reaches the logs; the body is rendered from a
        // fixed template that cannot carry it.
    }
}
