//! Route-level logic: health, predict, and model-registry admin reads.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use bytes::Bytes;
use serde_json::{json, Value};
use tracing::Instrument;

use crate::error::GatewayError;
use crate::pipeline::context::RequestContext;
use crate::server::AppState;
use crate::upstream::ProxyOutcome;

/// Marker identifying this service in proxied response envelopes.
pub const SOURCE: &str = "model-gateway";

/// GET /health — public liveness check. Never calls the upstream.
pub async fn health(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> Response {
    tracing::info!(correlation_id = %ctx.correlation_id, "Handling /health");

    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "detail": "model-gateway running",
            "upstreamBaseUrl": state.upstream.base_url(),
            "correlationId": ctx.correlation_id,
        })),
    )
        .into_response()
}

/// POST /predict — validate the body locally, then delegate to the
/// upstream `/predict` endpoint.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    body: Bytes,
) -> Response {
    let span = gateway_tracing::gateway_request_span!(&ctx.correlation_id, "/predict");

    async {
        let payload = match parse_predict_body(&body) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(
                    correlation_id = %ctx.correlation_id,
                    error = %e,
                    "Rejected /predict request"
                );
                return e.respond(&ctx.correlation_id);
            }
        };

        let outcome = state
            .upstream
            .post_json("/predict", &payload, &ctx.correlation_id)
            .await;
        proxied_response(outcome, &state, &ctx)
    }
    .instrument(span)
    .await
}

/// GET /admin/models — proxy the upstream model listing.
pub async fn admin_list_models(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> Response {
    let span = gateway_tracing::gateway_request_span!(&ctx.correlation_id, "/admin/models");

    async {
        let outcome = state.upstream.get("/models", &ctx.correlation_id).await;
        proxied_response(outcome, &state, &ctx)
    }
    .instrument(span)
    .await
}

/// GET /admin/models/latest — proxy the latest-model metadata, surfacing
/// its `version` field on the span when present.
pub async fn admin_latest_model(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> Response {
    let span = gateway_tracing::gateway_request_span!(&ctx.correlation_id, "/admin/models/latest");

    async {
        let outcome = state
            .upstream
            .get("/models/latest", &ctx.correlation_id)
            .await;

        if let ProxyOutcome::Success { payload, .. } = &outcome {
            if let Some(version) = payload.get("version").and_then(Value::as_str) {
                tracing::Span::current().record("upstream_version", version);
            }
        }

        proxied_response(outcome, &state, &ctx)
    }
    .instrument(span)
    .await
}

/// Extract and validate the predict payload: `text` must be a non-empty
/// string; `version` is forwarded only when it is one too.
fn parse_predict_body(body: &Bytes) -> Result<Value, GatewayError> {
    let parsed: Value = serde_json::from_slice(body)
        .map_err(|_| GatewayError::InvalidInput("body must be valid JSON".to_string()))?;

    let text = match parsed.get("text").and_then(Value::as_str) {
        Some(text) if !text.is_empty() => text,
        _ => {
            return Err(GatewayError::InvalidInput(
                "'text' field is required and must be a non-empty string".to_string(),
            ))
        }
    };

    let mut payload = json!({ "text": text });
    if let Some(version) = parsed.get("version").and_then(Value::as_str) {
        if !version.is_empty() {
            payload["version"] = json!(version);
        }
    }

    Ok(payload)
}

/// Outcome-to-response mapping shared by predict and the admin reads.
fn proxied_response(outcome: ProxyOutcome, state: &AppState, ctx: &RequestContext) -> Response {
    match outcome {
        ProxyOutcome::Success { payload, status } => {
            tracing::info!(
                correlation_id = %ctx.correlation_id,
                upstream_status = status,
                "Upstream call successful"
            );
            (
                StatusCode::OK,
                Json(json!({
                    "source": SOURCE,
                    "upstreamBaseUrl": state.upstream.base_url(),
                    "correlationId": ctx.correlation_id,
                    "result": payload,
                })),
            )
                .into_response()
        }
        ProxyOutcome::UpstreamFailure { status, body } => {
            GatewayError::Upstream { status, body }.respond(&ctx.correlation_id)
        }
        ProxyOutcome::TransportFailure { cause } => {
            GatewayError::Internal(cause).respond(&ctx.correlation_id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(s: &str) -> Bytes {
        Bytes::copy_from_slice(s.as_bytes())
    }

    #[test]
    fn test_predict_body_requires_text() {
        assert!(parse_predict_body(&bytes("{}")).is_err());
        assert!(parse_predict_body(&bytes(r#"{"text": 42}"#)).is_err());
        assert!(parse_predict_body(&bytes(r#"{"text": ""}"#)).is_err());
        assert!(parse_predict_body(&bytes(r#"{"text": null}"#)).is_err());
    }

    #[test]
    fn test_predict_body_rejects_malformed_json() {
        assert!(parse_predict_body(&bytes("not json")).is_err());
        assert!(parse_predict_body(&bytes("")).is_err());
    }

    #[test]
    fn test_predict_body_forwards_text() {
        let payload = parse_predict_body(&bytes(r#"{"text": "hello"}"#)).unwrap();
        assert_eq!(payload, json!({"text": "hello"}));
    }

    #[test]
    fn test_predict_body_forwards_string_version_only() {
        let payload =
            parse_predict_body(&bytes(r#"{"text": "hello", "version": "v2"}"#)).unwrap();
        assert_eq!(payload, json!({"text": "hello", "version": "v2"}));

        // Non-string or empty versions are dropped, not rejected.
        let payload = parse_predict_body(&bytes(r#"{"text": "hello", "version": 3}"#)).unwrap();
        assert_eq!(payload, json!({"text": "hello"}));
        let payload = parse_predict_body(&bytes(r#"{"text": "hello", "version": ""}"#)).unwrap();
        assert_eq!(payload, json!({"text": "hello"}));
    }

    #[test]
    fn test_predict_body_ignores_extra_fields() {
        let payload =
            parse_predict_body(&bytes(r#"{"text": "hello", "unexpected": true}"#)).unwrap();
        assert_eq!(payload, json!({"text": "hello"}));
    }
}
