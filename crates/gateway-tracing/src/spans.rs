//! Span builder helpers for model-gateway instrumentation.

/// Create a tracing span for a routed gateway request.
///
/// Usage: `let span = gateway_request_span!(&correlation_id, "/predict");`
///
/// Fields recorded later by the handler:
/// - `upstream_version`: model version surfaced from a registry payload
#[macro_export]
macro_rules! gateway_request_span {
    ($correlation_id:expr, $route:expr) => {
        tracing::info_span!(
            "gateway_request",
            correlation_id = %$correlation_id,
            route = %$route,
            upstream_version = tracing::field::Empty,
        )
    };
}

/// Create a tracing span for a single upstream call.
///
/// `status` and `latency_ms` are recorded once the call resolves.
#[macro_export]
macro_rules! upstream_call_span {
    ($correlation_id:expr, $target:expr) => {
        tracing::info_span!(
            "upstream_call",
            correlation_id = %$correlation_id,
            target = %$target,
            status = tracing::field::Empty,
            latency_ms = tracing::field::Empty,
        )
    };
}
