//! Outbound calls to the prediction/model-registry service.

use std::time::{Duration, Instant};

use http::Method;
use serde_json::Value;
use tracing::Instrument;

use crate::config::UpstreamConfig;
use crate::pipeline::correlation::REQUEST_ID_HEADER;

/// Result of a single upstream call.
///
/// The only representation of upstream outcomes that handlers consume;
/// raw transport errors never leave this module.
#[derive(Debug)]
pub enum ProxyOutcome {
    /// 2xx with a JSON body.
    Success { payload: Value, status: u16 },
    /// Upstream reachable but answered outside the 2xx range. The body is
    /// kept as raw text; error bodies are not guaranteed structured.
    UpstreamFailure { status: u16, body: String },
    /// Connection, timeout, DNS or decode failure.
    TransportFailure { cause: anyhow::Error },
}

/// HTTP client for the configured upstream. Cheap to clone.
#[derive(Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get(&self, path: &str, correlation_id: &str) -> ProxyOutcome {
        self.call(Method::GET, path, None, correlation_id).await
    }

    pub async fn post_json(&self, path: &str, body: &Value, correlation_id: &str) -> ProxyOutcome {
        self.call(Method::POST, path, Some(body), correlation_id)
            .await
    }

    /// Perform one call against the upstream, propagating the correlation
    /// id as an outbound header. A single attempt: no retries, no
    /// speculative execution.
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        correlation_id: &str,
    ) -> ProxyOutcome {
        let url = format!("{}{}", self.base_url, path);
        let span = gateway_tracing::upstream_call_span!(correlation_id, &url);
        let start = Instant::now();

        async {
            let mut req_builder = self
                .client
                .request(method, &url)
                .header(REQUEST_ID_HEADER, correlation_id);
            if let Some(body) = body {
                req_builder = req_builder.json(body);
            }

            let outcome = match req_builder.send().await {
                Ok(resp) => read_response(resp).await,
                Err(e) => ProxyOutcome::TransportFailure { cause: e.into() },
            };

            let latency = start.elapsed().as_millis() as u64;
            tracing::Span::current().record("latency_ms", latency);

            match &outcome {
                ProxyOutcome::Success { status, .. } => {
                    tracing::Span::current().record("status", *status);
                    tracing::info!(status = *status, latency_ms = latency, "Upstream call complete");
                }
                ProxyOutcome::UpstreamFailure { status, .. } => {
                    tracing::Span::current().record("status", *status);
                    tracing::error!(
                        status = *status,
                        latency_ms = latency,
                        "Upstream responded with non-2xx status"
                    );
                }
                ProxyOutcome::TransportFailure { cause } => {
                    tracing::error!(error = %cause, latency_ms = latency, "Upstream call failed");
                }
            }

            outcome
        }
        .instrument(span)
        .await
    }
}

/// Translate an upstream HTTP response into a [`ProxyOutcome`].
async fn read_response(resp: reqwest::Response) -> ProxyOutcome {
    let status = resp.status().as_u16();

    if !resp.status().is_success() {
        return match resp.text().await {
            Ok(body) => ProxyOutcome::UpstreamFailure { status, body },
            Err(e) => ProxyOutcome::TransportFailure { cause: e.into() },
        };
    }

    match resp.json::<Value>().await {
        Ok(payload) => ProxyOutcome::Success { payload, status },
        Err(e) => ProxyOutcome::TransportFailure {
            cause: anyhow::Error::from(e).context("upstream returned a non-JSON success body"),
        },
    }
}
