//! Axum HTTP server: router, pipeline layering, listener, graceful shutdown.

use std::sync::Arc;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::config::GatewayConfig;
use crate::handlers;
use crate::keys::KeyStore;
use crate::pipeline::{auth, correlation};
use crate::upstream::UpstreamClient;

/// Shared application state. Read-only after startup; no locking needed.
pub struct AppState {
    pub config: GatewayConfig,
    pub keys: KeyStore,
    pub upstream: UpstreamClient,
}

impl AppState {
    /// Build the process-wide state from loaded configuration.
    ///
    /// An empty key set is a startup warning, not an error: the gateway
    /// starts and fails closed per request instead.
    pub fn from_config(config: GatewayConfig) -> anyhow::Result<Self> {
        let keys = KeyStore::from_csv(&config.auth.api_keys);
        if keys.is_empty() {
            tracing::warn!(
                "No API keys configured (auth.api_keys is empty). All protected requests will be rejected."
            );
        }

        let upstream = UpstreamClient::new(&config.upstream)?;

        Ok(Self {
            config,
            keys,
            upstream,
        })
    }
}

/// Assemble the router with the ordered request pipeline: correlation
/// assignment outermost, then CORS, then the auth gate, then the handler.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/predict", post(handlers::predict))
        .route("/admin/models", get(handlers::admin_list_models))
        .route("/admin/models/latest", get(handlers::admin_latest_model))
        // Layers run outermost-last: correlation wraps CORS wraps auth.
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::enforce_route_policy,
        ))
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(correlation::assign_request_id))
        .with_state(state)
}

/// Build and run the HTTP server.
pub async fn run(state: AppState) -> anyhow::Result<()> {
    let listen_addr = state.config.server.listen_address.clone();

    let app = app(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    tracing::info!(address = %listen_addr, "model-gateway listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("model-gateway shut down gracefully");
    Ok(())
}

/// Wait for SIGINT (Ctrl+C) for graceful shutdown.
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install CTRL+C signal handler");
    tracing::info!("Shutdown signal received, draining connections...");
}
