//! model-gateway: front door for the prediction service — correlation ids,
//! API key authentication, upstream proxying, and model-registry admin
//! reads.

use model_gateway::config::GatewayConfig;
use model_gateway::server::{self, AppState};

fn main() -> anyhow::Result<()> {
    // Determine config path
    let config_path = {
        let args: Vec<String> = std::env::args().collect();
        // Check for --config flag first
        args.iter()
            .position(|a| a == "--config")
            .and_then(|i| args.get(i + 1).cloned())
            // Fall back to positional arg
            .or_else(|| args.get(1).filter(|a| !a.starts_with('-')).cloned())
            .or_else(|| std::env::var("GATEWAY_CONFIG").ok())
            .unwrap_or_else(|| "model-gateway.toml".to_string())
    };

    // Load configuration
    let config = GatewayConfig::load(&config_path)?;

    // Build the tokio runtime first — the tonic gRPC exporter needs a
    // reactor context
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        // Initialize tracing (OTLP export is optional — falls back to fmt-only)
        let _tracing_guard = gateway_tracing::init_tracing(&config.tracing);

        let state = AppState::from_config(config)?;

        tracing::info!(
            config_path = %config_path,
            listen_address = %state.config.server.listen_address,
            upstream_base = %state.config.upstream.base_url,
            configured_keys = state.keys.len(),
            "Starting model-gateway"
        );

        server::run(state).await
    })
}
