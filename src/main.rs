//! # Provider Routing Gateway
//!
//! Routes generation requests to OpenAI, Anthropic, Gemini or Perplexity,
//! probes each provider's health in the background, and fails over in a
//! fixed order when a provider errors or times out.
//!
//! ## Usage
//!
//! ```bash
//! # Start with defaults (or config/gateway.yaml if present)
//! provider-routing-gateway
//!
//! # Start with a custom config file
//! GATEWAY_CONFIG=/etc/gateway.toml provider-routing-gateway
//!
//! # Start with environment overrides
//! GATEWAY_PORT=9000 GATEWAY_DEFAULT_PROVIDER=openai provider-routing-gateway
//! ```

use gateway_config::{load_config, GatewayConfig};
use gateway_core::ProviderDirectory;
use gateway_server::{build_registry, build_state, Server};
use gateway_telemetry::{init_tracing, shutdown_tracing, LoggingConfig, TracingConfig};
use std::sync::Arc;
use tracing::{error, info};

/// Application entry point
#[tokio::main]
async fn main() {
    let config = match load_config().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let tracer = match init_tracing(&tracing_config(&config)) {
        Ok(tracer) => tracer,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            None
        }
    };

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting provider routing gateway"
    );

    let result = run(config).await;
    shutdown_tracing(tracer);

    if let Err(e) = result {
        error!(error = %e, "Application failed");
        std::process::exit(1);
    }
}

fn tracing_config(config: &GatewayConfig) -> TracingConfig {
    let telemetry = &config.telemetry;
    TracingConfig::new(&telemetry.service_name)
        .with_enabled(telemetry.tracing_enabled)
        .with_sampling_rate(telemetry.sampling_rate)
        .with_logging(LoggingConfig::new(&telemetry.log_level).with_json(telemetry.json_logs))
}

/// Main application logic
async fn run(config: GatewayConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        host = %config.server.host,
        port = config.server.port,
        default_provider = %config.routing.default_provider,
        "Configuration loaded"
    );

    let registry = build_registry(&config)?;
    info!(providers = registry.len(), "Provider registry initialized");

    let directory: Arc<dyn ProviderDirectory> = Arc::new(registry);
    let state = build_state(&config, directory)?;
    let monitor = Arc::clone(&state.monitor);

    if config.health.enabled {
        monitor.start();
    } else {
        info!("Background health probing disabled");
    }

    let served = Server::new(&config.server.host, config.server.port, state)
        .run()
        .await;

    monitor.stop().await;
    info!("Gateway stopped");

    served.map_err(Into::into)
}
