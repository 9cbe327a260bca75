//! # Taekwondo Scoring Node
//!
//! Serves one match: judge consoles and scoreboards connect over WebSocket,
//! static pages come from the configured directory.
//!
//! ```text
//! judges ──ws──→ Gateway ──→ MatchService ──→ InMemoryEventBus ──ws──→ every client
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use tkd_gateway::GatewayService;
use tkd_node::{init_tracing, NodeConfig};
use tkd_scoring::{InMemoryEventBus, MatchService};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let config = NodeConfig::from_env();
    init_tracing(&config).context("failed to initialize logging")?;

    config
        .rules
        .validate()
        .context("invalid match rules")?;

    let bus = Arc::new(InMemoryEventBus::new());
    let service = MatchService::new(config.rules, bus);
    let gateway = GatewayService::new(config.gateway_config(), service)
        .context("invalid gateway configuration")?;

    info!(
        environment = %config.environment,
        addr = %gateway.config().addr(),
        cors_origin = %config.cors_origin(),
        victory_gap = config.rules.victory_gap,
        "Starting taekwondo scoring node"
    );

    gateway
        .serve(shutdown_signal())
        .await
        .context("gateway stopped with an error")?;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!(error = %e, "Failed to listen for Ctrl-C, running until killed");
            std::future::pending::<()>().await;
        }
    }
}
