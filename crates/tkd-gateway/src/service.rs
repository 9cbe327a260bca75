//! Gateway service - binds the listener and serves until shutdown.

use crate::domain::config::GatewayConfig;
use crate::domain::error::GatewayError;
use crate::router::{build_router, AppState};
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use tkd_scoring::{InMemoryEventBus, MatchService};
use tokio::net::TcpListener;
use tracing::info;

/// Gateway service state
pub struct GatewayService {
    config: GatewayConfig,
    service: MatchService<InMemoryEventBus>,
}

impl GatewayService {
    /// Create a new gateway for one match
    pub fn new(
        config: GatewayConfig,
        service: MatchService<InMemoryEventBus>,
    ) -> Result<Self, GatewayError> {
        config
            .validate()
            .map_err(|e| GatewayError::Config(e.to_string()))?;

        Ok(Self { config, service })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn router(&self) -> Router {
        build_router(AppState::new(self.service.clone(), self.config.clone()))
    }

    /// Bind the configured address.
    pub async fn bind(&self) -> Result<TcpListener, GatewayError> {
        let addr = self.config.addr();
        TcpListener::bind(addr)
            .await
            .map_err(|e| GatewayError::Bind(format!("{}: {}", addr, e)))
    }

    /// Serve on the configured address until `shutdown` resolves.
    pub async fn serve<F>(self, shutdown: F) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = self.bind().await?;
        self.serve_on(listener, shutdown).await
    }

    /// Serve on an already bound listener.
    ///
    /// Closes the event bus once the server has drained; later broadcasts
    /// report `BroadcastError::Closed`.
    pub async fn serve_on<F>(self, listener: TcpListener, shutdown: F) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr: Option<SocketAddr> = listener.local_addr().ok();
        info!(
            addr = ?addr,
            static_dir = %self.config.static_dir.display(),
            "Gateway listening"
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| GatewayError::Serve(e.to_string()))?;

        self.service.broadcaster().close();
        info!("Gateway stopped");
        Ok(())
    }
}
