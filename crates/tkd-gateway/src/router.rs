//! HTTP routes.
//!
//! `/ws` upgrades judge consoles and scoreboards, `/api/state` and `/health`
//! answer plain GETs, everything else falls through to the static files.

use crate::domain::config::GatewayConfig;
use crate::middleware::create_cors_layer;
use crate::ws::WebSocketHandler;
use axum::{
    extract::{ws::WebSocketUpgrade, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tkd_scoring::{InMemoryEventBus, MatchApi, MatchService};
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: MatchService<InMemoryEventBus>,
    pub config: Arc<GatewayConfig>,
}

impl AppState {
    pub fn new(service: MatchService<InMemoryEventBus>, config: GatewayConfig) -> Self {
        Self {
            service,
            config: Arc::new(config),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer(&state.config.cors));
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/ws", get(ws_upgrade))
        .route("/api/state", get(match_state))
        .route("/health", get(health_check))
        .fallback_service(static_files)
        .layer(middleware)
        .with_state(state)
}

async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let handler = WebSocketHandler::new(state.service, state.config.websocket.clone());
    ws.on_upgrade(move |socket| handler.handle(socket))
}

async fn match_state(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.service.snapshot().await)
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": crate::VERSION,
    }))
}
