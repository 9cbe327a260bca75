//! tkd-gateway - WebSocket and HTTP surface for a taekwondo match.
//!
//! Judge consoles and scoreboards connect over one WebSocket endpoint. Every
//! connection is a judge identity, receives the current match state on
//! connect and every state change afterwards.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                        GATEWAY                            │
//! ├───────────────────────────────────────────────────────────┤
//! │  GET /ws          GET /api/state   GET /health   static   │
//! │     │                   │               │           │     │
//! │  ┌──┴───────────────────┴───────────────┴───────────┴──┐  │
//! │  │            Middleware: Trace → CORS                 │  │
//! │  └──┬──────────────────────────────────────────────────┘  │
//! │     │ ClientMessage → InboundSignal                       │
//! └─────┼─────────────────────────────────────────────────────┘
//!       ▼                                   ▲
//!   MatchService ──→ InMemoryEventBus ──────┘ ServerMessage fan-out
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use tkd_gateway::{GatewayConfig, GatewayService};
//!
//! let gateway = GatewayService::new(GatewayConfig::default(), match_service)?;
//! gateway.serve(shutdown_signal()).await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod domain;
pub mod middleware;
pub mod router;
pub mod service;
pub mod ws;

pub use domain::config::{ConfigError, CorsConfig, GatewayConfig, WebSocketConfig};
pub use domain::error::GatewayError;
pub use router::{build_router, AppState};
pub use service::GatewayService;
pub use ws::{ClientMessage, ServerMessage, WebSocketHandler};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
