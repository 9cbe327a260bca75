//! Gateway configuration with validation.

use axum::http::{HeaderValue, Method};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Default HTTP port, shared by the API, the WebSocket and static files.
pub const DEFAULT_PORT: u16 = 3000;

/// Judge frames are a few dozen bytes.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 16 * 1024;

/// Frames queued per connection before the sender falls behind.
pub const DEFAULT_OUTBOUND_BUFFER: usize = 64;

/// Main gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Bind address
    pub host: IpAddr,
    /// Port (default: 3000)
    pub port: u16,
    /// Directory served for every path no route claims
    pub static_dir: PathBuf,
    /// CORS configuration
    pub cors: CorsConfig,
    /// WebSocket configuration
    pub websocket: WebSocketConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: DEFAULT_PORT,
            static_dir: PathBuf::from("public"),
            cors: CorsConfig::default(),
            websocket: WebSocketConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.websocket.max_message_size == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_message_size cannot be 0".into(),
            ));
        }

        if self.websocket.outbound_buffer == 0 {
            return Err(ConfigError::InvalidLimit(
                "outbound_buffer cannot be 0".into(),
            ));
        }

        self.cors.validate()
    }

    /// Get server bind address
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Enable CORS
    pub enabled: bool,
    /// Allowed origins ("*" for all)
    pub allowed_origins: Vec<String>,
    /// Allowed methods
    pub allowed_methods: Vec<String>,
    /// Max age for preflight cache
    pub max_age: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: vec![format!("http://localhost:{}", DEFAULT_PORT)],
            allowed_methods: vec!["GET".to_string(), "POST".to_string()],
            max_age: 86400, // 24 hours
        }
    }
}

impl CorsConfig {
    /// Restrict to a single origin.
    pub fn for_origin(origin: impl Into<String>) -> Self {
        Self {
            allowed_origins: vec![origin.into()],
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.enabled {
            return Ok(());
        }

        if self.allowed_origins.is_empty() {
            return Err(ConfigError::InvalidCors("no allowed origins".into()));
        }

        for origin in &self.allowed_origins {
            if origin != "*" && origin.parse::<HeaderValue>().is_err() {
                return Err(ConfigError::InvalidCors(format!(
                    "invalid origin: {}",
                    origin
                )));
            }
        }

        for method in &self.allowed_methods {
            if method.parse::<Method>().is_err() {
                return Err(ConfigError::InvalidCors(format!(
                    "invalid method: {}",
                    method
                )));
            }
        }

        Ok(())
    }
}

/// WebSocket configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebSocketConfig {
    /// Maximum inbound frame size in bytes
    pub max_message_size: usize,
    /// Outbound frames buffered per connection
    pub outbound_buffer: usize,
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            outbound_buffer: DEFAULT_OUTBOUND_BUFFER,
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Invalid size or buffer limit
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
    /// Invalid CORS policy
    #[error("invalid CORS configuration: {0}")]
    InvalidCors(String),
}
