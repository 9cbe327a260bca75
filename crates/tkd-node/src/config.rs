//! Node configuration from environment variables.

use std::env;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use tkd_gateway::{CorsConfig, GatewayConfig};
use tkd_scoring::MatchRules;

/// Public origin allowed by CORS in production.
pub const DEFAULT_PUBLIC_ORIGIN: &str = "https://arbitraje-taekwondo.onrender.com";

const DEFAULT_PORT: u16 = 3000;

/// Deployment environment; decides the CORS origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Configuration for one scoring station.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub environment: Environment,

    /// Bind address
    pub host: IpAddr,

    /// HTTP and WebSocket port
    pub port: u16,

    /// Origin allowed in production
    pub public_origin: String,

    /// Judge and scoreboard pages
    pub static_dir: PathBuf,

    /// Log level filter (trace, debug, info, warn, error)
    pub log_level: String,

    /// Whether to enable JSON formatted logs
    pub json_logs: bool,

    pub rules: MatchRules,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: DEFAULT_PORT,
            public_origin: DEFAULT_PUBLIC_ORIGIN.to_string(),
            static_dir: PathBuf::from("public"),
            log_level: "info".to_string(),
            json_logs: false,
            rules: MatchRules::default(),
        }
    }
}

impl NodeConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `PORT`: HTTP port (default: 3000)
    /// - `HOST`: Bind address (default: 0.0.0.0)
    /// - `TKD_ENV` or `NODE_ENV`: `production` restricts CORS to the public origin
    /// - `TKD_PUBLIC_ORIGIN`: Public origin (default: https://arbitraje-taekwondo.onrender.com)
    /// - `TKD_STATIC_DIR`: Static files directory (default: public)
    /// - `TKD_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `TKD_JSON_LOGS`: Enable JSON logs (default: true in production)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Self::from_env`] over an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let environment = lookup("TKD_ENV")
            .or_else(|| lookup("NODE_ENV"))
            .map(|v| Environment::parse(&v))
            .unwrap_or_default();

        Self {
            environment,

            host: lookup("HOST")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.host),

            port: lookup("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),

            public_origin: lookup("TKD_PUBLIC_ORIGIN").unwrap_or(defaults.public_origin),

            static_dir: lookup("TKD_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),

            log_level: lookup("TKD_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or(defaults.log_level),

            json_logs: lookup("TKD_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(environment == Environment::Production),

            rules: defaults.rules,
        }
    }

    /// Origin browsers may call the API from.
    pub fn cors_origin(&self) -> String {
        match self.environment {
            Environment::Production => self.public_origin.clone(),
            Environment::Development => format!("http://localhost:{}", self.port),
        }
    }

    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            host: self.host,
            port: self.port,
            static_dir: self.static_dir.clone(),
            cors: CorsConfig::for_origin(self.cors_origin()),
            ..GatewayConfig::default()
        }
    }
}
