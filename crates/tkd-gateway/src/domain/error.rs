//! Gateway errors.
//!
//! Protocol problems on a single connection never surface here; they are
//! answered with an `error` frame and the connection continues.

/// Gateway-level errors
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Server socket bind error
    #[error("server bind error: {0}")]
    Bind(String),

    /// The HTTP server stopped with an I/O error
    #[error("server error: {0}")]
    Serve(String),
}
