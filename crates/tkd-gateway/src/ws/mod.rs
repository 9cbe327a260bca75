//! WebSocket endpoint: wire protocol and per-connection handler.

pub mod handler;
pub mod protocol;

pub use handler::WebSocketHandler;
pub use protocol::{ClientMessage, ServerMessage};
