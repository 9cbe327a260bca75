//! # tkd-node
//!
//! Startup pieces for the scoring station binary.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from the environment
//! 2. Initialise logging
//! 3. Validate match rules and gateway configuration
//! 4. Serve the match until Ctrl-C

pub mod config;
pub mod telemetry;

pub use config::{Environment, NodeConfig, DEFAULT_PUBLIC_ORIGIN};
pub use telemetry::{init_tracing, TelemetryError};
