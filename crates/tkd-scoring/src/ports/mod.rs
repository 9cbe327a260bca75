//! Ports module for the scoring core

pub mod inbound;
pub mod outbound;

pub use inbound::{MatchApi, SignalOutcome};
pub use outbound::{Broadcaster, SystemTimeSource, TimeSource};
