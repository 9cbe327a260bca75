//! Events module for the scoring core

pub mod incoming;
pub mod outgoing;

pub use incoming::InboundSignal;
pub use outgoing::{EventTopic, MatchEvent, MatchSnapshot};
