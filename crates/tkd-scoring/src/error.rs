//! Error types for the scoring core
//!
//! Nothing here is fatal to the process. Rejected signals are absorbed and
//! broadcast failures are recovered locally by the caller.

use thiserror::Error;

/// Why an inbound signal was dropped before reaching the ledger.
///
/// Never surfaced to the judge; only logged.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The match has ended and awaits reset.
    #[error("match is not active")]
    Inactive,

    /// The signal took too long to reach the server.
    #[error("signal is stale: {age_ms} ms old")]
    Stale { age_ms: i64 },
}

/// Outbound broadcast failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BroadcastError {
    /// The channel was shut down.
    #[error("broadcast channel closed")]
    Closed,

    /// The collaborator refused the event.
    #[error("broadcast rejected: {reason}")]
    Rejected { reason: String },
}

/// Invalid match rules.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RulesError {
    /// A zero gap would let a tied match end with an arbitrary winner.
    #[error("victory gap must be at least 1")]
    ZeroVictoryGap,

    #[error("{name} must be greater than zero")]
    ZeroWindow { name: &'static str },
}

/// Result type for broadcast operations
pub type BroadcastResult<T> = Result<T, BroadcastError>;
