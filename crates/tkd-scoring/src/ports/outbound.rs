//! Driven ports (Outbound dependencies)

use crate::domain::EpochMillis;
use crate::error::BroadcastResult;
use crate::events::MatchEvent;
use async_trait::async_trait;
use std::time::{SystemTime, UNIX_EPOCH};

/// Fan-out of state changes to every connected collaborator.
#[async_trait]
pub trait Broadcaster: Send + Sync {
    /// Deliver one event.
    ///
    /// Returns the number of receivers reached. Zero receivers is not a
    /// failure; an error means the event could not be delivered at all.
    async fn broadcast(&self, event: MatchEvent) -> BroadcastResult<usize>;
}

/// Time source for signal freshness and victory timestamps
pub trait TimeSource: Send + Sync {
    /// Current unix time in milliseconds.
    fn now_millis(&self) -> EpochMillis;
}

/// Default time source using system time
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now_millis(&self) -> EpochMillis {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or(0)
    }
}
