//! Recording broadcaster
//!
//! Keeps every delivered event in memory. Used by tests and by anything that
//! needs to assert on broadcast order without a live transport.

use crate::error::{BroadcastError, BroadcastResult};
use crate::events::{EventTopic, MatchEvent};
use crate::ports::Broadcaster;
use async_trait::async_trait;
use parking_lot::RwLock;

#[derive(Default)]
pub struct RecordingBroadcaster {
    events: RwLock<Vec<MatchEvent>>,
    failing: RwLock<Vec<EventTopic>>,
}

impl RecordingBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every broadcast on `topic` fail until [`Self::heal`] is called.
    pub fn fail_on(&self, topic: EventTopic) {
        self.failing.write().push(topic);
    }

    pub fn heal(&self) {
        self.failing.write().clear();
    }

    pub fn events(&self) -> Vec<MatchEvent> {
        self.events.read().clone()
    }

    pub fn event_count(&self) -> usize {
        self.events.read().len()
    }

    pub fn clear(&self) {
        self.events.write().clear();
    }
}

#[async_trait]
impl Broadcaster for RecordingBroadcaster {
    async fn broadcast(&self, event: MatchEvent) -> BroadcastResult<usize> {
        if self.failing.read().contains(&event.topic()) {
            return Err(BroadcastError::Rejected {
                reason: format!("{:?} delivery disabled", event.topic()),
            });
        }
        self.events.write().push(event);
        Ok(1)
    }
}
