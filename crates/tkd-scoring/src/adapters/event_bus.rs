//! # In-Memory Event Bus
//!
//! Implements the [`Broadcaster`] port on top of `tokio::sync::broadcast`:
//! every connected collaborator subscribes and receives every match event
//! in publish order.

use crate::error::{BroadcastError, BroadcastResult};
use crate::events::{EventTopic, MatchEvent};
use crate::ports::Broadcaster;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, warn};

/// Maximum events buffered per subscriber before it starts lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Topic filter for a subscription.
#[derive(Clone, Debug, Default)]
pub struct EventFilter {
    /// Empty means every topic.
    pub topics: Vec<EventTopic>,
}

impl EventFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self { topics }
    }

    pub fn matches(&self, event: &MatchEvent) -> bool {
        self.topics.is_empty() || self.topics.contains(&event.topic())
    }
}

pub struct InMemoryEventBus {
    sender: broadcast::Sender<MatchEvent>,
    closed: AtomicBool,
    events_published: AtomicU64,
    capacity: usize,
}

impl InMemoryEventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            closed: AtomicBool::new(false),
            events_published: AtomicU64::new(0),
            capacity,
        }
    }

    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        debug!(topics = ?filter.topics, "New subscription created");
        Subscription {
            receiver: self.sender.subscribe(),
            filter,
        }
    }

    /// Filtered stream of events; lagged gaps are skipped.
    pub fn event_stream(&self, filter: EventFilter) -> impl Stream<Item = MatchEvent> + Send {
        BroadcastStream::new(self.sender.subscribe()).filter_map(move |item| match item {
            Ok(event) if filter.matches(&event) => Some(event),
            Ok(_) => None,
            Err(e) => {
                debug!(error = %e, "Subscriber lagged, some events dropped");
                None
            }
        })
    }

    /// Refuse every later publish.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Broadcaster for InMemoryEventBus {
    async fn broadcast(&self, event: MatchEvent) -> BroadcastResult<usize> {
        if self.is_closed() {
            return Err(BroadcastError::Closed);
        }

        let topic = event.topic();
        self.events_published.fetch_add(1, Ordering::Relaxed);

        match self.sender.send(event) {
            Ok(receivers) => {
                debug!(topic = ?topic, receivers, "Event published");
                Ok(receivers)
            }
            Err(_) => {
                // Nobody listening is not a delivery failure.
                warn!(topic = ?topic, "Event dropped (no receivers)");
                Ok(0)
            }
        }
    }
}

/// A subscription handle for receiving events.
pub struct Subscription {
    receiver: broadcast::Receiver<MatchEvent>,
    filter: EventFilter,
}

impl Subscription {
    /// Next matching event, or `None` once the bus is dropped.
    pub async fn recv(&mut self) -> Option<MatchEvent> {
        loop {
            let event = match self.receiver.recv().await {
                Ok(e) => e,
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    debug!(lagged = count, "Subscriber lagged, some events dropped");
                    continue;
                }
            };

            if self.filter.matches(&event) {
                return Some(event);
            }
        }
    }

    /// Next matching event without waiting.
    pub fn try_recv(&mut self) -> Option<MatchEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if self.filter.matches(&event) => return Some(event),
                Ok(_) | Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => return None,
            }
        }
    }

    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PenaltySnapshot, ScoreSnapshot};
    use std::time::Duration;
    use tokio::time::timeout;

    fn score_event(blue_score: u32) -> MatchEvent {
        MatchEvent::ScoreUpdated(ScoreSnapshot {
            blue_score,
            red_score: 0,
        })
    }

    #[tokio::test]
    async fn test_publish_no_subscribers() {
        let bus = InMemoryEventBus::new();
        assert_eq!(bus.broadcast(score_event(1)).await, Ok(0));
        assert_eq!(bus.events_published(), 1);
    }

    #[tokio::test]
    async fn test_publish_with_subscribers() {
        let bus = InMemoryEventBus::new();
        let _a = bus.subscribe(EventFilter::all());
        let _b = bus.subscribe(EventFilter::all());
        assert_eq!(bus.broadcast(score_event(1)).await, Ok(2));
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[tokio::test]
    async fn test_closed_bus_fails() {
        let bus = InMemoryEventBus::new();
        bus.close();
        assert_eq!(
            bus.broadcast(score_event(1)).await,
            Err(BroadcastError::Closed)
        );
        assert_eq!(bus.events_published(), 0);
    }

    #[tokio::test]
    async fn test_subscription_filter() {
        let bus = InMemoryEventBus::new();
        let mut sub = bus.subscribe(EventFilter::topics(vec![EventTopic::Penalty]));

        bus.broadcast(score_event(3)).await.unwrap();
        let penalty = MatchEvent::PenaltyUpdated(PenaltySnapshot {
            blue_penalty: 1,
            red_penalty: 0,
        });
        bus.broadcast(penalty.clone()).await.unwrap();

        let received = timeout(Duration::from_millis(100), sub.recv())
            .await
            .expect("timeout")
            .expect("event");
        assert_eq!(received, penalty);
    }

    #[tokio::test]
    async fn test_event_stream_preserves_order() {
        let bus = InMemoryEventBus::new();
        let stream = bus.event_stream(EventFilter::all());
        tokio::pin!(stream);

        for i in 1..=3 {
            bus.broadcast(score_event(i)).await.unwrap();
        }

        for i in 1..=3 {
            let event = timeout(Duration::from_millis(100), stream.next())
                .await
                .expect("timeout")
                .expect("event");
            assert_eq!(event, score_event(i));
        }
    }

    #[tokio::test]
    async fn test_try_recv_empty() {
        let bus = InMemoryEventBus::new();
        let mut sub = bus.subscribe(EventFilter::all());
        assert!(sub.try_recv().is_none());
    }

    #[test]
    fn test_default_bus() {
        let bus = InMemoryEventBus::default();
        assert_eq!(bus.capacity(), DEFAULT_CHANNEL_CAPACITY);
        assert_eq!(bus.subscriber_count(), 0);
        assert!(!bus.is_closed());
    }
}
