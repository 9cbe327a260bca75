//! Adapters for the outbound broadcast port

pub mod event_bus;
pub mod recording;

pub use event_bus::{EventFilter, InMemoryEventBus, Subscription, DEFAULT_CHANNEL_CAPACITY};
pub use recording::RecordingBroadcaster;
