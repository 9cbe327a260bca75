//! Match lifecycle state machine
//!
//! ```text
//! [ACTIVE] ──victory declared──→ [ENDED]
//!     ↑                             │
//!     ├──── victory retracted ──────┤   (victory broadcast failed)
//!     │                             │
//!     └────────── reset ────────────┘
//! ```
//!
//! Reset is accepted from either state.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Signals are accepted.
    #[default]
    Active,
    /// A side won by gap; everything but reset is dropped.
    Ended,
}

/// Events that drive lifecycle transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleEvent {
    VictoryDeclared,
    /// The victory notice could not be delivered; play resumes.
    VictoryRetracted,
    Reset,
}

#[derive(Debug, Default)]
pub struct MatchLifecycle {
    phase: MatchPhase,
    resets: u64,
}

impl MatchLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, MatchPhase::Active)
    }

    /// Number of resets since the session was created.
    pub fn resets(&self) -> u64 {
        self.resets
    }

    pub fn process_event(&mut self, event: LifecycleEvent) -> MatchPhase {
        if event == LifecycleEvent::Reset {
            self.resets += 1;
        }
        self.phase = self.next_state(event);
        self.phase
    }

    fn next_state(&self, event: LifecycleEvent) -> MatchPhase {
        match (self.phase, event) {
            (_, LifecycleEvent::Reset) => MatchPhase::Active,
            (_, LifecycleEvent::VictoryDeclared) => MatchPhase::Ended,
            (_, LifecycleEvent::VictoryRetracted) => MatchPhase::Active,
        }
    }
}
