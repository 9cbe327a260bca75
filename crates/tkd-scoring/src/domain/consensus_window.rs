//! Consensus window
//!
//! One window per team buffers pending judge signals until two distinct
//! judges agree within the consensus span.
//!
//! ```text
//! admit(judge, ts)                      disarm debounce, take oldest
//!     │
//!     ├── queue empty ──→ push, arm debounce ──→ Waiting
//!     │
//!     └── oldest.judge != judge && ts - oldest.ts <= window
//!              │ yes ──→ clear ──→ Confirmed
//!              │ no  ──→ push, oldest dropped ──→ Discarded
//! ```
//!
//! Only the first and last entries are compared, never all pairs. A stale
//! survivor is harmless: the next mismatch drops it.
//!
//! The debounce timer itself is owned by the caller. The window hands out a
//! [`DebounceTicket`] on arm and only honours the newest one on expiry, so a
//! timer that fires after being superseded changes nothing.

use super::team::{EpochMillis, JudgeId, TeamId};
use std::collections::VecDeque;

/// A judge report waiting for a second opinion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingSignal {
    pub timestamp: EpochMillis,
    pub judge: JudgeId,
}

/// Proof that the holder armed the current debounce timer for a team.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DebounceTicket {
    pub team: TeamId,
    generation: u64,
}

/// Result of admitting one signal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Admission {
    /// Two distinct judges agreed; the queue is empty again.
    Confirmed,
    /// Lone signal; a debounce timer must be armed with `ticket`.
    Waiting { ticket: DebounceTicket },
    /// The oldest entry could not pair with the newest and was dropped.
    Discarded { dropped: PendingSignal },
}

#[derive(Debug)]
pub struct ConsensusWindow {
    team: TeamId,
    window_ms: i64,
    queue: VecDeque<PendingSignal>,
    generation: u64,
    armed: bool,
}

impl ConsensusWindow {
    pub fn new(team: TeamId, window_ms: i64) -> Self {
        Self {
            team,
            window_ms,
            queue: VecDeque::new(),
            generation: 0,
            armed: false,
        }
    }

    pub fn team(&self) -> TeamId {
        self.team
    }

    pub fn admit(&mut self, judge: JudgeId, timestamp: EpochMillis) -> Admission {
        let signal = PendingSignal { timestamp, judge };
        self.disarm();

        // The incoming signal is always the newest entry; compare it with the oldest.
        match self.queue.pop_front() {
            None => {
                self.queue.push_back(signal);
                Admission::Waiting { ticket: self.arm() }
            }
            Some(first) if self.agree(&first, &signal) => {
                self.queue.clear();
                Admission::Confirmed
            }
            Some(first) => {
                self.queue.push_back(signal);
                Admission::Discarded { dropped: first }
            }
        }
    }

    /// Debounce expiry. Returns `true` if the ticket was current and the
    /// queue was cleared.
    pub fn expire(&mut self, ticket: DebounceTicket) -> bool {
        if !self.armed || ticket.team != self.team || ticket.generation != self.generation {
            return false;
        }
        self.armed = false;
        self.queue.clear();
        true
    }

    /// Drop every pending signal and disarm.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.disarm();
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn pending(&self) -> impl Iterator<Item = &PendingSignal> {
        self.queue.iter()
    }

    fn agree(&self, first: &PendingSignal, last: &PendingSignal) -> bool {
        first.judge != last.judge
            && last.timestamp.saturating_sub(first.timestamp) <= self.window_ms
    }

    fn arm(&mut self) -> DebounceTicket {
        self.generation = self.generation.wrapping_add(1);
        self.armed = true;
        DebounceTicket {
            team: self.team,
            generation: self.generation,
        }
    }

    fn disarm(&mut self) {
        if self.armed {
            self.armed = false;
            self.generation = self.generation.wrapping_add(1);
        }
    }
}
