//! Domain layer for the scoring core
//!
//! Pure state transitions. Nothing in here performs I/O, reads a clock or
//! spawns a task; time is passed in and timers are owned by the service.

pub mod consensus_window;
pub mod ledger;
pub mod lifecycle;
pub mod rules;
pub mod team;
pub mod validator;
pub mod victory;

pub use consensus_window::{Admission, ConsensusWindow, DebounceTicket, PendingSignal};
pub use ledger::{PenaltySnapshot, ScoreLedger, ScoreSnapshot};
pub use lifecycle::{LifecycleEvent, MatchLifecycle, MatchPhase};
pub use rules::{MatchRules, CONSENSUS_WINDOW_MS, SIGNAL_FRESHNESS_MS, VICTORY_GAP};
pub use team::{EpochMillis, JudgeId, ManualAdjustment, ScoringAction, TeamId, TeamMap};
pub use validator::SignalValidator;
pub use victory::{VictoryEvaluator, VictoryResult};
