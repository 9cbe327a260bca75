//! # tkd-scoring
//!
//! Taekwondo scoring core: a point counts only when two distinct judges
//! report it for the same team within the consensus window.
//!
//! ## Overview
//!
//! This crate provides:
//! - **Signal Validator**: drops stale signals and signals for an ended match
//! - **Consensus Window**: per-team pending queue with debounce expiry
//! - **Score Ledger**: scores, manual corrections, kamgeon counters
//! - **Victory Evaluator**: ends the match on a 12-point gap
//! - **Match Lifecycle**: active/ended, atomic reset
//!
//! ## Flow
//!
//! ```text
//! judge signal ──→ Validator ──→ Consensus Window (team) ──confirmed──→ Ledger
//!                                                                        │
//! manual / penalty ─────────────────────────────────────────────────────→┤
//!                                                                        ↓
//!                                                              Victory Evaluator
//!                                                                        │
//!                                                                        ↓
//!                                                                   Broadcaster
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tkd_scoring::{InMemoryEventBus, MatchApi, MatchRules, MatchService, ScoringAction, TeamId};
//!
//! let bus = Arc::new(InMemoryEventBus::new());
//! let service = MatchService::new(MatchRules::default(), bus.clone());
//!
//! service.submit_strike("judge-a".into(), TeamId::Blue, ScoringAction::HeadStrike, ts).await;
//! service.submit_strike("judge-b".into(), TeamId::Blue, ScoringAction::HeadStrike, ts).await;
//! assert_eq!(service.snapshot().await.blue_score, 3);
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod events;
pub mod ports;
pub mod service;
pub mod session;

pub use adapters::{EventFilter, InMemoryEventBus, RecordingBroadcaster, Subscription};
pub use domain::{
    EpochMillis, JudgeId, ManualAdjustment, MatchPhase, MatchRules, PenaltySnapshot,
    ScoreSnapshot, ScoringAction, TeamId, VictoryResult,
};
pub use error::{BroadcastError, BroadcastResult, RejectReason, RulesError};
pub use events::{EventTopic, InboundSignal, MatchEvent, MatchSnapshot};
pub use ports::{Broadcaster, MatchApi, SignalOutcome, SystemTimeSource, TimeSource};
pub use service::MatchService;
pub use session::{MatchSession, TimerDirective, Transition};
