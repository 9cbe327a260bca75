//! Driving Ports (API - Inbound)
//!
//! The operations a transport invokes on a match.

use crate::domain::{EpochMillis, JudgeId, ManualAdjustment, ScoringAction, TeamId};
use crate::error::RejectReason;
use crate::events::{InboundSignal, MatchSnapshot};
use async_trait::async_trait;

/// What happened to one inbound signal.
///
/// Judges are never told; every variant looks the same from the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignalOutcome {
    /// Dropped before reaching the ledger.
    Rejected(RejectReason),
    /// Lone signal waiting for a second judge.
    Pending,
    /// The oldest pending signal could not pair and was dropped.
    Discarded,
    /// Two judges agreed and the points were applied.
    Confirmed {
        team: TeamId,
        points: u32,
        score: u32,
    },
    /// A direct-path mutation or reset was applied.
    Applied,
}

impl SignalOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, SignalOutcome::Rejected(_))
    }
}

/// Primary match API
///
/// All operations on one match are applied one at a time in arrival order.
#[async_trait]
pub trait MatchApi: Send + Sync {
    /// Consensus path: validate, admit, apply, check, broadcast.
    async fn submit_strike(
        &self,
        judge: JudgeId,
        team: TeamId,
        action: ScoringAction,
        timestamp: EpochMillis,
    ) -> SignalOutcome;

    /// Direct path: referee correction.
    async fn adjust_score(&self, team: TeamId, adjustment: ManualAdjustment) -> SignalOutcome;

    /// Direct path: kamgeon.
    async fn record_penalty(&self, team: TeamId) -> SignalOutcome;

    /// Always accepted. Clears scores, penalties, queues and timers.
    async fn reset(&self) -> MatchSnapshot;

    async fn snapshot(&self) -> MatchSnapshot;

    /// Pending signals held for a team.
    async fn pending_len(&self, team: TeamId) -> usize;

    /// Route a decoded signal to the matching operation.
    async fn dispatch(&self, judge: JudgeId, signal: InboundSignal) -> SignalOutcome {
        match signal {
            InboundSignal::Strike {
                team,
                action,
                timestamp,
            } => self.submit_strike(judge, team, action, timestamp).await,
            InboundSignal::Manual { team, adjustment } => {
                self.adjust_score(team, adjustment).await
            }
            InboundSignal::Penalty { team } => self.record_penalty(team).await,
            InboundSignal::Reset => {
                self.reset().await;
                SignalOutcome::Applied
            }
        }
    }
}
