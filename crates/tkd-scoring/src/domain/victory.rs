//! Victory by point gap

use super::ledger::ScoreSnapshot;
use super::lifecycle::{LifecycleEvent, MatchLifecycle};
use super::team::{EpochMillis, TeamId};
use serde::{Deserialize, Serialize};

/// Result of a match that ended by gap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VictoryResult {
    pub winner: TeamId,
    pub blue_score: u32,
    pub red_score: u32,
    pub difference: u32,
    pub timestamp: EpochMillis,
}

#[derive(Clone, Copy, Debug)]
pub struct VictoryEvaluator {
    victory_gap: u32,
}

impl VictoryEvaluator {
    pub fn new(victory_gap: u32) -> Self {
        Self { victory_gap }
    }

    /// Ends the match if the gap is reached while still active.
    ///
    /// No-op once the match has ended.
    pub fn check(
        &self,
        lifecycle: &mut MatchLifecycle,
        scores: ScoreSnapshot,
        now: EpochMillis,
    ) -> Option<VictoryResult> {
        if !lifecycle.is_active() {
            return None;
        }

        let difference = scores.difference();
        if difference < self.victory_gap {
            return None;
        }

        lifecycle.process_event(LifecycleEvent::VictoryDeclared);

        let winner = if scores.blue_score > scores.red_score {
            TeamId::Blue
        } else {
            TeamId::Red
        };

        Some(VictoryResult {
            winner,
            blue_score: scores.blue_score,
            red_score: scores.red_score,
            difference,
            timestamp: now,
        })
    }
}
