//! Score ledger
//!
//! Team scores and kamgeon (penalty) counters. Penalties are informational
//! and never feed into the score or the victory check.

use super::team::{ManualAdjustment, TeamId, TeamMap};
use serde::{Deserialize, Serialize};

/// Score pair as broadcast to every collaborator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSnapshot {
    pub blue_score: u32,
    pub red_score: u32,
}

impl ScoreSnapshot {
    pub fn of(&self, team: TeamId) -> u32 {
        match team {
            TeamId::Blue => self.blue_score,
            TeamId::Red => self.red_score,
        }
    }

    pub fn difference(&self) -> u32 {
        self.blue_score.abs_diff(self.red_score)
    }
}

/// Penalty pair as broadcast to every collaborator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PenaltySnapshot {
    pub blue_penalty: u32,
    pub red_penalty: u32,
}

#[derive(Debug, Default)]
pub struct ScoreLedger {
    scores: TeamMap<u32>,
    penalties: TeamMap<u32>,
}

impl ScoreLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add confirmed points. No upper bound.
    pub fn apply_confirmed_points(&mut self, team: TeamId, points: u32) -> u32 {
        let score = &mut self.scores[team];
        *score = score.saturating_add(points);
        *score
    }

    /// Referee correction, clamped at zero.
    pub fn adjust_manual(&mut self, team: TeamId, adjustment: ManualAdjustment) -> u32 {
        let score = &mut self.scores[team];
        *score = match adjustment {
            ManualAdjustment::Increment => score.saturating_add(1),
            ManualAdjustment::Decrement => score.saturating_sub(1),
        };
        *score
    }

    pub fn apply_penalty(&mut self, team: TeamId) -> u32 {
        let penalty = &mut self.penalties[team];
        *penalty = penalty.saturating_add(1);
        *penalty
    }

    pub fn score(&self, team: TeamId) -> u32 {
        self.scores[team]
    }

    pub fn penalty(&self, team: TeamId) -> u32 {
        self.penalties[team]
    }

    pub fn score_snapshot(&self) -> ScoreSnapshot {
        ScoreSnapshot {
            blue_score: self.scores.blue,
            red_score: self.scores.red,
        }
    }

    pub fn penalty_snapshot(&self) -> PenaltySnapshot {
        PenaltySnapshot {
            blue_penalty: self.penalties.blue,
            red_penalty: self.penalties.red,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
