//! Outgoing match events
//!
//! Every state change is announced once, after the mutation and the victory
//! check have both completed.

use crate::domain::{PenaltySnapshot, ScoreSnapshot, VictoryResult};
use serde::{Deserialize, Serialize};

/// Full, consistent view of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSnapshot {
    pub blue_score: u32,
    pub red_score: u32,
    pub blue_penalty: u32,
    pub red_penalty: u32,
    pub active: bool,
}

impl MatchSnapshot {
    pub fn new(scores: ScoreSnapshot, penalties: PenaltySnapshot, active: bool) -> Self {
        Self {
            blue_score: scores.blue_score,
            red_score: scores.red_score,
            blue_penalty: penalties.blue_penalty,
            red_penalty: penalties.red_penalty,
            active,
        }
    }

    pub fn scores(&self) -> ScoreSnapshot {
        ScoreSnapshot {
            blue_score: self.blue_score,
            red_score: self.red_score,
        }
    }

    pub fn penalties(&self) -> PenaltySnapshot {
        PenaltySnapshot {
            blue_penalty: self.blue_penalty,
            red_penalty: self.red_penalty,
        }
    }
}

/// Topic used to filter subscriptions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    Score,
    Penalty,
    Lifecycle,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchEvent {
    ScoreUpdated(ScoreSnapshot),
    PenaltyUpdated(PenaltySnapshot),
    MatchWon(VictoryResult),
    MatchReset(MatchSnapshot),
}

impl MatchEvent {
    pub fn topic(&self) -> EventTopic {
        match self {
            MatchEvent::ScoreUpdated(_) => EventTopic::Score,
            MatchEvent::PenaltyUpdated(_) => EventTopic::Penalty,
            MatchEvent::MatchWon(_) | MatchEvent::MatchReset(_) => EventTopic::Lifecycle,
        }
    }

    pub fn is_victory(&self) -> bool {
        matches!(self, MatchEvent::MatchWon(_))
    }
}
