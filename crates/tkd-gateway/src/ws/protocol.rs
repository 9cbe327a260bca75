//! WebSocket wire protocol.
//!
//! Every frame is a JSON object tagged by `type`.
//!
//! ```text
//! judge → server   {"type":"head-strike","team":"blue","timestamp":1700000000000}
//!                  {"type":"manual-decrement","team":"red"}
//!                  {"type":"reset"}
//! server → client  {"type":"score-update","blueScore":3,"redScore":0}
//! ```

use serde::{Deserialize, Serialize};
use tkd_scoring::{
    EpochMillis, InboundSignal, ManualAdjustment, MatchEvent, MatchSnapshot, PenaltySnapshot,
    ScoreSnapshot, ScoringAction, TeamId, VictoryResult,
};

/// Frames accepted from judge consoles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    HeadStrike { team: TeamId, timestamp: EpochMillis },
    TorsoStrike { team: TeamId, timestamp: EpochMillis },
    SpinningTorsoStrike { team: TeamId, timestamp: EpochMillis },
    SpinningHeadStrike { team: TeamId, timestamp: EpochMillis },
    Punch { team: TeamId, timestamp: EpochMillis },
    ManualIncrement { team: TeamId },
    ManualDecrement { team: TeamId },
    Penalty { team: TeamId },
    Reset,
}

impl ClientMessage {
    fn strike(team: TeamId, action: ScoringAction, timestamp: EpochMillis) -> InboundSignal {
        InboundSignal::Strike {
            team,
            action,
            timestamp,
        }
    }
}

impl From<ClientMessage> for InboundSignal {
    fn from(message: ClientMessage) -> Self {
        use ClientMessage::*;

        match message {
            HeadStrike { team, timestamp } => {
                ClientMessage::strike(team, ScoringAction::HeadStrike, timestamp)
            }
            TorsoStrike { team, timestamp } => {
                ClientMessage::strike(team, ScoringAction::TorsoStrike, timestamp)
            }
            SpinningTorsoStrike { team, timestamp } => {
                ClientMessage::strike(team, ScoringAction::SpinningTorsoStrike, timestamp)
            }
            SpinningHeadStrike { team, timestamp } => {
                ClientMessage::strike(team, ScoringAction::SpinningHeadStrike, timestamp)
            }
            Punch { team, timestamp } => ClientMessage::strike(team, ScoringAction::Punch, timestamp),
            ManualIncrement { team } => InboundSignal::Manual {
                team,
                adjustment: ManualAdjustment::Increment,
            },
            ManualDecrement { team } => InboundSignal::Manual {
                team,
                adjustment: ManualAdjustment::Decrement,
            },
            Penalty { team } => InboundSignal::Penalty { team },
            Reset => InboundSignal::Reset,
        }
    }
}

/// Frames pushed to every connection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerMessage {
    /// Sent once, right after the upgrade.
    GameState(MatchSnapshot),
    ScoreUpdate(ScoreSnapshot),
    PenaltyUpdate(PenaltySnapshot),
    GameOver(VictoryResult),
    GameReset(MatchSnapshot),
    /// Malformed or oversized frame. Rejected signals are never reported.
    Error { message: String },
}

impl ServerMessage {
    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }

    pub fn to_json(&self) -> String {
        // Plain data with string keys; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl From<MatchEvent> for ServerMessage {
    fn from(event: MatchEvent) -> Self {
        match event {
            MatchEvent::ScoreUpdated(scores) => ServerMessage::ScoreUpdate(scores),
            MatchEvent::PenaltyUpdated(penalties) => ServerMessage::PenaltyUpdate(penalties),
            MatchEvent::MatchWon(result) => ServerMessage::GameOver(result),
            MatchEvent::MatchReset(snapshot) => ServerMessage::GameReset(snapshot),
        }
    }
}

/// Decode one text frame.
pub fn decode(text: &str) -> Result<ClientMessage, serde_json::Error> {
    serde_json::from_str(text)
}
