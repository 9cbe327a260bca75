//! Inbound judge signals
//!
//! What a transport hands to the core after decoding a frame. The judge
//! identity travels beside the signal, never inside it.

use crate::domain::{EpochMillis, ManualAdjustment, ScoringAction, TeamId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InboundSignal {
    /// Consensus path.
    Strike {
        team: TeamId,
        action: ScoringAction,
        timestamp: EpochMillis,
    },
    /// Direct path, clamped at zero.
    Manual {
        team: TeamId,
        adjustment: ManualAdjustment,
    },
    /// Direct path, kamgeon counter.
    Penalty { team: TeamId },
    /// Lifecycle transition.
    Reset,
}

impl InboundSignal {
    pub fn team(&self) -> Option<TeamId> {
        match self {
            InboundSignal::Strike { team, .. }
            | InboundSignal::Manual { team, .. }
            | InboundSignal::Penalty { team } => Some(*team),
            InboundSignal::Reset => None,
        }
    }
}
