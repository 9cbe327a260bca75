//! Teams, judges and scoring actions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// Milliseconds since the Unix epoch, as stamped by the judge device.
///
/// Signed so that clock skew between devices produces negative spans
/// rather than wrapping.
pub type EpochMillis = i64;

/// One of the two competing sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamId {
    Blue,
    Red,
}

impl TeamId {
    /// Both sides, in broadcast order.
    pub const ALL: [TeamId; 2] = [TeamId::Blue, TeamId::Red];

    pub fn as_str(self) -> &'static str {
        match self {
            TeamId::Blue => "blue",
            TeamId::Red => "red",
        }
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-team storage, indexable by [`TeamId`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TeamMap<T> {
    pub blue: T,
    pub red: T,
}

impl<T> TeamMap<T> {
    pub fn new(blue: T, red: T) -> Self {
        Self { blue, red }
    }

    /// Build both entries from a per-team constructor.
    pub fn from_fn(mut f: impl FnMut(TeamId) -> T) -> Self {
        Self {
            blue: f(TeamId::Blue),
            red: f(TeamId::Red),
        }
    }
}

impl<T> Index<TeamId> for TeamMap<T> {
    type Output = T;

    fn index(&self, team: TeamId) -> &T {
        match team {
            TeamId::Blue => &self.blue,
            TeamId::Red => &self.red,
        }
    }
}

impl<T> IndexMut<TeamId> for TeamMap<T> {
    fn index_mut(&mut self, team: TeamId) -> &mut T {
        match team {
            TeamId::Blue => &mut self.blue,
            TeamId::Red => &mut self.red,
        }
    }
}

/// Opaque identity of a scoring observer.
///
/// The core only compares judges for equality; it never authenticates them.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JudgeId(String);

impl JudgeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for JudgeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for JudgeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for JudgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A technique that scores only after judge consensus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoringAction {
    HeadStrike,
    TorsoStrike,
    SpinningTorsoStrike,
    SpinningHeadStrike,
    Punch,
}

impl ScoringAction {
    pub const ALL: [ScoringAction; 5] = [
        ScoringAction::HeadStrike,
        ScoringAction::TorsoStrike,
        ScoringAction::SpinningTorsoStrike,
        ScoringAction::SpinningHeadStrike,
        ScoringAction::Punch,
    ];

    /// Points awarded once the action is confirmed.
    pub const fn points(self) -> u32 {
        match self {
            ScoringAction::HeadStrike => 3,
            ScoringAction::TorsoStrike => 2,
            ScoringAction::SpinningTorsoStrike => 4,
            ScoringAction::SpinningHeadStrike => 5,
            ScoringAction::Punch => 1,
        }
    }
}

/// Referee correction applied directly to a score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManualAdjustment {
    Increment,
    Decrement,
}

impl ManualAdjustment {
    pub const fn delta(self) -> i64 {
        match self {
            ManualAdjustment::Increment => 1,
            ManualAdjustment::Decrement => -1,
        }
    }
}
