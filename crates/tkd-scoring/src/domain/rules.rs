//! Match rules
//!
//! The windows are fixed system constants. They live in a struct so a session
//! can be built with the same shape in tests and production, never so a single
//! signal can carry its own window.

use crate::error::RulesError;

/// Maximum transit age of a judge signal (ms).
pub const SIGNAL_FRESHNESS_MS: i64 = 5_000;

/// Span within which two distinct judges must agree (ms).
pub const CONSENSUS_WINDOW_MS: i64 = 5_000;

/// Score difference that ends the match.
pub const VICTORY_GAP: u32 = 12;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchRules {
    pub signal_freshness_ms: i64,
    pub consensus_window_ms: i64,
    pub victory_gap: u32,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            signal_freshness_ms: SIGNAL_FRESHNESS_MS,
            consensus_window_ms: CONSENSUS_WINDOW_MS,
            victory_gap: VICTORY_GAP,
        }
    }
}

impl MatchRules {
    pub fn validate(&self) -> Result<(), RulesError> {
        if self.victory_gap == 0 {
            return Err(RulesError::ZeroVictoryGap);
        }
        if self.signal_freshness_ms <= 0 {
            return Err(RulesError::ZeroWindow {
                name: "signal_freshness_ms",
            });
        }
        if self.consensus_window_ms <= 0 {
            return Err(RulesError::ZeroWindow {
                name: "consensus_window_ms",
            });
        }
        Ok(())
    }

    /// Debounce delay for a lone pending signal.
    pub fn debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.consensus_window_ms.unsigned_abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules() {
        let rules = MatchRules::default();
        assert_eq!(rules.signal_freshness_ms, 5_000);
        assert_eq!(rules.consensus_window_ms, 5_000);
        assert_eq!(rules.victory_gap, 12);
        assert!(rules.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_gap() {
        let rules = MatchRules {
            victory_gap: 0,
            ..MatchRules::default()
        };
        assert_eq!(rules.validate(), Err(RulesError::ZeroVictoryGap));
    }

    #[test]
    fn test_rejects_zero_window() {
        let rules = MatchRules {
            consensus_window_ms: 0,
            ..MatchRules::default()
        };
        assert!(matches!(
            rules.validate(),
            Err(RulesError::ZeroWindow { name: "consensus_window_ms" })
        ));
    }
}
