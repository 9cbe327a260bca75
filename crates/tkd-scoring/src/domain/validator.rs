//! Signal validation
//!
//! Drops signals for an ended match and signals that spent too long in
//! transit. Team and action are trusted as given.

use super::team::EpochMillis;
use crate::error::RejectReason;

/// Gate in front of the consensus window.
#[derive(Clone, Copy, Debug)]
pub struct SignalValidator {
    freshness_ms: i64,
}

impl SignalValidator {
    pub fn new(freshness_ms: i64) -> Self {
        Self { freshness_ms }
    }

    /// Accept a consensus-path signal.
    ///
    /// A timestamp ahead of `now` is never stale.
    pub fn validate(
        &self,
        match_active: bool,
        signal_timestamp: EpochMillis,
        now: EpochMillis,
    ) -> Result<(), RejectReason> {
        Self::require_active(match_active)?;

        let age_ms = now.saturating_sub(signal_timestamp);
        if age_ms > self.freshness_ms {
            return Err(RejectReason::Stale { age_ms });
        }
        Ok(())
    }

    /// Accept a direct-path signal (manual adjustment, penalty).
    pub fn require_active(match_active: bool) -> Result<(), RejectReason> {
        if match_active {
            Ok(())
        } else {
            Err(RejectReason::Inactive)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> SignalValidator {
        SignalValidator::new(5_000)
    }

    #[test]
    fn test_accepts_fresh_signal() {
        assert!(validator().validate(true, 10_000, 15_000).is_ok());
    }

    #[test]
    fn test_rejects_stale_signal() {
        assert_eq!(
            validator().validate(true, 10_000, 15_001),
            Err(RejectReason::Stale { age_ms: 5_001 })
        );
    }

    #[test]
    fn test_rejects_inactive_match() {
        assert_eq!(
            validator().validate(false, 10_000, 10_000),
            Err(RejectReason::Inactive)
        );
    }

    #[test]
    fn test_future_timestamp_is_fresh() {
        assert!(validator().validate(true, 20_000, 10_000).is_ok());
    }
}
