//! Oracle parameters
//!
//! Every threshold the aggregation and slashing paths consult is a governed
//! parameter, never a constant baked into an algorithm. Defaults follow the
//! conventional values of Tendermint-family oracle modules.

use crate::domain::{OracleError, OracleResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Governed oracle parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleParams {
    /// Blocks per voting period.
    pub vote_period: u64,
    /// Quorum: fraction of total bonded power that must back winning votes
    /// for a denom's rate to be accepted.
    pub vote_threshold: Decimal,
    /// Full width of the tolerance band around the weighted median; votes
    /// within ±band/2 are winners.
    pub reward_band: Decimal,
    /// Penalty fraction applied to bonded stake on window failure.
    pub slash_fraction: Decimal,
    /// Voting periods per slash window.
    pub slash_window: u64,
    /// Minimum fraction of a window's periods in which a validator must have
    /// a winning vote; below it the validator is slashed at window close.
    pub min_valid_per_window: Decimal,
    /// Validators below this bonded power are exempt from miss accounting.
    pub min_voting_power: u64,
    /// Retention horizon for price history, in seconds.
    pub price_retention_secs: u64,
    /// When true, a tracked denom that receives zero votes in a period is
    /// dropped from the tracking list automatically; when false, removal
    /// requires an explicit governance decision.
    pub prune_stale_denoms: bool,
}

impl Default for OracleParams {
    fn default() -> Self {
        Self {
            vote_period: 5,
            vote_threshold: Decimal::new(50, 2),     // 0.50
            reward_band: Decimal::new(2, 2),         // 0.02
            slash_fraction: Decimal::new(1, 4),      // 0.0001
            slash_window: 100_800,
            min_valid_per_window: Decimal::new(5, 2), // 0.05
            min_voting_power: 0,
            price_retention_secs: 24 * 60 * 60,
            prune_stale_denoms: false,
        }
    }
}

impl OracleParams {
    /// Validate parameter ranges.
    pub fn validate(&self) -> OracleResult<()> {
        if self.vote_period == 0 {
            return Err(OracleError::InvalidParams("vote_period must be positive".into()));
        }
        if self.slash_window == 0 {
            return Err(OracleError::InvalidParams("slash_window must be positive".into()));
        }
        if self.vote_threshold <= Decimal::ZERO || self.vote_threshold > Decimal::ONE {
            return Err(OracleError::InvalidParams(format!(
                "vote_threshold must be in (0, 1], got {}",
                self.vote_threshold
            )));
        }
        if self.reward_band < Decimal::ZERO {
            return Err(OracleError::InvalidParams(format!(
                "reward_band must be non-negative, got {}",
                self.reward_band
            )));
        }
        if self.slash_fraction < Decimal::ZERO || self.slash_fraction > Decimal::ONE {
            return Err(OracleError::InvalidParams(format!(
                "slash_fraction must be in [0, 1], got {}",
                self.slash_fraction
            )));
        }
        if self.min_valid_per_window < Decimal::ZERO || self.min_valid_per_window > Decimal::ONE {
            return Err(OracleError::InvalidParams(format!(
                "min_valid_per_window must be in [0, 1], got {}",
                self.min_valid_per_window
            )));
        }
        Ok(())
    }

    /// The voting period index for a block height.
    pub fn period_index(&self, height: u64) -> u64 {
        height / self.vote_period
    }

    /// Whether `height` closes a slash window (last period of the window).
    pub fn is_window_boundary(&self, height: u64) -> bool {
        self.period_index(height) % self.slash_window == self.slash_window - 1
    }

    /// Periods elapsed in the current slash window at `height`.
    pub fn window_progress(&self, height: u64) -> u64 {
        self.period_index(height) % self.slash_window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_are_valid() {
        assert!(OracleParams::default().validate().is_ok());
    }

    #[test]
    fn test_zero_vote_period_rejected() {
        let params = OracleParams {
            vote_period: 0,
            ..Default::default()
        };
        assert!(matches!(params.validate(), Err(OracleError::InvalidParams(_))));
    }

    #[test]
    fn test_threshold_above_one_rejected() {
        let params = OracleParams {
            vote_threshold: Decimal::new(15, 1),
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_period_index() {
        let params = OracleParams {
            vote_period: 5,
            ..Default::default()
        };
        assert_eq!(params.period_index(0), 0);
        assert_eq!(params.period_index(4), 0);
        assert_eq!(params.period_index(5), 1);
    }

    #[test]
    fn test_window_boundary() {
        let params = OracleParams {
            vote_period: 1,
            slash_window: 10,
            ..Default::default()
        };
        assert!(!params.is_window_boundary(8));
        assert!(params.is_window_boundary(9));
        assert!(params.is_window_boundary(19));
        assert_eq!(params.window_progress(12), 2);
    }
}
