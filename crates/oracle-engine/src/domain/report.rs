//! Period-close and window reports
//!
//! `on_period_end` hands the host a summary of everything that changed so
//! the host can emit its own chain events and operators can audit slashing
//! outcomes without replaying state.

use crate::domain::ExchangeRate;
use oracle_types::{Denom, ValidatorAddr};
use serde::{Deserialize, Serialize};

/// What one period close did.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSummary {
    /// Height that closed the period.
    pub height: u64,
    /// Rates accepted this period.
    pub updated: Vec<ExchangeRate>,
    /// Tracked denoms whose ballot fell short of quorum (stale rate kept).
    pub no_consensus: Vec<Denom>,
    /// Denoms auto-dropped from tracking for receiving zero votes (only
    /// when the pruning policy is enabled).
    pub pruned: Vec<Denom>,
    /// Validators that earned a miss this period.
    pub misses: Vec<ValidatorAddr>,
    /// Validators penalized at this window boundary.
    pub slashed: Vec<ValidatorAddr>,
    /// Slash requests the staking collaborator rejected; local counters are
    /// reset regardless, the failure is surfaced here.
    pub slash_errors: Vec<(ValidatorAddr, String)>,
}

/// Progress through the current slash window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlashWindowProgress {
    /// Voting periods elapsed in the current window.
    pub elapsed_periods: u64,
    /// Window length in voting periods.
    pub window_periods: u64,
}
