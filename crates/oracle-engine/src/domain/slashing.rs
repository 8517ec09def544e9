//! Miss counting and the slash-window state machine
//!
//! Every period, each validator expected to vote that achieved no winning
//! vote on any denom gets one miss. At each slash-window boundary the book
//! is closed: validators whose valid-vote ratio fell below the governed
//! minimum are marked for slashing, and every counter resets whether or not
//! a penalty applied. The penalty itself is executed by the staking
//! collaborator; this module only decides.

use oracle_types::ValidatorAddr;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Participation status, transitioned only at period close.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OracleStatus {
    /// Counting misses normally.
    #[default]
    Active,
    /// Window closed below the minimum valid ratio; penalty requested but
    /// not yet confirmed by the staking collaborator.
    SlashPending,
    /// Penalty applied this window boundary.
    Slashed,
}

/// Per-validator participation record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorPerformance {
    pub miss_counter: u64,
    pub status: OracleStatus,
}

/// Participation records for the whole validator set.
#[derive(Clone, Debug, Default)]
pub struct PerformanceBook {
    records: BTreeMap<ValidatorAddr, ValidatorPerformance>,
}

impl PerformanceBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one miss. The caller guarantees at most one call per validator
    /// per period.
    pub fn record_miss(&mut self, validator: &ValidatorAddr) {
        self.records
            .entry(validator.clone())
            .or_default()
            .miss_counter += 1;
    }

    pub fn miss_counter(&self, validator: &ValidatorAddr) -> u64 {
        self.records
            .get(validator)
            .map(|r| r.miss_counter)
            .unwrap_or(0)
    }

    pub fn status(&self, validator: &ValidatorAddr) -> OracleStatus {
        self.records
            .get(validator)
            .map(|r| r.status)
            .unwrap_or_default()
    }

    /// Close the window: pick delinquents, reset every counter.
    ///
    /// A validator is delinquent when its valid ratio
    /// `1 - misses / slash_window` falls below `min_valid_per_window`.
    /// Delinquents move to `SlashPending`; all counters reset to zero
    /// regardless of outcome. Returned in address order for deterministic
    /// downstream iteration.
    pub fn close_window(
        &mut self,
        slash_window: u64,
        min_valid_per_window: Decimal,
    ) -> Vec<ValidatorAddr> {
        let window = Decimal::from(slash_window);
        let mut delinquents = Vec::new();

        for (validator, record) in self.records.iter_mut() {
            let valid_ratio = Decimal::ONE - Decimal::from(record.miss_counter) / window;
            if valid_ratio < min_valid_per_window {
                record.status = OracleStatus::SlashPending;
                delinquents.push(validator.clone());
            }
            record.miss_counter = 0;
        }

        delinquents
    }

    /// Confirm the staking collaborator applied the penalty.
    pub fn mark_slashed(&mut self, validator: &ValidatorAddr) {
        if let Some(record) = self.records.get_mut(validator) {
            record.status = OracleStatus::Slashed;
        }
    }

    /// Begin the next window: every status returns to `Active`.
    pub fn reactivate_all(&mut self) {
        for record in self.records.values_mut() {
            record.status = OracleStatus::Active;
        }
    }

    /// Drop records for validators no longer in the bonded set.
    pub fn retain_validators(&mut self, bonded: &[ValidatorAddr]) {
        self.records.retain(|v, _| bonded.contains(v));
    }
}
