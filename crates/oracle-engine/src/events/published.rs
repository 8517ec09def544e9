//! Published events (outgoing)
//!
//! Emitted after a period close commits. Subscribers (lending, trading, fee
//! modules, indexers) get price changes without polling the store.

use crate::domain::PeriodSummary;
use oracle_types::{Denom, ValidatorAddr};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A denom's canonical rate changed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRateUpdatedEvent {
    pub denom: Denom,
    pub rate: Decimal,
    /// Height of the period close that accepted the rate.
    pub height: u64,
    /// Block timestamp recorded in price history.
    pub timestamp: u64,
}

impl ExchangeRateUpdatedEvent {
    pub fn new(denom: Denom, rate: Decimal, height: u64, timestamp: u64) -> Self {
        Self {
            denom,
            rate,
            height,
            timestamp,
        }
    }
}

/// A voting period closed; carries the full summary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodClosedEvent {
    pub summary: PeriodSummary,
}

impl PeriodClosedEvent {
    pub fn new(summary: PeriodSummary) -> Self {
        Self { summary }
    }
}

/// A validator was penalized at a slash-window boundary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorSlashedEvent {
    pub validator: ValidatorAddr,
    pub fraction: Decimal,
    pub height: u64,
}

impl ValidatorSlashedEvent {
    pub fn new(validator: ValidatorAddr, fraction: Decimal, height: u64) -> Self {
        Self {
            validator,
            fraction,
            height,
        }
    }
}
