//! Driven ports (outbound dependencies)

use crate::events::{ExchangeRateUpdatedEvent, PeriodClosedEvent, ValidatorSlashedEvent};
use oracle_types::ValidatorAddr;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A bonded validator as seen by the staking subsystem.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BondedValidator {
    pub operator: ValidatorAddr,
    pub power: u64,
}

impl BondedValidator {
    pub fn new(operator: ValidatorAddr, power: u64) -> Self {
        Self { operator, power }
    }
}

/// Staking subsystem: the bonded set and the penalty effect.
///
/// `slash` is idempotent at a given height on the staking side; the engine
/// never retries a failed call, it resets local state and surfaces the
/// error in the period summary.
#[async_trait::async_trait]
pub trait StakingKeeper: Send + Sync {
    /// Current bonded validators with voting power.
    async fn bonded_validators(&self) -> Result<Vec<BondedValidator>, String>;

    /// Apply a penalty fraction to a validator's bonded stake.
    async fn slash(&self, validator: &ValidatorAddr, fraction: Decimal) -> Result<(), String>;
}

/// Event bus the engine publishes period outcomes to.
///
/// Publishing is best-effort: a bus failure is logged, never rolled back
/// into consensus state.
#[async_trait::async_trait]
pub trait EventBus: Send + Sync {
    async fn publish_exchange_rate_updated(
        &self,
        event: ExchangeRateUpdatedEvent,
    ) -> Result<(), String>;

    async fn publish_period_closed(&self, event: PeriodClosedEvent) -> Result<(), String>;

    async fn publish_validator_slashed(&self, event: ValidatorSlashedEvent)
        -> Result<(), String>;
}
