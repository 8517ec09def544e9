//! Mutable oracle state
//!
//! All mutable stores live in one `OracleStore` behind a single
//! `parking_lot::RwLock`. Period close must be all-or-nothing — peers
//! diverge if it half-applies — so the service clones the store, mutates the
//! working copy, and commits by swap. One lock also means a reader can never
//! observe a store where the exchange rate moved but history did not.

use crate::domain::{
    AggregatePrevote, AggregateVote, ExchangeRateStore, OracleParams, PerformanceBook,
    PriceHistory, TrackingList,
};
use oracle_types::{AccountAddr, ValidatorAddr};
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// Everything the engine mutates, as one clonable value.
#[derive(Clone, Debug, Default)]
pub struct OracleStore {
    pub params: OracleParams,
    pub tracking: TrackingList,
    pub rates: ExchangeRateStore,
    pub prevotes: BTreeMap<ValidatorAddr, AggregatePrevote>,
    pub votes: BTreeMap<ValidatorAddr, AggregateVote>,
    pub feeders: BTreeMap<ValidatorAddr, AccountAddr>,
    pub performance: PerformanceBook,
    pub history: PriceHistory,
    /// Height of the last completed period close.
    pub last_close_height: Option<u64>,
}

impl OracleStore {
    pub fn with_params(params: OracleParams) -> Self {
        Self {
            params,
            ..Default::default()
        }
    }

    /// The address authorized to submit for `validator`: its delegate if
    /// one is set, else the validator's own account.
    pub fn resolve_feeder(&self, validator: &ValidatorAddr) -> AccountAddr {
        self.feeders
            .get(validator)
            .cloned()
            .unwrap_or_else(|| validator.account())
    }
}

/// Encapsulates the mutable state of the oracle service.
pub struct OracleState {
    pub store: RwLock<OracleStore>,
}

impl OracleState {
    pub fn new(params: OracleParams) -> Self {
        Self {
            store: RwLock::new(OracleStore::with_params(params)),
        }
    }
}
