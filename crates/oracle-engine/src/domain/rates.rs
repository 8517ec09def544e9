//! Latest accepted exchange rates
//!
//! One entry per tracked denom, written only by the period-close tally and
//! read by every other chain module needing a price. A denom with no
//! accepted ballot has no entry at all — never a zero rate.

use oracle_types::Denom;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The canonical rate for one denom.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub denom: Denom,
    pub rate: Decimal,
    pub last_update_height: u64,
}

/// Latest accepted rate per denom.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ExchangeRateStore {
    rates: BTreeMap<Denom, ExchangeRate>,
}

impl ExchangeRateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, denom: &Denom) -> Option<&ExchangeRate> {
        self.rates.get(denom)
    }

    pub fn set(&mut self, denom: Denom, rate: Decimal, height: u64) {
        debug_assert!(rate > Decimal::ZERO);
        self.rates.insert(
            denom.clone(),
            ExchangeRate {
                denom,
                rate,
                last_update_height: height,
            },
        );
    }

    pub fn remove(&mut self, denom: &Denom) -> Option<ExchangeRate> {
        self.rates.remove(denom)
    }

    /// All rates in canonical denom order.
    pub fn all(&self) -> Vec<ExchangeRate> {
        self.rates.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_set_then_get() {
        let mut store = ExchangeRateStore::new();
        store.set(Denom::new("JUNO"), dec!(10.0), 42);

        let rate = store.get(&Denom::new("JUNO")).unwrap();
        assert_eq!(rate.rate, dec!(10.0));
        assert_eq!(rate.last_update_height, 42);
    }

    #[test]
    fn test_absent_denom_has_no_entry() {
        let store = ExchangeRateStore::new();
        assert!(store.get(&Denom::new("JUNO")).is_none());
    }

    #[test]
    fn test_remove() {
        let mut store = ExchangeRateStore::new();
        store.set(Denom::new("JUNO"), dec!(10.0), 42);
        assert!(store.remove(&Denom::new("JUNO")).is_some());
        assert!(store.is_empty());
    }
}
