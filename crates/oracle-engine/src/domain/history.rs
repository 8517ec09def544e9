//! Accepted-rate time series
//!
//! Append-only per-denom history of tally results, keyed by block timestamp.
//! Timestamps are block-driven and must be monotone non-decreasing per denom;
//! a violation indicates a host bug and aborts the period close that raised
//! it. History survives a denom's removal from the tracking list: it is an
//! immutable record, not live state.

use crate::domain::{OracleError, OracleResult};
use oracle_types::{Denom, PageRequest, PageResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One accepted rate observation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: u64,
    pub rate: Decimal,
}

/// Per-denom append-only price series.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PriceHistory {
    series: BTreeMap<Denom, BTreeMap<u64, Decimal>>,
}

impl PriceHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an observation.
    ///
    /// Fails with `NonMonotonicTimestamp` if `timestamp` precedes the last
    /// stored timestamp for the denom. An equal timestamp replaces the
    /// stored rate (one observation per block time).
    pub fn append(&mut self, denom: &Denom, timestamp: u64, rate: Decimal) -> OracleResult<()> {
        let entries = self.series.entry(denom.clone()).or_default();
        if let Some((&last, _)) = entries.iter().next_back() {
            if timestamp < last {
                return Err(OracleError::NonMonotonicTimestamp {
                    denom: denom.clone(),
                    last,
                    actual: timestamp,
                });
            }
        }
        entries.insert(timestamp, rate);
        Ok(())
    }

    /// Remove entries strictly older than `before` for one denom.
    pub fn prune(&mut self, denom: &Denom, before: u64) {
        if let Some(entries) = self.series.get_mut(denom) {
            *entries = entries.split_off(&before);
        }
    }

    /// Remove entries strictly older than `before` across all denoms.
    pub fn prune_all(&mut self, before: u64) {
        for entries in self.series.values_mut() {
            *entries = entries.split_off(&before);
        }
    }

    /// The most recent observation at or before `timestamp`.
    pub fn price_at(&self, denom: &Denom, timestamp: u64) -> OracleResult<PricePoint> {
        self.series
            .get(denom)
            .and_then(|entries| entries.range(..=timestamp).next_back())
            .map(|(&timestamp, &rate)| PricePoint { timestamp, rate })
            .ok_or_else(|| OracleError::InsufficientHistory {
                denom: denom.clone(),
                at: timestamp,
            })
    }

    /// A page of a denom's history in timestamp order.
    pub fn page(&self, denom: &Denom, page: PageRequest) -> (Vec<PricePoint>, PageResponse) {
        let Some(entries) = self.series.get(denom) else {
            return (Vec::new(), PageResponse { total: 0 });
        };
        let points = entries
            .iter()
            .skip(page.offset)
            .take(page.limit)
            .map(|(&timestamp, &rate)| PricePoint { timestamp, rate })
            .collect();
        (points, PageResponse { total: entries.len() })
    }

    /// Full ordered series for one denom, if any.
    pub fn series(&self, denom: &Denom) -> Option<&BTreeMap<u64, Decimal>> {
        self.series.get(denom)
    }

    pub fn len(&self, denom: &Denom) -> usize {
        self.series.get(denom).map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self, denom: &Denom) -> bool {
        self.len(denom) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn juno() -> Denom {
        Denom::new("JUNO")
    }

    #[test]
    fn test_append_and_read_back() {
        let mut history = PriceHistory::new();
        history.append(&juno(), 100, dec!(10.0)).unwrap();
        history.append(&juno(), 200, dec!(10.5)).unwrap();

        let point = history.price_at(&juno(), 150).unwrap();
        assert_eq!(point.timestamp, 100);
        assert_eq!(point.rate, dec!(10.0));
    }

    #[test]
    fn test_rewinding_timestamp_rejected() {
        let mut history = PriceHistory::new();
        history.append(&juno(), 200, dec!(10.0)).unwrap();

        let err = history.append(&juno(), 100, dec!(11.0)).unwrap_err();
        assert_eq!(
            err,
            OracleError::NonMonotonicTimestamp {
                denom: juno(),
                last: 200,
                actual: 100,
            }
        );
    }

    #[test]
    fn test_equal_timestamp_replaces() {
        let mut history = PriceHistory::new();
        history.append(&juno(), 100, dec!(10.0)).unwrap();
        history.append(&juno(), 100, dec!(10.5)).unwrap();

        assert_eq!(history.len(&juno()), 1);
        assert_eq!(history.price_at(&juno(), 100).unwrap().rate, dec!(10.5));
    }

    #[test]
    fn test_price_at_before_first_entry_fails() {
        let mut history = PriceHistory::new();
        history.append(&juno(), 100, dec!(10.0)).unwrap();

        assert!(matches!(
            history.price_at(&juno(), 99),
            Err(OracleError::InsufficientHistory { .. })
        ));
    }

    #[test]
    fn test_prune_drops_strictly_older() {
        let mut history = PriceHistory::new();
        for (ts, rate) in [(100, dec!(1)), (200, dec!(2)), (300, dec!(3))] {
            history.append(&juno(), ts, rate).unwrap();
        }

        history.prune(&juno(), 200);

        assert_eq!(history.len(&juno()), 2);
        assert!(history.price_at(&juno(), 150).is_err());
        assert_eq!(history.price_at(&juno(), 200).unwrap().rate, dec!(2));
    }

    #[test]
    fn test_pagination() {
        let mut history = PriceHistory::new();
        for ts in 1..=10 {
            history.append(&juno(), ts, dec!(1)).unwrap();
        }

        let (points, meta) = history.page(&juno(), PageRequest::new(4, 3));
        assert_eq!(meta.total, 10);
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].timestamp, 5);
    }
}
