//! Tracking list and governance decisions
//!
//! The set of denominations eligible for voting is mutated only by finalized
//! governance decisions. The mutation itself is a pure function from
//! (current list, decision) to the denoms actually added or removed, applied
//! by the service inside its state lock.

use oracle_types::{AccountAddr, Denom};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One tracked denomination, optionally restricted to a feeder whitelist.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingEntry {
    pub denom: Denom,
    /// When present, only these feeder accounts may include the denom in a
    /// vote.
    pub whitelist: Option<Vec<AccountAddr>>,
}

impl TrackingEntry {
    pub fn open(denom: Denom) -> Self {
        Self {
            denom,
            whitelist: None,
        }
    }

    pub fn whitelisted(denom: Denom, feeders: Vec<AccountAddr>) -> Self {
        Self {
            denom,
            whitelist: Some(feeders),
        }
    }

    /// Whether `feeder` may vote on this denom.
    pub fn permits(&self, feeder: &AccountAddr) -> bool {
        match &self.whitelist {
            Some(list) => list.contains(feeder),
            None => true,
        }
    }
}

/// A finalized governance decision affecting the tracking list.
///
/// Only the decision content arrives here; proposal submission and voting
/// happen in the governance collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackingDecision {
    /// Start tracking denoms, open to any registered feeder.
    AddDenoms(Vec<Denom>),
    /// Start tracking denoms, each restricted to a feeder whitelist.
    AddDenomsWithWhitelist(Vec<TrackingEntry>),
    /// Stop tracking denoms.
    RemoveDenoms(Vec<Denom>),
}

/// Outcome of applying a decision: what actually changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrackingDelta {
    pub added: Vec<Denom>,
    pub removed: Vec<Denom>,
}

/// The set of denominations currently eligible for voting.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingList {
    entries: BTreeMap<Denom, TrackingEntry>,
}

impl TrackingList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, denom: &Denom) -> bool {
        self.entries.contains_key(denom)
    }

    pub fn get(&self, denom: &Denom) -> Option<&TrackingEntry> {
        self.entries.get(denom)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tracked entries in canonical denom order.
    pub fn entries(&self) -> impl Iterator<Item = &TrackingEntry> {
        self.entries.values()
    }

    /// Tracked denoms in canonical order.
    pub fn denoms(&self) -> Vec<Denom> {
        self.entries.keys().cloned().collect()
    }

    /// Remove a single denom; returns whether it was present.
    pub fn remove(&mut self, denom: &Denom) -> bool {
        self.entries.remove(denom).is_some()
    }

    /// Apply a finalized governance decision.
    ///
    /// Idempotent with respect to already-present or already-absent entries:
    /// re-adding a tracked denom or removing an untracked one is a no-op and
    /// does not appear in the returned delta. Adding an already-tracked denom
    /// with a whitelist does NOT overwrite the existing entry.
    pub fn apply(&mut self, decision: TrackingDecision) -> TrackingDelta {
        let mut delta = TrackingDelta::default();
        match decision {
            TrackingDecision::AddDenoms(denoms) => {
                for denom in denoms {
                    if !self.entries.contains_key(&denom) {
                        self.entries
                            .insert(denom.clone(), TrackingEntry::open(denom.clone()));
                        delta.added.push(denom);
                    }
                }
            }
            TrackingDecision::AddDenomsWithWhitelist(entries) => {
                for entry in entries {
                    if !self.entries.contains_key(&entry.denom) {
                        delta.added.push(entry.denom.clone());
                        self.entries.insert(entry.denom.clone(), entry);
                    }
                }
            }
            TrackingDecision::RemoveDenoms(denoms) => {
                for denom in denoms {
                    if self.entries.remove(&denom).is_some() {
                        delta.removed.push(denom);
                    }
                }
            }
        }
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn denom(s: &str) -> Denom {
        Denom::new(s)
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut list = TrackingList::new();

        let first = list.apply(TrackingDecision::AddDenoms(vec![denom("JUNO"), denom("ATOM")]));
        assert_eq!(first.added.len(), 2);

        let second = list.apply(TrackingDecision::AddDenoms(vec![denom("JUNO")]));
        assert!(second.added.is_empty());
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_remove_untracked_is_noop() {
        let mut list = TrackingList::new();
        let delta = list.apply(TrackingDecision::RemoveDenoms(vec![denom("JUNO")]));
        assert!(delta.removed.is_empty());
    }

    #[test]
    fn test_whitelist_restricts_feeders() {
        let mut list = TrackingList::new();
        let allowed = AccountAddr::new("feeder1");
        let outsider = AccountAddr::new("feeder2");

        list.apply(TrackingDecision::AddDenomsWithWhitelist(vec![
            TrackingEntry::whitelisted(denom("JUNO"), vec![allowed.clone()]),
        ]));

        let entry = list.get(&denom("JUNO")).unwrap();
        assert!(entry.permits(&allowed));
        assert!(!entry.permits(&outsider));
    }

    #[test]
    fn test_whitelist_add_does_not_overwrite_existing_entry() {
        let mut list = TrackingList::new();
        list.apply(TrackingDecision::AddDenoms(vec![denom("JUNO")]));

        let delta = list.apply(TrackingDecision::AddDenomsWithWhitelist(vec![
            TrackingEntry::whitelisted(denom("JUNO"), vec![AccountAddr::new("feeder1")]),
        ]));

        assert!(delta.added.is_empty());
        // Still open to everyone.
        assert!(list
            .get(&denom("JUNO"))
            .unwrap()
            .permits(&AccountAddr::new("anyone")));
    }
}
