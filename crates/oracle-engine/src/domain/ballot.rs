//! Ballot tally: power-weighted median with tolerance band
//!
//! At period close every revealed vote naming a denom contributes
//! (rate, voting power) to that denom's ballot. The canonical rate is the
//! power-weighted median; votes inside a band around it are winners, votes
//! outside are misses. If winners do not carry quorum, the denom gets no
//! update this period and nobody is credited either way.
//!
//! Determinism: every node must tally an identical ballot to an identical
//! result, so votes are ordered by (rate, voter address) before the median
//! walk. Address order breaks rate ties.

use oracle_types::ValidatorAddr;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One vote inside a denom's ballot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteForTally {
    pub voter: ValidatorAddr,
    pub rate: Decimal,
    pub power: u64,
}

impl VoteForTally {
    pub fn new(voter: ValidatorAddr, rate: Decimal, power: u64) -> Self {
        Self { voter, rate, power }
    }
}

/// The set of votes for one denomination in one period.
#[derive(Clone, Debug, Default)]
pub struct Ballot {
    votes: Vec<VoteForTally>,
}

impl Ballot {
    pub fn new(votes: Vec<VoteForTally>) -> Self {
        Self { votes }
    }

    pub fn push(&mut self, vote: VoteForTally) {
        self.votes.push(vote);
    }

    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    /// Total power behind the ballot.
    pub fn total_power(&self) -> u64 {
        self.votes.iter().map(|v| v.power).sum()
    }

    /// Sort into canonical tally order: rate ascending, voter address as
    /// tie-break.
    fn sort_canonical(&mut self) {
        self.votes
            .sort_by(|a, b| a.rate.cmp(&b.rate).then_with(|| a.voter.cmp(&b.voter)));
    }

    /// Power-weighted median: the first rate (in canonical order) at which
    /// cumulative power reaches half the ballot's total power.
    pub fn weighted_median(&mut self) -> Option<Decimal> {
        if self.votes.is_empty() {
            return None;
        }
        self.sort_canonical();

        let total = self.total_power() as u128;
        let mut cumulative: u128 = 0;
        for vote in &self.votes {
            cumulative += vote.power as u128;
            if cumulative * 2 >= total {
                return Some(vote.rate);
            }
        }
        // Unreachable: cumulative reaches total on the last vote.
        self.votes.last().map(|v| v.rate)
    }
}

/// Classified result of one denom's tally.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BallotOutcome {
    /// Winners carried quorum; the weighted median is the canonical rate.
    Consensus(BallotTally),
    /// Winner power fell short of quorum, or the ballot was empty. No rate
    /// update, no hits, no misses for this denom.
    NoConsensus,
}

/// Winning median plus per-validator classification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BallotTally {
    pub median: Decimal,
    pub winner_power: u64,
    /// Voters whose rate fell inside the tolerance band.
    pub winners: BTreeSet<ValidatorAddr>,
    /// Voters whose rate fell outside the band.
    pub misses: BTreeSet<ValidatorAddr>,
}

/// Tally one denom's ballot.
///
/// `reward_band` is the governed full band width (winners lie within
/// ±band/2 of the median). `vote_threshold` × `total_bonded_power` is the
/// quorum winners must carry.
pub fn tally_ballot(
    mut ballot: Ballot,
    reward_band: Decimal,
    vote_threshold: Decimal,
    total_bonded_power: u64,
) -> BallotOutcome {
    let median = match ballot.weighted_median() {
        Some(m) => m,
        None => return BallotOutcome::NoConsensus,
    };

    let spread = median * reward_band / Decimal::TWO;
    let mut winners = BTreeSet::new();
    let mut misses = BTreeSet::new();
    let mut winner_power: u64 = 0;

    for vote in &ballot.votes {
        let deviation = (vote.rate - median).abs();
        if deviation <= spread {
            winner_power += vote.power;
            winners.insert(vote.voter.clone());
        } else {
            misses.insert(vote.voter.clone());
        }
    }

    let quorum = vote_threshold * Decimal::from(total_bonded_power);
    if Decimal::from(winner_power) < quorum {
        return BallotOutcome::NoConsensus;
    }

    BallotOutcome::Consensus(BallotTally {
        median,
        winner_power,
        winners,
        misses,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn vote(addr: &str, rate: Decimal, power: u64) -> VoteForTally {
        VoteForTally::new(ValidatorAddr::new(addr), rate, power)
    }

    #[test]
    fn test_weighted_median_simple() {
        let mut ballot = Ballot::new(vec![
            vote("valoper1a", dec!(10.0), 5),
            vote("valoper1b", dec!(10.1), 3),
            vote("valoper1c", dec!(50.0), 2),
        ]);
        // Cumulative power 5 of 10 reaches 50% at the first sorted vote.
        assert_eq!(ballot.weighted_median(), Some(dec!(10.0)));
    }

    #[test]
    fn test_weighted_median_order_independent() {
        let votes = vec![
            vote("valoper1a", dec!(10.0), 5),
            vote("valoper1b", dec!(10.1), 3),
            vote("valoper1c", dec!(50.0), 2),
        ];
        let mut forward = Ballot::new(votes.clone());
        let mut reversed = Ballot::new(votes.into_iter().rev().collect());
        assert_eq!(forward.weighted_median(), reversed.weighted_median());
    }

    #[test]
    fn test_weighted_median_tie_broken_by_address() {
        // Equal rates and powers: result must not depend on insertion order.
        let mut a = Ballot::new(vec![
            vote("valoper1b", dec!(2.0), 1),
            vote("valoper1a", dec!(1.0), 1),
        ]);
        let mut b = Ballot::new(vec![
            vote("valoper1a", dec!(1.0), 1),
            vote("valoper1b", dec!(2.0), 1),
        ]);
        assert_eq!(a.weighted_median(), b.weighted_median());
        assert_eq!(a.weighted_median(), Some(dec!(1.0)));
    }

    #[test]
    fn test_empty_ballot_has_no_median() {
        let mut ballot = Ballot::default();
        assert_eq!(ballot.weighted_median(), None);
    }

    #[test]
    fn test_tally_excludes_outlier_as_miss() {
        let ballot = Ballot::new(vec![
            vote("valoper1a", dec!(10.0), 5),
            vote("valoper1b", dec!(10.1), 3),
            vote("valoper1c", dec!(50.0), 2),
        ]);

        // 2% band around 10.0 admits [9.9, 10.1]; 50.0 is out.
        let outcome = tally_ballot(ballot, dec!(0.02), dec!(0.5), 10);
        let tally = match outcome {
            BallotOutcome::Consensus(t) => t,
            BallotOutcome::NoConsensus => panic!("expected consensus"),
        };

        assert_eq!(tally.median, dec!(10.0));
        assert_eq!(tally.winner_power, 8);
        assert!(tally.winners.contains(&ValidatorAddr::new("valoper1a")));
        assert!(tally.winners.contains(&ValidatorAddr::new("valoper1b")));
        assert!(tally.misses.contains(&ValidatorAddr::new("valoper1c")));
    }

    #[test]
    fn test_band_boundary_vote_is_winner() {
        let ballot = Ballot::new(vec![
            vote("valoper1a", dec!(100), 5),
            // Exactly median + band/2 = 101.
            vote("valoper1b", dec!(101), 5),
        ]);
        let outcome = tally_ballot(ballot, dec!(0.02), dec!(0.5), 10);
        match outcome {
            BallotOutcome::Consensus(t) => {
                assert_eq!(t.winners.len(), 2);
                assert!(t.misses.is_empty());
            }
            BallotOutcome::NoConsensus => panic!("expected consensus"),
        }
    }

    #[test]
    fn test_quorum_shortfall_yields_no_consensus() {
        // Winners carry 8 of 100 bonded power; threshold 0.5 requires 50.
        let ballot = Ballot::new(vec![
            vote("valoper1a", dec!(10.0), 5),
            vote("valoper1b", dec!(10.1), 3),
        ]);
        let outcome = tally_ballot(ballot, dec!(0.02), dec!(0.5), 100);
        assert_eq!(outcome, BallotOutcome::NoConsensus);
    }
}
