//! Commit-reveal vote records
//!
//! A validator first submits an aggregate *prevote*: a truncated SHA-256
//! digest over its future rate submission. One vote period later it reveals
//! the rates and the salt; the reveal is accepted only if it reproduces the
//! committed digest. The split stops validators from copying each other's
//! rates within a period.

use crate::domain::{OracleError, OracleResult};
use oracle_types::{Denom, ValidatorAddr, VoteHash, VOTE_HASH_LEN};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fmt;

/// Maximum accepted salt length in bytes.
pub const MAX_SALT_LEN: usize = 64;

/// One denom's rate inside an aggregate vote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenomRate {
    pub denom: Denom,
    pub rate: Decimal,
}

impl DenomRate {
    pub fn new(denom: Denom, rate: Decimal) -> Self {
        Self { denom, rate }
    }
}

impl fmt::Display for DenomRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.denom, self.rate)
    }
}

/// Hashed commitment to a future aggregate rate submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatePrevote {
    pub validator: ValidatorAddr,
    pub hash: VoteHash,
    pub submit_height: u64,
}

/// Revealed aggregate rate submission, already hash-checked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateVote {
    pub validator: ValidatorAddr,
    pub rates: Vec<DenomRate>,
    pub submit_height: u64,
}

impl AggregateVote {
    /// The revealed rate for `denom`, if any.
    pub fn rate_for(&self, denom: &Denom) -> Option<Decimal> {
        self.rates
            .iter()
            .find(|dr| &dr.denom == denom)
            .map(|dr| dr.rate)
    }
}

/// Canonical string form of a rate list: `denom1:rate1,denom2:rate2`.
///
/// Submission order is preserved; the submitter commits to exactly this
/// rendering, so both sides must produce it byte-identically.
pub fn rates_to_canonical(rates: &[DenomRate]) -> String {
    rates
        .iter()
        .map(DenomRate::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Compute the commitment digest over `salt:rates:validator`.
pub fn vote_hash(salt: &str, rates: &[DenomRate], validator: &ValidatorAddr) -> VoteHash {
    let source = format!("{}:{}:{}", salt, rates_to_canonical(rates), validator);
    let digest = Sha256::digest(source.as_bytes());
    let mut truncated = [0u8; VOTE_HASH_LEN];
    truncated.copy_from_slice(&digest[..VOTE_HASH_LEN]);
    VoteHash::from_bytes(truncated)
}

/// Validate a salt string: non-empty, bounded, printable ASCII.
pub fn validate_salt(salt: &str) -> OracleResult<()> {
    if salt.is_empty() {
        return Err(OracleError::InvalidSalt("salt must not be empty".into()));
    }
    if salt.len() > MAX_SALT_LEN {
        return Err(OracleError::InvalidSalt(format!(
            "salt exceeds {} bytes",
            MAX_SALT_LEN
        )));
    }
    if !salt.chars().all(|c| c.is_ascii_graphic()) {
        return Err(OracleError::InvalidSalt(
            "salt must be printable ASCII".into(),
        ));
    }
    Ok(())
}

/// Validate a revealed rate list: non-empty, strictly positive rates, no
/// duplicate denoms.
pub fn validate_rates(rates: &[DenomRate]) -> OracleResult<()> {
    if rates.is_empty() {
        return Err(OracleError::InvalidExchangeRate {
            denom: Denom::new(""),
            reason: "vote must name at least one denom".into(),
        });
    }
    let mut seen = BTreeSet::new();
    for dr in rates {
        if dr.rate <= Decimal::ZERO {
            return Err(OracleError::InvalidExchangeRate {
                denom: dr.denom.clone(),
                reason: format!("rate must be strictly positive, got {}", dr.rate),
            });
        }
        if !seen.insert(dr.denom.clone()) {
            return Err(OracleError::InvalidExchangeRate {
                denom: dr.denom.clone(),
                reason: "duplicate denom in submission".into(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn voter() -> ValidatorAddr {
        ValidatorAddr::new("valoper1aaa")
    }

    fn rates() -> Vec<DenomRate> {
        vec![
            DenomRate::new(Denom::new("JUNO"), dec!(10.0)),
            DenomRate::new(Denom::new("ATOM"), dec!(11.5)),
        ]
    }

    #[test]
    fn test_vote_hash_is_deterministic() {
        let a = vote_hash("salt", &rates(), &voter());
        let b = vote_hash("salt", &rates(), &voter());
        assert_eq!(a, b);
    }

    #[test]
    fn test_vote_hash_binds_salt_rates_and_voter() {
        let base = vote_hash("salt", &rates(), &voter());

        assert_ne!(base, vote_hash("other", &rates(), &voter()));
        assert_ne!(base, vote_hash("salt", &rates(), &ValidatorAddr::new("valoper1bbb")));

        let mut changed = rates();
        changed[0].rate = dec!(10.1);
        assert_ne!(base, vote_hash("salt", &changed, &voter()));
    }

    #[test]
    fn test_canonical_rendering() {
        assert_eq!(rates_to_canonical(&rates()), "JUNO:10.0,ATOM:11.5");
    }

    #[test]
    fn test_salt_bounds() {
        assert!(validate_salt("abcd").is_ok());
        assert!(validate_salt("").is_err());
        assert!(validate_salt(&"x".repeat(MAX_SALT_LEN + 1)).is_err());
        assert!(validate_salt("has space").is_err());
    }

    #[test]
    fn test_rate_validation() {
        assert!(validate_rates(&rates()).is_ok());

        let zero = vec![DenomRate::new(Denom::new("JUNO"), dec!(0))];
        assert!(validate_rates(&zero).is_err());

        let dup = vec![
            DenomRate::new(Denom::new("JUNO"), dec!(1)),
            DenomRate::new(Denom::new("JUNO"), dec!(2)),
        ];
        assert!(validate_rates(&dup).is_err());

        assert!(validate_rates(&[]).is_err());
    }
}
