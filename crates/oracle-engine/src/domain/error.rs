//! Error types for the oracle engine

use oracle_types::{AccountAddr, Denom, ValidatorAddr, VoteHash};

/// Oracle error taxonomy.
///
/// Authorization and protocol-violation variants reject a single submission
/// without touching any other validator's state. `NonMonotonicTimestamp` is
/// a data-integrity failure and aborts the period close that raised it.
/// Quorum shortfall is deliberately NOT an error: a denom without consensus
/// is a normal tally outcome reported in the period summary.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OracleError {
    #[error("Signer {signer} is not the registered feeder for {validator}")]
    UnauthorizedSigner {
        signer: AccountAddr,
        validator: ValidatorAddr,
    },

    #[error("Unknown validator: {0} is not in the bonded set")]
    UnknownValidator(ValidatorAddr),

    #[error("Duplicate submission: {validator} already has a live prevote this period")]
    DuplicateSubmission { validator: ValidatorAddr },

    #[error("No prevote from {validator} matching period {expected_period}")]
    NoMatchingPrevote {
        validator: ValidatorAddr,
        expected_period: u64,
    },

    #[error("Reveal does not match commitment: expected {expected}, got {actual}")]
    HashMismatch {
        expected: VoteHash,
        actual: VoteHash,
    },

    #[error("Denom {0} is not in the tracking list")]
    UntrackedDenom(Denom),

    #[error("Feeder {feeder} is not whitelisted for denom {denom}")]
    WhitelistViolation { feeder: AccountAddr, denom: Denom },

    #[error("Invalid exchange rate for {denom}: {reason}")]
    InvalidExchangeRate { denom: Denom, reason: String },

    #[error("Invalid salt: {0}")]
    InvalidSalt(String),

    #[error("Non-monotonic timestamp for {denom}: {actual} < last stored {last}")]
    NonMonotonicTimestamp {
        denom: Denom,
        last: u64,
        actual: u64,
    },

    #[error("Insufficient price history for {denom} at {at}")]
    InsufficientHistory { denom: Denom, at: u64 },

    #[error("Invalid time range: start {start} must precede end {end}")]
    InvalidTimeRange { start: u64, end: u64 },

    #[error("Invalid oracle params: {0}")]
    InvalidParams(String),

    #[error("Period close out of order: height {actual} not beyond last close {last}")]
    NonMonotonicHeight { last: u64, actual: u64 },

    #[error("Staking collaborator failure: {0}")]
    StakingFailure(String),
}

/// Result type for oracle operations.
pub type OracleResult<T> = Result<T, OracleError>;
