//! Driving port (inbound API)
//!
//! The full surface the host drives: pre-authenticated submissions from the
//! transaction processor, the once-per-boundary period trigger from the
//! block lifecycle, finalized governance decisions, and the pure read
//! surface behind the query server.

use crate::domain::{
    AggregatePrevote, AggregateVote, DenomRate, ExchangeRate, OracleParams, OracleResult,
    PeriodSummary, PricePoint, SlashWindowProgress, TrackingDecision, TrackingDelta,
    TrackingEntry,
};
use async_trait::async_trait;
use oracle_types::{AccountAddr, Denom, PageRequest, PageResponse, ValidatorAddr, VoteHash};
use rust_decimal::Decimal;

/// The oracle engine's API.
///
/// `signer` arguments are pre-authenticated by the host's transaction
/// processing; the engine checks authorization (feeder resolution), not
/// authentication. All reads are pure and side-effect-free.
#[async_trait]
pub trait OracleApi: Send + Sync {
    // === Submissions ===

    /// Commit to a future rate reveal.
    async fn submit_prevote(
        &self,
        signer: AccountAddr,
        validator: ValidatorAddr,
        hash: VoteHash,
        height: u64,
    ) -> OracleResult<()>;

    /// Reveal rates against the prevote from the previous period.
    async fn submit_vote(
        &self,
        signer: AccountAddr,
        validator: ValidatorAddr,
        rates: Vec<DenomRate>,
        salt: String,
        height: u64,
    ) -> OracleResult<()>;

    /// Delegate (or reassign) vote submission to another account.
    async fn set_feeder(
        &self,
        signer: AccountAddr,
        validator: ValidatorAddr,
        delegate: AccountAddr,
    ) -> OracleResult<()>;

    // === Lifecycle ===

    /// Close the voting period ending at `height`. Invoked exactly once per
    /// period boundary by the block lifecycle.
    async fn on_period_end(&self, height: u64, timestamp: u64) -> OracleResult<PeriodSummary>;

    /// Apply a finalized governance decision to the tracking list.
    async fn apply_tracking_decision(
        &self,
        decision: TrackingDecision,
    ) -> OracleResult<TrackingDelta>;

    // === Reads ===

    fn params(&self) -> OracleParams;

    /// All rates, or just one denom's.
    fn exchange_rates(&self, denom: Option<Denom>) -> Vec<ExchangeRate>;

    /// Outstanding prevotes, optionally filtered to one validator.
    fn aggregate_prevote(&self, validator: Option<ValidatorAddr>) -> Vec<AggregatePrevote>;

    /// Outstanding votes, optionally filtered to one validator.
    fn aggregate_vote(&self, validator: Option<ValidatorAddr>) -> Vec<AggregateVote>;

    /// Current feeder for a validator (the validator itself if undelegated).
    fn feeder_delegation(&self, validator: &ValidatorAddr) -> AccountAddr;

    fn miss_counter(&self, validator: &ValidatorAddr) -> u64;

    /// Progress through the slash window containing `height`.
    fn slash_window_progress(&self, height: u64) -> SlashWindowProgress;

    fn price_history(
        &self,
        denom: &Denom,
        page: PageRequest,
    ) -> (Vec<PricePoint>, PageResponse);

    /// Most recent accepted rate at or before `timestamp`.
    fn price_at(&self, denom: &Denom, timestamp: u64) -> OracleResult<PricePoint>;

    fn tracking_list(&self) -> Vec<TrackingEntry>;

    /// Arithmetic TWAP over `[start, end)`.
    fn twap(&self, denom: &Denom, start: u64, end: u64) -> OracleResult<Decimal>;
}
