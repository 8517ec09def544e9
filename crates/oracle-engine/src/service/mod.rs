//! Oracle service — core business logic
//!
//! Wires the domain algorithms over the outbound ports. Submissions are
//! validated against the store under its lock; the period close builds the
//! next store state on a working copy and commits it by swap, so a failed
//! close leaves no partial mutation behind. Slashing and event publication
//! run after the commit: they affect collaborators, not oracle state, and a
//! failed slash call is surfaced in the summary rather than rolled back.

use crate::domain::{
    tally_ballot, validate_rates, validate_salt, vote_hash, AggregatePrevote, AggregateVote,
    Ballot, BallotOutcome, DenomRate, ExchangeRate, OracleError, OracleParams, OracleResult,
    OracleStatus, PeriodSummary, PricePoint, SlashWindowProgress, TrackingDecision,
    TrackingDelta, TrackingEntry, VoteForTally,
};
use crate::events::{ExchangeRateUpdatedEvent, PeriodClosedEvent, ValidatorSlashedEvent};
use crate::ports::{BondedValidator, EventBus, OracleApi, StakingKeeper};
use crate::state::OracleState;
use async_trait::async_trait;
use oracle_types::{AccountAddr, Denom, PageRequest, PageResponse, ValidatorAddr, VoteHash};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Dependencies for `OracleService`.
pub struct OracleDependencies<S, E>
where
    S: StakingKeeper,
    E: EventBus,
{
    pub staking: Arc<S>,
    pub event_bus: Arc<E>,
    pub params: OracleParams,
}

/// The oracle engine over its ports.
pub struct OracleService<S, E>
where
    S: StakingKeeper,
    E: EventBus,
{
    staking: Arc<S>,
    event_bus: Arc<E>,
    state: OracleState,
}

impl<S, E> OracleService<S, E>
where
    S: StakingKeeper,
    E: EventBus,
{
    /// Create a new `OracleService`. Fails if the parameters are invalid.
    pub fn new(deps: OracleDependencies<S, E>) -> OracleResult<Self> {
        deps.params.validate()?;
        Ok(Self {
            staking: deps.staking,
            event_bus: deps.event_bus,
            state: OracleState::new(deps.params),
        })
    }

    async fn bonded(&self) -> OracleResult<Vec<BondedValidator>> {
        self.staking
            .bonded_validators()
            .await
            .map_err(OracleError::StakingFailure)
    }

    fn require_bonded(
        bonded: &[BondedValidator],
        validator: &ValidatorAddr,
    ) -> OracleResult<()> {
        if bonded.iter().any(|b| &b.operator == validator) {
            Ok(())
        } else {
            Err(OracleError::UnknownValidator(validator.clone()))
        }
    }
}

#[async_trait]
impl<S, E> OracleApi for OracleService<S, E>
where
    S: StakingKeeper,
    E: EventBus,
{
    async fn submit_prevote(
        &self,
        signer: AccountAddr,
        validator: ValidatorAddr,
        hash: VoteHash,
        height: u64,
    ) -> OracleResult<()> {
        let bonded = self.bonded().await?;
        Self::require_bonded(&bonded, &validator)?;

        let mut store = self.state.store.write();
        let feeder = store.resolve_feeder(&validator);
        if signer != feeder {
            return Err(OracleError::UnauthorizedSigner { signer, validator });
        }

        let period = store.params.period_index(height);
        if let Some(existing) = store.prevotes.get(&validator) {
            // A stale unrevealed prevote from an earlier period may be
            // replaced; a second commit within the same period may not.
            if store.params.period_index(existing.submit_height) == period {
                return Err(OracleError::DuplicateSubmission { validator });
            }
        }

        debug!(validator = %validator, %hash, height, "prevote accepted");
        store.prevotes.insert(
            validator.clone(),
            AggregatePrevote {
                validator,
                hash,
                submit_height: height,
            },
        );
        Ok(())
    }

    async fn submit_vote(
        &self,
        signer: AccountAddr,
        validator: ValidatorAddr,
        rates: Vec<DenomRate>,
        salt: String,
        height: u64,
    ) -> OracleResult<()> {
        validate_salt(&salt)?;
        validate_rates(&rates)?;

        let bonded = self.bonded().await?;
        Self::require_bonded(&bonded, &validator)?;

        let mut store = self.state.store.write();
        let feeder = store.resolve_feeder(&validator);
        if signer != feeder {
            return Err(OracleError::UnauthorizedSigner { signer, validator });
        }

        for dr in &rates {
            let entry = store
                .tracking
                .get(&dr.denom)
                .ok_or_else(|| OracleError::UntrackedDenom(dr.denom.clone()))?;
            if !entry.permits(&signer) {
                return Err(OracleError::WhitelistViolation {
                    feeder: signer,
                    denom: dr.denom.clone(),
                });
            }
        }

        let current_period = store.params.period_index(height);
        let (expected_hash, prevote_height) = match store.prevotes.get(&validator) {
            Some(prevote) => (prevote.hash, prevote.submit_height),
            None => {
                return Err(OracleError::NoMatchingPrevote {
                    validator,
                    expected_period: current_period.saturating_sub(1),
                })
            }
        };
        if store.params.period_index(prevote_height) + 1 != current_period {
            return Err(OracleError::NoMatchingPrevote {
                validator,
                expected_period: current_period.saturating_sub(1),
            });
        }

        let actual = vote_hash(&salt, &rates, &validator);
        if actual != expected_hash {
            return Err(OracleError::HashMismatch {
                expected: expected_hash,
                actual,
            });
        }

        debug!(validator = %validator, denoms = rates.len(), height, "vote revealed");
        store.prevotes.remove(&validator);
        store.votes.insert(
            validator.clone(),
            AggregateVote {
                validator,
                rates,
                submit_height: height,
            },
        );
        Ok(())
    }

    async fn set_feeder(
        &self,
        signer: AccountAddr,
        validator: ValidatorAddr,
        delegate: AccountAddr,
    ) -> OracleResult<()> {
        let bonded = self.bonded().await?;
        Self::require_bonded(&bonded, &validator)?;

        // Only the validator's own key may delegate.
        if signer != validator.account() {
            return Err(OracleError::UnauthorizedSigner { signer, validator });
        }

        info!(validator = %validator, delegate = %delegate, "feeder delegation set");
        self.state
            .store
            .write()
            .feeders
            .insert(validator, delegate);
        Ok(())
    }

    async fn on_period_end(&self, height: u64, timestamp: u64) -> OracleResult<PeriodSummary> {
        let bonded = self.bonded().await?;

        // Phase 1: tally and mutate, all-or-nothing on a working copy.
        let (mut summary, delinquents, slash_fraction, window_closed) = {
            let mut guard = self.state.store.write();
            let mut working = guard.clone();

            if let Some(last) = working.last_close_height {
                if height <= last {
                    return Err(OracleError::NonMonotonicHeight {
                        last,
                        actual: height,
                    });
                }
            }

            let params = working.params.clone();
            let expected: Vec<&BondedValidator> = bonded
                .iter()
                .filter(|b| b.power >= params.min_voting_power)
                .filter(|b| working.performance.status(&b.operator) != OracleStatus::Slashed)
                .collect();
            let total_power: u64 = expected.iter().map(|b| b.power).sum();
            let power_of: BTreeMap<&ValidatorAddr, u64> =
                expected.iter().map(|b| (&b.operator, b.power)).collect();

            let mut ballots: BTreeMap<Denom, Ballot> = BTreeMap::new();
            for (validator, vote) in &working.votes {
                let Some(&power) = power_of.get(validator) else {
                    continue;
                };
                for dr in &vote.rates {
                    // Tracking may have changed since the reveal.
                    if working.tracking.contains(&dr.denom) {
                        ballots
                            .entry(dr.denom.clone())
                            .or_default()
                            .push(VoteForTally::new(validator.clone(), dr.rate, power));
                    }
                }
            }

            let had_tracked = !working.tracking.is_empty();
            let mut summary = PeriodSummary {
                height,
                ..Default::default()
            };
            let mut hits: BTreeSet<ValidatorAddr> = BTreeSet::new();

            for denom in working.tracking.denoms() {
                match ballots.remove(&denom) {
                    None => {
                        // Zero votes: previous rate stays (stale), no
                        // history point.
                        if params.prune_stale_denoms {
                            working.tracking.remove(&denom);
                            working.rates.remove(&denom);
                            summary.pruned.push(denom);
                        }
                    }
                    Some(ballot) => match tally_ballot(
                        ballot,
                        params.reward_band,
                        params.vote_threshold,
                        total_power,
                    ) {
                        BallotOutcome::NoConsensus => {
                            debug!(denom = %denom, height, "quorum shortfall, no update");
                            summary.no_consensus.push(denom);
                        }
                        BallotOutcome::Consensus(tally) => {
                            working.rates.set(denom.clone(), tally.median, height);
                            working.history.append(&denom, timestamp, tally.median)?;
                            hits.extend(tally.winners.iter().cloned());
                            summary.updated.push(ExchangeRate {
                                denom,
                                rate: tally.median,
                                last_update_height: height,
                            });
                        }
                    },
                }
            }

            // A validator misses iff it was expected to vote and won
            // nothing. With nothing tracked there is nothing to vote on, so
            // nobody misses.
            if had_tracked {
                for b in &expected {
                    if !hits.contains(&b.operator) {
                        working.performance.record_miss(&b.operator);
                        summary.misses.push(b.operator.clone());
                    }
                }
            }

            working
                .history
                .prune_all(timestamp.saturating_sub(params.price_retention_secs));

            let window_closed = params.is_window_boundary(height);
            let delinquents = if window_closed {
                working
                    .performance
                    .close_window(params.slash_window, params.min_valid_per_window)
            } else {
                Vec::new()
            };

            let bonded_operators: Vec<ValidatorAddr> =
                bonded.iter().map(|b| b.operator.clone()).collect();
            working.performance.retain_validators(&bonded_operators);

            // Votes are spent; prevotes committed this period survive for
            // next period's reveal, older ones can never match again.
            working.votes.clear();
            let current_period = params.period_index(height);
            working
                .prevotes
                .retain(|_, pv| params.period_index(pv.submit_height) == current_period);
            working.last_close_height = Some(height);

            *guard = working;
            (summary, delinquents, params.slash_fraction, window_closed)
        };

        // Phase 2: collaborator effects, outside the lock.
        for validator in delinquents {
            match self.staking.slash(&validator, slash_fraction).await {
                Ok(()) => {
                    info!(validator = %validator, %slash_fraction, height, "validator slashed");
                    summary.slashed.push(validator);
                }
                Err(reason) => {
                    warn!(validator = %validator, %reason, "slash request failed");
                    summary.slash_errors.push((validator, reason));
                }
            }
        }

        if window_closed {
            let mut guard = self.state.store.write();
            for validator in &summary.slashed {
                guard.performance.mark_slashed(validator);
            }
            guard.performance.reactivate_all();
        }

        for rate in &summary.updated {
            let event = ExchangeRateUpdatedEvent::new(
                rate.denom.clone(),
                rate.rate,
                height,
                timestamp,
            );
            if let Err(reason) = self.event_bus.publish_exchange_rate_updated(event).await {
                warn!(denom = %rate.denom, %reason, "event bus publish failed");
            }
        }
        for validator in &summary.slashed {
            let event = ValidatorSlashedEvent::new(validator.clone(), slash_fraction, height);
            if let Err(reason) = self.event_bus.publish_validator_slashed(event).await {
                warn!(validator = %validator, %reason, "event bus publish failed");
            }
        }
        let closed = PeriodClosedEvent::new(summary.clone());
        if let Err(reason) = self.event_bus.publish_period_closed(closed).await {
            warn!(height, %reason, "event bus publish failed");
        }

        info!(
            height,
            updated = summary.updated.len(),
            no_consensus = summary.no_consensus.len(),
            misses = summary.misses.len(),
            slashed = summary.slashed.len(),
            "voting period closed"
        );
        Ok(summary)
    }

    async fn apply_tracking_decision(
        &self,
        decision: TrackingDecision,
    ) -> OracleResult<TrackingDelta> {
        let mut store = self.state.store.write();
        let delta = store.tracking.apply(decision);

        // A removed denom loses its live rate; history is an immutable
        // record and stays.
        for denom in &delta.removed {
            store.rates.remove(denom);
        }

        info!(
            added = delta.added.len(),
            removed = delta.removed.len(),
            "tracking decision applied"
        );
        Ok(delta)
    }

    fn params(&self) -> OracleParams {
        self.state.store.read().params.clone()
    }

    fn exchange_rates(&self, denom: Option<Denom>) -> Vec<ExchangeRate> {
        let store = self.state.store.read();
        match denom {
            Some(denom) => store.rates.get(&denom).cloned().into_iter().collect(),
            None => store.rates.all(),
        }
    }

    fn aggregate_prevote(&self, validator: Option<ValidatorAddr>) -> Vec<AggregatePrevote> {
        let store = self.state.store.read();
        match validator {
            Some(v) => store.prevotes.get(&v).cloned().into_iter().collect(),
            None => store.prevotes.values().cloned().collect(),
        }
    }

    fn aggregate_vote(&self, validator: Option<ValidatorAddr>) -> Vec<AggregateVote> {
        let store = self.state.store.read();
        match validator {
            Some(v) => store.votes.get(&v).cloned().into_iter().collect(),
            None => store.votes.values().cloned().collect(),
        }
    }

    fn feeder_delegation(&self, validator: &ValidatorAddr) -> AccountAddr {
        self.state.store.read().resolve_feeder(validator)
    }

    fn miss_counter(&self, validator: &ValidatorAddr) -> u64 {
        self.state.store.read().performance.miss_counter(validator)
    }

    fn slash_window_progress(&self, height: u64) -> SlashWindowProgress {
        let store = self.state.store.read();
        SlashWindowProgress {
            elapsed_periods: store.params.window_progress(height),
            window_periods: store.params.slash_window,
        }
    }

    fn price_history(
        &self,
        denom: &Denom,
        page: PageRequest,
    ) -> (Vec<PricePoint>, PageResponse) {
        self.state.store.read().history.page(denom, page)
    }

    fn price_at(&self, denom: &Denom, timestamp: u64) -> OracleResult<PricePoint> {
        self.state.store.read().history.price_at(denom, timestamp)
    }

    fn tracking_list(&self) -> Vec<TrackingEntry> {
        self.state
            .store
            .read()
            .tracking
            .entries()
            .cloned()
            .collect()
    }

    fn twap(&self, denom: &Denom, start: u64, end: u64) -> OracleResult<Decimal> {
        let store = self.state.store.read();
        crate::domain::arithmetic_twap(&store.history, denom, start, end)
    }
}
