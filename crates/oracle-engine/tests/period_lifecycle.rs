//! End-to-end lifecycle: governance tracking, commit-reveal voting across
//! several periods, a slash-window boundary, and the query surface over the
//! produced history.

use async_trait::async_trait;
use oracle_engine::domain::{vote_hash, DenomRate};
use oracle_engine::{
    BondedValidator, InMemoryEventBus, OracleApi, OracleDependencies, OracleParams,
    OracleService, StakingKeeper, TrackingDecision,
};
use oracle_types::{Denom, PageRequest, ValidatorAddr};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

struct StaticStaking {
    validators: Vec<BondedValidator>,
    slash_calls: parking_lot::Mutex<Vec<ValidatorAddr>>,
}

impl StaticStaking {
    fn new(powers: &[(&str, u64)]) -> Self {
        Self {
            validators: powers
                .iter()
                .map(|(addr, power)| BondedValidator::new(ValidatorAddr::new(*addr), *power))
                .collect(),
            slash_calls: parking_lot::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl StakingKeeper for StaticStaking {
    async fn bonded_validators(&self) -> Result<Vec<BondedValidator>, String> {
        Ok(self.validators.clone())
    }

    async fn slash(&self, validator: &ValidatorAddr, _fraction: Decimal) -> Result<(), String> {
        self.slash_calls.lock().push(validator.clone());
        Ok(())
    }
}

async fn feed(
    service: &OracleService<StaticStaking, InMemoryEventBus>,
    validator: &ValidatorAddr,
    rate: Decimal,
    commit_height: u64,
) {
    let rates = vec![DenomRate::new(Denom::new("JUNO"), rate)];
    let salt = format!("s{}", commit_height);
    let hash = vote_hash(&salt, &rates, validator);
    service
        .submit_prevote(validator.account(), validator.clone(), hash, commit_height)
        .await
        .unwrap();
    service
        .submit_vote(
            validator.account(),
            validator.clone(),
            rates,
            salt,
            commit_height + 1,
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn full_lifecycle_across_slash_window() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();

    let staking = Arc::new(StaticStaking::new(&[
        ("valoper1a", 5),
        ("valoper1b", 3),
        ("valoper1c", 2),
    ]));
    let bus = Arc::new(InMemoryEventBus::new());
    let service = OracleService::new(OracleDependencies {
        staking: Arc::clone(&staking),
        event_bus: Arc::clone(&bus),
        params: OracleParams {
            vote_period: 1,
            vote_threshold: dec!(0.5),
            reward_band: dec!(0.02),
            slash_window: 4,
            min_valid_per_window: dec!(0.5),
            ..Default::default()
        },
    })
    .unwrap();

    service
        .apply_tracking_decision(TrackingDecision::AddDenoms(vec![Denom::new("juno")]))
        .await
        .unwrap();

    let a = ValidatorAddr::new("valoper1a");
    let b = ValidatorAddr::new("valoper1b");

    // Four periods (one slash window). valoper1a and valoper1b feed every
    // period; valoper1c never participates.
    let mut timestamp = 1_000;
    for commit_height in 0..4u64 {
        feed(&service, &a, dec!(10.0) + Decimal::from(commit_height), commit_height).await;
        feed(&service, &b, dec!(10.0) + Decimal::from(commit_height), commit_height).await;
        timestamp += 100;
        let summary = service
            .on_period_end(commit_height + 1, timestamp)
            .await
            .unwrap();
        assert_eq!(summary.updated.len(), 1);
        assert_eq!(summary.misses, vec![ValidatorAddr::new("valoper1c")]);
    }

    // Period 3 closed the window: only the silent validator is slashed.
    assert_eq!(
        staking.slash_calls.lock().clone(),
        vec![ValidatorAddr::new("valoper1c")]
    );
    assert_eq!(bus.slashes().len(), 1);
    // Counter was reset at the boundary (height 3); only the fourth period's
    // miss remains.
    assert_eq!(service.miss_counter(&ValidatorAddr::new("valoper1c")), 1);

    // Rates followed the feeds: last accepted rate is 13.0.
    let rates = service.exchange_rates(Some(Denom::new("JUNO")));
    assert_eq!(rates[0].rate, dec!(13.0));

    // History holds all four points; TWAP over a flat stretch is exact.
    let (points, meta) = service.price_history(&Denom::new("JUNO"), PageRequest::default());
    assert_eq!(meta.total, 4);
    assert_eq!(points.first().unwrap().rate, dec!(10.0));

    // Rate is 10.0 on [1100, 1200) and 11.0 on [1200, 1300).
    let twap = service.twap(&Denom::new("JUNO"), 1100, 1300).unwrap();
    assert_eq!(twap, dec!(10.5));

    // Published one rate update per period plus one period-close each.
    assert_eq!(bus.rate_updates().len(), 4);
    assert_eq!(bus.period_closes().len(), 4);
}
