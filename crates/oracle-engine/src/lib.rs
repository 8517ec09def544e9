//! # oracle-engine
//!
//! Deterministic price-oracle engine for a proof-of-stake chain.
//!
//! ## Architecture
//!
//! Validators report exchange rates through a commit-reveal scheme: an
//! aggregate *prevote* commits a truncated digest of the rates, and one vote
//! period later the *vote* reveals them. At each period boundary the host's
//! block lifecycle calls `on_period_end`, which tallies every tracked
//! denomination's ballot into a power-weighted median, updates the canonical
//! rates and the price history, counts participation misses, and at each
//! slash-window boundary requests penalties from the staking collaborator.
//!
//! ```text
//! [Tx processing] ──submit_prevote/vote──→ ┌───────────────┐
//! [Block lifecycle] ──on_period_end──────→ │ OracleService │──slash──→ [Staking]
//! [Governance] ──apply_tracking_decision─→ │               │──events─→ [Event Bus]
//! [Query server] ──reads─────────────────→ └───────────────┘
//! ```
//!
//! ## Determinism
//!
//! The engine is a replicated state machine: every node must process the
//! same submissions and period closes and reach bit-identical state. All
//! rate math uses fixed-point decimals, every map iterates in key order,
//! ballot ties break on validator address, and a period close either
//! commits entirely or not at all. The host serializes all calls onto one
//! logical thread; the internal lock only guards against misuse when
//! embedded in a threaded host.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use oracle_engine::{OracleDependencies, OracleService, OracleApi};
//! use oracle_engine::domain::OracleParams;
//!
//! let service = OracleService::new(OracleDependencies {
//!     staking,
//!     event_bus,
//!     params: OracleParams::default(),
//! })?;
//!
//! let summary = service.on_period_end(height, timestamp).await?;
//! ```

pub mod adapters;
pub mod domain;
pub mod events;
pub mod ports;
pub mod service;
pub mod state;

// Re-export main types
pub use adapters::InMemoryEventBus;
pub use domain::{
    AggregatePrevote, AggregateVote, DenomRate, ExchangeRate, OracleError, OracleParams,
    OracleResult, PeriodSummary, PricePoint, SlashWindowProgress, TrackingDecision,
    TrackingEntry, TrackingList,
};
pub use events::{ExchangeRateUpdatedEvent, PeriodClosedEvent, ValidatorSlashedEvent};
pub use ports::{BondedValidator, EventBus, OracleApi, StakingKeeper};
pub use service::{OracleDependencies, OracleService};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_pass_validation() {
        let params = OracleParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.vote_period, 5);
    }
}
