//! Events published by the oracle engine

mod published;

pub use published::{ExchangeRateUpdatedEvent, PeriodClosedEvent, ValidatorSlashedEvent};
