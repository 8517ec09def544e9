//! Event bus adapter
//!
//! In-memory implementation of the `EventBus` port. Used in tests and by
//! hosts that poll period outcomes instead of wiring a real bus.

use crate::events::{ExchangeRateUpdatedEvent, PeriodClosedEvent, ValidatorSlashedEvent};
use crate::ports::EventBus;
use async_trait::async_trait;

/// Captures published events in memory.
#[derive(Default)]
pub struct InMemoryEventBus {
    rate_updates: parking_lot::RwLock<Vec<ExchangeRateUpdatedEvent>>,
    period_closes: parking_lot::RwLock<Vec<PeriodClosedEvent>>,
    slashes: parking_lot::RwLock<Vec<ValidatorSlashedEvent>>,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rate_updates(&self) -> Vec<ExchangeRateUpdatedEvent> {
        self.rate_updates.read().clone()
    }

    pub fn period_closes(&self) -> Vec<PeriodClosedEvent> {
        self.period_closes.read().clone()
    }

    pub fn slashes(&self) -> Vec<ValidatorSlashedEvent> {
        self.slashes.read().clone()
    }

    pub fn event_count(&self) -> usize {
        self.rate_updates.read().len()
            + self.period_closes.read().len()
            + self.slashes.read().len()
    }
}

#[async_trait]
impl EventBus for InMemoryEventBus {
    async fn publish_exchange_rate_updated(
        &self,
        event: ExchangeRateUpdatedEvent,
    ) -> Result<(), String> {
        self.rate_updates.write().push(event);
        Ok(())
    }

    async fn publish_period_closed(&self, event: PeriodClosedEvent) -> Result<(), String> {
        self.period_closes.write().push(event);
        Ok(())
    }

    async fn publish_validator_slashed(
        &self,
        event: ValidatorSlashedEvent,
    ) -> Result<(), String> {
        self.slashes.write().push(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oracle_types::Denom;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_in_memory_bus_captures_events() {
        let bus = InMemoryEventBus::new();

        bus.publish_exchange_rate_updated(ExchangeRateUpdatedEvent::new(
            Denom::new("JUNO"),
            dec!(10.0),
            5,
            1000,
        ))
        .await
        .unwrap();

        assert_eq!(bus.event_count(), 1);
        assert_eq!(bus.rate_updates()[0].denom, Denom::new("JUNO"));
    }
}
