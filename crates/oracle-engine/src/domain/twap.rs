//! Time-weighted average price
//!
//! Arithmetic TWAP over an ordered price series. Rates are treated as a step
//! function: each observation holds until the next one, with no
//! interpolation. The observation at or before the interval start anchors
//! the first step; the last observation inside the interval extends to its
//! end.

use crate::domain::{OracleError, OracleResult, PriceHistory};
use oracle_types::Denom;
use rust_decimal::Decimal;

/// Compute the arithmetic TWAP of `denom` over `[start, end)`.
///
/// Fails with `InvalidTimeRange` unless `start < end`, and with
/// `InsufficientHistory` if no observation exists at or before `start`.
/// Result: Σ rate_i × duration_i / (end − start).
pub fn arithmetic_twap(
    history: &PriceHistory,
    denom: &Denom,
    start: u64,
    end: u64,
) -> OracleResult<Decimal> {
    if start >= end {
        return Err(OracleError::InvalidTimeRange { start, end });
    }

    // Anchor: the rate in force when the interval opens.
    let anchor = history.price_at(denom, start)?;
    let series = history
        .series(denom)
        .ok_or_else(|| OracleError::InsufficientHistory {
            denom: denom.clone(),
            at: start,
        })?;

    let mut weighted_sum = Decimal::ZERO;
    let mut current_rate = anchor.rate;
    let mut current_time = start;

    for (&timestamp, &rate) in series.range(start + 1..end) {
        weighted_sum += current_rate * Decimal::from(timestamp - current_time);
        current_rate = rate;
        current_time = timestamp;
    }
    weighted_sum += current_rate * Decimal::from(end - current_time);

    Ok(weighted_sum / Decimal::from(end - start))
}
