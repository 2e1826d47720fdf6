//! FIRE number estimate for the dashboard's retirement card.

use crate::summary::{AggregateError, round2};

/// Corpus needed to sustain `annual_expense` at a safe withdrawal rate.
///
/// The conventional default rate is 0.04; the caller supplies it so the
/// dashboard can expose a slider. Non-positive rates are rejected.
pub fn estimate_fire_number(
    annual_expense: f64,
    withdrawal_rate: f64,
) -> Result<f64, AggregateError> {
    if withdrawal_rate <= 0.0 {
        return Err(AggregateError::InvalidWithdrawalRate(withdrawal_rate));
    }
    Ok(round2(annual_expense / withdrawal_rate))
}
