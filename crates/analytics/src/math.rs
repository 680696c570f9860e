//! Sample statistics over yearly percent returns.

use crate::error::AnalyticsError;
use core_types::math::safe_div;
use rust_decimal::Decimal;
use rust_decimal::prelude::*;

/// Arithmetic mean; zero for an empty slice.
pub fn mean(values: &[Decimal]) -> Decimal {
    let sum: Decimal = values.iter().sum();
    safe_div(sum, Decimal::from(values.len()))
}

/// Sample standard deviation with Bessel's correction (divides by `n - 1`).
///
/// Fewer than two observations have no spread to measure and yield zero.
pub fn sample_std_dev(values: &[Decimal]) -> Result<Decimal, AnalyticsError> {
    if values.len() < 2 {
        return Ok(Decimal::ZERO);
    }

    let avg = mean(values);
    let variance = values
        .iter()
        .map(|v| (*v - avg) * (*v - avg))
        .sum::<Decimal>()
        / Decimal::from(values.len() - 1);

    variance.sqrt().ok_or(AnalyticsError::SquareRoot(variance))
}

/// Sample standard deviation of the strictly negative values only.
pub fn downside_deviation(values: &[Decimal]) -> Result<Decimal, AnalyticsError> {
    let negatives: Vec<Decimal> = values
        .iter()
        .copied()
        .filter(|v| v.is_sign_negative() && !v.is_zero())
        .collect();
    sample_std_dev(&negatives)
}
