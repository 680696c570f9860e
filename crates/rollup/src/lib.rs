//! # Yearly Rollup
//!
//! Collapses the weekly totals into one row per calendar year.
//!
//! Yearly risk is the *peak* weekly total risk of the year: the capital that had
//! to be available at any one time. Yearly profit is the *sum* of the weekly
//! profits. The yearly return relates the two, and the cumulative return
//! compounds the yearly returns in ascending year order from a base of 100.

use core_types::math::{HUNDRED, percent_of, round2, safe_div};
use core_types::{AdjustedSummary, WeeklyAggregate, YearlySummary};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// The yearly table and the averages derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct YearlyRollup {
    /// Rounded rows in ascending year order.
    pub years: Vec<YearlySummary>,
    pub summary: AdjustedSummary,
    /// Total profit over total risk across all years, in percent, unrounded.
    /// Years are weighted by the risk they carried.
    pub weighted_return_pct: Decimal,
}

impl YearlyRollup {
    /// The (year, yearly return) pairs, in year order.
    pub fn yearly_returns(&self) -> Vec<(i32, Decimal)> {
        self.years
            .iter()
            .map(|y| (y.year, y.yearly_return_pct))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct YearTotals {
    peak_risk: Option<Decimal>,
    profit: Decimal,
}

/// Rolls weekly totals up into calendar years.
pub fn rollup(weekly: Vec<WeeklyAggregate>) -> YearlyRollup {
    let mut by_year: BTreeMap<i32, YearTotals> = BTreeMap::new();
    for week in &weekly {
        let totals = by_year.entry(week.year()).or_default();
        totals.peak_risk = Some(match totals.peak_risk {
            Some(peak) => peak.max(week.total_risk),
            None => week.total_risk,
        });
        totals.profit += week.total_profit_or_loss;
    }

    let returns: Vec<Decimal> = by_year
        .values()
        .map(|t| percent_of(t.profit, t.peak_risk.unwrap_or_default()))
        .collect();
    let cumulative = cumulative_returns(&returns);

    let years: Vec<YearlySummary> = by_year
        .iter()
        .zip(returns.iter().zip(cumulative))
        .map(|((&year, totals), (&yearly_return, cumulative))| YearlySummary {
            year,
            yearly_risk: round2(totals.peak_risk.unwrap_or_default()),
            yearly_profit: round2(totals.profit),
            yearly_return_pct: round2(yearly_return),
            cumulative_return_pct: cumulative,
        })
        .collect();

    let total_risk: Decimal = by_year.values().filter_map(|t| t.peak_risk).sum();
    let total_profit: Decimal = by_year.values().map(|t| t.profit).sum();
    let weighted_return_pct = percent_of(total_profit, total_risk);

    // the summary averages the published (rounded) table columns
    let count = Decimal::from(years.len());
    let average_risk = safe_div(years.iter().map(|y| y.yearly_risk).sum(), count);
    let average_profit = safe_div(years.iter().map(|y| y.yearly_profit).sum(), count);

    tracing::debug!(
        weeks = weekly.len(),
        years = years.len(),
        %weighted_return_pct,
        "Weekly totals rolled up into years"
    );

    YearlyRollup {
        years,
        summary: AdjustedSummary {
            average_yearly_risk: round2(average_risk),
            average_yearly_profit: round2(average_profit),
            percent_return: round2(percent_of(average_profit, average_risk)),
        },
        weighted_return_pct,
    }
}

/// Compounds yearly percent returns, in the given order, from a base of 100.
///
/// Each element is the running index minus 100, rounded to 2 places; the
/// running index itself is never rounded. An index that outgrows `Decimal`
/// saturates at its bound.
pub fn cumulative_returns(yearly_returns: &[Decimal]) -> Vec<Decimal> {
    let mut index = HUNDRED;
    let mut saturated = false;
    yearly_returns
        .iter()
        .map(|r| {
            let growth = Decimal::ONE.saturating_add(r / HUNDRED);
            match index.checked_mul(growth) {
                Some(next) => index = next,
                None => {
                    index = index.saturating_mul(growth);
                    if !saturated {
                        tracing::warn!(yearly_return = %r, "Cumulative return overflowed and saturated");
                        saturated = true;
                    }
                }
            }
            round2(index.saturating_sub(HUNDRED))
        })
        .collect()
}
