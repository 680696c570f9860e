//! # Per-Instrument Transformer
//!
//! Turns one instrument's weekly price history into the figures the strategy
//! is judged on. The strategy enters each week carrying a risk equal to the
//! negated move of the previous week, and realizes this week's move against it:
//!
//! ```text
//! pct_change[i]     = (close[i] - open[i]) / open[i] * 100
//! risk_on_open[i]   = -pct_change[i - 1]
//! profit_or_loss[i] = pct_change[i] * risk_on_open[i] / 100
//! ```
//!
//! The first week has no previous move, so its risk and profit are undefined
//! (`None`). A zero or missing open price leaves the week's percent change
//! undefined rather than failing; downstream stages treat undefined figures as
//! zero or drop them.

use core_types::math::{HUNDRED, round2};
use core_types::parse::parse_timestamp;
use core_types::{DerivedWeeklyRecord, RawWeeklyRecord};
use rust_decimal::Decimal;

/// Week-over-week percent change; `None` when either price is missing or the
/// open is zero.
pub fn pct_change(open: Option<Decimal>, close: Option<Decimal>) -> Option<Decimal> {
    let (open, close) = (open?, close?);
    (close - open).checked_div(open)?.checked_mul(HUNDRED)
}

/// Derives the weekly figures for one instrument.
///
/// Figures are computed in input order, rounded to 2 places, and the result is
/// then stably sorted by week (unparseable timestamps last).
pub fn transform(records: Vec<RawWeeklyRecord>) -> Vec<DerivedWeeklyRecord> {
    let mut previous_change: Option<Decimal> = None;
    let mut derived = Vec::with_capacity(records.len());

    for record in records {
        let change = pct_change(record.open, record.close);
        let risk = previous_change.map(|prev| -prev);
        let profit = change
            .zip(risk)
            .and_then(|(change, risk)| change.checked_mul(risk))
            .and_then(|product| product.checked_div(HUNDRED));

        derived.push(DerivedWeeklyRecord {
            week_ended: parse_timestamp(&record.timestamp),
            timestamp: record.timestamp,
            open: record.open,
            close: record.close,
            pct_change: change.map(round2),
            risk_on_open: risk.map(round2),
            abs_risk_on_open: risk.map(|r| round2(r.abs())),
            profit_or_loss: profit.map(round2),
        });
        previous_change = change;
    }

    derived.sort_by_key(|r| (r.week_ended.is_none(), r.week_ended));

    let undefined = derived.iter().filter(|r| r.pct_change.is_none()).count();
    if undefined > 0 {
        tracing::debug!(weeks = derived.len(), undefined, "Weeks without a defined percent change");
    }
    derived
}
