//! # Cross-Instrument Aggregator
//!
//! Merges the derived histories of every instrument into one series of weekly
//! totals, and tallies each instrument's winning and losing weeks.
//!
//! Only weeks that carried positive risk into the week and have a parseable
//! week timestamp take part. That excludes every instrument's first week,
//! whose risk is undefined.

pub mod tally;

pub use tally::{COMBINED_TOTALS, WinLossTable};

use chrono::NaiveDateTime;
use core_types::{DerivedWeeklyRecord, InstrumentSeries, WeeklyAggregate};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// A derived week after normalization and filtering.
#[derive(Debug, Clone, Copy, PartialEq)]
struct EligibleWeek {
    week_ended: NaiveDateTime,
    risk: Decimal,
    profit_or_loss: Decimal,
}

impl EligibleWeek {
    /// Missing profit counts as zero; missing or non-positive risk and an
    /// unparsed week disqualify the row.
    fn from_record(record: &DerivedWeeklyRecord) -> Option<Self> {
        let risk = record.risk_on_open.filter(|risk| *risk > Decimal::ZERO)?;
        Some(Self {
            week_ended: record.week_ended?,
            risk,
            profit_or_loss: record.profit_or_loss.unwrap_or(Decimal::ZERO),
        })
    }
}

/// The output of the aggregation stage.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    /// One row per distinct week, in ascending week order.
    pub weekly: Vec<WeeklyAggregate>,
    pub tallies: WinLossTable,
}

/// Aggregates every instrument's derived history.
pub fn aggregate(instruments: Vec<InstrumentSeries>) -> Aggregation {
    let mut risk_by_week: BTreeMap<NaiveDateTime, Decimal> = BTreeMap::new();
    let mut profit_by_week: BTreeMap<NaiveDateTime, Decimal> = BTreeMap::new();
    let mut tallies = WinLossTable::default();

    for series in instruments {
        let eligible: Vec<EligibleWeek> = series
            .records
            .iter()
            .filter_map(EligibleWeek::from_record)
            .collect();

        tracing::debug!(
            instrument = %series.instrument,
            rows = series.records.len(),
            eligible = eligible.len(),
            "Instrument filtered for aggregation"
        );

        for week in &eligible {
            *risk_by_week.entry(week.week_ended).or_default() += week.risk;
            *profit_by_week.entry(week.week_ended).or_default() += week.profit_or_loss;
        }

        let positive = eligible
            .iter()
            .filter(|w| w.profit_or_loss > Decimal::ZERO)
            .count();
        tallies.record(series.instrument, eligible.len(), positive);
    }

    Aggregation {
        weekly: join_weeks(risk_by_week, profit_by_week),
        tallies,
    }
}

/// Outer-joins the weekly risk and profit totals; a side missing for a week
/// counts as zero.
fn join_weeks(
    risk_by_week: BTreeMap<NaiveDateTime, Decimal>,
    mut profit_by_week: BTreeMap<NaiveDateTime, Decimal>,
) -> Vec<WeeklyAggregate> {
    let mut weekly: Vec<WeeklyAggregate> = risk_by_week
        .into_iter()
        .map(|(week_ended, total_risk)| WeeklyAggregate {
            week_ended,
            total_risk,
            total_profit_or_loss: profit_by_week.remove(&week_ended).unwrap_or_default(),
        })
        .collect();

    weekly.extend(profit_by_week.into_iter().map(|(week_ended, total_profit_or_loss)| {
        WeeklyAggregate {
            week_ended,
            total_risk: Decimal::ZERO,
            total_profit_or_loss,
        }
    }));
    weekly.sort_by_key(|w| w.week_ended);
    weekly
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn week(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 1, d)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .unwrap()
    }

    fn derived(
        week_ended: Option<NaiveDateTime>,
        risk: Option<Decimal>,
        profit: Option<Decimal>,
    ) -> DerivedWeeklyRecord {
        DerivedWeeklyRecord {
            timestamp: String::new(),
            open: None,
            close: None,
            week_ended,
            pct_change: None,
            risk_on_open: risk,
            abs_risk_on_open: risk.map(|r| r.abs()),
            profit_or_loss: profit,
        }
    }

    #[test]
    fn sums_by_week_across_instruments() {
        let result = aggregate(vec![
            InstrumentSeries::new(
                "aapl",
                vec![
                    derived(Some(week(3)), None, None),
                    derived(Some(week(10)), Some(dec!(4)), Some(dec!(1.5))),
                    derived(Some(week(17)), Some(dec!(2)), Some(dec!(-0.5))),
                ],
            ),
            InstrumentSeries::new(
                "msft",
                vec![
                    derived(Some(week(3)), None, None),
                    derived(Some(week(10)), Some(dec!(6)), Some(dec!(-1))),
                ],
            ),
        ]);

        assert_eq!(
            result.weekly,
            vec![
                WeeklyAggregate {
                    week_ended: week(10),
                    total_risk: dec!(10),
                    total_profit_or_loss: dec!(0.5),
                },
                WeeklyAggregate {
                    week_ended: week(17),
                    total_risk: dec!(2),
                    total_profit_or_loss: dec!(-0.5),
                },
            ]
        );
    }

    #[test]
    fn first_weeks_and_non_positive_risk_never_reach_the_sums() {
        let result = aggregate(vec![InstrumentSeries::new(
            "ibm",
            vec![
                derived(Some(week(3)), None, Some(dec!(9))),
                derived(Some(week(10)), Some(dec!(0)), Some(dec!(9))),
                derived(Some(week(17)), Some(dec!(-3)), Some(dec!(9))),
                derived(None, Some(dec!(3)), Some(dec!(9))),
            ],
        )]);

        assert!(result.weekly.is_empty());
        let row = &result.tallies.instruments()[0];
        assert_eq!(row.total_weeks, 0);
    }

    #[test]
    fn missing_profit_keeps_the_week_with_zero_profit() {
        let result = aggregate(vec![InstrumentSeries::new(
            "xom",
            vec![derived(Some(week(10)), Some(dec!(7)), None)],
        )]);

        assert_eq!(result.weekly.len(), 1);
        assert_eq!(result.weekly[0].total_risk, dec!(7));
        assert_eq!(result.weekly[0].total_profit_or_loss, Decimal::ZERO);
        assert_eq!(result.tallies.instruments()[0].negative_weeks, 1);
    }

    #[test]
    fn join_treats_absent_side_as_zero() {
        let risk = BTreeMap::from([(week(10), dec!(5))]);
        let profit = BTreeMap::from([(week(17), dec!(2))]);

        let weekly = join_weeks(risk, profit);
        assert_eq!(weekly.len(), 2);
        assert_eq!(weekly[0].total_profit_or_loss, Decimal::ZERO);
        assert_eq!(weekly[1].total_risk, Decimal::ZERO);
        assert_eq!(weekly[1].total_profit_or_loss, dec!(2));
    }
}
