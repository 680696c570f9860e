use crate::parse::{deserialize_figure, deserialize_timestamp};
use chrono::{Datelike, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One week of an instrument's price history, as read from its source file.
///
/// Prices are optional because source exports leave cells blank; a missing
/// price makes that week's percent change undefined.
#[derive(Debug, Clone, PartialEq)]
pub struct RawWeeklyRecord {
    /// The timestamp text exactly as it appeared in the source.
    pub timestamp: String,
    pub open: Option<Decimal>,
    /// Close price adjusted for splits and other corporate actions.
    pub close: Option<Decimal>,
}

/// A raw week extended with the figures the strategy is evaluated on.
///
/// `None` marks a value that is undefined: the first week has no prior move
/// and therefore no risk exposure, and a zero open price has no percent change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedWeeklyRecord {
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, deserialize_with = "deserialize_figure")]
    pub open: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_figure")]
    pub close: Option<Decimal>,
    /// The parsed week-ended timestamp; `None` when the source text is unparseable.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub week_ended: Option<NaiveDateTime>,
    /// `(close - open) / open * 100` for this week.
    #[serde(default, deserialize_with = "deserialize_figure")]
    pub pct_change: Option<Decimal>,
    /// The negated percent change of the previous week.
    #[serde(deserialize_with = "deserialize_figure")]
    pub risk_on_open: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_figure")]
    pub abs_risk_on_open: Option<Decimal>,
    /// This week's move applied to the risk carried into the week.
    #[serde(deserialize_with = "deserialize_figure")]
    pub profit_or_loss: Option<Decimal>,
}

/// The derived history of one instrument, keyed by its source identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentSeries {
    pub instrument: String,
    pub records: Vec<DerivedWeeklyRecord>,
}

impl InstrumentSeries {
    pub fn new(instrument: impl Into<String>, records: Vec<DerivedWeeklyRecord>) -> Self {
        Self {
            instrument: instrument.into(),
            records,
        }
    }
}

/// Risk and profit summed across every instrument for one week.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeeklyAggregate {
    pub week_ended: NaiveDateTime,
    pub total_risk: Decimal,
    pub total_profit_or_loss: Decimal,
}

impl WeeklyAggregate {
    pub fn year(&self) -> i32 {
        self.week_ended.year()
    }
}

/// One row of the yearly risk and profit table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearlySummary {
    pub year: i32,
    /// Peak weekly total risk of the year.
    pub yearly_risk: Decimal,
    pub yearly_profit: Decimal,
    pub yearly_return_pct: Decimal,
    /// Compounded return from the first year up to and including this one.
    pub cumulative_return_pct: Decimal,
}

/// Averages across all yearly rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdjustedSummary {
    pub average_yearly_risk: Decimal,
    pub average_yearly_profit: Decimal,
    pub percent_return: Decimal,
}

/// Positive versus non-positive profit weeks for one instrument, or the
/// synthetic combined row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinLossRow {
    pub instrument: String,
    pub total_weeks: usize,
    pub positive_weeks: usize,
    pub negative_weeks: usize,
    pub percent_positive: Decimal,
    pub percent_negative: Decimal,
}
