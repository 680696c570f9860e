//! CSV renderings of the result tables.

use crate::error::ReportError;
use analytics::RiskAdjustedReport;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::Path;

pub const YEARLY_HEADER: [&str; 5] = [
    "year",
    "yearly_risk",
    "yearly_profit",
    "yearly_return_pct",
    "cumulative_return_pct",
];

pub const WIN_LOSS_HEADER: [&str; 6] = [
    "instrument",
    "total_weeks",
    "positive_weeks",
    "negative_weeks",
    "percent_positive",
    "percent_negative",
];

/// One line of the CSV flavour of the metrics report. The difference section
/// has no volatility figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsRow {
    pub section: &'static str,
    pub average_return: Decimal,
    pub volatility: Option<Decimal>,
    pub sharpe_ratio: Decimal,
    pub sortino_ratio: Decimal,
    pub max_drawdown: Decimal,
    pub downside_volatility: Option<Decimal>,
}

/// Flattens a (published) report into its three CSV rows.
pub fn metrics_rows(report: &RiskAdjustedReport) -> [MetricsRow; 3] {
    let bundle_row = |section, bundle: &analytics::MetricBundle| MetricsRow {
        section,
        average_return: bundle.average_return,
        volatility: Some(bundle.volatility),
        sharpe_ratio: bundle.sharpe_ratio,
        sortino_ratio: bundle.sortino_ratio,
        max_drawdown: bundle.max_drawdown,
        downside_volatility: Some(bundle.downside_volatility),
    };
    [
        bundle_row("strategy", &report.strategy),
        bundle_row("benchmark", &report.benchmark),
        MetricsRow {
            section: "difference",
            average_return: report.difference.average_return,
            volatility: None,
            sharpe_ratio: report.difference.sharpe_ratio,
            sortino_ratio: report.difference.sortino_ratio,
            max_drawdown: report.difference.max_drawdown,
            downside_volatility: None,
        },
    ]
}

/// Writes `rows` as CSV. `header` is written explicitly only for an empty
/// table, since serde emits it alongside the first row otherwise.
pub fn write_rows<T: Serialize>(path: &Path, header: &[&str], rows: &[T]) -> Result<(), ReportError> {
    let csv_err = |source| ReportError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    if rows.is_empty() {
        writer.write_record(header).map_err(csv_err)?;
    }
    for row in rows {
        writer.serialize(row).map_err(csv_err)?;
    }
    writer.flush().map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
