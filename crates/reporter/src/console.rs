//! Terminal renderings of the result tables.

use analytics::RiskAdjustedReport;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use core_types::{AdjustedSummary, WinLossRow, YearlySummary};
use rust_decimal::Decimal;

fn base_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.to_vec());
    table
}

fn figure(value: Decimal) -> Cell {
    Cell::new(value).set_alignment(CellAlignment::Right)
}

pub fn yearly_table(years: &[YearlySummary]) -> Table {
    let mut table = base_table(&[
        "Year",
        "Yearly Risk",
        "Yearly Profit",
        "Return %",
        "Cumulative %",
    ]);
    for year in years {
        table.add_row(vec![
            Cell::new(year.year),
            figure(year.yearly_risk),
            figure(year.yearly_profit),
            figure(year.yearly_return_pct),
            figure(year.cumulative_return_pct),
        ]);
    }
    table
}

pub fn summary_table(summary: &AdjustedSummary) -> Table {
    let mut table = base_table(&["Average Yearly Risk", "Average Yearly Profit", "Percent Return"]);
    table.add_row(vec![
        figure(summary.average_yearly_risk),
        figure(summary.average_yearly_profit),
        figure(summary.percent_return),
    ]);
    table
}

pub fn win_loss_table(rows: &[WinLossRow]) -> Table {
    let mut table = base_table(&["Instrument", "Weeks", "Positive", "Negative", "% Positive", "% Negative"]);
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.instrument),
            Cell::new(row.total_weeks),
            Cell::new(row.positive_weeks),
            Cell::new(row.negative_weeks),
            figure(row.percent_positive),
            figure(row.percent_negative),
        ]);
    }
    table
}

/// Strategy, benchmark and difference side by side. Expects a published report.
pub fn metrics_table(report: &RiskAdjustedReport) -> Table {
    let mut table = base_table(&["Metric", "Strategy", report.benchmark_name.as_str(), "Difference"]);
    let blank = || Cell::new("-").set_alignment(CellAlignment::Right);
    let (s, b, d) = (&report.strategy, &report.benchmark, &report.difference);
    table.add_row(vec![
        Cell::new("Average Return %"),
        figure(s.average_return),
        figure(b.average_return),
        figure(d.average_return),
    ]);
    table.add_row(vec![Cell::new("Volatility %"), figure(s.volatility), figure(b.volatility), blank()]);
    table.add_row(vec![
        Cell::new("Sharpe Ratio"),
        figure(s.sharpe_ratio),
        figure(b.sharpe_ratio),
        figure(d.sharpe_ratio),
    ]);
    table.add_row(vec![
        Cell::new("Sortino Ratio"),
        figure(s.sortino_ratio),
        figure(b.sortino_ratio),
        figure(d.sortino_ratio),
    ]);
    table.add_row(vec![
        Cell::new("Max Drawdown %"),
        figure(s.max_drawdown),
        figure(b.max_drawdown),
        figure(d.max_drawdown),
    ]);
    table.add_row(vec![
        Cell::new("Downside Volatility %"),
        figure(s.downside_volatility),
        figure(b.downside_volatility),
        blank(),
    ]);
    table
}
