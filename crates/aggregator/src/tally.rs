use core_types::WinLossRow;
use core_types::math::{percent_of, round2};
use rust_decimal::Decimal;

/// Label of the synthetic row that sums every instrument's counts.
pub const COMBINED_TOTALS: &str = "Combined Totals";

/// Per-instrument counts of positive and non-positive profit weeks.
///
/// A week with zero profit counts as a loss.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WinLossTable {
    rows: Vec<WinLossRow>,
}

impl WinLossTable {
    pub fn record(&mut self, instrument: impl Into<String>, total_weeks: usize, positive_weeks: usize) {
        self.rows.push(row(instrument.into(), total_weeks, positive_weeks));
    }

    /// Rows for the individual instruments, in the order they were recorded.
    pub fn instruments(&self) -> &[WinLossRow] {
        &self.rows
    }

    /// The combined row. Percentages come from the summed counts, not from
    /// averaging the instrument percentages.
    pub fn combined(&self) -> WinLossRow {
        let total = self.rows.iter().map(|r| r.total_weeks).sum();
        let positive = self.rows.iter().map(|r| r.positive_weeks).sum();
        row(COMBINED_TOTALS.to_string(), total, positive)
    }

    /// The combined row followed by every instrument row.
    pub fn to_rows(&self) -> Vec<WinLossRow> {
        std::iter::once(self.combined())
            .chain(self.rows.iter().cloned())
            .collect()
    }
}

fn row(instrument: String, total_weeks: usize, positive_weeks: usize) -> WinLossRow {
    let negative_weeks = total_weeks - positive_weeks;
    let total = Decimal::from(total_weeks);
    WinLossRow {
        instrument,
        total_weeks,
        positive_weeks,
        negative_weeks,
        percent_positive: round2(percent_of(Decimal::from(positive_weeks), total)),
        percent_negative: round2(percent_of(Decimal::from(negative_weeks), total)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn combined_row_sums_counts_not_percentages() {
        let mut table = WinLossTable::default();
        table.record("aapl", 3, 1);
        table.record("msft", 1, 1);

        let combined = table.combined();
        assert_eq!(combined.instrument, COMBINED_TOTALS);
        assert_eq!(combined.total_weeks, 4);
        assert_eq!(combined.positive_weeks, 2);
        assert_eq!(combined.negative_weeks, 2);
        assert_eq!(combined.percent_positive, dec!(50));

        let aapl = &table.instruments()[0];
        assert_eq!(aapl.percent_positive, dec!(33.33));
        assert_eq!(aapl.percent_negative, dec!(66.67));
    }

    #[test]
    fn combined_row_comes_first() {
        let mut table = WinLossTable::default();
        table.record("aapl", 2, 2);

        let rows = table.to_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].instrument, COMBINED_TOTALS);
        assert_eq!(rows[1].instrument, "aapl");
    }

    #[test]
    fn instrument_without_weeks_reports_zero_percentages() {
        let mut table = WinLossTable::default();
        table.record("empty", 0, 0);

        let row = &table.instruments()[0];
        assert_eq!(row.percent_positive, Decimal::ZERO);
        assert_eq!(row.percent_negative, Decimal::ZERO);
    }
}
