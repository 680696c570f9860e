use crate::error::DataError;
use core_types::parse::parse_figure;
use core_types::{DerivedWeeklyRecord, RawWeeklyRecord};
use std::path::Path;

/// Columns a derived file must carry to take part in aggregation.
pub const DERIVED_REQUIRED_COLUMNS: [&str; 3] = ["week_ended", "risk_on_open", "profit_or_loss"];

/// Header of a derived file, in the order `DerivedWeeklyRecord` serializes.
const DERIVED_HEADER: [&str; 8] = [
    "timestamp",
    "open",
    "close",
    "week_ended",
    "pct_change",
    "risk_on_open",
    "abs_risk_on_open",
    "profit_or_loss",
];

/// Names of the three mandatory columns of a raw price-history file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawColumns {
    pub timestamp: String,
    pub open: String,
    pub close: String,
}

impl Default for RawColumns {
    fn default() -> Self {
        Self {
            timestamp: "timestamp".to_string(),
            open: "open".to_string(),
            close: "close_with_splits".to_string(),
        }
    }
}

/// Reads and writes per-instrument histories as CSV files.
#[derive(Debug, Clone, Default)]
pub struct FileRepository {
    columns: RawColumns,
}

impl FileRepository {
    pub fn new(columns: RawColumns) -> Self {
        Self { columns }
    }

    /// Reads a raw price history.
    ///
    /// The file is rejected as a whole with [`DataError::MissingColumns`] when any
    /// of the three mandatory columns is absent. Individual cells that do not
    /// hold a number are read as missing prices.
    pub fn read_raw(&self, path: &Path) -> Result<Vec<RawWeeklyRecord>, DataError> {
        let mut reader = open_reader(path)?;
        let headers = reader.headers().map_err(|source| csv_error(path, source))?.clone();

        let wanted = [&self.columns.timestamp, &self.columns.open, &self.columns.close];
        let positions: Vec<Option<usize>> = wanted
            .iter()
            .map(|name| headers.iter().position(|h| h == name.as_str()))
            .collect();
        let missing: Vec<String> = wanted
            .iter()
            .zip(&positions)
            .filter(|(_, pos)| pos.is_none())
            .map(|(name, _)| name.to_string())
            .collect();
        let &[Some(ts_idx), Some(open_idx), Some(close_idx)] = positions.as_slice() else {
            return Err(DataError::MissingColumns {
                path: path.to_path_buf(),
                missing,
            });
        };

        let mut records = Vec::new();
        let mut unreadable = 0usize;
        for row in reader.records() {
            let row = row.map_err(|source| csv_error(path, source))?;
            let mut price = |idx: usize| {
                parse_figure(row.get(idx).unwrap_or_default()).unwrap_or_else(|_| {
                    unreadable += 1;
                    None
                })
            };
            let open = price(open_idx);
            let close = price(close_idx);
            records.push(RawWeeklyRecord {
                timestamp: row.get(ts_idx).unwrap_or_default().to_string(),
                open,
                close,
            });
        }

        if unreadable > 0 {
            tracing::debug!(file = %path.display(), unreadable, "Non-numeric prices read as missing");
        }
        Ok(records)
    }

    /// Writes a derived history, replacing any existing file.
    pub fn write_derived(
        &self,
        path: &Path,
        records: &[DerivedWeeklyRecord],
    ) -> Result<(), DataError> {
        let mut writer = csv::Writer::from_path(path).map_err(|source| csv_error(path, source))?;
        if records.is_empty() {
            // serde only emits the header alongside the first record
            writer
                .write_record(DERIVED_HEADER)
                .map_err(|source| csv_error(path, source))?;
        }
        for record in records {
            writer.serialize(record).map_err(|source| csv_error(path, source))?;
        }
        writer.flush().map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads back a derived history. Infinite values are normalized to zero on
    /// the way in; unparseable week timestamps are kept as `None`.
    pub fn read_derived(&self, path: &Path) -> Result<Vec<DerivedWeeklyRecord>, DataError> {
        let mut reader = open_reader(path)?;
        let headers = reader.headers().map_err(|source| csv_error(path, source))?;

        let missing: Vec<String> = DERIVED_REQUIRED_COLUMNS
            .iter()
            .filter(|name| !headers.iter().any(|h| h == **name))
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(DataError::MissingColumns {
                path: path.to_path_buf(),
                missing,
            });
        }

        reader
            .deserialize()
            .collect::<Result<Vec<DerivedWeeklyRecord>, _>>()
            .map_err(|source| csv_error(path, source))
    }
}

fn open_reader(path: &Path) -> Result<csv::Reader<std::fs::File>, DataError> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| csv_error(path, source))
}

fn csv_error(path: &Path, source: csv::Error) -> DataError {
    DataError::Csv {
        path: path.to_path_buf(),
        source,
    }
}
