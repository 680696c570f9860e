use crate::error::ConfigError;
use core_types::BenchmarkSeries;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub paths: Paths,
    pub input: InputColumns,
    pub analytics: AnalyticsSettings,
    pub report: ReportSettings,
    /// Overrides the embedded S&P 500 table when present.
    #[serde(default)]
    pub benchmark: Option<BenchmarkSettings>,
}

/// Where the pipeline reads from and writes to.
#[derive(Debug, Clone, Deserialize)]
pub struct Paths {
    /// One price-history file per instrument.
    pub raw_data_dir: PathBuf,
    /// Receives one derived file per instrument during the adjust phase.
    pub adjusted_data_dir: PathBuf,
    /// Receives the tables, the metrics report, the chart and the log file.
    pub results_dir: PathBuf,
    /// Files are discovered by this extension (without the dot).
    pub file_extension: String,
}

/// Column names of the raw price-history files.
#[derive(Debug, Clone, Deserialize)]
pub struct InputColumns {
    pub timestamp_column: String,
    pub open_column: String,
    /// The close price adjusted for splits.
    pub close_column: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyticsSettings {
    /// Reference rate, in percent, subtracted before the Sharpe and Sortino ratios.
    pub risk_free_rate: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportSettings {
    pub format: ReportFormat,
    /// Whether to render the yearly return chart.
    pub chart: bool,
}

/// Serialization of the risk-adjusted metrics report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ReportFormat {
    #[default]
    Json,
    Csv,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
        }
    }
}

/// A user-supplied benchmark table. Keys are calendar years written as strings,
/// since TOML table keys always are.
#[derive(Debug, Clone, Deserialize)]
pub struct BenchmarkSettings {
    pub name: String,
    pub version: String,
    pub returns: BTreeMap<String, Decimal>,
}

impl Config {
    /// The benchmark series to compare against: the configured table, or the
    /// embedded S&P 500 series when none is configured.
    pub fn benchmark(&self) -> Result<BenchmarkSeries, ConfigError> {
        let Some(settings) = &self.benchmark else {
            return Ok(BenchmarkSeries::sp500());
        };

        let returns = settings
            .returns
            .iter()
            .map(|(year, value)| {
                year.trim()
                    .parse::<i32>()
                    .map(|y| (y, *value))
                    .map_err(|_| ConfigError::BenchmarkYear(year.clone()))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        BenchmarkSeries::new(settings.name.clone(), settings.version.clone(), returns)
            .map_err(|e| ConfigError::ValidationError(e.to_string()))
    }

    /// Checks the invariants `serde` cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("paths.file_extension", &self.paths.file_extension),
            ("input.timestamp_column", &self.input.timestamp_column),
            ("input.open_column", &self.input.open_column),
            ("input.close_column", &self.input.close_column),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!("{key} must not be empty")));
            }
        }

        self.benchmark()?;
        Ok(())
    }
}
