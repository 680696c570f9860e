use crate::chart::render_yearly_chart;
use crate::error::ReportError;
use crate::tables::{WIN_LOSS_HEADER, YEARLY_HEADER, metrics_rows, write_rows};
use analytics::RiskAdjustedReport;
use configuration::ReportFormat;
use core_types::{AdjustedSummary, BenchmarkSeries, WinLossRow, YearlySummary};
use std::fs;
use std::path::{Path, PathBuf};

/// File names of the artifacts written into the results directory.
pub mod artifact_names {
    pub const YEARLY: &str = "Yearly Risk and Profit.csv";
    pub const ADJUSTED_SUMMARY: &str = "Adjusted Summary.csv";
    pub const WIN_LOSS: &str = "Instrument Profit Odds.csv";
    /// Stem of the metrics report; the extension follows the report format.
    pub const METRICS_STEM: &str = "Risk Adjusted Metrics";
    pub const CHART: &str = "Yearly Return Graph.svg";
}

/// Everything a finished run hands to the writer.
#[derive(Debug, Clone, Copy)]
pub struct ReportInputs<'a> {
    pub yearly: &'a [YearlySummary],
    pub summary: &'a AdjustedSummary,
    pub win_loss: &'a [WinLossRow],
    /// Unrounded; the writer publishes it.
    pub metrics: &'a RiskAdjustedReport,
    pub benchmark: &'a BenchmarkSeries,
}

#[derive(Debug, Clone)]
pub struct ReportWriter {
    results_dir: PathBuf,
    format: ReportFormat,
    chart: bool,
}

impl ReportWriter {
    pub fn new(results_dir: impl Into<PathBuf>, format: ReportFormat, chart: bool) -> Self {
        Self {
            results_dir: results_dir.into(),
            format,
            chart,
        }
    }

    pub fn metrics_file_name(&self) -> String {
        format!("{}.{}", artifact_names::METRICS_STEM, self.format.extension())
    }

    /// Writes every artifact and returns the paths written, in order.
    ///
    /// A chart that fails to render is logged and left out; every other
    /// failure aborts.
    pub fn write(&self, inputs: &ReportInputs<'_>) -> Result<Vec<PathBuf>, ReportError> {
        fs::create_dir_all(&self.results_dir).map_err(|source| ReportError::Io {
            path: self.results_dir.clone(),
            source,
        })?;
        let mut written = Vec::new();

        let path = self.results_dir.join(artifact_names::YEARLY);
        write_rows(&path, &YEARLY_HEADER, inputs.yearly)?;
        written.push(path);

        let path = self.results_dir.join(artifact_names::ADJUSTED_SUMMARY);
        write_rows(&path, &[], std::slice::from_ref(inputs.summary))?;
        written.push(path);

        let path = self.results_dir.join(artifact_names::WIN_LOSS);
        write_rows(&path, &WIN_LOSS_HEADER, inputs.win_loss)?;
        written.push(path);

        let path = self.results_dir.join(self.metrics_file_name());
        self.write_metrics(&path, &inputs.metrics.published())?;
        written.push(path);

        if self.chart {
            let path = self.results_dir.join(artifact_names::CHART);
            match render_yearly_chart(inputs.yearly, inputs.benchmark)
                .and_then(|svg| write_text(&path, &svg))
            {
                Ok(()) => written.push(path),
                Err(e) => tracing::warn!(error = %e, "Skipping the yearly return chart"),
            }
        }

        for path in &written {
            tracing::info!(path = %path.display(), "Wrote artifact");
        }
        Ok(written)
    }

    fn write_metrics(&self, path: &Path, report: &RiskAdjustedReport) -> Result<(), ReportError> {
        match self.format {
            ReportFormat::Json => write_text(path, &serde_json::to_string_pretty(report)?),
            ReportFormat::Csv => write_rows(path, &[], &metrics_rows(report)),
        }
    }
}

fn write_text(path: &Path, contents: &str) -> Result<(), ReportError> {
    fs::write(path, contents).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
