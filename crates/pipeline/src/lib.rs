//! # Pipeline
//!
//! Drives a full analysis in two phases:
//!
//! 1. **Adjust**: every raw price-history file is turned into a derived weekly
//!    history and written to the adjusted-data directory.
//! 2. **Process**: the derived histories are aggregated across instruments,
//!    rolled up by year, scored against the benchmark and reported.
//!
//! Of the input problems, only a missing input directory stops a phase. A file
//! that cannot be read or lacks a required column is logged and skipped.

pub mod error;

pub use error::PipelineError;

use aggregator::aggregate;
use analytics::{AnalyticsEngine, RiskAdjustedReport};
use configuration::Config;
use core_types::{BenchmarkSeries, InstrumentSeries, WinLossRow};
use datastore::{DataError, FileRepository, RawColumns, ensure_dir, instrument_id, list_instrument_files};
use indicatif::ProgressStyle;
use reporter::{ReportInputs, ReportWriter};
use rollup::{YearlyRollup, rollup};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::Span;
use tracing_indicatif::span_ext::IndicatifSpanExt;

const PROGRESS_TEMPLATE: &str =
    "{spinner:.green} {span_name} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})";

/// The phase a run starts with; it decides which input directory must exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Adjust,
    Process,
}

/// File counts of one phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseCounts {
    pub processed: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone)]
pub struct AdjustOutcome {
    pub files: PhaseCounts,
    pub elapsed: Duration,
}

/// The results of the process phase, as written to the results directory.
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    pub files: PhaseCounts,
    pub rollup: YearlyRollup,
    /// Combined row first, then one row per instrument.
    pub win_loss: Vec<WinLossRow>,
    /// Rounded to 2 places, as published.
    pub metrics: RiskAdjustedReport,
    pub artifacts: Vec<PathBuf>,
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub adjust: AdjustOutcome,
    pub process: ProcessOutcome,
    pub elapsed: Duration,
}

pub struct Pipeline {
    raw_data_dir: PathBuf,
    adjusted_data_dir: PathBuf,
    file_extension: String,
    repository: FileRepository,
    engine: AnalyticsEngine,
    benchmark: BenchmarkSeries,
    writer: ReportWriter,
}

impl Pipeline {
    /// Wires the stages from a validated configuration.
    pub fn new(config: &Config) -> Result<Self, PipelineError> {
        let columns = RawColumns {
            timestamp: config.input.timestamp_column.clone(),
            open: config.input.open_column.clone(),
            close: config.input.close_column.clone(),
        };
        Ok(Self {
            raw_data_dir: config.paths.raw_data_dir.clone(),
            adjusted_data_dir: config.paths.adjusted_data_dir.clone(),
            file_extension: config.paths.file_extension.clone(),
            repository: FileRepository::new(columns),
            engine: AnalyticsEngine::new(config.analytics.risk_free_rate),
            benchmark: config.benchmark()?,
            writer: ReportWriter::new(
                config.paths.results_dir.clone(),
                config.report.format,
                config.report.chart,
            ),
        })
    }

    /// Fails with [`PipelineError::MissingInputDirectory`] when the input
    /// directory of `phase` does not exist. Touches nothing on disk.
    pub fn check_input(&self, phase: Phase) -> Result<(), PipelineError> {
        let dir = match phase {
            Phase::Adjust => &self.raw_data_dir,
            Phase::Process => &self.adjusted_data_dir,
        };
        if dir.is_dir() {
            Ok(())
        } else {
            Err(PipelineError::MissingInputDirectory(dir.clone()))
        }
    }

    /// Derives the weekly history of every raw file into the adjusted-data
    /// directory. A skipped file also loses any derived file left by an
    /// earlier run, so it cannot reach the process phase.
    pub fn adjust(&self) -> Result<AdjustOutcome, PipelineError> {
        let start = Instant::now();
        let files = self.discover(&self.raw_data_dir)?;
        ensure_dir(&self.adjusted_data_dir)?;
        tracing::info!(
            files = files.len(),
            dir = %self.raw_data_dir.display(),
            "Adjust phase started"
        );

        let span = progress_span(tracing::info_span!("adjust"), files.len())?;
        let _entered = span.enter();
        let mut counts = PhaseCounts::default();
        for path in &files {
            match self.adjust_file(path) {
                Ok(weeks) => {
                    tracing::debug!(file = %path.display(), weeks, "Derived weekly history");
                    counts.processed += 1;
                }
                Err(e) => {
                    skip_file(path, e, &mut counts)?;
                    self.discard_derived(path)?;
                }
            }
            span.pb_inc(1);
        }

        let elapsed = start.elapsed();
        tracing::info!(
            processed = counts.processed,
            skipped = counts.skipped,
            elapsed = ?elapsed,
            "Adjust phase finished"
        );
        Ok(AdjustOutcome {
            files: counts,
            elapsed,
        })
    }

    /// Aggregates, rolls up, scores and reports the derived histories.
    pub fn process(&self) -> Result<ProcessOutcome, PipelineError> {
        let start = Instant::now();
        let files = self.discover(&self.adjusted_data_dir)?;
        tracing::info!(
            files = files.len(),
            dir = %self.adjusted_data_dir.display(),
            "Process phase started"
        );

        let mut counts = PhaseCounts::default();
        let mut instruments = Vec::with_capacity(files.len());
        {
            let span = progress_span(tracing::info_span!("process"), files.len())?;
            let _entered = span.enter();
            for path in &files {
                match self.repository.read_derived(path) {
                    Ok(records) => {
                        instruments.push(InstrumentSeries::new(instrument_id(path), records));
                        counts.processed += 1;
                    }
                    Err(e) => skip_file(path, e, &mut counts)?,
                }
                span.pb_inc(1);
            }
        }

        let aggregation = aggregate(instruments);
        let win_loss = aggregation.tallies.to_rows();
        let rollup = rollup(aggregation.weekly);
        let report = self.engine.compare(
            &rollup.yearly_returns(),
            Some(rollup.weighted_return_pct),
            &self.benchmark,
        )?;

        let artifacts = self.writer.write(&ReportInputs {
            yearly: &rollup.years,
            summary: &rollup.summary,
            win_loss: &win_loss,
            metrics: &report,
            benchmark: &self.benchmark,
        })?;

        let elapsed = start.elapsed();
        tracing::info!(
            processed = counts.processed,
            skipped = counts.skipped,
            years = rollup.years.len(),
            artifacts = artifacts.len(),
            elapsed = ?elapsed,
            "Process phase finished"
        );
        Ok(ProcessOutcome {
            files: counts,
            rollup,
            win_loss,
            metrics: report.published(),
            artifacts,
            elapsed,
        })
    }

    /// Adjust followed by process.
    pub fn run(&self) -> Result<RunOutcome, PipelineError> {
        let start = Instant::now();
        let adjust = self.adjust()?;
        let process = self.process()?;
        let elapsed = start.elapsed();
        tracing::info!(elapsed = ?elapsed, "Run finished");
        Ok(RunOutcome {
            adjust,
            process,
            elapsed,
        })
    }

    fn discover(&self, dir: &Path) -> Result<Vec<PathBuf>, PipelineError> {
        list_instrument_files(dir, &self.file_extension).map_err(|e| match e {
            DataError::MissingDirectory(dir) => PipelineError::MissingInputDirectory(dir),
            other => other.into(),
        })
    }

    /// Returns the number of derived weeks written.
    fn adjust_file(&self, path: &Path) -> Result<usize, DataError> {
        let file_name = path
            .file_name()
            .ok_or_else(|| DataError::NotAFile(path.to_path_buf()))?;
        let raw = self.repository.read_raw(path)?;
        let derived = transformer::transform(raw);
        self.repository
            .write_derived(&self.adjusted_data_dir.join(file_name), &derived)?;
        Ok(derived.len())
    }

    /// Removes the derived counterpart of a raw file, if there is one.
    fn discard_derived(&self, raw_path: &Path) -> Result<(), DataError> {
        let Some(file_name) = raw_path.file_name() else {
            return Ok(());
        };
        let stale = self.adjusted_data_dir.join(file_name);
        match fs::remove_file(&stale) {
            Ok(()) => {
                tracing::debug!(file = %stale.display(), "Removed derived file of a skipped instrument");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(DataError::Io { path: stale, source }),
        }
    }
}

/// Attaches a per-file progress bar to `span`. The bar is drawn while the span
/// is entered, when a `tracing-indicatif` layer is installed.
fn progress_span(span: Span, len: usize) -> Result<Span, PipelineError> {
    span.pb_set_style(
        &ProgressStyle::default_bar()
            .template(PROGRESS_TEMPLATE)?
            .progress_chars("=>-"),
    );
    span.pb_set_length(len as u64);
    Ok(span)
}

/// Counts a file-local failure as a skip; anything else propagates.
fn skip_file(path: &Path, error: DataError, counts: &mut PhaseCounts) -> Result<(), PipelineError> {
    if !error.is_file_local() {
        return Err(error.into());
    }
    match &error {
        DataError::MissingColumns { missing, .. } => tracing::warn!(
            file = %path.display(),
            missing = %missing.join(", "),
            "Skipping file without the required columns"
        ),
        _ => tracing::warn!(file = %path.display(), error = %error, "Skipping unreadable file"),
    }
    counts.skipped += 1;
    Ok(())
}
