//! # Report Writer
//!
//! Renders the finished results of a run. Nothing here computes a figure: the
//! tables, the metrics report and the chart are straight renderings of what the
//! pipeline hands over.
//!
//! ## Public API
//!
//! - `ReportWriter`: writes every artifact into the results directory.
//! - `ReportInputs`: the borrowed results of a run.
//! - `chart::render_yearly_chart`: the strategy vs benchmark SVG.
//! - `console`: `comfy-table` renderings for the terminal.

pub mod chart;
pub mod console;
pub mod error;
pub mod tables;
pub mod writer;

pub use error::ReportError;
pub use writer::{ReportInputs, ReportWriter, artifact_names};
