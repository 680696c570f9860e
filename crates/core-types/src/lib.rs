//! Shared vocabulary for the weekly analytics pipeline.
//!
//! Every stage of the pipeline speaks in the types defined here: the raw and
//! derived weekly records of a single instrument, the cross-instrument weekly
//! aggregate, the yearly summary rows, and the benchmark reference data.
//! The `math` module holds the two numeric primitives every stage relies on:
//! the zero-guarded division and 2-decimal rounding.

pub mod benchmark;
pub mod error;
pub mod math;
pub mod parse;
pub mod records;

// Re-export the core types to provide a clean public API.
pub use benchmark::BenchmarkSeries;
pub use error::CoreError;
pub use records::{
    AdjustedSummary, DerivedWeeklyRecord, InstrumentSeries, RawWeeklyRecord, WeeklyAggregate,
    WinLossRow, YearlySummary,
};
