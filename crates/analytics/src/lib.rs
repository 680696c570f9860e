//! # Risk-Adjusted Metrics Engine
//!
//! This crate judges a series of yearly percentage returns: mean return,
//! volatility, Sharpe-like and Sortino-like ratios and worst year. It then
//! lines the strategy up against a benchmark.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** no knowledge of files or formats. It depends only on
//!   `core-types`.
//! - **Stateless Calculation:** the `AnalyticsEngine` holds nothing but the
//!   risk-free rate. The same inputs always produce the same `MetricBundle`.
//! - **Injected Benchmark:** the benchmark is a `BenchmarkSeries` argument, so
//!   alternate reference data never requires touching the engine.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: computes `MetricBundle`s and the strategy/benchmark comparison.
//! - `MetricBundle`, `DifferenceBundle`, `RiskAdjustedReport`: the outputs.
//! - `AnalyticsError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod math;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{AnalyticsEngine, DEFAULT_RISK_FREE_RATE};
pub use error::AnalyticsError;
pub use report::{DifferenceBundle, MetricBundle, RiskAdjustedReport};
