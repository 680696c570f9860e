use core_types::math::{REPORT_DP, round_to, round2};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Risk-adjusted performance of one series of yearly percent returns.
///
/// All figures are in percent except the two ratios, which are unitless.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricBundle {
    pub average_return: Decimal,
    /// Sample standard deviation of the yearly returns.
    pub volatility: Decimal,
    pub sharpe_ratio: Decimal,
    pub sortino_ratio: Decimal,
    /// The worst single-year return.
    pub max_drawdown: Decimal,
    /// Sample standard deviation of the negative yearly returns only.
    pub downside_volatility: Decimal,
}

impl MetricBundle {
    /// A copy with every figure rounded to `dp` places.
    pub fn rounded(&self, dp: u32) -> Self {
        Self {
            average_return: round_to(self.average_return, dp),
            volatility: round_to(self.volatility, dp),
            sharpe_ratio: round_to(self.sharpe_ratio, dp),
            sortino_ratio: round_to(self.sortino_ratio, dp),
            max_drawdown: round_to(self.max_drawdown, dp),
            downside_volatility: round_to(self.downside_volatility, dp),
        }
    }
}

/// Strategy minus benchmark for the four headline metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifferenceBundle {
    pub average_return: Decimal,
    pub sharpe_ratio: Decimal,
    pub sortino_ratio: Decimal,
    pub max_drawdown: Decimal,
}

impl DifferenceBundle {
    /// Field-wise `strategy - benchmark`, rounded to 2 places.
    pub fn between(strategy: &MetricBundle, benchmark: &MetricBundle) -> Self {
        Self {
            average_return: round2(strategy.average_return - benchmark.average_return),
            sharpe_ratio: round2(strategy.sharpe_ratio - benchmark.sharpe_ratio),
            sortino_ratio: round2(strategy.sortino_ratio - benchmark.sortino_ratio),
            max_drawdown: round2(strategy.max_drawdown - benchmark.max_drawdown),
        }
    }
}

/// The three-section comparison of a strategy with its benchmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAdjustedReport {
    pub benchmark_name: String,
    pub benchmark_version: String,
    pub strategy: MetricBundle,
    pub benchmark: MetricBundle,
    pub difference: DifferenceBundle,
}

impl RiskAdjustedReport {
    /// The report as published: both bundles rounded to 2 places.
    pub fn published(&self) -> Self {
        Self {
            benchmark_name: self.benchmark_name.clone(),
            benchmark_version: self.benchmark_version.clone(),
            strategy: self.strategy.rounded(REPORT_DP),
            benchmark: self.benchmark.rounded(REPORT_DP),
            difference: self.difference,
        }
    }
}
