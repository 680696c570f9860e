use crate::error::AnalyticsError;
use crate::math::{downside_deviation, mean, sample_std_dev};
use crate::report::{DifferenceBundle, MetricBundle, RiskAdjustedReport};
use core_types::BenchmarkSeries;
use core_types::math::safe_div;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Reference rate, in percent, used when none is configured.
pub const DEFAULT_RISK_FREE_RATE: Decimal = dec!(2.0);

/// A stateless calculator for risk-adjusted metrics over yearly returns.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    risk_free_rate: Decimal,
}

impl AnalyticsEngine {
    pub fn new(risk_free_rate: Decimal) -> Self {
        Self { risk_free_rate }
    }

    pub fn risk_free_rate(&self) -> Decimal {
        self.risk_free_rate
    }

    /// Computes the metric bundle of one series of yearly percent returns.
    ///
    /// # Arguments
    ///
    /// * `returns` - Yearly percent returns in ascending year order.
    /// * `average_override` - A true average return to use instead of the naive
    ///   mean. The strategy passes its risk-weighted return here, because its
    ///   yearly returns do not carry equal capital.
    ///
    /// Degenerate inputs never fail: no volatility means a zero ratio, and an
    /// empty series means zero everywhere.
    pub fn calculate(
        &self,
        returns: &[Decimal],
        average_override: Option<Decimal>,
    ) -> Result<MetricBundle, AnalyticsError> {
        let average_return = average_override.unwrap_or_else(|| mean(returns));
        let volatility = sample_std_dev(returns)?;
        let downside_volatility = downside_deviation(returns)?;
        let excess = average_return - self.risk_free_rate;

        Ok(MetricBundle {
            average_return,
            volatility,
            sharpe_ratio: safe_div(excess, volatility),
            sortino_ratio: safe_div(excess, downside_volatility),
            max_drawdown: Self::worst_year(returns),
            downside_volatility,
        })
    }

    /// Scores the strategy and the benchmark over the same years and reports
    /// both bundles with their difference.
    ///
    /// Years the benchmark does not cover count as a 0% benchmark return.
    pub fn compare(
        &self,
        strategy_returns: &[(i32, Decimal)],
        strategy_average: Option<Decimal>,
        benchmark: &BenchmarkSeries,
    ) -> Result<RiskAdjustedReport, AnalyticsError> {
        let years: Vec<i32> = strategy_returns.iter().map(|(year, _)| *year).collect();
        let strategy_series: Vec<Decimal> = strategy_returns.iter().map(|(_, r)| *r).collect();
        let benchmark_series = benchmark.returns_for(&years);

        let strategy = self.calculate(&strategy_series, strategy_average)?;
        let benchmark_bundle = self.calculate(&benchmark_series, None)?;
        let difference = DifferenceBundle::between(&strategy, &benchmark_bundle);

        tracing::info!(
            benchmark = %benchmark.name,
            years = years.len(),
            strategy_sharpe = %strategy.sharpe_ratio.round_dp(2),
            benchmark_sharpe = %benchmark_bundle.sharpe_ratio.round_dp(2),
            "Risk-adjusted metrics calculated"
        );

        Ok(RiskAdjustedReport {
            benchmark_name: benchmark.name.clone(),
            benchmark_version: benchmark.version.clone(),
            strategy,
            benchmark: benchmark_bundle,
            difference,
        })
    }

    /// The single worst yearly return; zero for an empty series.
    fn worst_year(returns: &[Decimal]) -> Decimal {
        returns.iter().copied().min().unwrap_or(Decimal::ZERO)
    }
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::new(DEFAULT_RISK_FREE_RATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn close_to(actual: Decimal, expected: Decimal) -> bool {
        (actual - expected).abs() < dec!(0.001)
    }

    #[test]
    fn metrics_for_three_year_series() {
        let bundle = AnalyticsEngine::default()
            .calculate(&[dec!(10), dec!(-5), dec!(15)], None)
            .unwrap();

        assert!(close_to(bundle.average_return, dec!(6.6667)));
        assert!(close_to(bundle.volatility, dec!(10.408)));
        assert!(close_to(bundle.sharpe_ratio, dec!(0.4484)));
        // a single negative year is not enough for a downside deviation
        assert_eq!(bundle.downside_volatility, Decimal::ZERO);
        assert_eq!(bundle.sortino_ratio, Decimal::ZERO);
        assert_eq!(bundle.max_drawdown, dec!(-5));
    }

    #[test]
    fn sortino_uses_downside_volatility() {
        let bundle = AnalyticsEngine::default()
            .calculate(&[dec!(20), dec!(-4), dec!(-8)], None)
            .unwrap();

        // mean 2.6667, downside deviation of [-4, -8] = 2.8284
        assert!(close_to(bundle.downside_volatility, dec!(2.8284)));
        assert!(close_to(bundle.sortino_ratio, dec!(0.2357)));
        assert_eq!(bundle.max_drawdown, dec!(-8));
    }

    #[test]
    fn override_replaces_the_naive_mean() {
        let engine = AnalyticsEngine::new(dec!(0));
        let bundle = engine.calculate(&[dec!(10), dec!(20)], Some(dec!(12))).unwrap();

        assert_eq!(bundle.average_return, dec!(12));
        // volatility still comes from the series itself
        assert!(close_to(bundle.volatility, dec!(7.0711)));
        assert!(close_to(bundle.sharpe_ratio, dec!(1.6971)));
    }

    #[test]
    fn flat_or_empty_series_are_guarded() {
        let engine = AnalyticsEngine::default();

        let flat = engine.calculate(&[dec!(4), dec!(4)], None).unwrap();
        assert_eq!(flat.volatility, Decimal::ZERO);
        assert_eq!(flat.sharpe_ratio, Decimal::ZERO);

        let empty = engine.calculate(&[], None).unwrap();
        assert_eq!(
            empty,
            MetricBundle {
                average_return: Decimal::ZERO,
                volatility: Decimal::ZERO,
                sharpe_ratio: Decimal::ZERO,
                sortino_ratio: Decimal::ZERO,
                max_drawdown: Decimal::ZERO,
                downside_volatility: Decimal::ZERO,
            }
        );
    }

    #[test]
    fn comparison_aligns_benchmark_years_and_subtracts() {
        let benchmark = BenchmarkSeries::new(
            "Index",
            "test",
            BTreeMap::from([(2020, dec!(10)), (2021, dec!(-20))]),
        )
        .unwrap();
        let engine = AnalyticsEngine::new(dec!(0));

        let report = engine
            .compare(
                &[(2020, dec!(5)), (2021, dec!(-5)), (2022, dec!(30))],
                Some(dec!(7.5)),
                &benchmark,
            )
            .unwrap();

        assert_eq!(report.benchmark_name, "Index");
        assert_eq!(report.strategy.average_return, dec!(7.5));
        // benchmark series is [10, -20, 0]: 2022 is outside the table
        assert!(close_to(report.benchmark.average_return, dec!(-3.3333)));
        assert_eq!(report.benchmark.max_drawdown, dec!(-20));
        assert_eq!(report.difference.average_return, dec!(10.83));
        assert_eq!(report.difference.max_drawdown, dec!(15));
    }

    #[test]
    fn published_report_rounds_to_two_places() {
        let report = AnalyticsEngine::default()
            .compare(&[(2020, dec!(10)), (2021, dec!(-5)), (2022, dec!(15))], None, &BenchmarkSeries::sp500())
            .unwrap()
            .published();

        assert_eq!(report.strategy.average_return, dec!(6.67));
        assert_eq!(report.strategy.volatility, dec!(10.41));
        assert_eq!(report.strategy.sharpe_ratio, dec!(0.45));

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("strategy").is_some());
        assert!(json.get("benchmark").is_some());
        assert!(json.get("difference").is_some());
    }
}
