//! SVG bar/line chart of yearly strategy returns against the benchmark.

use crate::error::ReportError;
use core_types::{BenchmarkSeries, YearlySummary};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::fmt::Write;

const WIDTH: f64 = 960.0;
const HEIGHT: f64 = 640.0;
const MARGIN_LEFT: f64 = 72.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 56.0;
const MARGIN_BOTTOM: f64 = 88.0;
const STRATEGY_COLOR: &str = "#1f4fbf";
const BENCHMARK_COLOR: &str = "#d62728";
const GRID_COLOR: &str = "#e0e0e0";
const Y_TICKS: usize = 5;

/// Maps values onto the vertical pixel axis of the plot area.
struct ValueScale {
    lo: f64,
    hi: f64,
}

impl ValueScale {
    /// Covers every value and zero, padded by 10% on each side.
    fn covering(values: &[f64]) -> Self {
        let (lo, hi) = values
            .iter()
            .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
        let span = if hi - lo < f64::EPSILON { 1.0 } else { hi - lo };
        Self {
            lo: lo - span * 0.1,
            hi: hi + span * 0.1,
        }
    }

    fn y(&self, value: f64) -> f64 {
        let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        MARGIN_TOP + (self.hi - value) / (self.hi - self.lo) * plot_height
    }
}

fn to_f64(value: Decimal) -> Result<f64, ReportError> {
    value
        .to_f64()
        .ok_or_else(|| ReportError::Chart(format!("value {value} is not plottable")))
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Renders the yearly strategy returns as bars and the benchmark returns for
/// the same years as a line.
pub fn render_yearly_chart(
    years: &[YearlySummary],
    benchmark: &BenchmarkSeries,
) -> Result<String, ReportError> {
    if years.is_empty() {
        return Err(ReportError::Chart("no yearly rows to plot".to_string()));
    }

    let strategy = years
        .iter()
        .map(|y| to_f64(y.yearly_return_pct))
        .collect::<Result<Vec<_>, _>>()?;
    let reference = years
        .iter()
        .map(|y| to_f64(benchmark.return_for(y.year)))
        .collect::<Result<Vec<_>, _>>()?;

    let all: Vec<f64> = strategy.iter().chain(&reference).copied().collect();
    let scale = ValueScale::covering(&all);
    let plot_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let band = plot_width / years.len() as f64;
    let bar_width = band * 0.6;
    let x_center = |i: usize| MARGIN_LEFT + band * (i as f64 + 0.5);
    let zero_y = scale.y(0.0);
    let benchmark_name = escape(&benchmark.name);

    let mut svg = String::new();
    // `write!` into a String cannot fail
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}">"#
    );
    svg.push_str(
        "<style>text{font-family:Arial,sans-serif;font-size:11px;fill:#333}.title{font-size:16px;font-weight:bold}</style>",
    );
    let _ = write!(
        svg,
        r#"<rect width="{WIDTH}" height="{HEIGHT}" fill="white"/><text class="title" x="{}" y="28" text-anchor="middle">Yearly Return % - Strategy vs {benchmark_name}</text>"#,
        WIDTH / 2.0
    );

    for k in 0..=Y_TICKS {
        let value = scale.lo + (scale.hi - scale.lo) * k as f64 / Y_TICKS as f64;
        let y = scale.y(value);
        let _ = write!(
            svg,
            r#"<line x1="{MARGIN_LEFT}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="{GRID_COLOR}"/><text x="{:.1}" y="{:.1}" text-anchor="end">{value:.0}%</text>"#,
            WIDTH - MARGIN_RIGHT,
            MARGIN_LEFT - 6.0,
            y + 4.0
        );
    }
    let _ = write!(
        svg,
        r##"<line x1="{MARGIN_LEFT}" y1="{zero_y:.1}" x2="{:.1}" y2="{zero_y:.1}" stroke="#888"/>"##,
        WIDTH - MARGIN_RIGHT
    );

    for (i, (summary, value)) in years.iter().zip(&strategy).enumerate() {
        let x = x_center(i);
        let top = scale.y(*value).min(zero_y);
        let height = (scale.y(*value) - zero_y).abs();
        let label_y = if *value >= 0.0 { top - 4.0 } else { top + height + 12.0 };
        let _ = write!(
            svg,
            r#"<rect x="{:.1}" y="{top:.1}" width="{bar_width:.1}" height="{height:.1}" fill="{STRATEGY_COLOR}" fill-opacity="0.7"/><text x="{x:.1}" y="{label_y:.1}" text-anchor="middle" font-size="9">{value:.1}%</text>"#,
            x - bar_width / 2.0
        );
        let label_y = HEIGHT - MARGIN_BOTTOM + 18.0;
        let _ = write!(
            svg,
            r#"<text x="{x:.1}" y="{label_y:.1}" text-anchor="end" transform="rotate(-45 {x:.1} {label_y:.1})">{}</text>"#,
            summary.year
        );
    }

    let points: Vec<String> = reference
        .iter()
        .enumerate()
        .map(|(i, v)| format!("{:.1},{:.1}", x_center(i), scale.y(*v)))
        .collect();
    let _ = write!(
        svg,
        r#"<polyline points="{}" fill="none" stroke="{BENCHMARK_COLOR}" stroke-width="2"/>"#,
        points.join(" ")
    );
    for (i, v) in reference.iter().enumerate() {
        let _ = write!(
            svg,
            r#"<circle cx="{:.1}" cy="{:.1}" r="4" fill="{BENCHMARK_COLOR}"/>"#,
            x_center(i),
            scale.y(*v)
        );
    }

    let legend_x = MARGIN_LEFT + 12.0;
    let _ = write!(
        svg,
        r#"<rect x="{legend_x}" y="{}" width="14" height="10" fill="{STRATEGY_COLOR}" fill-opacity="0.7"/><text x="{}" y="{}">Strategy</text>"#,
        MARGIN_TOP + 4.0,
        legend_x + 20.0,
        MARGIN_TOP + 13.0
    );
    let _ = write!(
        svg,
        r#"<line x1="{legend_x}" y1="{}" x2="{}" y2="{}" stroke="{BENCHMARK_COLOR}" stroke-width="2"/><text x="{}" y="{}">{benchmark_name}</text>"#,
        MARGIN_TOP + 25.0,
        legend_x + 14.0,
        MARGIN_TOP + 25.0,
        legend_x + 20.0,
        MARGIN_TOP + 29.0
    );
    let _ = write!(
        svg,
        r#"<text x="{}" y="{}" text-anchor="middle">Year</text><text x="18" y="{}" text-anchor="middle" transform="rotate(-90 18 {})">Percent (%)</text></svg>"#,
        WIDTH / 2.0,
        HEIGHT - 12.0,
        HEIGHT / 2.0,
        HEIGHT / 2.0
    );

    Ok(svg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn year(year: i32, ret: Decimal) -> YearlySummary {
        YearlySummary {
            year,
            yearly_risk: dec!(10),
            yearly_profit: dec!(1),
            yearly_return_pct: ret,
            cumulative_return_pct: ret,
        }
    }

    #[test]
    fn renders_one_bar_and_one_marker_per_year() {
        let svg = render_yearly_chart(
            &[year(2019, dec!(12.5)), year(2020, dec!(-4))],
            &BenchmarkSeries::sp500(),
        )
        .unwrap();

        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("<circle").count(), 2);
        assert!(svg.contains("12.5%"));
        assert!(svg.contains("-4.0%"));
        assert!(svg.contains(">2019<"));
        // the benchmark name is escaped
        assert!(svg.contains("S&amp;P 500"));
        assert!(!svg.contains("S&P"));
    }

    #[test]
    fn empty_input_is_a_render_failure() {
        let err = render_yearly_chart(&[], &BenchmarkSeries::sp500()).unwrap_err();
        assert!(matches!(err, ReportError::Chart(_)));
    }
}
