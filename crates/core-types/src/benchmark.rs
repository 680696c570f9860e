use crate::error::CoreError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A versioned table of calendar-year percentage returns for an external
/// benchmark.
///
/// Strategy results are compared against this series year by year. Years the
/// table does not cover count as a 0% return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkSeries {
    pub name: String,
    pub version: String,
    returns: BTreeMap<i32, Decimal>,
}

impl BenchmarkSeries {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        returns: BTreeMap<i32, Decimal>,
    ) -> Result<Self, CoreError> {
        let name = name.into();
        if returns.is_empty() {
            return Err(CoreError::EmptyBenchmark(name));
        }
        Ok(Self {
            name,
            version: version.into(),
            returns,
        })
    }

    /// S&P 500 calendar-year total returns, 2000 through 2024.
    pub fn sp500() -> Self {
        let returns = BTreeMap::from([
            (2000, dec!(-9.10)),
            (2001, dec!(-11.89)),
            (2002, dec!(-22.10)),
            (2003, dec!(28.68)),
            (2004, dec!(10.88)),
            (2005, dec!(4.91)),
            (2006, dec!(15.79)),
            (2007, dec!(5.49)),
            (2008, dec!(-37.00)),
            (2009, dec!(26.46)),
            (2010, dec!(15.06)),
            (2011, dec!(2.11)),
            (2012, dec!(16.00)),
            (2013, dec!(32.39)),
            (2014, dec!(13.69)),
            (2015, dec!(1.38)),
            (2016, dec!(11.96)),
            (2017, dec!(21.83)),
            (2018, dec!(-4.38)),
            (2019, dec!(31.49)),
            (2020, dec!(18.40)),
            (2021, dec!(28.71)),
            (2022, dec!(-18.11)),
            (2023, dec!(26.29)),
            (2024, dec!(25.02)),
        ]);
        Self {
            name: "S&P 500".to_string(),
            version: "total-return-2000-2024".to_string(),
            returns,
        }
    }

    /// The benchmark return for `year`, or zero when the table has no entry.
    pub fn return_for(&self, year: i32) -> Decimal {
        self.returns.get(&year).copied().unwrap_or(Decimal::ZERO)
    }

    /// Benchmark returns aligned with `years`, in the same order.
    pub fn returns_for(&self, years: &[i32]) -> Vec<Decimal> {
        years.iter().map(|&year| self.return_for(year)).collect()
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.returns.keys().copied()
    }
}

impl Default for BenchmarkSeries {
    fn default() -> Self {
        Self::sp500()
    }
}
