use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Variance {0} has no square root")]
    SquareRoot(Decimal),
}
