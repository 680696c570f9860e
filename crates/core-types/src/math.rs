use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub const HUNDRED: Decimal = dec!(100);

/// Number of decimal places every published figure is rounded to.
pub const REPORT_DP: u32 = 2;

/// Divides `numerator` by `denominator`, returning zero when the denominator is
/// zero or the quotient overflows.
///
/// Every ratio in the pipeline goes through this function so that a degenerate
/// input (no risk taken, no volatility, no observations) yields 0 instead of a
/// fault.
pub fn safe_div(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}

/// `part / whole * 100`, zero-guarded. Saturates at the `Decimal` bounds
/// instead of overflowing.
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    safe_div(part, whole).saturating_mul(HUNDRED)
}

/// Rounds to `dp` places with banker's rounding and fixes the scale at `dp`,
/// so `20` is carried (and printed) as `20.00`. Idempotent.
pub fn round_to(value: Decimal, dp: u32) -> Decimal {
    let mut rounded = value.round_dp(dp);
    rounded.rescale(dp);
    rounded
}

/// [`round_to`] at [`REPORT_DP`] places.
pub fn round2(value: Decimal) -> Decimal {
    round_to(value, REPORT_DP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn safe_div_guards_zero_denominator() {
        assert_eq!(safe_div(dec!(5), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(safe_div(dec!(5), dec!(2)), dec!(2.5));
    }

    #[test]
    fn percent_of_zero_whole_is_zero() {
        assert_eq!(percent_of(dec!(3), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(percent_of(dec!(3), dec!(4)), dec!(75));
    }

    #[test]
    fn percent_of_saturates_instead_of_overflowing() {
        assert_eq!(percent_of(Decimal::MAX, Decimal::ONE), Decimal::MAX);
        assert_eq!(percent_of(Decimal::MIN, Decimal::ONE), Decimal::MIN);
    }

    #[rstest]
    #[case(dec!(1.005), dec!(1.00))]
    #[case(dec!(1.015), dec!(1.02))]
    #[case(dec!(-2.3449), dec!(-2.34))]
    #[case(dec!(6.666666), dec!(6.67))]
    fn round2_uses_bankers_rounding(#[case] input: Decimal, #[case] expected: Decimal) {
        assert_eq!(round2(input), expected);
    }

    #[rstest]
    #[case(dec!(10.4089))]
    #[case(dec!(-0.125))]
    #[case(dec!(3.14159265))]
    fn round2_is_idempotent(#[case] input: Decimal) {
        let once = round2(input);
        assert_eq!(round2(once), once);
        assert_eq!(round2(once).to_string(), once.to_string());
    }

    #[test]
    fn round2_pads_to_two_places() {
        assert_eq!(round2(dec!(20)).to_string(), "20.00");
        assert_eq!(round2(dec!(-1.5)).to_string(), "-1.50");
    }
}
