//! Covered-interest-parity forward pricing.
//!
//! Forward rates use the money-market 360-day basis. Returns produced from
//! them are annualized on a 365-day calendar basis by the caller; the two
//! conventions are deliberately different and must not be unified.

use crate::core::currency::CurrencyPair;
use crate::valuation::carry::CarryError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Day-count basis for the forward-rate year fraction.
pub const MONEY_MARKET_DAYS: u32 = 360;

/// Day-count basis for annualizing period returns.
pub const CALENDAR_DAYS: u32 = 365;

/// `days / 360`.
pub fn year_fraction(horizon_days: u32) -> Decimal {
    Decimal::from(horizon_days) / Decimal::from(MONEY_MARKET_DAYS)
}

/// Accrual factor `1 + rate% / 100 * year_fraction`.
fn accrual_factor(rate_pct: Decimal, year_fraction: Decimal) -> Result<Decimal, CarryError> {
    (rate_pct / dec!(100))
        .checked_mul(year_fraction)
        .and_then(|interest| Decimal::ONE.checked_add(interest))
        .ok_or(CarryError::Overflow("accrual factor"))
}

/// Forward rate implied by covered interest parity.
///
/// `spot * (1 + q * d/360) / (1 + b * d/360)` with `b`, `q` the base and
/// quote annual rates in percent.
///
/// # Examples
///
/// ```
/// use carry_engine::valuation::forward::compute_forward_rate;
/// use rust_decimal_macros::dec;
///
/// // Equal rates leave the forward at spot.
/// let fwd = compute_forward_rate(dec!(1.085), dec!(4.25), dec!(4.25), 90).unwrap();
/// assert_eq!(fwd, dec!(1.085));
/// ```
pub fn compute_forward_rate(
    spot_rate: Decimal,
    base_rate_pct: Decimal,
    quote_rate_pct: Decimal,
    horizon_days: u32,
) -> Result<Decimal, CarryError> {
    if spot_rate <= Decimal::ZERO {
        return Err(CarryError::NonPositiveSpot(spot_rate));
    }
    if horizon_days == 0 {
        return Err(CarryError::NonPositiveHorizon);
    }

    let t = year_fraction(horizon_days);
    let numerator = accrual_factor(quote_rate_pct, t)?;
    let denominator = accrual_factor(base_rate_pct, t)?;
    if denominator <= Decimal::ZERO {
        return Err(CarryError::NonPositiveDenominator {
            base_rate: base_rate_pct,
            horizon_days,
        });
    }

    // Ratio first: identical rates give exactly 1 and the forward stays at spot.
    let ratio = numerator
        .checked_div(denominator)
        .ok_or(CarryError::Overflow("forward ratio"))?;
    spot_rate
        .checked_mul(ratio)
        .ok_or(CarryError::Overflow("forward rate"))
}

/// Forward premium (positive) or discount (negative) in pips.
pub fn compute_forward_points(
    spot_rate: Decimal,
    forward_rate: Decimal,
    pair: &CurrencyPair,
) -> Result<Decimal, CarryError> {
    forward_rate
        .checked_sub(spot_rate)
        .and_then(|premium| premium.checked_mul(pair.pip_multiplier()))
        .ok_or(CarryError::Overflow("forward points"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_fraction_uses_360_days() {
        assert_eq!(year_fraction(90), dec!(0.25));
        assert_eq!(year_fraction(360), Decimal::ONE);
    }

    #[test]
    fn test_forward_rate_eur_usd_90d() {
        let fwd = compute_forward_rate(dec!(1.085), dec!(4.25), dec!(5.50), 90).unwrap();
        assert_eq!(fwd.round_dp(5), dec!(1.08835));
    }

    #[test]
    fn test_forward_rate_discount_when_base_yields_more() {
        let fwd = compute_forward_rate(dec!(147.60), dec!(5.50), dec!(0.10), 180).unwrap();
        assert!(fwd < dec!(147.60));
    }

    #[test]
    fn test_equal_rates_keep_spot() {
        for days in [1, 7, 30, 90, 180, 365, 730] {
            let fwd = compute_forward_rate(dec!(0.8575), dec!(3.3), dec!(3.3), days).unwrap();
            assert_eq!(fwd, dec!(0.8575), "days = {}", days);
        }
    }

    #[test]
    fn test_negative_rates_allowed() {
        let fwd = compute_forward_rate(dec!(0.96), dec!(-0.75), dec!(4.25), 90).unwrap();
        assert!(fwd > dec!(0.96));
    }

    #[test]
    fn test_zero_spot_rejected() {
        let result = compute_forward_rate(Decimal::ZERO, dec!(1), dec!(2), 90);
        assert_eq!(result, Err(CarryError::NonPositiveSpot(Decimal::ZERO)));
    }

    #[test]
    fn test_zero_horizon_rejected() {
        let result = compute_forward_rate(dec!(1.1), dec!(1), dec!(2), 0);
        assert_eq!(result, Err(CarryError::NonPositiveHorizon));
    }

    #[test]
    fn test_denominator_must_be_positive() {
        // -100% over a full 360-day year zeroes the denominator.
        let result = compute_forward_rate(dec!(1.1), dec!(-100), dec!(2), 360);
        assert!(matches!(result, Err(CarryError::NonPositiveDenominator { .. })));

        let result = compute_forward_rate(dec!(1.1), dec!(-500), dec!(2), 90);
        assert!(matches!(result, Err(CarryError::NonPositiveDenominator { .. })));
    }

    #[test]
    fn test_forward_points_pip_scale() {
        let eur_usd = CurrencyPair::parse("EUR/USD").unwrap();
        let usd_jpy = CurrencyPair::parse("USD/JPY").unwrap();
        assert_eq!(compute_forward_points(dec!(1.0850), dec!(1.0860), &eur_usd), Ok(dec!(10)));
        assert_eq!(compute_forward_points(dec!(150.00), dec!(149.50), &usd_jpy), Ok(dec!(-50)));
    }

    #[test]
    fn test_forward_points_differ_by_100x_on_same_delta() {
        let eur_usd = CurrencyPair::parse("EUR/USD").unwrap();
        let usd_jpy = CurrencyPair::parse("USD/JPY").unwrap();
        let non_jpy = compute_forward_points(dec!(1.2), dec!(1.2345), &eur_usd).unwrap();
        let jpy = compute_forward_points(dec!(1.2), dec!(1.2345), &usd_jpy).unwrap();
        assert_eq!(non_jpy, jpy * dec!(100));
    }

    #[test]
    fn test_forward_points_overflow() {
        // A 1e25 premium does not fit once scaled by 10 000.
        let eur_usd = CurrencyPair::parse("EUR/USD").unwrap();
        let spot = Decimal::from_i128_with_scale(10_i128.pow(25), 0);
        let result = compute_forward_points(spot, spot * dec!(2), &eur_usd);
        assert_eq!(result, Err(CarryError::Overflow("forward points")));
    }
}
