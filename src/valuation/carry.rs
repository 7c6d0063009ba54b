use crate::core::currency::CurrencyPair;
use crate::report::{format_fixed, format_signed, format_signed_pct};
use crate::valuation::forward::{compute_forward_points, compute_forward_rate, CALENDAR_DAYS};
use crate::valuation::signal::TradeSignal;
use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid input to a carry valuation. Every variant is a caller contract
/// violation; nothing is computed when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CarryError {
    #[error("spot rate must be positive, got {0}")]
    NonPositiveSpot(Decimal),
    #[error("holding period must be at least one day")]
    NonPositiveHorizon,
    #[error(
        "base rate {base_rate}% over {horizon_days} days drives the forward denominator to zero or below"
    )]
    NonPositiveDenominator {
        base_rate: Decimal,
        horizon_days: u32,
    },
    #[error("arithmetic overflow computing {0}")]
    Overflow(&'static str),
}

/// Inputs to a single carry-trade valuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarryInputs {
    /// Pair being valued; only the quote currency matters (pip scale).
    pub pair: CurrencyPair,
    /// Price of one unit of base currency in quote currency.
    pub spot_rate: Decimal,
    /// Base-currency interest rate, percent per annum.
    pub base_rate: Decimal,
    /// Quote-currency interest rate, percent per annum.
    pub quote_rate: Decimal,
    pub horizon_days: u32,
    /// Notional in the base currency.
    pub investment: Decimal,
}

impl CarryInputs {
    pub fn new(
        pair: CurrencyPair,
        spot_rate: Decimal,
        base_rate: Decimal,
        quote_rate: Decimal,
        horizon_days: u32,
        investment: Decimal,
    ) -> Self {
        Self {
            pair,
            spot_rate,
            base_rate,
            quote_rate,
            horizon_days,
            investment,
        }
    }

    fn validate(&self) -> Result<(), CarryError> {
        if self.spot_rate <= Decimal::ZERO {
            return Err(CarryError::NonPositiveSpot(self.spot_rate));
        }
        if self.horizon_days == 0 {
            return Err(CarryError::NonPositiveHorizon);
        }
        Ok(())
    }
}

/// Outcome of a carry valuation. The input pair, spot, horizon and notional
/// are carried along so a renderer needs nothing else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarryResult {
    pub pair: CurrencyPair,
    pub spot_rate: Decimal,
    pub horizon_days: u32,
    pub investment: Decimal,
    pub forward_rate: Decimal,
    /// Forward premium/discount in pips.
    pub forward_points: Decimal,
    /// `quote_rate - base_rate`, percentage points.
    pub interest_differential: Decimal,
    /// Return over the holding period, percent.
    pub period_return_pct: Decimal,
    /// Period return scaled to a 365-day year, percent.
    pub annualized_return_pct: Decimal,
    /// Profit or loss on the notional, in the base currency.
    pub profit_loss: Decimal,
    pub signal: TradeSignal,
}

/// Stateless carry-trade valuation engine.
pub struct CarryEngine;

impl CarryEngine {
    /// Value a carry trade.
    ///
    /// # Algorithm
    ///
    /// 1. Forward rate by covered interest parity on a 360-day basis.
    /// 2. Forward points on the pair's pip scale.
    /// 3. Period return = `(forward / spot - 1) * 100`.
    /// 4. Annualized = `period * 365 / days`.
    /// 5. P&L = `investment * period / 100`.
    /// 6. Signal from the annualized return.
    ///
    /// # Examples
    ///
    /// ```
    /// use carry_engine::core::currency::CurrencyPair;
    /// use carry_engine::valuation::carry::{CarryEngine, CarryInputs};
    /// use carry_engine::valuation::signal::TradeSignal;
    /// use rust_decimal_macros::dec;
    ///
    /// let inputs = CarryInputs::new(
    ///     CurrencyPair::parse("EUR/USD").unwrap(),
    ///     dec!(1.085),
    ///     dec!(4.25),
    ///     dec!(5.50),
    ///     90,
    ///     dec!(10000),
    /// );
    /// let result = CarryEngine::evaluate(&inputs).unwrap();
    /// assert_eq!(result.forward_rate.round_dp(5), dec!(1.08835));
    /// assert_eq!(result.signal, TradeSignal::Buy);
    /// ```
    pub fn evaluate(inputs: &CarryInputs) -> Result<CarryResult, CarryError> {
        inputs.validate()?;

        let forward_rate = compute_forward_rate(
            inputs.spot_rate,
            inputs.base_rate,
            inputs.quote_rate,
            inputs.horizon_days,
        )?;
        let forward_points = compute_forward_points(inputs.spot_rate, forward_rate, &inputs.pair)?;
        let interest_differential = inputs
            .quote_rate
            .checked_sub(inputs.base_rate)
            .ok_or(CarryError::Overflow("interest differential"))?;

        let period_return_pct = forward_rate
            .checked_div(inputs.spot_rate)
            .and_then(|growth| growth.checked_sub(Decimal::ONE))
            .and_then(|growth| growth.checked_mul(dec!(100)))
            .ok_or(CarryError::Overflow("period return"))?;
        let annualized_return_pct = period_return_pct
            .checked_mul(Decimal::from(CALENDAR_DAYS))
            .ok_or(CarryError::Overflow("annualized return"))?
            / Decimal::from(inputs.horizon_days);
        let profit_loss = inputs
            .investment
            .checked_mul(period_return_pct)
            .ok_or(CarryError::Overflow("profit/loss"))?
            / dec!(100);

        let signal = TradeSignal::classify(annualized_return_pct);

        debug!(
            "carry {} {}d: fwd={} pts={} ann={}% -> {}",
            inputs.pair,
            inputs.horizon_days,
            forward_rate.round_dp(5),
            forward_points.round_dp(1),
            annualized_return_pct.round_dp(2),
            signal
        );

        Ok(CarryResult {
            pair: inputs.pair.clone(),
            spot_rate: inputs.spot_rate,
            horizon_days: inputs.horizon_days,
            investment: inputs.investment,
            forward_rate,
            forward_points,
            interest_differential,
            period_return_pct,
            annualized_return_pct,
            profit_loss,
            signal,
        })
    }
}

impl std::fmt::Display for CarryResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Carry Trade: {} ({} days) ===", self.pair, self.horizon_days)?;
        writeln!(f, "Spot Rate:          {}", format_fixed(self.spot_rate, 5))?;
        writeln!(f, "Forward Rate:       {}", format_fixed(self.forward_rate, 5))?;
        writeln!(f, "Forward Points:     {} pips", format_signed(self.forward_points, 1))?;
        writeln!(f, "Rate Differential:  {}", format_signed_pct(self.interest_differential, 2))?;
        writeln!(f, "Carry Return:       {}", format_signed_pct(self.period_return_pct, 3))?;
        writeln!(f, "Annualized Return:  {}", format_signed_pct(self.annualized_return_pct, 2))?;
        writeln!(
            f,
            "Profit/Loss:        {} {}",
            format_signed(self.profit_loss, 2),
            self.pair.base
        )?;
        writeln!(f, "Signal:             {}", self.signal)
    }
}
