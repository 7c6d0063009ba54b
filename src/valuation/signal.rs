use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete trade recommendation derived from the annualized carry return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeSignal {
    StrongBuy,
    Buy,
    Neutral,
    Sell,
    StrongSell,
}

/// Direction a signal leans, for colouring in a presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalTone {
    Positive,
    Neutral,
    Negative,
}

impl TradeSignal {
    /// Band an annualized return (in percent).
    ///
    /// | annualized        | signal      |
    /// |-------------------|-------------|
    /// | `> 3`             | STRONG_BUY  |
    /// | `(1, 3]`          | BUY         |
    /// | `[-1, 1]`         | NEUTRAL     |
    /// | `[-3, -1)`        | SELL        |
    /// | `< -3`            | STRONG_SELL |
    pub fn classify(annualized_return_pct: Decimal) -> Self {
        let three = Decimal::from(3);
        let x = annualized_return_pct;
        if x > three {
            TradeSignal::StrongBuy
        } else if x > Decimal::ONE {
            TradeSignal::Buy
        } else if x >= -Decimal::ONE {
            TradeSignal::Neutral
        } else if x >= -three {
            TradeSignal::Sell
        } else {
            TradeSignal::StrongSell
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TradeSignal::StrongBuy => "STRONG BUY",
            TradeSignal::Buy => "BUY",
            TradeSignal::Neutral => "NEUTRAL",
            TradeSignal::Sell => "SELL",
            TradeSignal::StrongSell => "STRONG SELL",
        }
    }

    pub fn tone(&self) -> SignalTone {
        match self {
            TradeSignal::StrongBuy | TradeSignal::Buy => SignalTone::Positive,
            TradeSignal::Neutral => SignalTone::Neutral,
            TradeSignal::Sell | TradeSignal::StrongSell => SignalTone::Negative,
        }
    }
}

impl fmt::Display for TradeSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Free-function form of [`TradeSignal::classify`].
pub fn classify_signal(annualized_return_pct: Decimal) -> TradeSignal {
    TradeSignal::classify(annualized_return_pct)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(classify_signal(dec!(3.0001)), TradeSignal::StrongBuy);
        assert_eq!(classify_signal(dec!(3.0)), TradeSignal::Buy);
        assert_eq!(classify_signal(dec!(1.0001)), TradeSignal::Buy);
        assert_eq!(classify_signal(dec!(1.0)), TradeSignal::Neutral);
        assert_eq!(classify_signal(Decimal::ZERO), TradeSignal::Neutral);
        assert_eq!(classify_signal(dec!(-1.0)), TradeSignal::Neutral);
        assert_eq!(classify_signal(dec!(-1.0001)), TradeSignal::Sell);
        assert_eq!(classify_signal(dec!(-3.0)), TradeSignal::Sell);
        assert_eq!(classify_signal(dec!(-3.0001)), TradeSignal::StrongSell);
    }

    #[test]
    fn test_extremes() {
        assert_eq!(classify_signal(dec!(250)), TradeSignal::StrongBuy);
        assert_eq!(classify_signal(dec!(-250)), TradeSignal::StrongSell);
    }

    #[test]
    fn test_tone_and_label() {
        assert_eq!(TradeSignal::StrongBuy.tone(), SignalTone::Positive);
        assert_eq!(TradeSignal::Neutral.tone(), SignalTone::Neutral);
        assert_eq!(TradeSignal::Sell.tone(), SignalTone::Negative);
        assert_eq!(TradeSignal::StrongSell.to_string(), "STRONG SELL");
    }

    #[test]
    fn test_serializes_screaming_snake() {
        let json = serde_json::to_string(&TradeSignal::StrongBuy).unwrap();
        assert_eq!(json, "\"STRONG_BUY\"");
    }
}
