use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// ISO 4217-style currency code.
///
/// # Examples
///
/// ```
/// use carry_engine::core::currency::CurrencyCode;
///
/// let eur = CurrencyCode::new("EUR");
/// let usd = CurrencyCode::new("usd");
/// assert_ne!(eur, usd);
/// assert_eq!(usd.as_str(), "USD");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Create a currency code. Codes are stored upper-case.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_jpy(&self) -> bool {
        self.0 == "JPY"
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CurrencyCode {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

/// Errors arising from FX rate operations.
#[derive(Debug, Error)]
pub enum FxError {
    #[error("no FX rate available for {from} -> {to}")]
    RateNotFound {
        from: CurrencyCode,
        to: CurrencyCode,
    },
    #[error("FX rate must be positive, got {rate} for {from} -> {to}")]
    InvalidRate {
        from: CurrencyCode,
        to: CurrencyCode,
        rate: Decimal,
    },
    #[error("invalid currency pair '{0}': expected BASE/QUOTE with two different currencies")]
    InvalidPair(String),
    #[error("cross rate {from} -> {to} is out of range")]
    CrossRateOverflow {
        from: CurrencyCode,
        to: CurrencyCode,
    },
}

/// A pair of currencies quoted as BASE/QUOTE: one unit of `base`
/// costs the spot rate in units of `quote`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    pub base: CurrencyCode,
    pub quote: CurrencyCode,
}

impl CurrencyPair {
    pub fn new(base: CurrencyCode, quote: CurrencyCode) -> Self {
        Self { base, quote }
    }

    /// Parse a `"EUR/USD"` style label.
    pub fn parse(label: &str) -> Result<Self, FxError> {
        let (base, quote) = label
            .split_once('/')
            .ok_or_else(|| FxError::InvalidPair(label.to_string()))?;
        let base = CurrencyCode::new(base);
        let quote = CurrencyCode::new(quote);
        if base.as_str().is_empty() || quote.as_str().is_empty() || base == quote {
            return Err(FxError::InvalidPair(label.to_string()));
        }
        Ok(Self { base, quote })
    }

    /// The same pair quoted the other way round.
    pub fn swapped(&self) -> Self {
        Self {
            base: self.quote.clone(),
            quote: self.base.clone(),
        }
    }

    pub fn is_jpy_quoted(&self) -> bool {
        self.quote.is_jpy()
    }

    /// Pips per unit of price: 100 for JPY-quoted pairs, 10 000 otherwise.
    pub fn pip_multiplier(&self) -> Decimal {
        if self.is_jpy_quoted() {
            dec!(100)
        } else {
            dec!(10000)
        }
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

impl FromStr for CurrencyPair {
    type Err = FxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Anchor-based reference rate table.
///
/// Holds one rate per currency expressed as "1 unit of the anchor buys
/// `rate` units of X", the way central-bank reference feeds publish them.
/// Any pair between two listed currencies is derived as a cross rate.
///
/// # Examples
///
/// ```
/// use carry_engine::core::currency::{CurrencyCode, ReferenceRates};
/// use rust_decimal_macros::dec;
///
/// let mut rates = ReferenceRates::new(CurrencyCode::new("EUR"));
/// rates.set_rate(CurrencyCode::new("USD"), dec!(1.25)).unwrap();
/// rates.set_rate(CurrencyCode::new("GBP"), dec!(0.5)).unwrap();
///
/// let gbp_usd = rates
///     .cross_rate(&CurrencyCode::new("GBP"), &CurrencyCode::new("USD"))
///     .unwrap();
/// assert_eq!(gbp_usd, dec!(2.5));
/// ```
///
/// Tables are built through [`set_rate`](Self::set_rate) or from a validated
/// snapshot, so every stored rate is positive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceRates {
    /// The currency every stored rate is quoted against.
    anchor: CurrencyCode,
    /// Publication date of the rates, when known.
    as_of: Option<NaiveDate>,
    /// anchor -> currency rates.
    rates: BTreeMap<CurrencyCode, Decimal>,
}

impl ReferenceRates {
    pub fn new(anchor: CurrencyCode) -> Self {
        Self {
            anchor,
            as_of: None,
            rates: BTreeMap::new(),
        }
    }

    /// Hardcoded EUR reference table used when no live snapshot is available.
    pub fn fallback() -> Self {
        let mut table = Self::new(CurrencyCode::new("EUR"));
        let entries = [
            ("USD", dec!(1.08500)),
            ("GBP", dec!(0.85750)),
            ("JPY", dec!(160.15000)),
            ("CHF", dec!(0.96000)),
            ("AUD", dec!(1.63000)),
            ("CAD", dec!(1.45000)),
            ("NZD", dec!(1.78000)),
            ("SEK", dec!(11.25000)),
            ("NOK", dec!(11.50000)),
            ("DKK", dec!(7.46000)),
        ];
        for (code, rate) in entries {
            table.rates.insert(CurrencyCode::new(code), rate);
        }
        table
    }

    pub fn anchor(&self) -> &CurrencyCode {
        &self.anchor
    }

    pub fn as_of(&self) -> Option<NaiveDate> {
        self.as_of
    }

    pub fn set_as_of(&mut self, date: NaiveDate) {
        self.as_of = Some(date);
    }

    /// Set the anchor -> `currency` rate. Setting the anchor itself is ignored
    /// since it is always 1.
    pub fn set_rate(&mut self, currency: CurrencyCode, rate: Decimal) -> Result<(), FxError> {
        if rate <= Decimal::ZERO {
            return Err(FxError::InvalidRate {
                from: self.anchor.clone(),
                to: currency,
                rate,
            });
        }
        if currency != self.anchor {
            self.rates.insert(currency, rate);
        }
        Ok(())
    }

    /// Rate of `currency` against the anchor.
    pub fn anchor_rate(&self, currency: &CurrencyCode) -> Option<Decimal> {
        if *currency == self.anchor {
            return Some(Decimal::ONE);
        }
        self.rates.get(currency).copied()
    }

    /// All currencies with a known rate, anchor first.
    pub fn currencies(&self) -> Vec<CurrencyCode> {
        std::iter::once(self.anchor.clone())
            .chain(self.rates.keys().cloned())
            .collect()
    }

    /// True when the pair is quoted straight off the table (base is the anchor).
    pub fn is_direct_quote(&self, pair: &CurrencyPair) -> bool {
        pair.base == self.anchor
    }

    /// Price of one unit of `base` in `quote`.
    pub fn cross_rate(&self, base: &CurrencyCode, quote: &CurrencyCode) -> Result<Decimal, FxError> {
        if base == quote {
            return Ok(Decimal::ONE);
        }
        let not_found = || FxError::RateNotFound {
            from: base.clone(),
            to: quote.clone(),
        };
        let base_rate = self.anchor_rate(base).ok_or_else(not_found)?;
        let quote_rate = self.anchor_rate(quote).ok_or_else(not_found)?;

        if *base == self.anchor {
            return Ok(quote_rate);
        }
        quote_rate
            .checked_div(base_rate)
            .ok_or_else(|| FxError::CrossRateOverflow {
                from: base.clone(),
                to: quote.clone(),
            })
    }

    /// Spot rate for a pair.
    pub fn spot(&self, pair: &CurrencyPair) -> Result<Decimal, FxError> {
        self.cross_rate(&pair.base, &pair.quote)
    }
}
