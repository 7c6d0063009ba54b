use crate::core::currency::CurrencyCode;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Annual policy interest rates per currency, in percent per annum.
///
/// Currencies without an entry read as zero, matching how an empty
/// rate-input field is treated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterestRateTable {
    rates: BTreeMap<CurrencyCode, Decimal>,
}

impl InterestRateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Central-bank policy rates shipped as the calculator's starting inputs.
    pub fn central_bank_defaults() -> Self {
        let mut table = Self::new();
        let entries = [
            ("EUR", dec!(4.25)), // ECB
            ("USD", dec!(5.50)), // Federal Reserve
            ("GBP", dec!(5.25)), // Bank of England
            ("JPY", dec!(0.10)), // Bank of Japan
            ("CHF", dec!(1.50)), // SNB
            ("AUD", dec!(4.35)), // RBA
            ("CAD", dec!(4.00)), // Bank of Canada
            ("NZD", dec!(4.50)), // RBNZ
            ("SEK", dec!(3.75)), // Riksbank
            ("NOK", dec!(4.00)), // Norges Bank
            ("DKK", dec!(4.25)), // Danmarks Nationalbank
        ];
        for (code, rate) in entries {
            table.set(CurrencyCode::new(code), rate);
        }
        table
    }

    pub fn set(&mut self, currency: CurrencyCode, rate_pct: Decimal) {
        self.rates.insert(currency, rate_pct);
    }

    pub fn get(&self, currency: &CurrencyCode) -> Decimal {
        self.rates.get(currency).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn contains(&self, currency: &CurrencyCode) -> bool {
        self.rates.contains_key(currency)
    }

    /// Overlay `other` on top of this table.
    pub fn merge(&mut self, other: &InterestRateTable) {
        for (currency, rate) in &other.rates {
            self.rates.insert(currency.clone(), *rate);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CurrencyCode, &Decimal)> {
        self.rates.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let table = InterestRateTable::central_bank_defaults();
        assert_eq!(table.get(&CurrencyCode::new("EUR")), dec!(4.25));
        assert_eq!(table.get(&CurrencyCode::new("USD")), dec!(5.50));
        assert_eq!(table.get(&CurrencyCode::new("JPY")), dec!(0.10));
        assert_eq!(table.iter().count(), 11);
    }

    #[test]
    fn test_missing_currency_reads_zero() {
        let table = InterestRateTable::central_bank_defaults();
        let brl = CurrencyCode::new("BRL");
        assert!(!table.contains(&brl));
        assert_eq!(table.get(&brl), Decimal::ZERO);
    }

    #[test]
    fn test_merge_overrides() {
        let mut table = InterestRateTable::central_bank_defaults();
        let mut overrides = InterestRateTable::new();
        overrides.set(CurrencyCode::new("JPY"), dec!(-0.10));
        table.merge(&overrides);
        assert_eq!(table.get(&CurrencyCode::new("JPY")), dec!(-0.10));
        assert_eq!(table.get(&CurrencyCode::new("USD")), dec!(5.50));
    }

    #[test]
    fn test_deserializes_from_map() {
        let table: InterestRateTable =
            serde_json::from_str(r#"{ "usd": "5.25", "EUR": "3.5" }"#).unwrap();
        assert_eq!(table.get(&CurrencyCode::new("USD")), dec!(5.25));
        assert_eq!(table.get(&CurrencyCode::new("EUR")), dec!(3.5));
    }
}
