//! Calculator settings.
//!
//! Settings are plain serde structs with a `Default` matching the
//! calculator's reset state, loadable from a JSON file:
//!
//! ```json
//! {
//!   "base_currency": "EUR",
//!   "quote_currency": "USD",
//!   "horizon_days": 90,
//!   "investment": "10000",
//!   "interest_overrides": { "USD": "5.25" }
//! }
//! ```

use crate::core::currency::{CurrencyCode, CurrencyPair};
use crate::core::interest::InterestRateTable;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read settings '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// User-facing calculator inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorSettings {
    pub base_currency: CurrencyCode,
    pub quote_currency: CurrencyCode,
    /// Holding period in days.
    pub horizon_days: u32,
    /// Notional in the base currency.
    pub investment: Decimal,
    /// Interest rates that replace the central-bank defaults.
    pub interest_overrides: InterestRateTable,
}

impl Default for CalculatorSettings {
    fn default() -> Self {
        Self {
            base_currency: CurrencyCode::new("EUR"),
            quote_currency: CurrencyCode::new("USD"),
            horizon_days: 90,
            investment: dec!(10000),
            interest_overrides: InterestRateTable::new(),
        }
    }
}

impl CalculatorSettings {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let settings: CalculatorSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.horizon_days == 0 {
            return Err(ConfigError::Invalid(
                "horizon_days must be at least 1".to_string(),
            ));
        }
        if self.base_currency == self.quote_currency {
            return Err(ConfigError::Invalid(format!(
                "base and quote currency are both {}",
                self.base_currency
            )));
        }
        Ok(())
    }

    pub fn pair(&self) -> CurrencyPair {
        CurrencyPair::new(self.base_currency.clone(), self.quote_currency.clone())
    }

    /// Central-bank defaults with this configuration's overrides applied.
    pub fn interest_rates(&self) -> InterestRateTable {
        let mut table = InterestRateTable::central_bank_defaults();
        table.merge(&self.interest_overrides);
        table
    }
}
