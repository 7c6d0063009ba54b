use crate::core::currency::{CurrencyCode, FxError, ReferenceRates};
use chrono::NaiveDate;
use log::{info, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading reference rates.
#[derive(Debug, Error)]
pub enum RateSourceError {
    #[error("could not read rate snapshot '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed rate snapshot: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Fx(#[from] FxError),
    #[error("rate source '{0}' is unavailable")]
    Unavailable(String),
}

/// Anything that can supply a reference-rate table.
///
/// The valuation engine never calls a source; callers load rates, then pass
/// spot prices into the engine.
pub trait RateSource: Send + Sync {
    /// Human-readable name used in notices and logs.
    fn name(&self) -> &str;

    fn load(&self) -> Result<ReferenceRates, RateSourceError>;
}

/// On-disk form of a reference-rate snapshot.
///
/// ```json
/// { "anchor": "EUR", "as_of": "2026-01-02", "rates": { "USD": "1.0850", "JPY": "160.15" } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateSnapshot {
    #[serde(default = "default_anchor")]
    pub anchor: CurrencyCode,
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
    pub rates: BTreeMap<CurrencyCode, Decimal>,
}

fn default_anchor() -> CurrencyCode {
    CurrencyCode::new("EUR")
}

impl TryFrom<RateSnapshot> for ReferenceRates {
    type Error = FxError;

    fn try_from(snapshot: RateSnapshot) -> Result<Self, Self::Error> {
        let mut table = ReferenceRates::new(snapshot.anchor);
        if let Some(date) = snapshot.as_of {
            table.set_as_of(date);
        }
        for (currency, rate) in snapshot.rates {
            table.set_rate(currency, rate)?;
        }
        Ok(table)
    }
}

/// A fixed, in-memory table.
#[derive(Debug, Clone)]
pub struct StaticRateSource {
    name: String,
    rates: ReferenceRates,
}

impl StaticRateSource {
    pub fn new(name: impl Into<String>, rates: ReferenceRates) -> Self {
        Self {
            name: name.into(),
            rates,
        }
    }

    /// The built-in fallback table.
    pub fn fallback() -> Self {
        Self::new("built-in fallback rates", ReferenceRates::fallback())
    }
}

impl RateSource for StaticRateSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<ReferenceRates, RateSourceError> {
        Ok(self.rates.clone())
    }
}

/// Reads a [`RateSnapshot`] JSON file on every load.
#[derive(Debug, Clone)]
pub struct JsonSnapshotSource {
    name: String,
    path: PathBuf,
}

impl JsonSnapshotSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            name: format!("snapshot {}", path.display()),
            path,
        }
    }

    /// Parse a snapshot from a JSON string.
    pub fn parse(json: &str) -> Result<ReferenceRates, RateSourceError> {
        let snapshot: RateSnapshot = serde_json::from_str(json)?;
        Ok(ReferenceRates::try_from(snapshot)?)
    }
}

impl RateSource for JsonSnapshotSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<ReferenceRates, RateSourceError> {
        let content = fs::read_to_string(&self.path).map_err(|source| RateSourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        Self::parse(&content)
    }
}

/// Where a loaded table came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RateOrigin {
    Live { source: String },
    Fallback { reason: String },
}

impl RateOrigin {
    pub fn is_fallback(&self) -> bool {
        matches!(self, RateOrigin::Fallback { .. })
    }

    /// Non-blocking notice to show the user, if any.
    pub fn notice(&self) -> Option<String> {
        match self {
            RateOrigin::Live { .. } => None,
            RateOrigin::Fallback { reason } => {
                Some(format!("Using fallback data - {}", reason))
            }
        }
    }
}

/// A reference table together with its origin.
#[derive(Debug, Clone)]
pub struct LoadedRates {
    pub rates: ReferenceRates,
    pub origin: RateOrigin,
}

/// Primary source with a static fallback table.
///
/// Loading never fails: a primary failure is logged and the fallback table is
/// returned with [`RateOrigin::Fallback`] so the caller can show a notice.
pub struct FallbackChain {
    primary: Option<Box<dyn RateSource>>,
    fallback: ReferenceRates,
}

impl FallbackChain {
    pub fn new(primary: impl RateSource + 'static) -> Self {
        Self {
            primary: Some(Box::new(primary)),
            fallback: ReferenceRates::fallback(),
        }
    }

    /// No live source configured; always serves the fallback table.
    pub fn fallback_only() -> Self {
        Self {
            primary: None,
            fallback: ReferenceRates::fallback(),
        }
    }

    pub fn with_fallback(mut self, fallback: ReferenceRates) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn load(&self) -> LoadedRates {
        let Some(primary) = &self.primary else {
            return LoadedRates {
                rates: self.fallback.clone(),
                origin: RateOrigin::Fallback {
                    reason: "no live rate source configured".to_string(),
                },
            };
        };

        match primary.load() {
            Ok(rates) => {
                info!(
                    "loaded {} reference rates from {}",
                    rates.currencies().len(),
                    primary.name()
                );
                LoadedRates {
                    rates,
                    origin: RateOrigin::Live {
                        source: primary.name().to_string(),
                    },
                }
            }
            Err(e) => {
                warn!("{} failed ({}); using fallback rates", primary.name(), e);
                LoadedRates {
                    rates: self.fallback.clone(),
                    origin: RateOrigin::Fallback {
                        reason: format!("{} unavailable: {}", primary.name(), e),
                    },
                }
            }
        }
    }
}
