//! # carry-engine
//!
//! Forex carry-trade valuation engine.
//!
//! Given a spot exchange rate, the two currencies' annual interest rates and
//! a holding period, the engine prices the covered-interest-parity forward
//! and derives forward points, carry return and a trade signal.
//!
//! ## Architecture
//!
//! - **core** — Currency codes and pairs, reference-rate tables, interest rates
//! - **valuation** — Forward pricing, carry returns, trade signals, pairs board
//! - **market** — Rate sources with fallback, refresh schedule, calculator session
//! - **simulation** — Simulated spot paths and chart series data
//! - **report** — Display formatting of results
//! - **config** — Calculator settings

pub mod config;
pub mod core;
pub mod market;
pub mod report;
pub mod simulation;
pub mod valuation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::config::CalculatorSettings;
    pub use crate::core::currency::{CurrencyCode, CurrencyPair, ReferenceRates};
    pub use crate::core::interest::InterestRateTable;
    pub use crate::market::session::CalculatorSession;
    pub use crate::market::source::{FallbackChain, JsonSnapshotSource, RateSource};
    pub use crate::report::ResultView;
    pub use crate::valuation::board::PairBoard;
    pub use crate::valuation::carry::{CarryEngine, CarryError, CarryInputs, CarryResult};
    pub use crate::valuation::signal::TradeSignal;
}
