use crate::core::currency::{CurrencyCode, CurrencyPair, ReferenceRates};
use crate::core::interest::InterestRateTable;
use crate::report::BoardRowView;
use crate::valuation::carry::{CarryEngine, CarryInputs, CarryResult};
use log::warn;
use rust_decimal::Decimal;
use serde::Serialize;

/// Standard forward tenor used by the pairs board.
pub const BOARD_HORIZON_DAYS: u32 = 90;

/// The ten EUR majors shown on the pairs board.
pub fn major_pairs() -> Vec<CurrencyPair> {
    let eur = CurrencyCode::new("EUR");
    ["USD", "GBP", "JPY", "CHF", "AUD", "CAD", "NZD", "SEK", "NOK", "DKK"]
        .iter()
        .map(|quote| CurrencyPair::new(eur.clone(), CurrencyCode::new(*quote)))
        .collect()
}

/// A pair the board could not value, with the reason.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedPair {
    pub pair: CurrencyPair,
    pub reason: String,
}

/// Carry valuation of many pairs at one horizon, on a unit notional.
#[derive(Debug, Clone, Serialize)]
pub struct PairBoard {
    horizon_days: u32,
    rows: Vec<CarryResult>,
    skipped: Vec<SkippedPair>,
}

impl PairBoard {
    /// Value every pair against the reference table and interest inputs.
    ///
    /// A pair without a reference rate, or whose inputs are rejected by the
    /// engine, is recorded in [`skipped`](Self::skipped) instead of failing
    /// the whole board.
    pub fn evaluate(
        rates: &ReferenceRates,
        interest: &InterestRateTable,
        pairs: &[CurrencyPair],
        horizon_days: u32,
    ) -> Self {
        let mut rows = Vec::with_capacity(pairs.len());
        let mut skipped = Vec::new();

        for pair in pairs {
            let outcome = rates
                .spot(pair)
                .map_err(|e| e.to_string())
                .and_then(|spot| {
                    let inputs = CarryInputs::new(
                        pair.clone(),
                        spot,
                        interest.get(&pair.base),
                        interest.get(&pair.quote),
                        horizon_days,
                        Decimal::ONE,
                    );
                    CarryEngine::evaluate(&inputs).map_err(|e| e.to_string())
                });

            match outcome {
                Ok(result) => rows.push(result),
                Err(reason) => {
                    warn!("skipping {} on pairs board: {}", pair, reason);
                    skipped.push(SkippedPair {
                        pair: pair.clone(),
                        reason,
                    });
                }
            }
        }

        PairBoard {
            horizon_days,
            rows,
            skipped,
        }
    }

    /// The default board: EUR majors at 90 days.
    pub fn majors(rates: &ReferenceRates, interest: &InterestRateTable) -> Self {
        Self::evaluate(rates, interest, &major_pairs(), BOARD_HORIZON_DAYS)
    }

    pub fn horizon_days(&self) -> u32 {
        self.horizon_days
    }

    pub fn rows(&self) -> &[CarryResult] {
        &self.rows
    }

    pub fn skipped(&self) -> &[SkippedPair] {
        &self.skipped
    }

    /// Row for a given pair, if it was valued.
    pub fn row(&self, pair: &CurrencyPair) -> Option<&CarryResult> {
        self.rows.iter().find(|r| &r.pair == pair)
    }
}

impl std::fmt::Display for PairBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Major Pairs ({}D forward) ===", self.horizon_days)?;
        writeln!(
            f,
            "{:<8} {:>11} {:>11} {:>9} {:>8} {:>8} {:>8}  {}",
            "Pair", "Spot", "Forward", "Points", "Diff", "Carry", "Annual", "Signal"
        )?;
        for result in &self.rows {
            let row = BoardRowView::from(result);
            writeln!(
                f,
                "{:<8} {:>11} {:>11} {:>9} {:>8} {:>8} {:>8}  {}",
                row.pair,
                row.spot,
                row.forward,
                row.points,
                row.differential,
                row.carry,
                row.annualized,
                row.signal
            )?;
        }
        for skipped in &self.skipped {
            writeln!(f, "{:<8} skipped: {}", skipped.pair, skipped.reason)?;
        }
        Ok(())
    }
}
