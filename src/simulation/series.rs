//! Chart series data for the carry calculator.
//!
//! There is no historical rate store, so the spot history is simulated as
//! small random deviations around the current spot. Each chart kind is then
//! derived from that path through the valuation engine.

use crate::core::currency::CurrencyPair;
use crate::valuation::carry::{CarryEngine, CarryError, CarryInputs};
use chrono::{Duration, NaiveDate};
use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Tenor used for the forward-points and return charts.
pub const CHART_HORIZON_DAYS: u32 = 90;

/// Maximum relative deviation of a simulated spot from the current spot.
pub const MAX_DAILY_VARIATION: f64 = 0.01;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Points,
    Spot,
    Return,
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "points" => Ok(ChartKind::Points),
            "spot" => Ok(ChartKind::Spot),
            "return" => Ok(ChartKind::Return),
            other => Err(format!(
                "unknown chart kind '{}': expected points, spot or return",
                other
            )),
        }
    }
}

/// One simulated daily spot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpotObservation {
    pub date: NaiveDate,
    pub rate: Decimal,
}

/// `days + 1` daily spots ending on `today`, oldest first.
pub fn simulate_spot_path<R: Rng>(
    spot: Decimal,
    days: u32,
    today: NaiveDate,
    rng: &mut R,
) -> Vec<SpotObservation> {
    (0..=days)
        .rev()
        .map(|back| {
            let variation = rng.gen_range(-MAX_DAILY_VARIATION..MAX_DAILY_VARIATION);
            let variation = Decimal::from_f64_retain(variation)
                .unwrap_or(Decimal::ZERO)
                .round_dp(6);
            SpotObservation {
                date: today - Duration::days(i64::from(back)),
                rate: spot * (Decimal::ONE + variation),
            }
        })
        .collect()
}

/// A labelled line-chart dataset.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSeries {
    pub kind: ChartKind,
    pub label: String,
    /// x-axis labels, e.g. `"Jan 5"`.
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    /// Build a dataset from a spot path.
    pub fn build(
        kind: ChartKind,
        pair: &CurrencyPair,
        path: &[SpotObservation],
        base_rate: Decimal,
        quote_rate: Decimal,
    ) -> Result<Self, CarryError> {
        let label = match kind {
            ChartKind::Points => format!("Forward Points ({}D)", CHART_HORIZON_DAYS),
            ChartKind::Spot => format!("Spot Rate {}", pair),
            ChartKind::Return => "Annualized Carry Return".to_string(),
        };

        let mut labels = Vec::with_capacity(path.len());
        let mut values = Vec::with_capacity(path.len());
        for obs in path {
            let value = match kind {
                ChartKind::Spot => obs.rate,
                ChartKind::Points | ChartKind::Return => {
                    let inputs = CarryInputs::new(
                        pair.clone(),
                        obs.rate,
                        base_rate,
                        quote_rate,
                        CHART_HORIZON_DAYS,
                        Decimal::ONE,
                    );
                    let result = CarryEngine::evaluate(&inputs)?;
                    if kind == ChartKind::Points {
                        result.forward_points
                    } else {
                        result.annualized_return_pct
                    }
                }
            };
            labels.push(obs.date.format("%b %-d").to_string());
            values.push(value.to_f64().unwrap_or(f64::NAN));
        }

        Ok(ChartSeries {
            kind,
            label,
            labels,
            values,
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
