//! Text rendering of valuation results.
//!
//! One renderer serves every surface (CLI text, JSON, demos). Fixed decimal
//! places: spot and forward 5, points 1, differential 2, period return 3,
//! annualized return 2, money 2. Signed quantities carry an explicit `+`.

use crate::core::currency::CurrencyCode;
use crate::valuation::board::PairBoard;
use crate::valuation::carry::CarryResult;
use crate::valuation::signal::SignalTone;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Round half away from zero to `dp` places and pad with zeros.
pub fn format_fixed(value: Decimal, dp: u32) -> String {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    // Avoid "-0.00".
    let rounded = if rounded.is_zero() { rounded.abs() } else { rounded };
    format!("{:.*}", dp as usize, rounded)
}

/// Like [`format_fixed`] with a leading `+` for non-negative values.
pub fn format_signed(value: Decimal, dp: u32) -> String {
    let text = format_fixed(value, dp);
    if text.starts_with('-') {
        text
    } else {
        format!("+{}", text)
    }
}

pub fn format_signed_pct(value: Decimal, dp: u32) -> String {
    format!("{}%", format_signed(value, dp))
}

/// Display symbol for an investment currency.
pub fn currency_symbol(currency: &CurrencyCode) -> &'static str {
    match currency.as_str() {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "CHF" => "CHF ",
        "AUD" => "A$",
        "CAD" => "C$",
        "NZD" => "NZ$",
        _ => "€",
    }
}

/// Signed money amount, e.g. `+€30.92` or `-$12.00`.
pub fn format_money(value: Decimal, currency: &CurrencyCode) -> String {
    let magnitude = format_fixed(value.abs(), 2);
    let sign = if format_fixed(value, 2).starts_with('-') {
        "-"
    } else {
        "+"
    };
    format!("{}{}{}", sign, currency_symbol(currency), magnitude)
}

/// A carry result rendered to display strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultView {
    pub pair: String,
    pub pair_info: &'static str,
    pub spot: String,
    pub spot_source: &'static str,
    pub forward: String,
    pub points: String,
    pub differential: String,
    pub carry: String,
    pub annualized: String,
    pub profit: String,
    pub signal: &'static str,
    pub tone: SignalTone,
}

impl ResultView {
    /// `direct_quote` marks spots read straight off the reference table
    /// rather than derived as a cross.
    pub fn new(result: &CarryResult, direct_quote: bool) -> Self {
        Self {
            pair: result.pair.to_string(),
            pair_info: if direct_quote {
                "Direct Quote"
            } else {
                "Cross Rate"
            },
            spot: format_fixed(result.spot_rate, 5),
            spot_source: if direct_quote {
                "Reference Rate"
            } else {
                "Calculated Cross"
            },
            forward: format_fixed(result.forward_rate, 5),
            points: format!("{} pips", format_signed(result.forward_points, 1)),
            differential: format_signed_pct(result.interest_differential, 2),
            carry: format_signed_pct(result.period_return_pct, 3),
            annualized: format_signed_pct(result.annualized_return_pct, 2),
            profit: format_money(result.profit_loss, &result.pair.base),
            signal: result.signal.label(),
            tone: result.signal.tone(),
        }
    }
}

/// One row of the pairs table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardRowView {
    pub pair: String,
    pub spot: String,
    pub forward: String,
    pub points: String,
    pub differential: String,
    pub carry: String,
    pub annualized: String,
    pub signal: &'static str,
}

impl From<&CarryResult> for BoardRowView {
    fn from(result: &CarryResult) -> Self {
        Self {
            pair: result.pair.to_string(),
            spot: format_fixed(result.spot_rate, 5),
            forward: format_fixed(result.forward_rate, 5),
            points: format_signed(result.forward_points, 1),
            differential: format_signed_pct(result.interest_differential, 2),
            carry: format_signed_pct(result.period_return_pct, 3),
            annualized: format_signed_pct(result.annualized_return_pct, 2),
            signal: result.signal.label(),
        }
    }
}

/// Rows of a pairs board plus the pairs that could not be valued.
#[derive(Debug, Clone, Serialize)]
pub struct BoardView {
    pub horizon_days: u32,
    pub rows: Vec<BoardRowView>,
    pub skipped: Vec<String>,
}

impl From<&PairBoard> for BoardView {
    fn from(board: &PairBoard) -> Self {
        Self {
            horizon_days: board.horizon_days(),
            rows: board.rows().iter().map(BoardRowView::from).collect(),
            skipped: board
                .skipped()
                .iter()
                .map(|s| format!("{}: {}", s.pair, s.reason))
                .collect(),
        }
    }
}
