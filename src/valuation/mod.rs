//! Carry-trade valuation: forward pricing, returns and trade signals.

pub mod board;
pub mod carry;
pub mod forward;
pub mod signal;
