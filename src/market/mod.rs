//! Everything around the engine that deals with live data: where spot rates
//! come from, when they are refreshed, and the caller-owned calculator state.

pub mod schedule;
pub mod session;
pub mod source;
