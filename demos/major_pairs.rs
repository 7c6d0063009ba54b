//! Board of the EUR majors on the built-in fallback rates, followed by the
//! same board after a simulated rate refresh.

use carry_engine::config::CalculatorSettings;
use carry_engine::core::currency::{CurrencyCode, ReferenceRates};
use carry_engine::market::session::CalculatorSession;
use carry_engine::market::source::{FallbackChain, LoadedRates, RateOrigin};
use rust_decimal_macros::dec;

fn main() {
    println!("╔══════════════════════════════════════════╗");
    println!("║  carry-engine: Major Pairs Example       ║");
    println!("╚══════════════════════════════════════════╝\n");

    let loaded = FallbackChain::fallback_only().load();
    if let Some(notice) = loaded.origin.notice() {
        println!("Note: {}\n", notice);
    }

    let mut session = CalculatorSession::new(CalculatorSettings::default(), loaded);
    println!("{}", session.board());

    // Two refreshes race; only the later one is applied.
    let stale = session.begin_refresh();
    let fresh = session.begin_refresh();

    let mut rates = ReferenceRates::fallback();
    rates
        .set_rate(CurrencyCode::new("USD"), dec!(1.1000))
        .expect("positive rate");
    let repriced = session
        .complete_refresh(
            fresh,
            LoadedRates {
                rates,
                origin: RateOrigin::Live {
                    source: "demo".to_string(),
                },
            },
        )
        .expect("EUR/USD is on the board")
        .cloned();
    let dropped = session
        .complete_refresh(stale, FallbackChain::fallback_only().load())
        .expect("stale refresh is ignored")
        .is_none();
    println!("stale dropped: {}\n", dropped);

    println!("{}", session.board());

    if let Some(result) = repriced {
        println!("{}", result);
    }
}
