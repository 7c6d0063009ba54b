//! Value a single carry trade and show how the signal moves with the
//! interest differential.

use carry_engine::core::currency::CurrencyPair;
use carry_engine::report::ResultView;
use carry_engine::valuation::carry::{CarryEngine, CarryInputs};
use rust_decimal_macros::dec;

fn main() {
    println!("╔══════════════════════════════════════════╗");
    println!("║  carry-engine: Basic Carry Trade Example ║");
    println!("╚══════════════════════════════════════════╝\n");

    // --- Scenario 1: EUR/USD, 90 days ---
    println!("━━━ Scenario 1: EUR/USD, 90 days ━━━\n");

    let eur_usd = CurrencyPair::parse("EUR/USD").expect("valid pair");
    let inputs = CarryInputs::new(eur_usd, dec!(1.08500), dec!(4.25), dec!(5.50), 90, dec!(10000));
    let result = CarryEngine::evaluate(&inputs).expect("valid inputs");

    println!("{}", result);
    let view = ResultView::new(&result, true);
    println!("Profit/Loss: {}\n", view.profit);

    // --- Scenario 2: sweep the quote rate ---
    println!("━━━ Scenario 2: Quote-rate sweep (EUR at 4.25%) ━━━\n");

    for quote_rate in [dec!(0.10), dec!(2.00), dec!(4.25), dec!(5.50), dec!(8.00)] {
        let inputs = CarryInputs::new(
            CurrencyPair::parse("EUR/USD").expect("valid pair"),
            dec!(1.08500),
            dec!(4.25),
            quote_rate,
            90,
            dec!(10000),
        );
        let result = CarryEngine::evaluate(&inputs).expect("valid inputs");
        let view = ResultView::new(&result, true);
        println!(
            "  quote {:>5}%  fwd {}  pts {:>12}  ann {:>8}  [{}]",
            quote_rate, view.forward, view.points, view.annualized, view.signal
        );
    }
}
