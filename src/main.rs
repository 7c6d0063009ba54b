//! carry-engine CLI
//!
//! Value forex carry trades from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Value EUR/USD over 90 days with central-bank default rates
//! carry-engine calc --pair EUR/USD --days 90 --investment 10000
//!
//! # Use a reference-rate snapshot and override an interest rate
//! carry-engine calc --rates rates.json --pair USD/JPY --quote-rate 0.25
//!
//! # The EUR majors board as JSON
//! carry-engine pairs --format json
//!
//! # Chart data
//! carry-engine series --pair EUR/USD --kind points
//! ```

use carry_engine::config::CalculatorSettings;
use carry_engine::core::currency::{CurrencyCode, CurrencyPair};
use carry_engine::market::schedule::{next_refresh, MarketStatus};
use carry_engine::market::session::CalculatorSession;
use carry_engine::market::source::{FallbackChain, JsonSnapshotSource, LoadedRates};
use carry_engine::report::BoardView;
use carry_engine::simulation::series::{simulate_spot_path, ChartKind, ChartSeries};
use carry_engine::valuation::board::{major_pairs, PairBoard, BOARD_HORIZON_DAYS};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_decimal::Decimal;
use std::process;
use std::str::FromStr;

fn print_usage() {
    eprintln!(
        r#"carry-engine — forex carry-trade valuation

USAGE:
    carry-engine <COMMAND> [OPTIONS]

COMMANDS:
    calc        Value one carry trade
    pairs       Value the EUR major pairs
    series      Emit chart series data for a pair
    schedule    Show market status and the next auto-refresh time
    help        Show this message

OPTIONS (calc, pairs, series):
    --rates <FILE>        Reference-rate snapshot (JSON); built-in table if omitted
    --config <FILE>       Calculator settings (JSON)
    --pair <BASE/QUOTE>   Currency pair (default: EUR/USD)
    --base <CCY>          Base currency
    --quote <CCY>         Quote currency
    --days <N>            Holding period in days (default: 90)
    --investment <AMT>    Notional in the base currency (default: 10000)
    --base-rate <PCT>     Base-currency interest rate, % p.a.
    --quote-rate <PCT>    Quote-currency interest rate, % p.a.
    --format <FORMAT>     Output format: text (default) or json

OPTIONS (series):
    --kind <KIND>         points (default), spot or return
    --history <N>         Days of simulated history (default: 30)
    --seed <N>            Seed for the simulated history

EXAMPLES:
    carry-engine calc --pair EUR/USD --days 90 --investment 10000
    carry-engine calc --pair AUD/JPY --base-rate 4.35 --quote-rate 0.10 --format json
    carry-engine pairs --rates rates.json
    carry-engine series --pair USD/JPY --kind return --seed 7"#
    );
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

/// Flags shared by the valuation commands.
#[derive(Default)]
struct Options {
    rates: Option<String>,
    config: Option<String>,
    pair: Option<CurrencyPair>,
    base: Option<CurrencyCode>,
    quote: Option<CurrencyCode>,
    days: Option<u32>,
    investment: Option<Decimal>,
    base_rate: Option<Decimal>,
    quote_rate: Option<Decimal>,
    format: String,
    kind: ChartKind,
    history: u32,
    seed: Option<u64>,
}

fn parse_value<T: FromStr>(flag: &str, value: Option<&String>) -> T
where
    T::Err: std::fmt::Display,
{
    let raw = value.unwrap_or_else(|| fail(format!("{} requires a value", flag)));
    raw.parse()
        .unwrap_or_else(|e| fail(format!("invalid value '{}' for {}: {}", raw, flag, e)))
}

fn parse_options(args: &[String]) -> Options {
    let mut opts = Options {
        format: "text".to_string(),
        history: 30,
        ..Default::default()
    };
    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        i += 1;
        let value = args.get(i);
        match flag {
            "--rates" => opts.rates = Some(parse_value(flag, value)),
            "--config" => opts.config = Some(parse_value(flag, value)),
            "--pair" => opts.pair = Some(parse_value(flag, value)),
            "--base" => opts.base = Some(CurrencyCode::new(parse_value::<String>(flag, value))),
            "--quote" => opts.quote = Some(CurrencyCode::new(parse_value::<String>(flag, value))),
            "--days" => opts.days = Some(parse_value(flag, value)),
            "--investment" => opts.investment = Some(parse_value(flag, value)),
            "--base-rate" => opts.base_rate = Some(parse_value(flag, value)),
            "--quote-rate" => opts.quote_rate = Some(parse_value(flag, value)),
            "--format" => {
                opts.format = parse_value(flag, value);
                if opts.format != "text" && opts.format != "json" {
                    fail("--format must be 'text' or 'json'");
                }
            }
            "--kind" => opts.kind = parse_value(flag, value),
            "--history" => opts.history = parse_value(flag, value),
            "--seed" => opts.seed = Some(parse_value(flag, value)),
            _ => fail(format!("unknown option: {}", flag)),
        }
        i += 1;
    }
    opts
}

fn load_rates(opts: &Options) -> LoadedRates {
    let chain = match &opts.rates {
        Some(path) => FallbackChain::new(JsonSnapshotSource::new(path)),
        None => FallbackChain::fallback_only(),
    };
    let loaded = chain.load();
    // Only worth a notice when the user asked for a snapshot.
    if let (Some(notice), Some(_)) = (loaded.origin.notice(), &opts.rates) {
        eprintln!("Warning: {}", notice);
    }
    loaded
}

fn build_settings(opts: &Options) -> CalculatorSettings {
    let mut settings = match &opts.config {
        Some(path) => CalculatorSettings::from_json_file(path).unwrap_or_else(|e| fail(e)),
        None => CalculatorSettings::default(),
    };
    if let Some(pair) = &opts.pair {
        settings.base_currency = pair.base.clone();
        settings.quote_currency = pair.quote.clone();
    }
    if let Some(base) = &opts.base {
        settings.base_currency = base.clone();
    }
    if let Some(quote) = &opts.quote {
        settings.quote_currency = quote.clone();
    }
    if let Some(days) = opts.days {
        settings.horizon_days = days;
    }
    if let Some(investment) = opts.investment {
        settings.investment = investment;
    }
    if let Some(rate) = opts.base_rate {
        settings
            .interest_overrides
            .set(settings.base_currency.clone(), rate);
    }
    if let Some(rate) = opts.quote_rate {
        settings
            .interest_overrides
            .set(settings.quote_currency.clone(), rate);
    }
    settings.validate().unwrap_or_else(|e| fail(e));
    settings
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| fail(e))
}

fn cmd_calc(args: &[String]) {
    let opts = parse_options(args);
    let settings = build_settings(&opts);
    let mut session = CalculatorSession::new(settings, load_rates(&opts));

    let result = session.calculate().unwrap_or_else(|e| fail(e)).clone();
    let view = session.view().unwrap_or_else(|| fail("no result to display"));

    if opts.format == "json" {
        #[derive(serde::Serialize)]
        struct CalcOutput<'a> {
            result: &'a carry_engine::valuation::carry::CarryResult,
            display: &'a carry_engine::report::ResultView,
            rates: &'a carry_engine::market::source::RateOrigin,
        }
        println!(
            "{}",
            to_json(&CalcOutput {
                result: &result,
                display: &view,
                rates: session.origin(),
            })
        );
    } else {
        print!("{}", result);
        println!("Quote:              {} ({})", view.pair_info, view.spot_source);
        println!("Profit/Loss:        {}", view.profit);
        if let Some(date) = session.rates().as_of() {
            println!("Rates as of:        {}", date);
        }
    }
}

fn cmd_pairs(args: &[String]) {
    let opts = parse_options(args);
    let settings = build_settings(&opts);
    let loaded = load_rates(&opts);
    let days = opts.days.unwrap_or(BOARD_HORIZON_DAYS);

    let board = PairBoard::evaluate(
        &loaded.rates,
        &settings.interest_rates(),
        &major_pairs(),
        days,
    );

    if opts.format == "json" {
        println!("{}", to_json(&BoardView::from(&board)));
    } else {
        print!("{}", board);
    }
}

fn cmd_series(args: &[String]) {
    let opts = parse_options(args);
    let settings = build_settings(&opts);
    let loaded = load_rates(&opts);
    let pair = settings.pair();
    let interest = settings.interest_rates();

    let spot = loaded.rates.spot(&pair).unwrap_or_else(|e| fail(e));
    let today = chrono::Local::now().date_naive();
    let path = match opts.seed {
        Some(seed) => simulate_spot_path(spot, opts.history, today, &mut StdRng::seed_from_u64(seed)),
        None => simulate_spot_path(spot, opts.history, today, &mut rand::thread_rng()),
    };

    let series = ChartSeries::build(
        opts.kind,
        &pair,
        &path,
        interest.get(&pair.base),
        interest.get(&pair.quote),
    )
    .unwrap_or_else(|e| fail(e));

    if opts.format == "json" {
        println!("{}", to_json(&series));
    } else {
        println!("{}", series.label);
        for (label, value) in series.labels.iter().zip(&series.values) {
            println!("  {:<8} {:>14.5}", label, value);
        }
    }
}

fn cmd_schedule() {
    let now = chrono::Utc::now();
    println!("Market status:   {}", MarketStatus::at(&now));
    match next_refresh(&now) {
        Some(next) => println!("Next refresh:    {}", next.format("%A %Y-%m-%d %H:%M %Z")),
        None => fail("no refresh date in range"),
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "calc" => cmd_calc(rest),
        "pairs" => cmd_pairs(rest),
        "series" => cmd_series(rest),
        "schedule" => cmd_schedule(),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
