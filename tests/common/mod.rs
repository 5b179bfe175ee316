#![allow(dead_code)]

use simtrader::adapters::clock_adapter::ManualClock;
use simtrader::domain::instrument::InstrumentCatalog;
use simtrader::domain::price_series::{PriceModel, PricePoint, PriceSeries, ScriptedFeed};
use simtrader::domain::simulation::{Simulation, SimulationConfig};
use simtrader::domain::strategy::Strategy;
use std::io::Write;

pub const START_MS: i64 = 1_700_000_000_000;
pub const INTERVAL_MS: i64 = 2000;

pub fn series_from_prices(prices: &[f64]) -> PriceSeries {
    let points = prices
        .iter()
        .enumerate()
        .map(|(i, &price)| PricePoint {
            time: START_MS + i as i64 * INTERVAL_MS,
            price,
        })
        .collect();
    PriceSeries::from_points(points, 200)
}

pub fn crossover_strategy(short: usize, long: usize, amount: f64) -> Strategy {
    Strategy {
        short_period: short,
        long_period: long,
        trade_amount: amount,
        ..Strategy::default()
    }
}

/// Simulation whose history is `history` flat prices of `base`, followed by
/// `ticks` on each step. Returns the clock handle driving it.
pub fn scripted_simulation(
    base: f64,
    history: usize,
    ticks: &[f64],
    strategy: Strategy,
    initial_balance: f64,
) -> (Simulation, ManualClock) {
    let config = SimulationConfig {
        initial_balance,
        history_len: history,
        model: PriceModel {
            initial_price: base,
            interval_ms: INTERVAL_MS,
            ..PriceModel::default()
        },
        seed: None,
    };
    // generate() takes the first price from the model, the rest from the feed
    let mut prices = vec![base; history.saturating_sub(1)];
    prices.extend_from_slice(ticks);

    let clock = ManualClock::new(START_MS);
    let sim = Simulation::with_feed(
        config,
        strategy,
        InstrumentCatalog::default(),
        Box::new(clock.clone()),
        Box::new(ScriptedFeed::new(prices)),
    )
    .unwrap();
    (sim, clock)
}

pub fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
