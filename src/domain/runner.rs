//! One simulation tick: extend prices, recompute averages, detect a
//! crossover and apply at most one trade.
//!
//! `run_tick` takes the previous `(PriceSeries, Portfolio)` pair by reference
//! and returns the next pair. Inputs are never modified, so a failed tick
//! leaves the caller's state exactly as it was.

use tracing::{debug, info};

use super::error::SimError;
use super::indicator::MovingAverage;
use super::indicator::sma::calculate_sma;
use super::instrument::InstrumentId;
use super::ledger::{BuyOutcome, SellOutcome, apply_buy, apply_sell};
use super::portfolio::{Portfolio, Trade};
use super::price_series::{PriceFeed, PriceModel, PriceSeries};
use super::signal::{Signal, detect};
use super::strategy::Strategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    InsufficientCash,
    QuantityZero,
    NoPosition,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TradeAction {
    Hold,
    Bought(Trade),
    Sold(Trade),
    /// A signal fired but the trade was not possible.
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub series: PriceSeries,
    pub portfolio: Portfolio,
    pub short_ma: MovingAverage,
    pub long_ma: MovingAverage,
    pub signal: Signal,
    pub action: TradeAction,
    pub price: f64,
    pub time: i64,
}

/// Both averages for `series` under `strategy`.
pub fn compute_averages(
    series: &PriceSeries,
    strategy: &Strategy,
) -> Result<(MovingAverage, MovingAverage), SimError> {
    let short = calculate_sma(series.points(), strategy.short_period)?;
    let long = calculate_sma(series.points(), strategy.long_period)?;
    Ok((short, long))
}

pub fn run_tick(
    series: &PriceSeries,
    portfolio: &Portfolio,
    strategy: &Strategy,
    instrument: &InstrumentId,
    model: &PriceModel,
    now_ms: i64,
    feed: &mut dyn PriceFeed,
) -> Result<TickOutcome, SimError> {
    strategy.validate()?;

    let series = series.append(now_ms, model, feed)?;
    let last = *series
        .last()
        .ok_or_else(|| SimError::invalid_state("price series empty after append"))?;

    let (short_ma, long_ma) = compute_averages(&series, strategy)?;
    let signal = detect(&short_ma, &long_ma);

    let mut portfolio = portfolio.clone();
    let action = match signal {
        Signal::GoldenCross => {
            match apply_buy(
                &mut portfolio,
                instrument,
                last.price,
                strategy.trade_amount,
                last.time,
            )? {
                BuyOutcome::Bought(trade) => TradeAction::Bought(trade),
                BuyOutcome::InsufficientCash => TradeAction::Skipped(SkipReason::InsufficientCash),
                BuyOutcome::QuantityZero => TradeAction::Skipped(SkipReason::QuantityZero),
            }
        }
        Signal::DeathCross => match apply_sell(&mut portfolio, instrument, last.price, last.time)? {
            SellOutcome::Sold(trade) => TradeAction::Sold(trade),
            SellOutcome::NoPosition => TradeAction::Skipped(SkipReason::NoPosition),
        },
        Signal::Neutral => TradeAction::Hold,
    };

    match &action {
        TradeAction::Bought(trade) | TradeAction::Sold(trade) => info!(
            %instrument,
            side = %trade.side,
            quantity = trade.quantity,
            price = trade.price,
            cash = portfolio.cash,
            "trade executed on {signal}"
        ),
        _ => debug!(%instrument, price = last.price, %signal, "tick"),
    }

    Ok(TickOutcome {
        series,
        portfolio,
        short_ma,
        long_ma,
        signal,
        action,
        price: last.price,
        time: last.time,
    })
}
