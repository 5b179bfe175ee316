//! Buy and sell transitions on a [`Portfolio`].
//!
//! Each operation validates and prices the trade before touching the
//! portfolio, then updates cash, the holding and the trade log together.
//! A caller never sees one of the three changed without the others.

use tracing::debug;

use super::error::SimError;
use super::instrument::InstrumentId;
use super::portfolio::{Holding, Portfolio, Side, Trade};

#[derive(Debug, Clone, PartialEq)]
pub enum BuyOutcome {
    Bought(Trade),
    /// Cash balance is below the configured trade amount.
    InsufficientCash,
    /// The trade amount does not cover a single unit at this price.
    QuantityZero,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SellOutcome {
    Sold(Trade),
    NoPosition,
}

/// Buys `floor(trade_amount / price)` units.
///
/// The cash check uses `trade_amount`, not the executed cost, so the cost of
/// a buy never exceeds `trade_amount` and never exceeds available cash.
pub fn apply_buy(
    portfolio: &mut Portfolio,
    instrument: &InstrumentId,
    price: f64,
    trade_amount: f64,
    timestamp: i64,
) -> Result<BuyOutcome, SimError> {
    if trade_amount <= 0.0 || !trade_amount.is_finite() {
        return Err(SimError::invalid_argument(
            "trade_amount",
            "must be a positive number",
        ));
    }
    if price <= 0.0 || !price.is_finite() {
        return Err(SimError::invalid_argument("price", "must be a positive number"));
    }

    let quantity = (trade_amount / price).floor();
    if quantity <= 0.0 {
        debug!(%instrument, price, trade_amount, "buy skipped: quantity rounds to zero");
        return Ok(BuyOutcome::QuantityZero);
    }
    if portfolio.cash < trade_amount {
        debug!(%instrument, cash = portfolio.cash, trade_amount, "buy skipped: insufficient cash");
        return Ok(BuyOutcome::InsufficientCash);
    }

    let cost = quantity * price;
    let holding = match portfolio.holdings.get(instrument) {
        Some(existing) => {
            let total_quantity = existing.quantity + quantity;
            Holding {
                quantity: total_quantity,
                average_cost: (existing.quantity * existing.average_cost + cost) / total_quantity,
            }
        }
        None => Holding {
            quantity,
            average_cost: price,
        },
    };
    let trade = Trade {
        instrument: instrument.clone(),
        side: Side::Buy,
        quantity,
        price,
        timestamp,
        realized_pnl: None,
    };

    portfolio.cash -= cost;
    portfolio.holdings.insert(instrument.clone(), holding);
    portfolio.trades.push(trade.clone());

    Ok(BuyOutcome::Bought(trade))
}

/// Liquidates the whole holding in `instrument` at `price`.
pub fn apply_sell(
    portfolio: &mut Portfolio,
    instrument: &InstrumentId,
    price: f64,
    timestamp: i64,
) -> Result<SellOutcome, SimError> {
    if price <= 0.0 || !price.is_finite() {
        return Err(SimError::invalid_argument("price", "must be a positive number"));
    }

    let holding = match portfolio.holdings.get(instrument) {
        Some(h) if h.quantity > 0.0 => *h,
        _ => {
            debug!(%instrument, "sell skipped: no position");
            return Ok(SellOutcome::NoPosition);
        }
    };

    let revenue = holding.quantity * price;
    let trade = Trade {
        instrument: instrument.clone(),
        side: Side::Sell,
        quantity: holding.quantity,
        price,
        timestamp,
        realized_pnl: Some(holding.unrealized_pnl(price)),
    };

    portfolio.cash += revenue;
    portfolio.holdings.remove(instrument);
    portfolio.trades.push(trade.clone());

    Ok(SellOutcome::Sold(trade))
}
