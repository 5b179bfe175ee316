//! Portfolio state: cash, open holdings and the trade log.

use std::collections::HashMap;
use std::fmt;

use super::instrument::InstrumentId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// The open position in one instrument. Absent from the map when flat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Holding {
    pub quantity: f64,
    pub average_cost: f64,
}

impl Holding {
    pub fn market_value(&self, price: f64) -> f64 {
        self.quantity * price
    }

    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        self.quantity * (price - self.average_cost)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub instrument: InstrumentId,
    pub side: Side,
    pub quantity: f64,
    pub price: f64,
    /// Epoch milliseconds of the tick that executed the trade.
    pub timestamp: i64,
    /// Set on sells: proceeds minus the average cost of the quantity sold.
    pub realized_pnl: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    pub cash: f64,
    pub initial_balance: f64,
    pub holdings: HashMap<InstrumentId, Holding>,
    pub trades: Vec<Trade>,
}

impl Portfolio {
    pub fn new(initial_balance: f64) -> Self {
        Portfolio {
            cash: initial_balance,
            initial_balance,
            holdings: HashMap::new(),
            trades: Vec::new(),
        }
    }

    pub fn holding(&self, instrument: &InstrumentId) -> Option<&Holding> {
        self.holdings.get(instrument)
    }

    pub fn has_holding(&self, instrument: &InstrumentId) -> bool {
        self.holdings.contains_key(instrument)
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn trade_count(&self) -> usize {
        self.trades.len()
    }

    /// Cash plus every holding valued at the price from `price_map`.
    /// Holdings without a price are skipped.
    pub fn total_equity(&self, price_map: &HashMap<InstrumentId, f64>) -> f64 {
        let holdings_value: f64 = self
            .holdings
            .iter()
            .filter_map(|(id, holding)| price_map.get(id).map(|&p| holding.market_value(p)))
            .sum();
        self.cash + holdings_value
    }
}
