//! Portfolio valuation against the current price.

use super::instrument::InstrumentId;
use super::portfolio::{Portfolio, Side};

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioSummary {
    pub cash: f64,
    pub holdings_value: f64,
    pub total_value: f64,
    pub pnl: f64,
    pub pnl_pct: f64,
    pub realized_pnl: f64,
    pub unrealized_pnl: f64,
    pub trades_buy: usize,
    pub trades_sell: usize,
}

impl PortfolioSummary {
    /// Values the holding in `instrument` at `current_price`. Holdings in
    /// other instruments are not priced and are left out.
    pub fn compute(portfolio: &Portfolio, instrument: &InstrumentId, current_price: f64) -> Self {
        let holding = portfolio.holding(instrument);
        let holdings_value = holding.map_or(0.0, |h| h.market_value(current_price));
        let unrealized_pnl = holding.map_or(0.0, |h| h.unrealized_pnl(current_price));

        let total_value = portfolio.cash + holdings_value;
        let pnl = total_value - portfolio.initial_balance;
        let pnl_pct = if portfolio.initial_balance > 0.0 {
            pnl / portfolio.initial_balance * 100.0
        } else {
            0.0
        };

        let realized_pnl: f64 = portfolio
            .trades
            .iter()
            .filter_map(|t| t.realized_pnl)
            .sum();
        let trades_buy = portfolio
            .trades
            .iter()
            .filter(|t| t.side == Side::Buy)
            .count();

        PortfolioSummary {
            cash: portfolio.cash,
            holdings_value,
            total_value,
            pnl,
            pnl_pct,
            realized_pnl,
            unrealized_pnl,
            trades_buy,
            trades_sell: portfolio.trades.len() - trades_buy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ledger::{apply_buy, apply_sell};

    fn gem() -> InstrumentId {
        InstrumentId::from("GEM")
    }

    #[test]
    fn fresh_portfolio_summary() {
        let portfolio = Portfolio::new(100_000.0);
        let s = PortfolioSummary::compute(&portfolio, &gem(), 150.0);
        assert!((s.total_value - 100_000.0).abs() < 1e-9);
        assert!(s.pnl.abs() < 1e-9);
        assert!(s.pnl_pct.abs() < 1e-9);
        assert_eq!(s.trades_buy, 0);
        assert_eq!(s.trades_sell, 0);
    }

    #[test]
    fn open_position_summary() {
        let mut portfolio = Portfolio::new(10_000.0);
        apply_buy(&mut portfolio, &gem(), 100.0, 1000.0, 1).unwrap();

        let s = PortfolioSummary::compute(&portfolio, &gem(), 110.0);
        assert!((s.holdings_value - 1100.0).abs() < 1e-9);
        assert!((s.total_value - 10_100.0).abs() < 1e-9);
        assert!((s.pnl - 100.0).abs() < 1e-9);
        assert!((s.pnl_pct - 1.0).abs() < 1e-9);
        assert!((s.unrealized_pnl - 100.0).abs() < 1e-9);
        assert!(s.realized_pnl.abs() < 1e-9);
    }

    #[test]
    fn closed_position_summary() {
        let mut portfolio = Portfolio::new(10_000.0);
        apply_buy(&mut portfolio, &gem(), 100.0, 1000.0, 1).unwrap();
        apply_sell(&mut portfolio, &gem(), 90.0, 2).unwrap();

        let s = PortfolioSummary::compute(&portfolio, &gem(), 95.0);
        assert!(s.holdings_value.abs() < 1e-9);
        assert!((s.realized_pnl + 100.0).abs() < 1e-9);
        assert!((s.pnl + 100.0).abs() < 1e-9);
        assert_eq!(s.trades_buy, 1);
        assert_eq!(s.trades_sell, 1);
    }

    #[test]
    fn zero_initial_balance_pct() {
        let portfolio = Portfolio::new(0.0);
        let s = PortfolioSummary::compute(&portfolio, &gem(), 10.0);
        assert_eq!(s.pnl_pct, 0.0);
    }
}
