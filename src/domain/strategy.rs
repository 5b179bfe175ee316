//! Strategy configuration and partial updates.

use std::fmt;

use super::error::SimError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    SmaCrossover,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::SmaCrossover => write!(f, "SMA_CROSSOVER"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Strategy {
    pub kind: StrategyKind,
    pub short_period: usize,
    pub long_period: usize,
    /// Cash spent per buy signal.
    pub trade_amount: f64,
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy {
            kind: StrategyKind::SmaCrossover,
            short_period: 10,
            long_period: 30,
            trade_amount: 1000.0,
        }
    }
}

impl Strategy {
    /// Rejects non-positive periods and trade amounts.
    ///
    /// `short_period < long_period` is expected but not required here; the
    /// engine runs either way. Config validation enforces it for files.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.short_period == 0 {
            return Err(SimError::invalid_argument(
                "short_period",
                "must be at least 1",
            ));
        }
        if self.long_period == 0 {
            return Err(SimError::invalid_argument("long_period", "must be at least 1"));
        }
        if self.trade_amount <= 0.0 || !self.trade_amount.is_finite() {
            return Err(SimError::invalid_argument(
                "trade_amount",
                "must be a positive number",
            ));
        }
        Ok(())
    }

    /// Returns a copy with the fields present in `update` replaced, validated.
    pub fn merged(&self, update: &StrategyUpdate) -> Result<Strategy, SimError> {
        let merged = Strategy {
            kind: self.kind,
            short_period: update.short_period.unwrap_or(self.short_period),
            long_period: update.long_period.unwrap_or(self.long_period),
            trade_amount: update.trade_amount.unwrap_or(self.trade_amount),
        };
        merged.validate()?;
        Ok(merged)
    }
}

/// Partial strategy change; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrategyUpdate {
    pub short_period: Option<usize>,
    pub long_period: Option<usize>,
    pub trade_amount: Option<f64>,
}
