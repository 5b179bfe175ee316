//! Report export port.

use std::path::Path;

use crate::domain::error::SimError;
use crate::domain::indicator::MovingAverage;
use crate::domain::portfolio::Trade;
use crate::domain::price_series::PriceSeries;

/// Port for exporting the trade log and price history.
pub trait ReportPort {
    fn write_trades(&self, trades: &[Trade], path: &Path) -> Result<(), SimError>;

    fn write_prices(
        &self,
        series: &PriceSeries,
        short_ma: &MovingAverage,
        long_ma: &MovingAverage,
        path: &Path,
    ) -> Result<(), SimError>;
}
