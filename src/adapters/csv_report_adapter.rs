//! CSV export of the trade log and price history.

use std::fs::File;
use std::path::Path;

use chrono::DateTime;

use crate::domain::error::SimError;
use crate::domain::indicator::MovingAverage;
use crate::domain::portfolio::Trade;
use crate::domain::price_series::PriceSeries;
use crate::ports::report_port::ReportPort;

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        CsvReportAdapter
    }

    fn open(path: &Path) -> Result<csv::Writer<File>, SimError> {
        csv::Writer::from_path(path).map_err(|e| SimError::Report {
            reason: format!("failed to create {}: {}", path.display(), e),
        })
    }

    fn write_row(writer: &mut csv::Writer<File>, row: &[String]) -> Result<(), SimError> {
        writer.write_record(row).map_err(|e| SimError::Report {
            reason: format!("CSV write error: {}", e),
        })
    }
}

fn format_timestamp(ms: i64) -> String {
    match DateTime::from_timestamp_millis(ms) {
        Some(dt) => dt.to_rfc3339(),
        None => ms.to_string(),
    }
}

impl ReportPort for CsvReportAdapter {
    fn write_trades(&self, trades: &[Trade], path: &Path) -> Result<(), SimError> {
        let mut writer = Self::open(path)?;
        Self::write_row(
            &mut writer,
            &[
                "timestamp".into(),
                "instrument".into(),
                "side".into(),
                "quantity".into(),
                "price".into(),
                "realized_pnl".into(),
            ],
        )?;

        for trade in trades {
            Self::write_row(
                &mut writer,
                &[
                    format_timestamp(trade.timestamp),
                    trade.instrument.to_string(),
                    trade.side.to_string(),
                    trade.quantity.to_string(),
                    format!("{:.4}", trade.price),
                    trade
                        .realized_pnl
                        .map(|p| format!("{:.4}", p))
                        .unwrap_or_default(),
                ],
            )?;
        }

        writer.flush()?;
        Ok(())
    }

    fn write_prices(
        &self,
        series: &PriceSeries,
        short_ma: &MovingAverage,
        long_ma: &MovingAverage,
        path: &Path,
    ) -> Result<(), SimError> {
        let mut writer = Self::open(path)?;
        Self::write_row(
            &mut writer,
            &[
                "time".into(),
                "price".into(),
                "short_ma".into(),
                "long_ma".into(),
            ],
        )?;

        let cell = |ma: &MovingAverage, time: i64| {
            ma.value_at(time)
                .map(|v| format!("{:.4}", v))
                .unwrap_or_default()
        };

        for point in series.points() {
            Self::write_row(
                &mut writer,
                &[
                    format_timestamp(point.time),
                    format!("{:.4}", point.price),
                    cell(short_ma, point.time),
                    cell(long_ma, point.time),
                ],
            )?;
        }

        writer.flush()?;
        Ok(())
    }
}
