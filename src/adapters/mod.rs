//! Concrete adapter implementations for ports.

pub mod canned_commentary_adapter;
pub mod clock_adapter;
pub mod csv_report_adapter;
pub mod file_config_adapter;
