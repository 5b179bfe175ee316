//! Port traits the domain is driven through.

pub mod clock_port;
pub mod commentary_port;
pub mod config_port;
pub mod report_port;
