//! Core domain types and logic.

pub mod price_series;
pub mod indicator;
pub mod signal;
pub mod portfolio;
pub mod ledger;
pub mod strategy;
pub mod instrument;
pub mod runner;
pub mod simulation;
pub mod metrics;
pub mod config_validation;
pub mod error;
