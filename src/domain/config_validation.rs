//! Configuration validation.
//!
//! Validates config fields before a simulation is built. Missing keys take
//! their defaults; only present, out-of-range values are rejected.

use crate::domain::error::SimError;
use crate::ports::config_port::ConfigPort;

pub fn validate_simulation_config(config: &dyn ConfigPort) -> Result<(), SimError> {
    validate_initial_balance(config)?;
    validate_price_model(config)?;
    validate_history(config)?;
    validate_seed(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), SimError> {
    validate_periods(config)?;
    validate_trade_amount(config)?;
    Ok(())
}

pub fn validate_instruments_config(config: &dyn ConfigPort) -> Result<(), SimError> {
    for (id, name) in config.section_entries("instruments") {
        if id.trim().is_empty() || name.trim().is_empty() {
            return Err(invalid(
                "instruments",
                &id,
                "instrument id and name must be non-empty",
            ));
        }
    }
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> SimError {
    SimError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_initial_balance(config: &dyn ConfigPort) -> Result<(), SimError> {
    let value = config.get_double("simulation", "initial_balance", 100_000.0);
    if value <= 0.0 {
        return Err(invalid(
            "simulation",
            "initial_balance",
            "initial_balance must be positive",
        ));
    }
    Ok(())
}

fn validate_price_model(config: &dyn ConfigPort) -> Result<(), SimError> {
    let initial_price = config.get_double("simulation", "initial_price", 150.0);
    if initial_price <= 0.0 {
        return Err(invalid(
            "simulation",
            "initial_price",
            "initial_price must be positive",
        ));
    }

    let volatility = config.get_double("simulation", "volatility", 0.02);
    if volatility < 0.0 {
        return Err(invalid(
            "simulation",
            "volatility",
            "volatility must be non-negative",
        ));
    }

    let floor = config.get_double("simulation", "price_floor", 10.0);
    if floor <= 0.0 {
        return Err(invalid(
            "simulation",
            "price_floor",
            "price_floor must be positive",
        ));
    }
    if floor > initial_price {
        return Err(invalid(
            "simulation",
            "price_floor",
            "price_floor must not exceed initial_price",
        ));
    }

    let interval = config.get_int("simulation", "interval_ms", 2000);
    if interval <= 0 {
        return Err(invalid(
            "simulation",
            "interval_ms",
            "interval_ms must be positive",
        ));
    }
    Ok(())
}

fn validate_history(config: &dyn ConfigPort) -> Result<(), SimError> {
    let max_len = config.get_int("simulation", "max_len", 200);
    if max_len < 1 {
        return Err(invalid(
            "simulation",
            "max_len",
            "max_len must be at least 1",
        ));
    }

    let history_len = config.get_int("simulation", "history_len", 150);
    if history_len < 1 || history_len > max_len {
        return Err(invalid(
            "simulation",
            "history_len",
            "history_len must be between 1 and max_len",
        ));
    }
    Ok(())
}

fn validate_seed(config: &dyn ConfigPort) -> Result<(), SimError> {
    match config.get_string("simulation", "seed") {
        Some(s) if s.trim().parse::<u64>().is_err() => Err(invalid(
            "simulation",
            "seed",
            "seed must be a non-negative integer",
        )),
        _ => Ok(()),
    }
}

fn validate_periods(config: &dyn ConfigPort) -> Result<(), SimError> {
    let short = config.get_int("strategy", "short_period", 10);
    if short < 1 {
        return Err(invalid(
            "strategy",
            "short_period",
            "short_period must be at least 1",
        ));
    }

    let long = config.get_int("strategy", "long_period", 30);
    if long < 1 {
        return Err(invalid(
            "strategy",
            "long_period",
            "long_period must be at least 1",
        ));
    }

    if short >= long {
        return Err(invalid(
            "strategy",
            "short_period",
            "short_period must be less than long_period",
        ));
    }
    Ok(())
}

fn validate_trade_amount(config: &dyn ConfigPort) -> Result<(), SimError> {
    let value = config.get_double("strategy", "trade_amount", 1000.0);
    if value <= 0.0 {
        return Err(invalid(
            "strategy",
            "trade_amount",
            "trade_amount must be positive",
        ));
    }
    Ok(())
}
