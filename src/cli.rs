//! CLI definition and dispatch.
//!
//! The `run` command is the periodic driver: it advances a simulated clock by
//! the configured interval before each tick and optionally paces ticks in
//! real time.

use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use crate::adapters::canned_commentary_adapter::{CannedCommentaryAdapter, Trend};
use crate::adapters::clock_adapter::ManualClock;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{
    validate_instruments_config, validate_simulation_config, validate_strategy_config,
};
use crate::domain::error::SimError;
use crate::domain::instrument::{Instrument, InstrumentCatalog, InstrumentId};
use crate::domain::price_series::PriceModel;
use crate::domain::runner::{SkipReason, TradeAction};
use crate::domain::simulation::{Simulation, SimulationConfig, Snapshot};
use crate::domain::strategy::{Strategy, StrategyKind};
use crate::ports::commentary_port::fetch_commentary;
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "simtrader", about = "Simulated moving-average crossover trading bot")]
pub struct Cli {
    /// Log engine events at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the bot for a number of ticks
    Run {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        instrument: Option<String>,
        #[arg(short, long, default_value_t = 100)]
        ticks: usize,
        /// Real-time pause between ticks in milliseconds
        #[arg(long, default_value_t = 0)]
        pace_ms: u64,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        trades_csv: Option<PathBuf>,
        #[arg(long)]
        prices_csv: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List configured instruments
    Instruments {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print market commentary for an instrument
    Insight {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        instrument: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    init_logging(cli.verbose);
    match cli.command {
        Command::Run {
            config,
            instrument,
            ticks,
            pace_ms,
            seed,
            trades_csv,
            prices_csv,
        } => run_simulation(&RunOptions {
            config,
            instrument,
            ticks,
            pace_ms,
            seed,
            trades_csv,
            prices_csv,
        }),
        Command::Validate { config } => run_validate(&config),
        Command::Instruments { config } => run_instruments(config.as_ref()),
        Command::Insight { config, instrument } => {
            run_insight(config.as_ref(), instrument.as_deref())
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // a second init (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub config: Option<PathBuf>,
    pub instrument: Option<String>,
    pub ticks: usize,
    pub pace_ms: u64,
    pub seed: Option<u64>,
    pub trades_csv: Option<PathBuf>,
    pub prices_csv: Option<PathBuf>,
}

pub fn load_config(path: Option<&PathBuf>) -> Result<FileConfigAdapter, SimError> {
    match path {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            FileConfigAdapter::from_file(path).map_err(|e| SimError::ConfigParse {
                file: path.display().to_string(),
                reason: e.to_string(),
            })
        }
        None => Ok(FileConfigAdapter::empty()),
    }
}

pub fn validate_config(adapter: &dyn ConfigPort) -> Result<(), SimError> {
    validate_simulation_config(adapter)?;
    validate_strategy_config(adapter)?;
    validate_instruments_config(adapter)?;
    Ok(())
}

fn positive_usize(
    adapter: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: usize,
) -> Result<usize, SimError> {
    let value = adapter.get_int(section, key, default as i64);
    usize::try_from(value)
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| SimError::ConfigInvalid {
            section: section.into(),
            key: key.into(),
            reason: format!("{key} must be a positive integer"),
        })
}

pub fn build_simulation_config(adapter: &dyn ConfigPort) -> Result<SimulationConfig, SimError> {
    let defaults = SimulationConfig::default();
    let model_defaults = PriceModel::default();

    let seed = match adapter.get_string("simulation", "seed") {
        Some(s) => Some(s.trim().parse::<u64>().map_err(|_| SimError::ConfigInvalid {
            section: "simulation".into(),
            key: "seed".into(),
            reason: "seed must be a non-negative integer".into(),
        })?),
        None => None,
    };

    Ok(SimulationConfig {
        initial_balance: adapter.get_double(
            "simulation",
            "initial_balance",
            defaults.initial_balance,
        ),
        history_len: positive_usize(adapter, "simulation", "history_len", defaults.history_len)?,
        model: PriceModel {
            initial_price: adapter.get_double(
                "simulation",
                "initial_price",
                model_defaults.initial_price,
            ),
            volatility: adapter.get_double("simulation", "volatility", model_defaults.volatility),
            floor: adapter.get_double("simulation", "price_floor", model_defaults.floor),
            interval_ms: adapter.get_int("simulation", "interval_ms", model_defaults.interval_ms),
            max_len: positive_usize(adapter, "simulation", "max_len", model_defaults.max_len)?,
        },
        seed,
    })
}

pub fn build_strategy(adapter: &dyn ConfigPort) -> Result<Strategy, SimError> {
    let defaults = Strategy::default();
    Ok(Strategy {
        kind: StrategyKind::SmaCrossover,
        short_period: positive_usize(adapter, "strategy", "short_period", defaults.short_period)?,
        long_period: positive_usize(adapter, "strategy", "long_period", defaults.long_period)?,
        trade_amount: adapter.get_double("strategy", "trade_amount", defaults.trade_amount),
    })
}

pub fn build_catalog(adapter: &dyn ConfigPort) -> InstrumentCatalog {
    let instruments = adapter
        .section_entries("instruments")
        .into_iter()
        .map(|(id, name)| Instrument::new(id.trim(), name.trim()))
        .collect();
    InstrumentCatalog::new(instruments)
}

/// Loads, validates and builds a stopped simulation driven by `clock`.
pub fn build_simulation(
    adapter: &dyn ConfigPort,
    seed_override: Option<u64>,
    instrument: Option<&str>,
    clock: ManualClock,
) -> Result<Simulation, SimError> {
    validate_config(adapter)?;
    let mut config = build_simulation_config(adapter)?;
    if seed_override.is_some() {
        config.seed = seed_override;
    }
    let strategy = build_strategy(adapter)?;
    let catalog = build_catalog(adapter);

    let mut sim = Simulation::new(config, strategy, catalog, Box::new(clock))?;
    if let Some(id) = instrument {
        sim.select_instrument(&InstrumentId::new(id))?;
    }
    Ok(sim)
}

fn fail(err: &SimError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

pub fn run_simulation(opts: &RunOptions) -> ExitCode {
    let adapter = match load_config(opts.config.as_ref()) {
        Ok(a) => a,
        Err(e) => return fail(&e),
    };

    let clock = ManualClock::new(Utc::now().timestamp_millis());
    let mut sim = match build_simulation(
        &adapter,
        opts.seed,
        opts.instrument.as_deref(),
        clock.clone(),
    ) {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };
    let interval_ms = sim.config().model.interval_ms;

    let instrument = sim.instrument().clone();
    eprintln!(
        "Running {} ticks on {} ({})",
        opts.ticks, instrument.name, instrument.id
    );

    sim.start();
    for _ in 0..opts.ticks {
        clock.advance(interval_ms);
        match sim.tick() {
            Ok(Some(report)) => match report.action {
                TradeAction::Bought(trade) | TradeAction::Sold(trade) => {
                    eprintln!(
                        "{} {} x {} @ {:.2}",
                        trade.side, trade.instrument, trade.quantity, trade.price
                    );
                }
                TradeAction::Skipped(reason) => {
                    eprintln!("{} ignored: {}", report.signal, describe_skip(reason));
                }
                TradeAction::Hold => {}
            },
            Ok(None) => break,
            Err(e) => return fail(&e),
        }
        if opts.pace_ms > 0 {
            thread::sleep(Duration::from_millis(opts.pace_ms));
        }
    }
    sim.stop();

    let snapshot = sim.snapshot();
    print_summary(&snapshot);

    if let Err(e) = export(&snapshot, opts.trades_csv.as_deref(), opts.prices_csv.as_deref()) {
        return fail(&e);
    }

    ExitCode::SUCCESS
}

fn describe_skip(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::InsufficientCash => "insufficient cash",
        SkipReason::QuantityZero => "trade amount below one unit",
        SkipReason::NoPosition => "no position to sell",
    }
}

pub fn export(
    snapshot: &Snapshot,
    trades_csv: Option<&Path>,
    prices_csv: Option<&Path>,
) -> Result<(), SimError> {
    let report = CsvReportAdapter::new();
    if let Some(path) = trades_csv {
        report.write_trades(&snapshot.trades, path)?;
        eprintln!("Trades written to {}", path.display());
    }
    if let Some(path) = prices_csv {
        report.write_prices(
            &snapshot.price_series,
            &snapshot.short_ma,
            &snapshot.long_ma,
            path,
        )?;
        eprintln!("Prices written to {}", path.display());
    }
    Ok(())
}

fn print_summary(snapshot: &Snapshot) {
    let s = &snapshot.summary;
    println!(
        "{} ({}) {} short={} long={} amount={:.2}",
        snapshot.instrument.name,
        snapshot.instrument.id,
        snapshot.strategy.kind,
        snapshot.strategy.short_period,
        snapshot.strategy.long_period,
        snapshot.strategy.trade_amount
    );
    if let Some(price) = snapshot.price_series.last_price() {
        println!("Last price:     {:.2}", price);
    }
    println!("Cash:           {:.2}", s.cash);
    println!("Holdings value: {:.2}", s.holdings_value);
    println!("Total value:    {:.2}", s.total_value);
    println!("P&L:            {:.2} ({:.2}%)", s.pnl, s.pnl_pct);
    println!("Realized P&L:   {:.2}", s.realized_pnl);
    if let Some(holding) = snapshot.portfolio.holding(&snapshot.instrument.id) {
        println!(
            "Position:       {} @ avg {:.2}",
            holding.quantity, holding.average_cost
        );
    }
    println!("Trades:         {} buys, {} sells", s.trades_buy, s.trades_sell);
    for trade in &snapshot.trades {
        println!(
            "  {:>13}  {:<4} {:>8} @ {:.2}",
            trade.timestamp, trade.side, trade.quantity, trade.price
        );
    }
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(Some(config_path)) {
        Ok(a) => a,
        Err(e) => return fail(&e),
    };
    if let Err(e) = validate_config(&adapter) {
        return fail(&e);
    }
    println!("OK: {} is valid", config_path.display());
    ExitCode::SUCCESS
}

fn run_instruments(config_path: Option<&PathBuf>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(e) => return fail(&e),
    };
    if let Err(e) = validate_instruments_config(&adapter) {
        return fail(&e);
    }
    for instrument in build_catalog(&adapter).iter() {
        println!("{}\t{}", instrument.id, instrument.name);
    }
    ExitCode::SUCCESS
}

fn run_insight(config_path: Option<&PathBuf>, instrument: Option<&str>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(e) => return fail(&e),
    };
    let clock = ManualClock::new(Utc::now().timestamp_millis());
    let mut sim = match build_simulation(&adapter, None, instrument, clock) {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };

    let snapshot = sim.snapshot();
    let provider =
        CannedCommentaryAdapter::new(Trend::from_averages(&snapshot.short_ma, &snapshot.long_ma));
    let ticket = sim.begin_commentary();
    let text = fetch_commentary(&provider, sim.instrument());
    sim.accept_commentary(&ticket, text);

    if let Some(text) = sim.commentary() {
        println!("{text}");
    }
    ExitCode::SUCCESS
}
