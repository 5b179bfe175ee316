//! The driver-facing simulation for one active instrument.
//!
//! A `Simulation` owns everything a tick reads or writes: the price series,
//! the portfolio and trade log, the strategy and the random source. Ticks run
//! through `&mut self`, so they are serialized by construction; a driver that
//! shares a simulation across threads wraps it in a `Mutex`.
//!
//! Parameter changes (`set_strategy`, `select_instrument`, `reset`) are
//! rejected while running. Selecting an instrument is a hard reset: history,
//! portfolio and trade log are rebuilt before the call returns.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{error, info, warn};

use super::error::SimError;
use super::indicator::MovingAverage;
use super::instrument::{Instrument, InstrumentCatalog, InstrumentId};
use super::metrics::PortfolioSummary;
use super::portfolio::{Portfolio, Trade};
use super::price_series::{PriceFeed, PriceModel, PriceSeries, RandomWalk};
use super::runner::{TradeAction, compute_averages, run_tick};
use super::signal::Signal;
use super::strategy::{Strategy, StrategyUpdate};
use crate::ports::clock_port::ClockPort;
use crate::ports::commentary_port::CommentaryRequest;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub initial_balance: f64,
    /// Points generated on every reset.
    pub history_len: usize,
    pub model: PriceModel,
    /// Seed for the random walk; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            initial_balance: 100_000.0,
            history_len: 150,
            model: PriceModel::default(),
            seed: None,
        }
    }
}

/// Consistent copy of the simulation state for display or export.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub instrument: Instrument,
    pub strategy: Strategy,
    pub price_series: PriceSeries,
    pub portfolio: Portfolio,
    pub trades: Vec<Trade>,
    pub running: bool,
    pub short_ma: MovingAverage,
    pub long_ma: MovingAverage,
    pub summary: PortfolioSummary,
    pub commentary: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub signal: Signal,
    pub action: TradeAction,
    pub price: f64,
    pub time: i64,
}

/// Identifies an in-flight commentary request. A result is accepted only if
/// no reset or instrument change happened since the ticket was issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentaryTicket {
    generation: u64,
    pub instrument: InstrumentId,
    pub request: CommentaryRequest,
}

pub struct Simulation {
    config: SimulationConfig,
    catalog: InstrumentCatalog,
    instrument: Instrument,
    strategy: Strategy,
    series: PriceSeries,
    portfolio: Portfolio,
    short_ma: MovingAverage,
    long_ma: MovingAverage,
    running: bool,
    feed: Box<dyn PriceFeed + Send>,
    clock: Box<dyn ClockPort + Send>,
    commentary: Option<String>,
    generation: u64,
}

impl Simulation {
    /// Random-walk simulation on the first catalog instrument.
    pub fn new(
        config: SimulationConfig,
        strategy: Strategy,
        catalog: InstrumentCatalog,
        clock: Box<dyn ClockPort + Send>,
    ) -> Result<Self, SimError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_feed(config, strategy, catalog, clock, Box::new(RandomWalk::new(rng)))
    }

    pub fn with_feed(
        config: SimulationConfig,
        strategy: Strategy,
        catalog: InstrumentCatalog,
        clock: Box<dyn ClockPort + Send>,
        feed: Box<dyn PriceFeed + Send>,
    ) -> Result<Self, SimError> {
        strategy.validate()?;
        config.model.validate()?;
        let instrument = catalog.first().clone();
        let max_len = config.model.max_len;
        let mut sim = Simulation {
            portfolio: Portfolio::new(config.initial_balance),
            config,
            catalog,
            instrument,
            strategy,
            series: PriceSeries::empty(max_len),
            short_ma: MovingAverage {
                period: 0,
                values: Vec::new(),
            },
            long_ma: MovingAverage {
                period: 0,
                values: Vec::new(),
            },
            running: false,
            feed,
            clock,
            commentary: None,
            generation: 0,
        };
        sim.reset_state()?;
        Ok(sim)
    }

    pub fn start(&mut self) {
        if !self.running {
            info!(instrument = %self.instrument.id, "simulation started");
        }
        self.running = true;
    }

    pub fn stop(&mut self) {
        if self.running {
            info!(instrument = %self.instrument.id, "simulation stopped");
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_strategy(&mut self, update: &StrategyUpdate) -> Result<(), SimError> {
        self.ensure_stopped("change strategy")?;
        let strategy = self.strategy.merged(update)?;
        let (short_ma, long_ma) = compute_averages(&self.series, &strategy)?;

        self.strategy = strategy;
        self.short_ma = short_ma;
        self.long_ma = long_ma;
        Ok(())
    }

    pub fn select_instrument(&mut self, id: &InstrumentId) -> Result<(), SimError> {
        self.ensure_stopped("select instrument")?;
        let instrument = self
            .catalog
            .get(id)
            .cloned()
            .ok_or_else(|| SimError::UnknownInstrument { id: id.to_string() })?;

        info!(instrument = %instrument.id, "instrument selected");
        self.instrument = instrument;
        self.reset_state()
    }

    pub fn reset(&mut self) -> Result<(), SimError> {
        self.ensure_stopped("reset")?;
        self.reset_state()
    }

    /// Runs one tick if started. `Ok(None)` when stopped.
    pub fn tick(&mut self) -> Result<Option<TickReport>, SimError> {
        if !self.running {
            return Ok(None);
        }
        self.step().map(Some)
    }

    /// Runs one tick regardless of the running flag. An error stops the
    /// simulation and leaves the previous state in place.
    pub fn step(&mut self) -> Result<TickReport, SimError> {
        let now = self.clock.now_ms();
        let outcome = match run_tick(
            &self.series,
            &self.portfolio,
            &self.strategy,
            &self.instrument.id,
            &self.config.model,
            now,
            self.feed.as_mut(),
        ) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.running = false;
                error!(instrument = %self.instrument.id, error = %e, "tick failed, simulation halted");
                return Err(e);
            }
        };

        self.series = outcome.series;
        self.portfolio = outcome.portfolio;
        self.short_ma = outcome.short_ma;
        self.long_ma = outcome.long_ma;

        Ok(TickReport {
            signal: outcome.signal,
            action: outcome.action,
            price: outcome.price,
            time: outcome.time,
        })
    }

    pub fn snapshot(&self) -> Snapshot {
        let price = self.series.last_price().unwrap_or(0.0);
        Snapshot {
            instrument: self.instrument.clone(),
            strategy: self.strategy.clone(),
            price_series: self.series.clone(),
            portfolio: self.portfolio.clone(),
            trades: self.portfolio.trades.clone(),
            running: self.running,
            short_ma: self.short_ma.clone(),
            long_ma: self.long_ma.clone(),
            summary: PortfolioSummary::compute(&self.portfolio, &self.instrument.id, price),
            commentary: self.commentary.clone(),
        }
    }

    pub fn begin_commentary(&mut self) -> CommentaryTicket {
        self.commentary = None;
        CommentaryTicket {
            generation: self.generation,
            instrument: self.instrument.id.clone(),
            request: CommentaryRequest::from(&self.instrument),
        }
    }

    /// Stores `text` if `ticket` is still current. Returns whether it was kept.
    pub fn accept_commentary(&mut self, ticket: &CommentaryTicket, text: String) -> bool {
        if ticket.generation != self.generation || ticket.instrument != self.instrument.id {
            warn!(instrument = %ticket.instrument, "discarding stale commentary");
            return false;
        }
        self.commentary = Some(text);
        true
    }

    pub fn commentary(&self) -> Option<&str> {
        self.commentary.as_deref()
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn instrument(&self) -> &Instrument {
        &self.instrument
    }

    pub fn catalog(&self) -> &InstrumentCatalog {
        &self.catalog
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    pub fn series(&self) -> &PriceSeries {
        &self.series
    }

    fn ensure_stopped(&self, operation: &str) -> Result<(), SimError> {
        if self.running {
            warn!(operation, "rejected while running");
            return Err(SimError::Busy {
                operation: operation.to_string(),
            });
        }
        Ok(())
    }

    fn reset_state(&mut self) -> Result<(), SimError> {
        let series = PriceSeries::generate(
            self.config.history_len,
            self.clock.now_ms(),
            &self.config.model,
            self.feed.as_mut(),
        );
        let (short_ma, long_ma) = compute_averages(&series, &self.strategy)?;

        self.series = series;
        self.short_ma = short_ma;
        self.long_ma = long_ma;
        self.portfolio = Portfolio::new(self.config.initial_balance);
        self.commentary = None;
        self.generation += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::clock_adapter::ManualClock;
    use crate::domain::price_series::ScriptedFeed;

    fn config() -> SimulationConfig {
        SimulationConfig {
            history_len: 30,
            seed: Some(42),
            ..SimulationConfig::default()
        }
    }

    fn sim() -> Simulation {
        Simulation::new(
            config(),
            Strategy::default(),
            InstrumentCatalog::default(),
            Box::new(ManualClock::new(1_000_000)),
        )
        .unwrap()
    }

    #[test]
    fn new_starts_stopped_on_first_instrument() {
        let s = sim();
        assert!(!s.is_running());
        assert_eq!(s.instrument().id.as_str(), "GEM");
        assert_eq!(s.series().len(), 30);
        assert!((s.portfolio().cash - 100_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn tick_when_stopped_does_nothing() {
        let mut s = sim();
        let before = s.series().clone();
        assert_eq!(s.tick().unwrap(), None);
        assert_eq!(s.series(), &before);
    }

    #[test]
    fn tick_when_running_appends() {
        let mut s = sim();
        s.start();
        let report = s.tick().unwrap().unwrap();
        assert_eq!(s.series().len(), 31);
        assert_eq!(report.time, 1_000_000);
    }

    #[test]
    fn controls_rejected_while_running() {
        let mut s = sim();
        s.start();

        let update = StrategyUpdate {
            short_period: Some(3),
            ..StrategyUpdate::default()
        };
        assert!(matches!(s.set_strategy(&update), Err(SimError::Busy { .. })));
        assert!(matches!(
            s.select_instrument(&InstrumentId::from("NOVA")),
            Err(SimError::Busy { .. })
        ));
        assert!(matches!(s.reset(), Err(SimError::Busy { .. })));
        assert_eq!(s.strategy().short_period, 10);
        assert_eq!(s.instrument().id.as_str(), "GEM");
    }

    #[test]
    fn set_strategy_recomputes_averages() {
        let mut s = sim();
        let update = StrategyUpdate {
            short_period: Some(5),
            long_period: Some(20),
            ..StrategyUpdate::default()
        };
        s.set_strategy(&update).unwrap();

        let snap = s.snapshot();
        assert_eq!(snap.strategy.short_period, 5);
        assert_eq!(snap.short_ma.len(), 26);
        assert_eq!(snap.long_ma.len(), 11);
    }

    #[test]
    fn set_strategy_invalid_keeps_previous() {
        let mut s = sim();
        let update = StrategyUpdate {
            long_period: Some(0),
            ..StrategyUpdate::default()
        };
        assert!(matches!(
            s.set_strategy(&update),
            Err(SimError::InvalidArgument { .. })
        ));
        assert_eq!(s.strategy(), &Strategy::default());
    }

    #[test]
    fn select_unknown_instrument() {
        let mut s = sim();
        let result = s.select_instrument(&InstrumentId::from("ZZZ"));
        assert!(matches!(result, Err(SimError::UnknownInstrument { .. })));
        assert_eq!(s.instrument().id.as_str(), "GEM");
    }

    #[test]
    fn select_instrument_resets_portfolio() {
        let mut s = sim();
        s.portfolio.cash = 1.0;
        s.portfolio.trades.push(Trade {
            instrument: InstrumentId::from("GEM"),
            side: crate::domain::portfolio::Side::Buy,
            quantity: 1.0,
            price: 1.0,
            timestamp: 0,
            realized_pnl: None,
        });

        s.select_instrument(&InstrumentId::from("TITAN")).unwrap();

        let snap = s.snapshot();
        assert_eq!(snap.instrument.name, "Titan Industries");
        assert!(snap.trades.is_empty());
        assert!((snap.portfolio.cash - 100_000.0).abs() < f64::EPSILON);
        assert_eq!(snap.price_series.len(), 30);
    }

    #[test]
    fn tick_error_halts() {
        let cfg = SimulationConfig {
            history_len: 0,
            ..config()
        };
        let mut s = Simulation::new(
            cfg,
            Strategy::default(),
            InstrumentCatalog::default(),
            Box::new(ManualClock::new(0)),
        )
        .unwrap();
        s.start();

        let result = s.tick();

        assert!(matches!(result, Err(SimError::InvalidState { .. })));
        assert!(!s.is_running());
        assert!(s.series().is_empty());
    }

    #[test]
    fn non_positive_floor_is_rejected() {
        let cfg = SimulationConfig {
            model: PriceModel {
                floor: -50.0,
                volatility: 3.0,
                ..PriceModel::default()
            },
            seed: Some(3),
            ..config()
        };
        let result = Simulation::new(
            cfg,
            Strategy::default(),
            InstrumentCatalog::default(),
            Box::new(ManualClock::new(0)),
        );
        assert!(matches!(result, Err(SimError::InvalidArgument { .. })));
    }

    #[test]
    fn stale_commentary_is_discarded() {
        let mut s = sim();
        let ticket = s.begin_commentary();
        assert_eq!(ticket.request.instrument_symbol, "GEM");

        s.select_instrument(&InstrumentId::from("NOVA")).unwrap();

        assert!(!s.accept_commentary(&ticket, "old news".into()));
        assert_eq!(s.commentary(), None);
    }

    #[test]
    fn current_commentary_is_kept() {
        let mut s = sim();
        let ticket = s.begin_commentary();
        s.start();
        s.tick().unwrap();
        assert!(s.accept_commentary(&ticket, "fresh".into()));
        assert_eq!(s.snapshot().commentary.as_deref(), Some("fresh"));
    }

    #[test]
    fn scripted_feed_drives_prices() {
        let cfg = SimulationConfig {
            history_len: 3,
            model: PriceModel {
                initial_price: 100.0,
                ..PriceModel::default()
            },
            ..config()
        };
        let mut s = Simulation::with_feed(
            cfg,
            Strategy::default(),
            InstrumentCatalog::default(),
            Box::new(ManualClock::new(10_000)),
            Box::new(ScriptedFeed::new([100.0, 100.0, 5.0])),
        )
        .unwrap();

        let report = s.step().unwrap();
        assert_eq!(report.price, 10.0);
    }
}
