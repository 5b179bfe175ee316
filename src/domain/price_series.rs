//! Synthetic price series: random-walk generation and bounded append.
//!
//! A [`PriceSeries`] is an immutable snapshot. [`PriceSeries::append`] returns a
//! new series with one more point, evicting the oldest points once the
//! configured maximum length is exceeded. Prices never drop below the model's
//! floor and timestamps never go backward.

use std::collections::VecDeque;

use rand::Rng;

use super::error::SimError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    /// Epoch milliseconds.
    pub time: i64,
    pub price: f64,
}

/// Parameters of the random-walk price model.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceModel {
    pub initial_price: f64,
    pub volatility: f64,
    pub floor: f64,
    pub interval_ms: i64,
    pub max_len: usize,
}

impl Default for PriceModel {
    fn default() -> Self {
        PriceModel {
            initial_price: 150.0,
            volatility: 0.02,
            floor: 10.0,
            interval_ms: 2000,
            max_len: 200,
        }
    }
}

impl PriceModel {
    /// Rejects a non-positive floor or interval, negative volatility and a
    /// zero history bound.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.floor <= 0.0 || !self.floor.is_finite() {
            return Err(SimError::invalid_argument("floor", "must be a positive number"));
        }
        if self.initial_price <= 0.0 || !self.initial_price.is_finite() {
            return Err(SimError::invalid_argument(
                "initial_price",
                "must be a positive number",
            ));
        }
        if self.volatility < 0.0 || !self.volatility.is_finite() {
            return Err(SimError::invalid_argument(
                "volatility",
                "must be a non-negative number",
            ));
        }
        if self.interval_ms <= 0 {
            return Err(SimError::invalid_argument("interval_ms", "must be positive"));
        }
        if self.max_len == 0 {
            return Err(SimError::invalid_argument("max_len", "must be at least 1"));
        }
        Ok(())
    }

    pub fn clamp(&self, price: f64) -> f64 {
        if price.is_nan() {
            return self.floor;
        }
        price.max(self.floor)
    }
}

/// Source of the next raw (unclamped) price given the last one.
pub trait PriceFeed {
    fn next_price(&mut self, last: f64, model: &PriceModel) -> f64;
}

/// `next = last + uniform(-0.5, 0.5) * last * volatility`.
#[derive(Debug, Clone)]
pub struct RandomWalk<R> {
    rng: R,
}

impl<R: Rng> RandomWalk<R> {
    pub fn new(rng: R) -> Self {
        RandomWalk { rng }
    }
}

impl<R: Rng> PriceFeed for RandomWalk<R> {
    fn next_price(&mut self, last: f64, model: &PriceModel) -> f64 {
        let shock: f64 = self.rng.gen_range(-0.5..0.5);
        last + shock * last * model.volatility
    }
}

/// Replays a fixed list of prices, then holds the last price flat.
#[derive(Debug, Clone, Default)]
pub struct ScriptedFeed {
    prices: VecDeque<f64>,
}

impl ScriptedFeed {
    pub fn new(prices: impl IntoIterator<Item = f64>) -> Self {
        ScriptedFeed {
            prices: prices.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.prices.len()
    }
}

impl PriceFeed for ScriptedFeed {
    fn next_price(&mut self, last: f64, _model: &PriceModel) -> f64 {
        self.prices.pop_front().unwrap_or(last)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
    max_len: usize,
}

impl PriceSeries {
    pub fn empty(max_len: usize) -> Self {
        PriceSeries {
            points: Vec::new(),
            max_len: max_len.max(1),
        }
    }

    /// Wraps existing points, keeping only the newest `max_len`.
    pub fn from_points(mut points: Vec<PricePoint>, max_len: usize) -> Self {
        let max_len = max_len.max(1);
        if points.len() > max_len {
            points.drain(..points.len() - max_len);
        }
        PriceSeries { points, max_len }
    }

    /// Generates `count` points spaced `interval_ms` apart, the last one
    /// `interval_ms` before `now_ms`, starting at the model's initial price.
    pub fn generate(
        count: usize,
        now_ms: i64,
        model: &PriceModel,
        feed: &mut dyn PriceFeed,
    ) -> Self {
        let mut points = Vec::with_capacity(count);
        let mut price = model.clamp(model.initial_price);

        for i in 0..count {
            if i > 0 {
                price = model.clamp(feed.next_price(price, model));
            }
            let steps_back = (count - i) as i64;
            points.push(PricePoint {
                time: now_ms - steps_back * model.interval_ms,
                price,
            });
        }

        Self::from_points(points, model.max_len)
    }

    /// Returns a new series extended by one random-walk step at `now_ms`.
    pub fn append(
        &self,
        now_ms: i64,
        model: &PriceModel,
        feed: &mut dyn PriceFeed,
    ) -> Result<Self, SimError> {
        let last = self
            .last()
            .ok_or_else(|| SimError::invalid_state("cannot append to an empty price series"))?;
        let next = feed.next_price(last.price, model);
        self.push_price(now_ms, next, model)
    }

    /// Returns a new series with `price` (floor-clamped) appended, evicting
    /// down to this series' own `max_len`. The timestamp is raised to the last
    /// point's time if `time` is earlier.
    pub fn push_price(&self, time: i64, price: f64, model: &PriceModel) -> Result<Self, SimError> {
        let last = self
            .last()
            .ok_or_else(|| SimError::invalid_state("cannot append to an empty price series"))?;

        let max_len = self.max_len;
        let keep_from = (self.points.len() + 1).saturating_sub(max_len);

        let mut points = Vec::with_capacity(self.points.len() + 1 - keep_from);
        points.extend_from_slice(&self.points[keep_from..]);
        points.push(PricePoint {
            time: time.max(last.time),
            price: model.clamp(price),
        });

        Ok(PriceSeries { points, max_len })
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn last_price(&self) -> Option<f64> {
        self.points.last().map(|p| p.price)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }
}
