//! Moving-average series derived from a price series.
//!
//! - `MovingAveragePoint`: one value aligned to a price point's time
//! - `MovingAverage`: the derived series plus the period that produced it
//!
//! A moving average is a pure projection of its input and is never stored
//! independently of the price series it came from.

pub mod sma;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovingAveragePoint {
    pub time: i64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MovingAverage {
    pub period: usize,
    pub values: Vec<MovingAveragePoint>,
}

impl MovingAverage {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn last(&self) -> Option<&MovingAveragePoint> {
        self.values.last()
    }

    /// Value at `time`, searching from the newest point.
    pub fn value_at(&self, time: i64) -> Option<f64> {
        self.values
            .iter()
            .rev()
            .find(|p| p.time == time)
            .map(|p| p.value)
    }
}

impl fmt::Display for MovingAverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SMA({})", self.period)
    }
}
