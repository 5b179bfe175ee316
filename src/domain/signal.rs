//! Moving-average crossover detection.
//!
//! Signals are edge-triggered: they fire on the tick where the short average
//! crosses the long one, not on every tick it stays on the same side.

use std::fmt;

use super::indicator::{MovingAverage, MovingAveragePoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Neutral,
    /// Short average crossed above the long average. Buy.
    GoldenCross,
    /// Short average crossed below the long average. Sell.
    DeathCross,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Neutral => write!(f, "neutral"),
            Signal::GoldenCross => write!(f, "golden cross"),
            Signal::DeathCross => write!(f, "death cross"),
        }
    }
}

/// Classifies the transition between two aligned samples.
///
/// Equality on the previous sample counts as "not yet crossed", so a move from
/// `prev_short == prev_long` to strictly above (below) is a golden (death) cross.
pub fn classify(prev_short: f64, curr_short: f64, prev_long: f64, curr_long: f64) -> Signal {
    if prev_short <= prev_long && curr_short > curr_long {
        Signal::GoldenCross
    } else if prev_short >= prev_long && curr_short < curr_long {
        Signal::DeathCross
    } else {
        Signal::Neutral
    }
}

/// Compares the two most recent points the series share by timestamp.
pub fn detect(short: &MovingAverage, long: &MovingAverage) -> Signal {
    match last_two_aligned(&short.values, &long.values) {
        Some([(prev_short, prev_long), (curr_short, curr_long)]) => {
            classify(prev_short, curr_short, prev_long, curr_long)
        }
        None => Signal::Neutral,
    }
}

/// Walks both series back from their ends, pairing points with equal time.
/// Returns `[(short, long) previous, (short, long) current]`.
fn last_two_aligned(
    short: &[MovingAveragePoint],
    long: &[MovingAveragePoint],
) -> Option<[(f64, f64); 2]> {
    let mut i = short.len();
    let mut j = long.len();
    let mut current: Option<(f64, f64)> = None;

    while i > 0 && j > 0 {
        let s = short[i - 1];
        let l = long[j - 1];
        if s.time == l.time {
            match current {
                None => current = Some((s.value, l.value)),
                Some(curr) => return Some([(s.value, l.value), curr]),
            }
            i -= 1;
            j -= 1;
        } else if s.time > l.time {
            i -= 1;
        } else {
            j -= 1;
        }
    }

    None
}
