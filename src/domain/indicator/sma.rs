//! Simple Moving Average.
//!
//! SMA(n)[i] = (P[i-n+1] + ... + P[i]) / n
//! Output holds one point per full window, so its length is len - n + 1,
//! or zero when fewer than n prices exist.

use crate::domain::error::SimError;
use crate::domain::indicator::{MovingAverage, MovingAveragePoint};
use crate::domain::price_series::PricePoint;

pub fn calculate_sma(points: &[PricePoint], period: usize) -> Result<MovingAverage, SimError> {
    if period == 0 {
        return Err(SimError::invalid_argument("period", "must be at least 1"));
    }

    // Each window is summed on its own so the result is exactly sum / period
    // with no running-sum drift.
    let values = points
        .windows(period)
        .map(|window| {
            let sum: f64 = window.iter().map(|p| p.price).sum();
            MovingAveragePoint {
                time: window[period - 1].time,
                value: sum / period as f64,
            }
        })
        .collect();

    Ok(MovingAverage { period, values })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_points(prices: &[f64]) -> Vec<PricePoint> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &price)| PricePoint {
                time: (i as i64 + 1) * 1000,
                price,
            })
            .collect()
    }

    #[test]
    fn sma_basic() {
        let points = make_points(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let sma = calculate_sma(&points, 3).unwrap();

        assert_eq!(sma.len(), 3);
        assert!((sma.values[0].value - 20.0).abs() < 1e-9);
        assert!((sma.values[1].value - 30.0).abs() < 1e-9);
        assert!((sma.values[2].value - 40.0).abs() < 1e-9);
    }

    #[test]
    fn sma_aligned_to_window_end() {
        let points = make_points(&[1.0, 2.0, 3.0, 4.0]);
        let sma = calculate_sma(&points, 2).unwrap();
        let times: Vec<i64> = sma.values.iter().map(|p| p.time).collect();
        assert_eq!(times, vec![2000, 3000, 4000]);
    }

    #[test]
    fn sma_period_one_is_identity() {
        let points = make_points(&[5.0, 7.5, 9.0]);
        let sma = calculate_sma(&points, 1).unwrap();
        let values: Vec<f64> = sma.values.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![5.0, 7.5, 9.0]);
    }

    #[test]
    fn sma_full_length_window() {
        let points = make_points(&[2.0, 4.0, 6.0]);
        let sma = calculate_sma(&points, 3).unwrap();
        assert_eq!(sma.len(), 1);
        assert!((sma.values[0].value - 4.0).abs() < 1e-9);
    }

    #[test]
    fn sma_insufficient_history_is_empty() {
        let points = make_points(&[1.0, 2.0]);
        let sma = calculate_sma(&points, 5).unwrap();
        assert!(sma.is_empty());
        assert_eq!(sma.period, 5);
    }

    #[test]
    fn sma_empty_input() {
        let sma = calculate_sma(&[], 3).unwrap();
        assert!(sma.is_empty());
    }

    #[test]
    fn sma_zero_period_rejected() {
        let points = make_points(&[1.0, 2.0]);
        let result = calculate_sma(&points, 0);
        assert!(matches!(result, Err(SimError::InvalidArgument { .. })));
    }
}
