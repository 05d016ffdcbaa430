//! Absolute day-over-day percentage change.
//!
//! volatility[t] = |price[t] / price[t-1] - 1| * 100
//! Lookback: 1. A zero previous price leaves the row undefined.

use super::{finite, Indicator};

#[derive(Debug, Clone, Default)]
pub struct Volatility;

impl Volatility {
    pub fn new() -> Self {
        Self
    }
}

impl Indicator for Volatility {
    fn name(&self) -> &str {
        "volatility_pct"
    }

    fn lookback(&self) -> usize {
        1
    }

    fn compute(&self, prices: &[f64]) -> Vec<Option<f64>> {
        let mut result = vec![None; prices.len()];
        for i in 1..prices.len() {
            result[i] = finite((prices[i] / prices[i - 1] - 1.0).abs() * 100.0);
        }
        result
    }
}
