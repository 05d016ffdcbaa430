//! Simple Moving Average (SMA).
//!
//! Mean of the trailing `period` prices. With `WindowPolicy::Shrinking` the
//! first rows average the shorter history available (lookback 0); with
//! `WindowPolicy::Strict` the first `period - 1` rows are undefined.

use super::{trailing, window_mean, Indicator, WindowPolicy};

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    policy: WindowPolicy,
    name: String,
}

impl Sma {
    pub fn new(period: usize, policy: WindowPolicy) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            policy,
            name: format!("sma_{period}"),
        }
    }

    /// SMA defined from the first row.
    pub fn shrinking(period: usize) -> Self {
        Self::new(period, WindowPolicy::Shrinking)
    }

    /// SMA defined only over full windows.
    pub fn strict(period: usize) -> Self {
        Self::new(period, WindowPolicy::Strict)
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        match self.policy {
            WindowPolicy::Shrinking => 0,
            WindowPolicy::Strict => self.period - 1,
        }
    }

    fn compute(&self, prices: &[f64]) -> Vec<Option<f64>> {
        let lookback = self.lookback();
        (0..prices.len())
            .map(|i| {
                if i < lookback {
                    return None;
                }
                window_mean(trailing(prices, i, self.period))
            })
            .collect()
    }
}
