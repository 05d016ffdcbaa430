//! Relative Strength Index (RSI).
//!
//! Day-over-day deltas split into gains and losses; both averaged with a
//! simple shrinking trailing window (not Wilder smoothing).
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! The first row has no delta and contributes a zero gain and zero loss.
//! Edge case: avg_loss == 0 → undefined (`None`), including the flat and
//! all-gains cases.

use super::{finite, trailing, Indicator};

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, prices: &[f64]) -> Vec<Option<f64>> {
        let n = prices.len();
        let mut gains = vec![0.0; n];
        let mut losses = vec![0.0; n];
        for i in 1..n {
            let change = prices[i] - prices[i - 1];
            if change > 0.0 {
                gains[i] = change;
            } else if change < 0.0 {
                losses[i] = -change;
            }
        }

        (0..n)
            .map(|i| {
                let g = trailing(&gains, i, self.period);
                let l = trailing(&losses, i, self.period);
                let avg_gain = g.iter().sum::<f64>() / g.len() as f64;
                let avg_loss = l.iter().sum::<f64>() / l.len() as f64;
                compute_rsi(avg_gain, avg_loss)
            })
            .collect()
    }
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if avg_loss == 0.0 {
        return None;
    }
    finite(100.0 - 100.0 / (1.0 + avg_gain / avg_loss))
}
