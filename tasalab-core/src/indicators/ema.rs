//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * price[t] + (1 - alpha) * EMA[t-1],
//! alpha = 2 / (span + 1).
//! Seed: EMA[0] = price[0], no bias adjustment.
//! Lookback: 0.

use super::Indicator;

#[derive(Debug, Clone)]
pub struct Ema {
    span: usize,
    name: String,
}

impl Ema {
    pub fn new(span: usize) -> Self {
        assert!(span >= 1, "EMA span must be >= 1");
        Self {
            span,
            name: format!("ema_{span}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, prices: &[f64]) -> Vec<Option<f64>> {
        ema_of_series(prices, self.span).into_iter().map(Some).collect()
    }
}

/// Smoothing factor for a span.
pub fn alpha(span: usize) -> f64 {
    2.0 / (span as f64 + 1.0)
}

/// Compute raw EMA values from a pre-extracted f64 slice.
/// Used by MACD, which smooths its own line for the signal.
pub fn ema_of_series(values: &[f64], span: usize) -> Vec<f64> {
    let mut result = Vec::with_capacity(values.len());
    let Some((&first, rest)) = values.split_first() else {
        return result;
    };

    let alpha = alpha(span);
    let mut prev = first;
    result.push(prev);
    for &v in rest {
        prev = alpha * v + (1.0 - alpha) * prev;
        result.push(prev);
    }
    result
}
