//! MACD: difference of two EMAs plus an EMA of that difference.
//!
//! Two lines (separate Indicator instances):
//! - Line: EMA(price, fast) - EMA(price, slow)
//! - Signal: EMA(line, signal)
//!
//! All EMAs are first-value seeded, so both lines are defined from row 0.

use super::ema::ema_of_series;
use super::Indicator;

/// Which MACD output to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdLine {
    Line,
    Signal,
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
    line: MacdLine,
    name: String,
}

impl Macd {
    fn build(fast: usize, slow: usize, signal: usize, line: MacdLine) -> Self {
        assert!(fast >= 1 && signal >= 1, "MACD spans must be >= 1");
        assert!(slow > fast, "MACD slow span must be > fast span");
        let kind = match line {
            MacdLine::Line => "line",
            MacdLine::Signal => "signal",
        };
        Self {
            fast,
            slow,
            signal,
            line,
            name: format!("macd_{kind}_{fast}_{slow}_{signal}"),
        }
    }

    pub fn line(fast: usize, slow: usize, signal: usize) -> Self {
        Self::build(fast, slow, signal, MacdLine::Line)
    }

    pub fn signal(fast: usize, slow: usize, signal: usize) -> Self {
        Self::build(fast, slow, signal, MacdLine::Signal)
    }

    fn macd_line(&self, prices: &[f64]) -> Vec<f64> {
        let fast = ema_of_series(prices, self.fast);
        let slow = ema_of_series(prices, self.slow);
        fast.iter().zip(&slow).map(|(f, s)| f - s).collect()
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, prices: &[f64]) -> Vec<Option<f64>> {
        let line = self.macd_line(prices);
        let out = match self.line {
            MacdLine::Line => line,
            MacdLine::Signal => ema_of_series(&line, self.signal),
        };
        out.into_iter().map(Some).collect()
    }
}
