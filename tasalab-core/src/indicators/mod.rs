//! Indicator implementations over a price column.
//!
//! Every indicator is a pure function from the full price column to an output
//! column of the same length. Undefined values (warm-up rows, division by
//! zero) are `None`; no indicator ever emits NaN or infinity.
//!
//! Two window policies coexist on purpose:
//! - SMA30, SMA200 and RSI use a *shrinking* window: defined from the first
//!   row, averaging whatever history exists so far.
//! - The Bollinger group uses a *strict* window: undefined until a full
//!   window is available.
//!
//! Multi-series indicators (MACD, Bollinger) are exposed as separate named
//! instances per output line, keeping the single-series trait.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod volatility;

pub use bollinger::{Bollinger, BollingerBand};
pub use ema::Ema;
pub use macd::{Macd, MacdLine};
pub use rsi::Rsi;
pub use sma::Sma;
pub use volatility::Volatility;

/// Fast trend average window.
pub const SMA_FAST_PERIOD: usize = 30;
/// Slow trend average window.
pub const SMA_SLOW_PERIOD: usize = 200;
/// RSI averaging window.
pub const RSI_PERIOD: usize = 14;
pub const MACD_FAST_SPAN: usize = 12;
pub const MACD_SLOW_SPAN: usize = 26;
pub const MACD_SIGNAL_SPAN: usize = 9;
/// Bollinger middle band window.
pub const BOLLINGER_PERIOD: usize = 20;
/// Bollinger band width in standard deviations.
pub const BOLLINGER_K: f64 = 2.0;

/// How an indicator treats rows before its window is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPolicy {
    /// Use the partial window (`min_periods = 1`).
    Shrinking,
    /// Undefined until `period` values are available.
    Strict,
}

/// Trait for indicators.
///
/// # Look-ahead guard
/// The value at row t may depend only on prices at rows <= t. Every indicator
/// must give the same prefix on a truncated series as on the full one.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_30", "rsi_14").
    fn name(&self) -> &str;

    /// Number of leading rows that are always `None`.
    fn lookback(&self) -> usize;

    /// Compute the indicator over the whole price column.
    ///
    /// Returns a vector of the same length as `prices`.
    fn compute(&self, prices: &[f64]) -> Vec<Option<f64>>;
}

/// Keep a float only if it is finite.
pub(crate) fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

/// Averages are rounded to this many decimal places (1e-9).
const MEAN_SCALE: f64 = 1e9;

/// Mean of a window, independent of how the window was summed.
///
/// A constant window returns its value unchanged. Otherwise the sum is
/// compensated (Neumaier) and the mean rounded to nine decimals, so windows
/// of different length with the same exact mean give bit-identical results.
/// `None` for an empty window or a non-finite mean.
pub(crate) fn window_mean(window: &[f64]) -> Option<f64> {
    let (&first, rest) = window.split_first()?;
    if rest.iter().all(|&v| v == first) {
        return finite(first);
    }
    let mean = compensated_sum(window) / window.len() as f64;
    finite(round_to_scale(mean))
}

fn compensated_sum(values: &[f64]) -> f64 {
    let mut sum = 0.0_f64;
    let mut correction = 0.0_f64;
    for &v in values {
        let t = sum + v;
        if sum.abs() >= v.abs() {
            correction += (sum - t) + v;
        } else {
            correction += (v - t) + sum;
        }
        sum = t;
    }
    sum + correction
}

fn round_to_scale(v: f64) -> f64 {
    let scaled = v * MEAN_SCALE;
    // past 2^52 every f64 is already an integer at this scale
    if scaled.abs() < 4_503_599_627_370_496.0 {
        scaled.round() / MEAN_SCALE
    } else {
        v
    }
}

/// Trailing window ending at `i` (inclusive), at most `period` long.
pub(crate) fn trailing(values: &[f64], i: usize, period: usize) -> &[f64] {
    let start = (i + 1).saturating_sub(period);
    &values[start..=i]
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Assert an optional value is defined and approximately equal.
#[cfg(test)]
pub fn assert_some_approx(actual: Option<f64>, expected: f64, epsilon: f64) {
    match actual {
        Some(v) => assert_approx(v, expected, epsilon),
        None => panic!("expected Some({expected}), got None"),
    }
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
