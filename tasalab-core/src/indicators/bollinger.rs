//! Bollinger Bands: moving average +/- standard deviation multiplier.
//!
//! Three bands (separate Indicator instances):
//! - Middle: SMA(price, period)
//! - Upper: middle + k * stddev(price, period)
//! - Lower: middle - k * stddev(price, period)
//!
//! Uses sample stddev (divide by N - 1) over a strict window: there is no
//! shrinking warm-up, band width over a handful of points is meaningless.
//! A constant window has an exact mean, so all three bands coincide.
//! Lookback: period - 1.

use super::{finite, window_mean, Indicator};

/// Which band of the Bollinger Bands to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BollingerBand {
    Upper,
    Middle,
    Lower,
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    multiplier: f64,
    band: BollingerBand,
    name: String,
}

impl Bollinger {
    fn build(period: usize, multiplier: f64, band: BollingerBand) -> Self {
        assert!(period >= 2, "Bollinger period must be >= 2");
        let kind = match band {
            BollingerBand::Upper => "upper",
            BollingerBand::Middle => "middle",
            BollingerBand::Lower => "lower",
        };
        Self {
            period,
            multiplier,
            band,
            name: format!("bollinger_{kind}_{period}_{multiplier}"),
        }
    }

    pub fn upper(period: usize, multiplier: f64) -> Self {
        Self::build(period, multiplier, BollingerBand::Upper)
    }

    pub fn middle(period: usize, multiplier: f64) -> Self {
        Self::build(period, multiplier, BollingerBand::Middle)
    }

    pub fn lower(period: usize, multiplier: f64) -> Self {
        Self::build(period, multiplier, BollingerBand::Lower)
    }
}

impl Indicator for Bollinger {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, prices: &[f64]) -> Vec<Option<f64>> {
        let n = prices.len();
        let mut result = vec![None; n];

        for i in self.lookback()..n {
            let window = &prices[i + 1 - self.period..=i];
            let Some(mean) = window_mean(window) else {
                continue;
            };

            result[i] = match self.band {
                BollingerBand::Middle => Some(mean),
                BollingerBand::Upper | BollingerBand::Lower => {
                    let stddev = sample_stddev(window, mean);
                    let offset = self.multiplier * stddev;
                    let band = if self.band == BollingerBand::Upper {
                        mean + offset
                    } else {
                        mean - offset
                    };
                    finite(band)
                }
            };
        }

        result
    }
}

fn sample_stddev(window: &[f64], mean: f64) -> f64 {
    let ss: f64 = window
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum();
    (ss / (window.len() - 1) as f64).sqrt()
}
