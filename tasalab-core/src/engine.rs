//! Indicator engine: one `IndicatorRow` per series point.
//!
//! Indicators are computed once over the whole price column, then zipped
//! back onto the series dates. The engine holds no state between calls, so
//! computing the same series twice gives identical rows.

use crate::domain::{IndicatorRow, Series, SignalEvent, TrendState};
use crate::indicators::{
    Bollinger, Indicator, Macd, Rsi, Sma, Volatility, BOLLINGER_K, BOLLINGER_PERIOD,
    MACD_FAST_SPAN, MACD_SIGNAL_SPAN, MACD_SLOW_SPAN, RSI_PERIOD, SMA_FAST_PERIOD,
    SMA_SLOW_PERIOD,
};

/// The fixed indicator set behind every `IndicatorRow`.
#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    sma_fast: Sma,
    sma_slow: Sma,
    rsi: Rsi,
    macd: Macd,
    macd_signal: Macd,
    bb_middle: Bollinger,
    bb_upper: Bollinger,
    bb_lower: Bollinger,
    volatility: Volatility,
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl IndicatorEngine {
    pub fn new() -> Self {
        Self {
            sma_fast: Sma::shrinking(SMA_FAST_PERIOD),
            sma_slow: Sma::shrinking(SMA_SLOW_PERIOD),
            rsi: Rsi::new(RSI_PERIOD),
            macd: Macd::line(MACD_FAST_SPAN, MACD_SLOW_SPAN, MACD_SIGNAL_SPAN),
            macd_signal: Macd::signal(MACD_FAST_SPAN, MACD_SLOW_SPAN, MACD_SIGNAL_SPAN),
            bb_middle: Bollinger::middle(BOLLINGER_PERIOD, BOLLINGER_K),
            bb_upper: Bollinger::upper(BOLLINGER_PERIOD, BOLLINGER_K),
            bb_lower: Bollinger::lower(BOLLINGER_PERIOD, BOLLINGER_K),
            volatility: Volatility::new(),
        }
    }

    /// Indicators in column order, for diagnostics.
    pub fn indicators(&self) -> [&dyn Indicator; 9] {
        [
            &self.sma_fast,
            &self.sma_slow,
            &self.rsi,
            &self.macd,
            &self.macd_signal,
            &self.bb_middle,
            &self.bb_upper,
            &self.bb_lower,
            &self.volatility,
        ]
    }

    /// Rows that are undefined for every input because of strict windows.
    pub fn warmup_rows(&self) -> usize {
        self.indicators()
            .iter()
            .map(|ind| ind.lookback())
            .max()
            .unwrap_or(0)
    }

    /// Compute every indicator column over the series.
    ///
    /// Columns are aligned to dates through the series' timestamp index.
    /// Rows come back in series order with `signal_event` left at
    /// `SignalEvent::None`; crossings are derived separately.
    pub fn compute(&self, series: &Series) -> Vec<IndicatorRow> {
        let prices = series.prices();

        let sma30 = self.sma_fast.compute(&prices);
        let sma200 = self.sma_slow.compute(&prices);
        let rsi = self.rsi.compute(&prices);
        let macd = self.macd.compute(&prices);
        let macd_signal = self.macd_signal.compute(&prices);
        let sma20 = self.bb_middle.compute(&prices);
        let upper = self.bb_upper.compute(&prices);
        let lower = self.bb_lower.compute(&prices);
        let volatility = self.volatility.compute(&prices);

        series
            .iter()
            .filter_map(|point| {
                let i = series.position(&point.timestamp)?;
                let trend_state = match (sma30[i], sma200[i]) {
                    (Some(fast), Some(slow)) => Some(TrendState::from_averages(fast, slow)),
                    _ => None,
                };
                Some(IndicatorRow {
                    timestamp: point.timestamp,
                    price: point.price,
                    sma30: sma30[i],
                    sma200: sma200[i],
                    rsi: rsi[i],
                    macd: macd[i],
                    macd_signal: macd_signal[i],
                    sma20: sma20[i],
                    upper_band: upper[i],
                    lower_band: lower[i],
                    volatility_pct: volatility[i],
                    trend_state,
                    signal_event: SignalEvent::None,
                })
            })
            .collect()
    }
}
