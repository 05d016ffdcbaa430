//! Indicator rows and the final Output Series.
//!
//! `IndicatorRow` carries every derived column as `Option<f64>`: warm-up rows
//! and undefined values (e.g. RSI with zero average loss) are `None`, never
//! NaN. `AnalyzedRow` is the fully-defined form that survives the row filter.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// RSI level at or above which a row is considered overbought.
pub const RSI_OVERBOUGHT: f64 = 70.0;
/// RSI level at or below which a row is considered oversold.
pub const RSI_OVERSOLD: f64 = 30.0;

/// Relative position of the fast SMA against the slow SMA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendState {
    /// sma30 > sma200
    Above,
    /// sma30 <= sma200
    Below,
}

impl TrendState {
    pub fn from_averages(fast: f64, slow: f64) -> Self {
        if fast > slow {
            TrendState::Above
        } else {
            TrendState::Below
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrendState::Above => "above",
            TrendState::Below => "below",
        }
    }
}

/// Discrete crossover event emitted on a trend-state flip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalEvent {
    /// below → above
    BuyCross,
    /// above → below
    SellCross,
    #[default]
    None,
}

impl SignalEvent {
    pub fn is_cross(&self) -> bool {
        !matches!(self, SignalEvent::None)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalEvent::BuyCross => "buy_cross",
            SignalEvent::SellCross => "sell_cross",
            SignalEvent::None => "none",
        }
    }
}

/// RSI classification against the 70/30 reference levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsiZone {
    Overbought,
    Neutral,
    Oversold,
}

impl RsiZone {
    pub fn classify(rsi: f64) -> Self {
        if rsi >= RSI_OVERBOUGHT {
            RsiZone::Overbought
        } else if rsi <= RSI_OVERSOLD {
            RsiZone::Oversold
        } else {
            RsiZone::Neutral
        }
    }
}

/// One series row extended with every indicator column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub timestamp: NaiveDateTime,
    pub price: f64,
    pub sma30: Option<f64>,
    pub sma200: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub sma20: Option<f64>,
    pub upper_band: Option<f64>,
    pub lower_band: Option<f64>,
    pub volatility_pct: Option<f64>,
    pub trend_state: Option<TrendState>,
    pub signal_event: SignalEvent,
}

impl IndicatorRow {
    /// True when every indicator column holds a value.
    pub fn is_complete(&self) -> bool {
        self.sma30.is_some()
            && self.sma200.is_some()
            && self.rsi.is_some()
            && self.macd.is_some()
            && self.macd_signal.is_some()
            && self.sma20.is_some()
            && self.upper_band.is_some()
            && self.lower_band.is_some()
            && self.volatility_pct.is_some()
            && self.trend_state.is_some()
    }

    /// Fully-defined view of the row, or `None` while any column is undefined.
    pub fn analyzed(&self) -> Option<AnalyzedRow> {
        Some(AnalyzedRow {
            timestamp: self.timestamp,
            price: self.price,
            sma30: self.sma30?,
            sma200: self.sma200?,
            rsi: self.rsi?,
            macd: self.macd?,
            macd_signal: self.macd_signal?,
            sma20: self.sma20?,
            upper_band: self.upper_band?,
            lower_band: self.lower_band?,
            volatility_pct: self.volatility_pct?,
            trend_state: self.trend_state?,
            signal_event: self.signal_event,
        })
    }
}

/// A row of the Output Series: every indicator is defined.
///
/// Field names and order are the contract with the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedRow {
    pub timestamp: NaiveDateTime,
    pub price: f64,
    pub sma30: f64,
    pub sma200: f64,
    pub rsi: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub sma20: f64,
    pub upper_band: f64,
    pub lower_band: f64,
    pub volatility_pct: f64,
    pub trend_state: TrendState,
    pub signal_event: SignalEvent,
}

impl AnalyzedRow {
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn rsi_zone(&self) -> RsiZone {
        RsiZone::classify(self.rsi)
    }
}

/// Content hash of an Output Series (BLAKE3, hex).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesHash(pub String);

impl fmt::Display for SeriesHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The analyzable series handed to rendering.
///
/// An empty Output Series is the "insufficient data" terminal state, not an
/// error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputSeries {
    pub rows: Vec<AnalyzedRow>,
}

impl OutputSeries {
    pub fn new(rows: Vec<AnalyzedRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn latest(&self) -> Option<&AnalyzedRow> {
        self.rows.last()
    }

    /// Rows carrying a buy crossing.
    pub fn buy_crosses(&self) -> impl Iterator<Item = &AnalyzedRow> {
        self.rows
            .iter()
            .filter(|r| r.signal_event == SignalEvent::BuyCross)
    }

    /// Rows carrying a sell crossing.
    pub fn sell_crosses(&self) -> impl Iterator<Item = &AnalyzedRow> {
        self.rows
            .iter()
            .filter(|r| r.signal_event == SignalEvent::SellCross)
    }

    /// Rows carrying either crossing, in series order.
    pub fn crossings(&self) -> impl Iterator<Item = &AnalyzedRow> {
        self.rows.iter().filter(|r| r.signal_event.is_cross())
    }

    /// Deterministic content hash over every row.
    ///
    /// Floats are hashed by bit pattern, so two runs agree only if they are
    /// bit-for-bit identical.
    pub fn fingerprint(&self) -> SeriesHash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(self.rows.len() as u64).to_le_bytes());
        for row in &self.rows {
            hasher.update(row.timestamp.to_string().as_bytes());
            for v in [
                row.price,
                row.sma30,
                row.sma200,
                row.rsi,
                row.macd,
                row.macd_signal,
                row.sma20,
                row.upper_band,
                row.lower_band,
                row.volatility_pct,
            ] {
                hasher.update(&v.to_bits().to_le_bytes());
            }
            hasher.update(row.trend_state.as_str().as_bytes());
            hasher.update(row.signal_event.as_str().as_bytes());
        }
        SeriesHash(hasher.finalize().to_hex().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row(day: u32, event: SignalEvent) -> IndicatorRow {
        IndicatorRow {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, day)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            price: 320.0,
            sma30: Some(318.0),
            sma200: Some(300.0),
            rsi: Some(55.0),
            macd: Some(1.5),
            macd_signal: Some(1.0),
            sma20: Some(319.0),
            upper_band: Some(325.0),
            lower_band: Some(313.0),
            volatility_pct: Some(0.4),
            trend_state: Some(TrendState::Above),
            signal_event: event,
        }
    }

    #[test]
    fn trend_state_strict_comparison() {
        assert_eq!(TrendState::from_averages(2.0, 1.0), TrendState::Above);
        assert_eq!(TrendState::from_averages(1.0, 1.0), TrendState::Below);
        assert_eq!(TrendState::from_averages(0.5, 1.0), TrendState::Below);
    }

    #[test]
    fn rsi_zone_boundaries() {
        assert_eq!(RsiZone::classify(70.0), RsiZone::Overbought);
        assert_eq!(RsiZone::classify(69.9), RsiZone::Neutral);
        assert_eq!(RsiZone::classify(30.0), RsiZone::Oversold);
    }

    #[test]
    fn analyzed_requires_every_column() {
        let row = sample_row(2, SignalEvent::None);
        assert!(row.is_complete());
        assert!(row.analyzed().is_some());

        let mut partial = row.clone();
        partial.upper_band = None;
        assert!(!partial.is_complete());
        assert!(partial.analyzed().is_none());
    }

    #[test]
    fn crossing_iterators() {
        let rows = vec![
            sample_row(2, SignalEvent::None),
            sample_row(3, SignalEvent::BuyCross),
            sample_row(4, SignalEvent::SellCross),
        ]
        .into_iter()
        .filter_map(|r| r.analyzed())
        .collect();
        let out = OutputSeries::new(rows);
        assert_eq!(out.buy_crosses().count(), 1);
        assert_eq!(out.sell_crosses().count(), 1);
        assert_eq!(out.crossings().count(), 2);
    }

    #[test]
    fn fingerprint_tracks_content() {
        let a = OutputSeries::new(sample_row(2, SignalEvent::None).analyzed().into_iter().collect());
        let b = a.clone();
        assert_eq!(a.fingerprint(), b.fingerprint());

        let mut c = a.clone();
        c.rows[0].rsi += 1e-9;
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn signal_event_serializes_snake_case() {
        let json = serde_json::to_string(&SignalEvent::BuyCross).unwrap();
        assert_eq!(json, "\"buy_cross\"");
        let json = serde_json::to_string(&SignalEvent::None).unwrap();
        assert_eq!(json, "\"none\"");
    }
}
