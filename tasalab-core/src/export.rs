//! Output Series export: CSV and JSON for the rendering layer.
//!
//! Column order is fixed; renderers bind to these names.

use crate::domain::OutputSeries;
use thiserror::Error;

/// CSV header, in column order.
pub const CSV_COLUMNS: [&str; 13] = [
    "date",
    "price",
    "sma30",
    "sma200",
    "rsi",
    "macd",
    "macd_signal",
    "sma20",
    "upper_band",
    "lower_band",
    "volatility_pct",
    "trend_state",
    "signal_event",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV flush failed: {0}")]
    Flush(String),

    #[error("CSV output is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Export every row as CSV.
pub fn export_csv(output: &OutputSeries) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(CSV_COLUMNS)?;

    for r in &output.rows {
        let fields: [String; 13] = [
            r.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            format!("{:.4}", r.price),
            format!("{:.4}", r.sma30),
            format!("{:.4}", r.sma200),
            format!("{:.4}", r.rsi),
            format!("{:.6}", r.macd),
            format!("{:.6}", r.macd_signal),
            format!("{:.4}", r.sma20),
            format!("{:.4}", r.upper_band),
            format!("{:.4}", r.lower_band),
            format!("{:.4}", r.volatility_pct),
            r.trend_state.as_str().to_string(),
            r.signal_event.as_str().to_string(),
        ];
        wtr.write_record(&fields)?;
    }

    let data = wtr.into_inner().map_err(|e| ExportError::Flush(e.to_string()))?;
    Ok(String::from_utf8(data)?)
}

/// Export the Output Series as pretty JSON.
pub fn export_json(output: &OutputSeries) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(output)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AnalyzedRow, SignalEvent, TrendState};
    use chrono::NaiveDate;

    fn sample() -> OutputSeries {
        OutputSeries::new(vec![AnalyzedRow {
            timestamp: NaiveDate::from_ymd_opt(2024, 5, 2)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            price: 355.0,
            sma30: 350.0,
            sma200: 340.0,
            rsi: 61.25,
            macd: 1.5,
            macd_signal: 1.25,
            sma20: 352.0,
            upper_band: 360.0,
            lower_band: 344.0,
            volatility_pct: 0.5,
            trend_state: TrendState::Above,
            signal_event: SignalEvent::BuyCross,
        }])
    }

    #[test]
    fn csv_header_and_row() {
        let csv = export_csv(&sample()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), CSV_COLUMNS.join(","));
        let row = lines.next().unwrap();
        assert!(row.starts_with("2024-05-02 00:00:00,355.0000,350.0000"));
        assert!(row.ends_with(",above,buy_cross"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn csv_empty_series_is_header_only() {
        let csv = export_csv(&OutputSeries::default()).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn json_roundtrip() {
        let out = sample();
        let json = export_json(&out).unwrap();
        let back: OutputSeries = serde_json::from_str(&json).unwrap();
        assert_eq!(back, out);
        assert!(json.contains("\"signal_event\": \"buy_cross\""));
    }
}
