//! Domain types for the indicator pipeline.
//!
//! - `Observation` / `PricePoint`: raw and normalized inputs
//! - `Series`: time-ordered, timestamp-unique price points
//! - `IndicatorRow` / `AnalyzedRow` / `OutputSeries`: derived rows

pub mod observation;
pub mod row;
pub mod series;

pub use observation::{Observation, PricePoint};
pub use row::{AnalyzedRow, IndicatorRow, OutputSeries, RsiZone, SeriesHash, SignalEvent, TrendState};
pub use series::Series;
