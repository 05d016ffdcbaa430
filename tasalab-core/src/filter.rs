//! Row filter: keep only rows where every indicator is defined.

use crate::domain::{IndicatorRow, OutputSeries};

/// Drop warm-up and undefined rows, producing the Output Series.
///
/// An empty result is the "insufficient data" state, not an error.
pub fn filter_complete(rows: &[IndicatorRow]) -> OutputSeries {
    OutputSeries::new(rows.iter().filter_map(IndicatorRow::analyzed).collect())
}
