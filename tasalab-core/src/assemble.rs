//! Series assembler: sort, dedupe, index.

use crate::domain::{PricePoint, Series};
use tracing::debug;

/// Result of assembling a series.
#[derive(Debug, Clone, Default)]
pub struct Assembled {
    pub series: Series,
    /// Points dropped because an earlier arrival had the same timestamp.
    pub duplicates: usize,
}

/// Sort points ascending by timestamp and keep the first arrival per timestamp.
///
/// The sort is stable, so among equal timestamps the earliest input wins.
/// An empty input yields an empty series.
pub fn assemble(points: Vec<PricePoint>) -> Assembled {
    let mut points = points;
    points.sort_by_key(|p| p.timestamp);

    let before = points.len();
    points.dedup_by_key(|p| p.timestamp);
    let duplicates = before - points.len();

    if duplicates > 0 {
        debug!(duplicates, "dropped duplicate timestamps");
    }

    Assembled {
        series: Series::from_sorted(points),
        duplicates,
    }
}
