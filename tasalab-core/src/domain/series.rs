//! Series: an assembled, strictly time-ordered price series.

use super::observation::PricePoint;
use chrono::NaiveDateTime;
use std::collections::HashMap;

/// Strictly increasing, timestamp-unique sequence of price points.
///
/// Only the assembler builds a `Series`; every later stage derives new data
/// from it instead of mutating it. The timestamp index gives O(1) lookup of a
/// row position for alignment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    points: Vec<PricePoint>,
    index: HashMap<NaiveDateTime, usize>,
}

impl Series {
    /// Build from points already sorted ascending with unique timestamps.
    pub(crate) fn from_sorted(points: Vec<PricePoint>) -> Self {
        debug_assert!(points.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        let index = points
            .iter()
            .enumerate()
            .map(|(i, p)| (p.timestamp, i))
            .collect();
        Self { points, index }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &PricePoint> {
        self.points.iter()
    }

    /// Price column in series order.
    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    /// Row position of a timestamp, if present.
    pub fn position(&self, timestamp: &NaiveDateTime) -> Option<usize> {
        self.index.get(timestamp).copied()
    }
}
