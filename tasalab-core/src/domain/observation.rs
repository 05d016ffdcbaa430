//! Observation: the raw record as delivered by a rate provider, and the
//! normalized `PricePoint` produced from it.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One raw record pulled out of the provider payload.
///
/// Both fields are kept as text: the date is whatever the provider sent as
/// its identifier, the price may carry a trailing annotation
/// (e.g. `"145.50JS: 2024-01-01"`). Numeric JSON prices are rendered to text
/// before they get here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub date: Option<String>,
    pub price: Option<String>,
}

/// A parsed (timestamp, price) pair.
///
/// Observations whose price could not be parsed never become a `PricePoint`;
/// the normalizer reports them as rejections instead. Time of day is kept so
/// that intraday duplicates order correctly; rows downstream render only the
/// calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: NaiveDateTime,
    pub price: f64,
}

impl PricePoint {
    pub fn new(timestamp: NaiveDateTime, price: f64) -> Self {
        Self { timestamp, price }
    }
}
