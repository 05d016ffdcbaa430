//! Raw record normalizer.
//!
//! Boundary adapter between a provider payload (a JSON array of records) and
//! typed `PricePoint`s. Bad records are skipped and reported; only a payload
//! that is not an array of records at all is fatal.

use crate::config::RecordFormat;
use crate::domain::{Observation, PricePoint};
use crate::error::{PipelineError, RecordParseError};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;
use tracing::debug;

/// Datetime layouts accepted for the record date, tried in order.
///
/// Year-first layouts only: the rate API sends `YYYY-MM-DD HH:MM:SS`.
/// Month-first slash dates such as `01/15/2024` are not recognized and the
/// record is rejected, as are free-form strings a general date parser would
/// guess at.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Date-only layouts; these normalize to midnight.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];

/// A record that did not make it into the series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected {
    /// Position of the record in the raw payload.
    pub index: usize,
    pub error: RecordParseError,
}

/// Output of a normalizer pass.
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub points: Vec<PricePoint>,
    pub rejected: Vec<Rejected>,
}

impl Normalized {
    /// Total records inspected.
    pub fn seen(&self) -> usize {
        self.points.len() + self.rejected.len()
    }
}

/// Turns raw provider records into price points.
#[derive(Debug, Clone)]
pub struct Normalizer {
    format: RecordFormat,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(RecordFormat::default())
    }
}

impl Normalizer {
    pub fn new(format: RecordFormat) -> Self {
        Self { format }
    }

    /// Normalize a whole payload.
    ///
    /// Fails only if `raw` is not a JSON array. Every element that cannot be
    /// turned into a `PricePoint` is recorded in `rejected` and skipped.
    pub fn normalize(&self, raw: &Value) -> Result<Normalized, PipelineError> {
        let items = raw.as_array().ok_or_else(|| {
            PipelineError::MalformedInput(format!(
                "expected an array of records, got {}",
                json_kind(raw)
            ))
        })?;

        let mut out = Normalized {
            points: Vec::with_capacity(items.len()),
            rejected: Vec::new(),
        };

        for (index, item) in items.iter().enumerate() {
            match self
                .observation(item)
                .and_then(|obs| self.normalize_observation(&obs))
            {
                Ok(point) => out.points.push(point),
                Err(error) => {
                    debug!(index, %error, "skipping raw record");
                    out.rejected.push(Rejected { index, error });
                }
            }
        }

        Ok(out)
    }

    /// Pull the configured date and price fields out of one raw record.
    pub fn observation(&self, item: &Value) -> Result<Observation, RecordParseError> {
        let obj = item.as_object().ok_or(RecordParseError::NotAnObject)?;

        let date = match obj.get(&self.format.date_field) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => return Err(RecordParseError::InvalidDate(other.to_string())),
        };

        let price = match obj.get(&self.format.price_field) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(other) => return Err(RecordParseError::InvalidPrice(other.to_string())),
        };

        Ok(Observation { date, price })
    }

    /// Parse an observation into a price point.
    pub fn normalize_observation(&self, obs: &Observation) -> Result<PricePoint, RecordParseError> {
        let raw_date = obs.date.as_deref().ok_or(RecordParseError::MissingDate)?;
        let timestamp = parse_timestamp(raw_date)
            .ok_or_else(|| RecordParseError::InvalidDate(raw_date.to_string()))?;

        let raw_price = obs.price.as_deref().ok_or(RecordParseError::MissingPrice)?;
        let price = parse_price(raw_price, &self.format.annotation_marker)
            .ok_or_else(|| RecordParseError::InvalidPrice(raw_price.to_string()))?;

        Ok(PricePoint::new(timestamp, price))
    }
}

/// Parse a record date; time of day is kept when present.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Parse a price field.
///
/// Everything from the first `marker` on is discarded, the rest is trimmed
/// and must be a plain non-negative decimal: ASCII digits with at most one
/// `.`, integer part optional (`".5"` is accepted, `"1e3"`, `"-2"` and `"."`
/// are not).
pub fn parse_price(raw: &str, marker: &str) -> Option<f64> {
    let head = if marker.is_empty() {
        raw
    } else {
        raw.split_once(marker).map_or(raw, |(head, _)| head)
    };
    let text = head.trim();

    if !is_plain_decimal(text) {
        return None;
    }
    text.parse::<f64>().ok()
}

fn is_plain_decimal(s: &str) -> bool {
    let mut digits = 0usize;
    let mut dots = 0usize;
    for c in s.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return false,
        }
    }
    digits > 0 && dots <= 1
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
