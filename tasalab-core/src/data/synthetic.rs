//! Synthetic payload generator for offline demos and benchmarks.
//!
//! Produces one record per day in the remote API's shape: a geometric random
//! walk around a starting rate, seeded for reproducibility. A fixed share of
//! prices carry a trailing annotation and a smaller share are unparsable, so
//! the normalizer's skip path is exercised too.

use super::provider::{DataError, FetchRequest, RateProvider};
use crate::config::RecordFormat;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{Map, Value};

#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    seed: u64,
    start_price: f64,
    /// Max absolute daily move, as a fraction.
    daily_step: f64,
    /// Probability a price gets an annotation suffix.
    annotated_share: f64,
    /// Probability a price is replaced with `"N/A"`.
    malformed_share: f64,
    format: RecordFormat,
}

impl SyntheticProvider {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            start_price: 120.0,
            daily_step: 0.02,
            annotated_share: 0.1,
            malformed_share: 0.02,
            format: RecordFormat::default(),
        }
    }

    pub fn with_format(mut self, format: RecordFormat) -> Self {
        self.format = format;
        self
    }

    /// Clean output: no annotations, no malformed prices.
    pub fn clean(mut self) -> Self {
        self.annotated_share = 0.0;
        self.malformed_share = 0.0;
        self
    }

    /// Generate `days` records starting at `request.date_from`'s day,
    /// capped at `request.date_to`.
    pub fn generate(&self, request: &FetchRequest, days: usize) -> Value {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut price = self.start_price;
        let start = request.date_from.date();

        let records = (0..days)
            .map_while(|i| {
                let day = start + chrono::Duration::days(i as i64);
                let ts = day.and_hms_opt(0, 0, 0)?;
                (ts <= request.date_to).then_some((ts, i))
            })
            .map(|(ts, i)| {
                if i > 0 {
                    let step: f64 = rng.gen_range(-self.daily_step..=self.daily_step);
                    price = (price * (1.0 + step)).max(0.01);
                }
                let price_text = if rng.gen_bool(self.malformed_share) {
                    "N/A".to_string()
                } else if rng.gen_bool(self.annotated_share) {
                    format!("{price:.2}{} {}", self.format.annotation_marker, ts.date())
                } else {
                    format!("{price:.2}")
                };

                let mut record = Map::new();
                record.insert(
                    self.format.date_field.clone(),
                    Value::String(ts.format("%Y-%m-%d %H:%M:%S").to_string()),
                );
                record.insert(self.format.price_field.clone(), Value::String(price_text));
                Value::Object(record)
            })
            .collect();

        Value::Array(records)
    }
}

impl RateProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(&self, request: &FetchRequest) -> Result<Value, DataError> {
        let span = (request.date_to.date() - request.date_from.date()).num_days();
        let days = usize::try_from(span + 1).unwrap_or(0);
        Ok(self.generate(request, days))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::Normalizer;
    use chrono::NaiveDate;

    fn request(days: i64) -> FetchRequest {
        let from = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        FetchRequest {
            currency: "USD".into(),
            date_from: from.and_hms_opt(0, 0, 0).unwrap(),
            date_to: (from + chrono::Duration::days(days - 1))
                .and_hms_opt(23, 59, 59)
                .unwrap(),
        }
    }

    #[test]
    fn one_record_per_day() {
        let payload = SyntheticProvider::new(7).fetch(&request(30)).unwrap();
        assert_eq!(payload.as_array().map(Vec::len), Some(30));
    }

    #[test]
    fn same_seed_same_payload() {
        let a = SyntheticProvider::new(42).fetch(&request(100)).unwrap();
        let b = SyntheticProvider::new(42).fetch(&request(100)).unwrap();
        let c = SyntheticProvider::new(43).fetch(&request(100)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn clean_payload_normalizes_fully() {
        let payload = SyntheticProvider::new(1).clean().fetch(&request(50)).unwrap();
        let out = Normalizer::default().normalize(&payload).unwrap();
        assert_eq!(out.points.len(), 50);
        assert!(out.rejected.is_empty());
    }

    #[test]
    fn noisy_payload_keeps_annotated_prices() {
        let payload = SyntheticProvider::new(3).fetch(&request(400)).unwrap();
        let out = Normalizer::default().normalize(&payload).unwrap();
        assert_eq!(out.seen(), 400);
        // Only "N/A" prices are dropped; annotated ones survive.
        let text = payload.to_string();
        let na = text.matches("N/A").count();
        assert_eq!(out.rejected.len(), na);
    }

    #[test]
    fn window_caps_generation() {
        let payload = SyntheticProvider::new(1).generate(&request(5), 50);
        assert_eq!(payload.as_array().map(Vec::len), Some(5));
    }
}
