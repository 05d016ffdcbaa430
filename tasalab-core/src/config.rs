//! Run configuration: data source and raw record layout.
//!
//! Stored as TOML; every field has a default so an empty file (or no file)
//! reproduces the stock deployment. Indicator windows are not configurable:
//! they are part of the Output Series contract.

use crate::data::FetchRequest;
use crate::normalize::parse_timestamp;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str =
    "https://api.cambiocuba.money/api/v1/x-rates-by-date-range-history";

/// Upper bound on `source.max_retries`.
pub const MAX_RETRIES: u32 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Where and how to fetch the rate history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub base_url: String,
    pub currency: String,
    /// Start of the history window (`YYYY-MM-DD[ HH:MM:SS]`).
    pub date_from: String,
    /// End of the window; defaults to the end of the invocation day.
    pub date_to: Option<String>,
    pub trmi: bool,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            currency: "USD".into(),
            date_from: "2021-01-01 00:00:00".into(),
            date_to: None,
            trmi: true,
            timeout_secs: 30,
            max_retries: 3,
        }
    }
}

/// Field names and annotation marker of the raw records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordFormat {
    pub date_field: String,
    pub price_field: String,
    /// Everything from this marker on is stripped from the price text.
    pub annotation_marker: String,
}

impl Default for RecordFormat {
    fn default() -> Self {
        Self {
            date_field: "_id".into(),
            price_field: "median".into(),
            annotation_marker: "JS:".into(),
        }
    }
}

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TasaConfig {
    pub source: SourceConfig,
    pub records: RecordFormat,
}

impl TasaConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.source;
        if s.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("source.base_url is empty".into()));
        }
        if s.currency.trim().is_empty() {
            return Err(ConfigError::Invalid("source.currency is empty".into()));
        }
        if parse_timestamp(&s.date_from).is_none() {
            return Err(ConfigError::Invalid(format!(
                "source.date_from {:?} is not a date",
                s.date_from
            )));
        }
        if let Some(to) = &s.date_to {
            if parse_timestamp(to).is_none() {
                return Err(ConfigError::Invalid(format!(
                    "source.date_to {to:?} is not a date"
                )));
            }
        }
        if s.max_retries > MAX_RETRIES {
            return Err(ConfigError::Invalid(format!(
                "source.max_retries {} exceeds {MAX_RETRIES}",
                s.max_retries
            )));
        }

        let r = &self.records;
        if r.date_field.is_empty() || r.price_field.is_empty() {
            return Err(ConfigError::Invalid("record field names must be non-empty".into()));
        }
        if r.annotation_marker.is_empty() {
            return Err(ConfigError::Invalid("records.annotation_marker is empty".into()));
        }
        Ok(())
    }

    /// Resolve the fetch window. `today` closes an open-ended `date_to` at 23:59:59.
    pub fn fetch_request(&self, today: NaiveDate) -> Result<FetchRequest, ConfigError> {
        let date_from = parse_timestamp(&self.source.date_from).ok_or_else(|| {
            ConfigError::Invalid(format!("source.date_from {:?} is not a date", self.source.date_from))
        })?;

        let date_to = match &self.source.date_to {
            Some(to) => parse_timestamp(to)
                .ok_or_else(|| ConfigError::Invalid(format!("source.date_to {to:?} is not a date")))?,
            None => end_of_day(today)?,
        };

        if date_to < date_from {
            return Err(ConfigError::Invalid(format!(
                "date range is empty: {date_from} > {date_to}"
            )));
        }

        Ok(FetchRequest {
            currency: self.source.currency.clone(),
            date_from,
            date_to,
        })
    }
}

fn end_of_day(day: NaiveDate) -> Result<NaiveDateTime, ConfigError> {
    day.and_hms_opt(23, 59, 59)
        .ok_or_else(|| ConfigError::Invalid(format!("cannot close day {day}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_toml_is_default() {
        let config = TasaConfig::from_toml("").unwrap();
        assert_eq!(config, TasaConfig::default());
        assert_eq!(config.records.price_field, "median");
        assert_eq!(config.source.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn partial_override() {
        let config = TasaConfig::from_toml(
            r#"
            [source]
            currency = "EUR"
            date_from = "2023-06-01"

            [records]
            annotation_marker = "|"
            "#,
        )
        .unwrap();
        assert_eq!(config.source.currency, "EUR");
        assert_eq!(config.source.max_retries, 3);
        assert_eq!(config.records.annotation_marker, "|");
        assert_eq!(config.records.date_field, "_id");
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            TasaConfig::from_toml("[source]\ndate_from = \"someday\""),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            TasaConfig::from_toml("[source]\ncurrency = \"\""),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            TasaConfig::from_toml("[source]\nmax_retries = 50"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            TasaConfig::from_toml("[source\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn toml_roundtrip() {
        let mut config = TasaConfig::default();
        config.source.date_to = Some("2024-12-31 23:59:59".into());
        let text = config.to_toml().unwrap();
        assert_eq!(TasaConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn fetch_request_defaults_to_end_of_today() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let req = TasaConfig::default().fetch_request(today).unwrap();
        assert_eq!(req.currency, "USD");
        assert_eq!(req.date_from.to_string(), "2021-01-01 00:00:00");
        assert_eq!(req.date_to.to_string(), "2025-03-10 23:59:59");
    }

    #[test]
    fn fetch_request_rejects_inverted_range() {
        let mut config = TasaConfig::default();
        config.source.date_from = "2025-01-01".into();
        config.source.date_to = Some("2024-01-01".into());
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        assert!(config.fetch_request(today).is_err());
    }

    #[test]
    fn from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[source]\ncurrency = \"MLC\"").unwrap();
        let config = TasaConfig::from_file(file.path()).unwrap();
        assert_eq!(config.source.currency, "MLC");

        let missing = TasaConfig::from_file(Path::new("/nonexistent/tasalab.toml"));
        assert!(matches!(missing, Err(ConfigError::Read { .. })));
    }
}
