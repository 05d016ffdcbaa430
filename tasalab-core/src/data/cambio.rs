//! Remote informal-rate API provider.
//!
//! Fetches the daily rate history as a JSON array of records from the
//! configured endpoint. Handles retries with exponential backoff and the
//! shared circuit breaker.

use super::circuit_breaker::CircuitBreaker;
use super::provider::{DataError, FetchRequest, RateProvider};
use crate::config::{SourceConfig, MAX_RETRIES};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Layout of the date parameters sent to the API.
const QUERY_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Remote rate history provider.
pub struct CambioProvider {
    client: reqwest::blocking::Client,
    circuit_breaker: Arc<CircuitBreaker>,
    base_url: String,
    trmi: bool,
    max_retries: u32,
    base_delay: Duration,
}

impl CambioProvider {
    pub fn new(source: &SourceConfig, circuit_breaker: Arc<CircuitBreaker>) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(source.timeout_secs))
            .user_agent(concat!("tasalab/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DataError::Client(e.to_string()))?;

        Ok(Self {
            client,
            circuit_breaker,
            base_url: source.base_url.clone(),
            trmi: source.trmi,
            max_retries: source.max_retries.min(MAX_RETRIES),
            base_delay: Duration::from_millis(500),
        })
    }

    /// Query parameters for a history window.
    pub fn query_params(&self, request: &FetchRequest) -> Vec<(&'static str, String)> {
        vec![
            ("trmi", self.trmi.to_string()),
            ("cur", request.currency.clone()),
            ("date_from", request.date_from.format(QUERY_DATE_FORMAT).to_string()),
            ("date_to", request.date_to.format(QUERY_DATE_FORMAT).to_string()),
        ]
    }

    /// Sleep before retry `attempt` (1-based): base delay doubled per attempt.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor)
    }

    fn refuse(&self) -> DataError {
        warn!(
            cooldown = ?self.circuit_breaker.remaining_cooldown(),
            "circuit breaker open, refusing rate fetch"
        );
        DataError::CircuitBreakerTripped
    }

    fn fetch_with_retry(&self, request: &FetchRequest) -> Result<Value, DataError> {
        if !self.circuit_breaker.is_allowed() {
            return Err(self.refuse());
        }

        let params = self.query_params(request);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.backoff_delay(attempt);
                warn!(attempt, ?delay, "retrying rate fetch");
                std::thread::sleep(delay);
            }

            if !self.circuit_breaker.is_allowed() {
                return Err(self.refuse());
            }

            debug!(url = %self.base_url, attempt, "requesting rate history");
            let resp = match self.client.get(&self.base_url).query(&params).send() {
                Ok(resp) => resp,
                Err(e) if e.is_connect() || e.is_timeout() => {
                    self.circuit_breaker.record_failure();
                    last_error = Some(DataError::NetworkUnreachable(e.to_string()));
                    continue;
                }
                Err(e) => return Err(DataError::NetworkUnreachable(e.to_string())),
            };

            let status = resp.status();

            if status == reqwest::StatusCode::FORBIDDEN {
                warn!("provider answered 403, tripping circuit breaker");
                self.circuit_breaker.trip();
                return Err(DataError::CircuitBreakerTripped);
            }

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                self.circuit_breaker.record_failure();
                let retry_after = resp
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(60);
                last_error = Some(DataError::RateLimited {
                    retry_after_secs: retry_after,
                });
                continue;
            }

            if status.is_server_error() {
                self.circuit_breaker.record_failure();
                last_error = Some(DataError::Http {
                    status: status.as_u16(),
                });
                continue;
            }

            if !status.is_success() {
                return Err(DataError::Http {
                    status: status.as_u16(),
                });
            }

            let payload: Value = resp
                .json()
                .map_err(|e| DataError::ResponseFormat(e.to_string()))?;
            self.circuit_breaker.record_success();
            info!(
                records = ?payload.as_array().map(Vec::len),
                "fetched rate history"
            );
            return Ok(payload);
        }

        Err(last_error.unwrap_or(DataError::NetworkUnreachable("max retries exceeded".into())))
    }
}

impl RateProvider for CambioProvider {
    fn name(&self) -> &str {
        "cambio"
    }

    fn fetch(&self, request: &FetchRequest) -> Result<Value, DataError> {
        self.fetch_with_retry(request)
    }

    fn is_available(&self) -> bool {
        self.circuit_breaker.is_allowed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn query_params_layout() {
        let provider = CambioProvider::new(
            &SourceConfig::default(),
            Arc::new(CircuitBreaker::default_provider()),
        )
        .unwrap();
        let request = FetchRequest {
            currency: "USD".into(),
            date_from: NaiveDate::from_ymd_opt(2021, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            date_to: NaiveDate::from_ymd_opt(2024, 6, 30)
                .unwrap()
                .and_hms_opt(23, 59, 59)
                .unwrap(),
        };
        let params = provider.query_params(&request);
        assert_eq!(
            params,
            vec![
                ("trmi", "true".to_string()),
                ("cur", "USD".to_string()),
                ("date_from", "2021-01-01 00:00:00".to_string()),
                ("date_to", "2024-06-30 23:59:59".to_string()),
            ]
        );
    }

    #[test]
    fn tripped_breaker_refuses_without_network() {
        let breaker = Arc::new(CircuitBreaker::default_provider());
        breaker.trip();
        let provider = CambioProvider::new(&SourceConfig::default(), breaker).unwrap();
        assert!(!provider.is_available());

        let request = FetchRequest {
            currency: "USD".into(),
            date_from: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            date_to: NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        };
        assert!(matches!(
            provider.fetch(&request),
            Err(DataError::CircuitBreakerTripped)
        ));
    }

    #[test]
    fn retries_are_capped_and_backoff_saturates() {
        let source = SourceConfig {
            max_retries: 40,
            ..SourceConfig::default()
        };
        let provider =
            CambioProvider::new(&source, Arc::new(CircuitBreaker::default_provider())).unwrap();
        assert_eq!(provider.max_retries, MAX_RETRIES);

        assert_eq!(provider.backoff_delay(1), Duration::from_millis(500));
        assert_eq!(provider.backoff_delay(3), Duration::from_millis(2000));
        // 2^39 overflows u32; the delay saturates instead of panicking.
        assert!(provider.backoff_delay(40) >= provider.backoff_delay(MAX_RETRIES));
    }
}
