//! Rate provider trait and structured error types.
//!
//! The `RateProvider` trait abstracts over payload sources (the remote rate
//! API, a local JSON file, synthetic data) so the pipeline can be fed and
//! tested without the network.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Structured error types for data operations.
///
/// These are designed to be displayable directly by the CLI.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("provider returned HTTP {status}")]
    Http { status: u16 },

    #[error("response is not valid JSON: {0}")]
    ResponseFormat(String),

    #[error("hard stop: provider has blocked requests (circuit breaker tripped)")]
    CircuitBreakerTripped,

    #[error("read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

/// History window for one fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    pub currency: String,
    pub date_from: NaiveDateTime,
    pub date_to: NaiveDateTime,
}

/// Trait for raw payload sources.
pub trait RateProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch the raw record payload for a history window.
    fn fetch(&self, request: &FetchRequest) -> Result<Value, DataError>;

    /// Whether the provider currently accepts requests.
    fn is_available(&self) -> bool {
        true
    }
}
