//! Rate providers: where the raw record payload comes from.
//!
//! Providers return the payload as untyped JSON; turning it into price points
//! is the normalizer's job.

pub mod cambio;
pub mod circuit_breaker;
pub mod file;
pub mod provider;
pub mod synthetic;

pub use cambio::CambioProvider;
pub use circuit_breaker::CircuitBreaker;
pub use file::FileProvider;
pub use provider::{DataError, FetchRequest, RateProvider};
pub use synthetic::SyntheticProvider;
