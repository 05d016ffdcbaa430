//! TasaLab Core: indicator pipeline for a daily informal exchange-rate series.
//!
//! This crate turns a raw provider payload into an analyzable series:
//! - Raw record normalization (annotated prices, heterogeneous dates)
//! - Series assembly (stable sort, timestamp dedupe)
//! - Indicators: SMA30/SMA200, RSI, MACD, Bollinger Bands, volatility
//! - Trend state and buy/sell crossover events
//! - Row filter producing the Output Series handed to rendering
//!
//! Plus the collaborators around it: configuration, rate providers,
//! export and fingerprinting.

pub mod assemble;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod export;
pub mod filter;
pub mod indicators;
pub mod normalize;
pub mod pipeline;
pub mod signals;

pub use config::{RecordFormat, SourceConfig, TasaConfig};
pub use domain::{AnalyzedRow, IndicatorRow, OutputSeries, PricePoint, Series, SignalEvent, TrendState};
pub use error::{PipelineError, RecordParseError};
pub use pipeline::{Pipeline, PipelineReport, PipelineRun};
