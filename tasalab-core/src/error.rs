//! Structured error types for the pipeline.
//!
//! `RecordParseError` is per record and never escapes the normalizer.
//! `PipelineError` aborts a run. Insufficient data is not an error at all:
//! it surfaces as an empty `OutputSeries`.

use thiserror::Error;

/// Why a single raw record was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordParseError {
    #[error("record is not an object")]
    NotAnObject,

    #[error("missing date field")]
    MissingDate,

    #[error("unparsable date: {0:?}")]
    InvalidDate(String),

    #[error("missing price field")]
    MissingPrice,

    #[error("unparsable price: {0:?}")]
    InvalidPrice(String),
}

/// Fatal pipeline failures.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("malformed input: {0}")]
    MalformedInput(String),
}
