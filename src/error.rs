//! Error taxonomy for the analysis pipeline.
//!
//! Insufficient series length is deliberately not represented here: a series
//! shorter than the scan window yields empty results, not an error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Upstream data source failure (network, rate limit, malformed response).
    /// Surfaced as a single opaque message; callers do not retry.
    #[error("market data source temporarily unavailable: {0}")]
    SourceUnavailable(String),

    /// Zero records returned, or a record with a missing/empty field.
    /// The whole batch is rejected, never a partial result.
    #[error("empty or invalid data in batch: {0}")]
    EmptyOrInvalidData(String),

    /// Startup-time configuration problem (missing credential, bad port).
    #[error("configuration error: {0}")]
    Config(String),
}
