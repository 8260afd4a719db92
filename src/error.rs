//! Error types for the matching pipeline.
//!
//! This module provides the [`MatchError`] type used across configuration
//! loading, indexing, matching, and batch execution, and the [`Result`]
//! convenience type.

use thiserror::Error;

/// Error type for all matching-pipeline operations.
///
/// Per-record and per-candidate errors encountered during matching are
/// intentionally *not* represented here: per the batch executor's error
/// policy, those are caught at the point of use and folded into
/// `BatchStats::records_with_errors` rather than propagated.
#[derive(Error, Debug)]
pub enum MatchError {
    /// A configuration value failed validation (weights, thresholds, years).
    #[error("Configuration error: {0}")]
    Config(String),

    /// A batch, result, or stats file failed to serialize or deserialize.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The cache could not be loaded or written; caller should rebuild.
    #[error("Cache error: {0}")]
    Cache(String),

    /// A worker failed to initialize (e.g. corrupt cache in a worker thread).
    #[error("Worker error: {0}")]
    Worker(String),

    /// IO error from the underlying source/destination.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for [`std::result::Result`] with [`MatchError`].
pub type Result<T> = std::result::Result<T, MatchError>;
