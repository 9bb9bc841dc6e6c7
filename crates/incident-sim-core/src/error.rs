//! Error types for generation, field mapping, and sinks.

use thiserror::Error;

/// Local validation failure for a single generation call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("unknown emergency category: '{0}'")]
    UnknownCategory(String),

    #[error("{field} out of range: {value} (expected {expected})")]
    OutOfRange {
        field: &'static str,
        value: String,
        expected: String,
    },
}

/// Mismatch between the adapter's mapping table and a sink schema.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("sink column '{0}' has no mapping from any incident field")]
    UnmappedColumn(String),

    #[error("mapped column '{0}' does not exist in the sink schema")]
    MissingColumn(String),
}

/// Failure reported by a persistence sink. Never retried by the core.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink '{sink}' rejected record {id}: {reason}")]
    Rejected {
        sink: String,
        id: String,
        reason: String,
    },

    #[error("failed to serialize record: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backing store could not be reached or failed mid-write.
    #[error("sink unavailable: {0:#}")]
    Unavailable(#[from] anyhow::Error),
}
