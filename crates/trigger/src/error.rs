//! Trigger error types.

use thiserror::Error;

/// Failures talking to the ingestion service.
#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("provider error: {0}")]
    Provider(String),

    #[error("response missing field: {0}")]
    MissingField(String),
}

/// Failures that abort an invocation.
#[derive(Debug, Error)]
pub enum TriggerError {
    #[error("malformed event: {0}")]
    MalformedEvent(String),

    #[error("malformed record {index}: {reason}")]
    MalformedRecord { index: usize, reason: String },
}
