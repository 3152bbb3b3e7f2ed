//! Error types for the status pipeline.
//!
//! Errors here never cross into the broadcast path: a failed render skips
//! one publish, and a closed intake is reported to the producer that tried
//! to submit.

/// Errors raised while folding or rendering the status document.
#[derive(Debug, thiserror::Error)]
pub enum StatusError {
    /// The status document could not be rendered to JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised when submitting domain events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IntakeError {
    /// The aggregator has stopped and no longer accepts events.
    #[error("event intake is closed")]
    Closed,
}
