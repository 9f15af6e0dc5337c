//! Error types for the merge crate.

/// Errors that can occur in merge helpers.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// Serialization or deserialization error during a text round-trip.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias for merge results.
pub type MergeResult<T> = Result<T, MergeError>;
