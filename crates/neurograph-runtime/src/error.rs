//! Runtime error type.
//!
//! Validation failures and storage failures are always surfaced to the
//! caller; nothing in the runtime retries a write internally.

use neurograph_core::error::ValidationError;
use thiserror::Error;

/// Result type for runtime operations.
pub type Result<T> = std::result::Result<T, NeuroError>;

/// Errors raised by the store, the engines and the workers.
#[derive(Debug, Error)]
pub enum NeuroError {
    /// Caller input rejected before touching storage.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// SQLite failure (I/O, lock timeout, constraint).
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Persisted state could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Output sink or filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A background worker could not be spawned or joined.
    #[error("worker error: {0}")]
    Worker(String),
}

impl NeuroError {
    pub fn is_validation(&self) -> bool {
        matches!(self, NeuroError::Validation(_))
    }
}
