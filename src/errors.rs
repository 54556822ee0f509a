//! Campaign Coordinator Error Hierarchy
//!
//! Defines the error types for the test-campaign coordination engine,
//! categorized by configuration, persistence and notification concerns.

use std::time::Duration;

use config::ConfigError;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration file / environment parsing failures
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Configuration validation failures (e.g. zero clusters or databases)
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Persistence-layer failures (storage engine, serialization)
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Notification sink delivery failures; logged and swallowed by the
    /// dispatcher, never escalated past it
    #[error("Notification error: {0}")]
    Notification(String),

    /// Unrecoverable failures requiring the caller to give up
    #[error("Fatal error: {0}")]
    Fatal(String),

    /// Cooperative shutdown was requested
    #[error("Exit")]
    Exit,
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Optimistic-concurrency rejection: the record changed since it was read.
    /// The only retryable error class.
    #[error("Version conflict on record {id}: expected version {expected}")]
    VersionConflict { id: String, expected: u64 },

    #[error("Sled error: {0}")]
    Sled(#[from] sled::Error),

    #[error("Bincode error: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True only for the retryable error class (version conflicts).
    pub fn is_version_conflict(&self) -> bool {
        matches!(self, Error::Storage(StorageError::VersionConflict { .. }))
    }

    pub(crate) fn retry_budget_exhausted(
        op: &str,
        budget: Duration,
    ) -> Self {
        Error::Fatal(format!(
            "{op}: version conflict not resolved within {budget:?}"
        ))
    }
}
