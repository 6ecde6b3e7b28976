use thiserror::Error;

use psicotest_core::error::CoreError;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("email already registered: {0}")]
    EmailTaken(String),

    #[error("slug already in use: {0}")]
    SlugTaken(String),

    #[error("built-in instrument cannot be edited: {0}")]
    BuiltInTest(String),

    #[error("invalid database url: {0}")]
    Config(String),

    #[error("query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("stored row could not be decoded: {0}")]
    Decode(String),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    /// True when the error means the database cannot be reached, as opposed
    /// to a query that reached it and failed.
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            StorageError::Query(
                sqlx::Error::Io(_)
                    | sqlx::Error::Tls(_)
                    | sqlx::Error::PoolTimedOut
                    | sqlx::Error::PoolClosed
                    | sqlx::Error::WorkerCrashed
            )
        )
    }
}
