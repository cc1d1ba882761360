//! Repository layer for the Casting Agency.
//!
//! Handlers call repositories directly; there is no service layer in
//! between. Every query is parameterized and every mutation runs in its own
//! transaction, which is rolled back when dropped uncommitted.

pub mod actors;
pub mod movies;

pub use actors::ActorsRepository;
pub use movies::MoviesRepository;

use crate::observability::metrics::record_db_query;
use std::future::Future;
use std::time::Instant;
use thiserror::Error;

/// Storage failure, classified so callers can tell bad data from an outage.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The row violated a table constraint (NOT NULL, CHECK, UNIQUE, FK).
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// The database could not be reached.
    #[error("database unavailable: {0}")]
    Unavailable(String),

    #[error("database error: {0}")]
    Other(String),
}

impl StoreError {
    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::Constraint(_) => "constraint",
            StoreError::Unavailable(_) => "unavailable",
            StoreError::Other(_) => "other",
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        use sqlx::error::ErrorKind;

        match &err {
            sqlx::Error::Database(db_err) => match db_err.kind() {
                ErrorKind::UniqueViolation
                | ErrorKind::ForeignKeyViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation => StoreError::Constraint(err.to_string()),
                _ => StoreError::Other(err.to_string()),
            },
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => StoreError::Unavailable(err.to_string()),
            _ => StoreError::Other(err.to_string()),
        }
    }
}

/// Run a repository operation, recording its duration and outcome.
pub(crate) async fn observe<T, F>(operation: &'static str, fut: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    let start = Instant::now();
    let result = fut.await;
    let status = if result.is_ok() { "success" } else { "error" };
    record_db_query(operation, status, start.elapsed());

    result.map_err(|e| {
        tracing::debug!(target: "ca.repository", operation = operation, error = %e, "Query failed");
        StoreError::from(e)
    })
}
