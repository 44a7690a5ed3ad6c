//! Repository Module
//!
//! Module-level CRUD functions over the SQLite pool. Multi-row effects
//! (dispatch creation, settlement, returns) run inside explicit
//! transactions; state transitions on terminal columns use conditional
//! updates and check the affected-row count.

pub mod commission;
pub mod customer;
pub mod dispatch;
pub mod return_order;
pub mod settlement;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Outstanding-balance gate: a driver owing more than the limit may not
    /// take a new dispatch. Carries the computed balance.
    #[error("Outstanding balance {0} exceeds the dispatch limit")]
    BalanceExceeded(f64),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
