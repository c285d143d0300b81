//! Error types shared across the workspace.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Errors produced while talking to PostgreSQL.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// The pool could not be built or a connection could not be established.
    #[error("database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// A statement failed to execute.
    #[error("database query error: {0}")]
    Query(#[source] SqlxError),

    /// The configuration read from the environment is unusable.
    #[error("database configuration error: {0}")]
    Configuration(String),
}

/// Result alias used by the database module.
pub type DatabaseResult<T> = Result<T, DatabaseError>;
