//! Error types for wicket.

use thiserror::Error;

/// Common error type for wicket.
#[derive(Error, Debug)]
pub enum WicketError {
    /// Database error.
    ///
    /// Wraps errors reported by the backing store at request time.
    #[error("database error: {0}")]
    Database(String),

    /// Database connection error (store unreachable).
    #[error("database connection error: {0}")]
    DatabaseConnection(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A record with the same key already exists.
    #[error("{0} already exists")]
    AlreadyExists(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Authentication error.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Permission denied error.
    #[error("permission denied: {0}")]
    Permission(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(#[from] crate::auth::ValidationError),

    /// Password hashing or verification error.
    #[error("password error: {0}")]
    Password(#[from] crate::auth::PasswordError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

// Conversion from sqlx errors
impl From<sqlx::Error> for WicketError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                WicketError::AlreadyExists("record".to_string())
            }
            sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => {
                WicketError::DatabaseConnection(e.to_string())
            }
            other => WicketError::Database(other.to_string()),
        }
    }
}

/// Result type alias for wicket operations.
pub type Result<T> = std::result::Result<T, WicketError>;
