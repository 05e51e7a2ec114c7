//! Storage error types.

/// Storage error.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Requested entity does not exist (or belongs to another user).
    #[error("not found")]
    NotFound,

    /// Entity with the same key already exists.
    #[error("already exists")]
    AlreadyExists,

    /// Conditional update lost to a concurrent writer after retrying.
    #[error("concurrent update conflict, try again")]
    Conflict,

    /// Input rejected by validation.
    #[error("invalid input: {0}")]
    Invalid(String),

    /// Backend error (database, connection, etc.).
    #[error("backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Create a backend error from any error type.
    #[inline]
    pub fn backend<E: std::fmt::Display>(err: E) -> Self {
        Self::Backend(err.to_string())
    }

    /// Create a validation error.
    #[inline]
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    /// Error type label for metrics/logging.
    pub fn error_type(&self) -> &'static str {
        use diagnohero_core::errors::*;
        match self {
            Self::NotFound => ERROR_NOT_FOUND,
            Self::AlreadyExists | Self::Invalid(_) => ERROR_VALIDATION,
            Self::Conflict => ERROR_CONFLICT,
            Self::Backend(_) => ERROR_STORE,
        }
    }
}

#[cfg(feature = "sql")]
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound,
            sqlx::Error::Database(db) if db.is_unique_violation() => Self::AlreadyExists,
            _ => Self::backend(err),
        }
    }
}
