use thiserror::Error;

use crate::domain::types::TypeConstraintError;

/// Errors produced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    /// A stored row no longer satisfies the domain constraints.
    #[error("validation error: {0}")]
    ValidationError(String),
    /// The record changed since it was read; the write was not applied.
    #[error("record was modified concurrently")]
    Conflict,
}

/// Convenient alias for results returned from repository functions.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}
