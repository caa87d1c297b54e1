use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

use crate::db::PoolError;

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Failures surfaced by the Diesel-backed repository.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    /// A uniqueness, foreign key or check constraint rejected the write.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
    /// The row changed between the read and the guarded write.
    #[error("record was modified concurrently")]
    Conflict,
    #[error("database error: {0}")]
    Database(DieselError),
    #[error("connection pool error: {0}")]
    Connection(#[from] PoolError),
}

impl From<DieselError> for RepositoryError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => Self::NotFound,
            DieselError::DatabaseError(
                DatabaseErrorKind::UniqueViolation
                | DatabaseErrorKind::ForeignKeyViolation
                | DatabaseErrorKind::CheckViolation
                | DatabaseErrorKind::NotNullViolation,
                info,
            ) => Self::ConstraintViolation(info.message().to_string()),
            other => Self::Database(other),
        }
    }
}
