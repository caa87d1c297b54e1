use thiserror::Error;

use crate::invoice::InvoiceError;
use crate::repository::errors::RepositoryError;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Outcome categories the HTTP layer translates into status codes.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("not found")]
    NotFound,
    #[error("conflict")]
    Conflict,
    /// The submitted payload failed validation.
    #[error("{0}")]
    Form(String),
    /// The request is well formed but the current state forbids it.
    #[error("{0}")]
    Precondition(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound,
            RepositoryError::ConstraintViolation(_) | RepositoryError::Conflict => Self::Conflict,
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<InvoiceError> for ServiceError {
    fn from(err: InvoiceError) -> Self {
        match err {
            InvoiceError::NotFound(_) => Self::NotFound,
            other => Self::Internal(other.to_string()),
        }
    }
}
