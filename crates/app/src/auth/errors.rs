//! Auth service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::auth::ApiTokenError;

#[derive(Debug, Error)]
pub enum AuthServiceError {
    #[error("token not found")]
    NotFound,

    #[error("customer not found")]
    UnknownCustomer,

    #[error("storage error")]
    Sql(#[source] Error),

    #[error("token processing error")]
    Token(#[source] ApiTokenError),
}

impl From<Error> for AuthServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::ForeignKeyViolation) => Self::UnknownCustomer,
            _ => Self::Sql(error),
        }
    }
}

impl From<ApiTokenError> for AuthServiceError {
    fn from(error: ApiTokenError) -> Self {
        Self::Token(error)
    }
}
