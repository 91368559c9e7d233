//! Catalog service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogServiceError {
    #[error("catalog entry already exists")]
    AlreadyExists,

    #[error("catalog entry not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("pack size is referenced by existing orders")]
    InUse,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CatalogServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        let error = CatalogServiceError::from(Error::RowNotFound);

        assert!(
            matches!(error, CatalogServiceError::NotFound),
            "expected NotFound, got {error:?}"
        );
    }

    #[test]
    fn other_errors_map_to_sql() {
        let error = CatalogServiceError::from(Error::PoolTimedOut);

        assert!(
            matches!(error, CatalogServiceError::Sql(Error::PoolTimedOut)),
            "expected Sql, got {error:?}"
        );
    }
}
