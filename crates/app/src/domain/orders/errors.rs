//! Orders service errors.

use pillbox::promo_codes::PromoCodeError;
use rust_decimal::Decimal;
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::{catalog::models::PackSizeUuid, orders::models::ContactError};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("invalid order: {0}")]
    Validation(String),

    #[error("invalid contact details: {0}")]
    InvalidContact(#[from] ContactError),

    #[error("invalid pack sizes: {0:?}")]
    InvalidPackSizes(Vec<PackSizeUuid>),

    #[error("promo code not found")]
    PromoCodeNotFound,

    #[error("subtotal {subtotal} is below the promo code minimum of {minimum}")]
    BelowMinimum { minimum: Decimal, subtotal: Decimal },

    #[error("order not found")]
    NotFound,

    #[error("cart has no items")]
    EmptyCart,

    #[error("checkout requires a signed-in customer")]
    CustomerRequired,

    #[error("order can no longer be cancelled")]
    NotCancellable,

    #[error("order already exists")]
    AlreadyExists,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
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

impl From<PromoCodeError> for OrdersServiceError {
    fn from(error: PromoCodeError) -> Self {
        match error {
            PromoCodeError::NotFound => Self::PromoCodeNotFound,
            PromoCodeError::BelowMinimum { minimum, subtotal } => {
                Self::BelowMinimum { minimum, subtotal }
            }
            PromoCodeError::UnknownStatus(_) => Self::InvalidData,
        }
    }
}
