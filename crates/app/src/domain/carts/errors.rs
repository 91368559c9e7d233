//! Carts service errors.

use pillbox::promo_codes::PromoCodeError;
use rust_decimal::Decimal;
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::{
    catalog::models::{PackSizeUuid, ProductUuid},
    orders::models::ContactError,
};

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("a cart needs a customer or a client address")]
    InvalidIdentity,

    #[error("invalid contact details: {0}")]
    InvalidContact(#[from] ContactError),

    #[error("cart not found")]
    NotFound,

    #[error("cart item not found")]
    ItemNotFound,

    #[error("pack size {pack_size} not found for product {product}")]
    PackSizeNotFound {
        product: ProductUuid,
        pack_size: PackSizeUuid,
    },

    #[error("promo code not found")]
    PromoCodeNotFound,

    #[error("subtotal {subtotal} is below the promo code minimum of {minimum}")]
    BelowMinimum { minimum: Decimal, subtotal: Decimal },

    #[error("no promo code applied to the cart")]
    PromoCodeNotApplied,

    #[error("cart was modified concurrently")]
    Conflict,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CartsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::Conflict,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

impl From<PromoCodeError> for CartsServiceError {
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
