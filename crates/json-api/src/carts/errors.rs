//! Errors

use salvo::http::StatusError;
use tracing::error;

use pillbox_app::domain::carts::CartsServiceError;

use crate::totals::money;

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::InvalidIdentity => {
            StatusError::bad_request().brief("Could not tell who the cart belongs to")
        }
        CartsServiceError::InvalidContact(reason) => {
            StatusError::bad_request().brief(reason.to_string())
        }
        CartsServiceError::NotFound => StatusError::not_found().brief("Cart not found"),
        CartsServiceError::ItemNotFound => StatusError::not_found().brief("Cart item not found"),
        CartsServiceError::PackSizeNotFound { product, pack_size } => StatusError::not_found()
            .brief(format!(
                "Pack size {pack_size} not found for product {product}"
            )),
        CartsServiceError::PromoCodeNotFound => {
            StatusError::not_found().brief("Promo code not found")
        }
        CartsServiceError::PromoCodeNotApplied => {
            StatusError::not_found().brief("No promo code applied to the cart")
        }
        CartsServiceError::BelowMinimum { minimum, subtotal } => {
            StatusError::unprocessable_entity().brief(format!(
                "Cart subtotal {:.2} is below the promo code minimum of {:.2}",
                money(subtotal),
                money(minimum)
            ))
        }
        CartsServiceError::Conflict => {
            StatusError::conflict().brief("Cart was modified concurrently, please retry")
        }
        CartsServiceError::InvalidReference
        | CartsServiceError::MissingRequiredData
        | CartsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid cart payload")
        }
        CartsServiceError::Sql(source) => {
            error!("cart storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
