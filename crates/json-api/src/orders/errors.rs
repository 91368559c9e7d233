//! Errors

use salvo::http::StatusError;
use tracing::error;

use pillbox_app::domain::orders::OrdersServiceError;

use crate::totals::money;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::Validation(reason) => StatusError::bad_request().brief(reason),
        OrdersServiceError::InvalidContact(reason) => {
            StatusError::bad_request().brief(reason.to_string())
        }
        OrdersServiceError::InvalidPackSizes(pack_sizes) => {
            let pack_sizes = pack_sizes
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");

            StatusError::bad_request().brief(format!("Invalid pack sizes: {pack_sizes}"))
        }
        OrdersServiceError::PromoCodeNotFound => {
            StatusError::not_found().brief("Promo code not found")
        }
        OrdersServiceError::BelowMinimum { minimum, subtotal } => {
            StatusError::unprocessable_entity().brief(format!(
                "Order subtotal {:.2} is below the promo code minimum of {:.2}",
                money(subtotal),
                money(minimum)
            ))
        }
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::EmptyCart => {
            StatusError::unprocessable_entity().brief("Cart has no items to check out")
        }
        OrdersServiceError::CustomerRequired => {
            StatusError::unauthorized().brief("Authentication required")
        }
        OrdersServiceError::NotCancellable => {
            StatusError::conflict().brief("Order can no longer be cancelled")
        }
        OrdersServiceError::AlreadyExists => StatusError::conflict().brief("Order already exists"),
        OrdersServiceError::InvalidReference
        | OrdersServiceError::MissingRequiredData
        | OrdersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid order payload")
        }
        OrdersServiceError::Sql(source) => {
            error!("order storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use pillbox_app::domain::{
        catalog::models::PackSizeUuid, orders::models::ContactError,
    };
    use rust_decimal_macros::dec;
    use salvo::http::StatusCode;

    use super::*;

    #[test]
    fn service_errors_map_to_status_codes() {
        let cases = [
            (
                OrdersServiceError::Validation("an order needs at least one item".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                OrdersServiceError::InvalidContact(ContactError::InvalidPhone),
                StatusCode::BAD_REQUEST,
            ),
            (
                OrdersServiceError::InvalidPackSizes(vec![PackSizeUuid::new()]),
                StatusCode::BAD_REQUEST,
            ),
            (OrdersServiceError::PromoCodeNotFound, StatusCode::NOT_FOUND),
            (
                OrdersServiceError::BelowMinimum {
                    minimum: dec!(50),
                    subtotal: dec!(20),
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (OrdersServiceError::NotFound, StatusCode::NOT_FOUND),
            (OrdersServiceError::EmptyCart, StatusCode::UNPROCESSABLE_ENTITY),
            (OrdersServiceError::CustomerRequired, StatusCode::UNAUTHORIZED),
            (OrdersServiceError::NotCancellable, StatusCode::CONFLICT),
            (
                OrdersServiceError::Sql(sqlx::Error::PoolTimedOut),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            let message = error.to_string();

            assert_eq!(into_status_error(error).code, expected, "{message}");
        }
    }

    #[test]
    fn invalid_pack_sizes_are_listed() {
        let pack_size = PackSizeUuid::new();

        let error = into_status_error(OrdersServiceError::InvalidPackSizes(vec![pack_size]));

        assert_eq!(error.brief, format!("Invalid pack sizes: {pack_size}"));
    }
}
