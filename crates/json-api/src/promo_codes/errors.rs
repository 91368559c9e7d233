//! Errors

use salvo::http::StatusError;
use tracing::error;

use pillbox_app::domain::promo_codes::PromoCodesServiceError;

pub(crate) fn into_status_error(error: PromoCodesServiceError) -> StatusError {
    match error {
        PromoCodesServiceError::NotFound => StatusError::not_found().brief("Promo code not found"),
        PromoCodesServiceError::AlreadyExists => {
            StatusError::conflict().brief("Promo code already exists")
        }
        PromoCodesServiceError::Validation(message) => StatusError::bad_request().brief(message),
        PromoCodesServiceError::MissingRequiredData | PromoCodesServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid promo code")
        }
        PromoCodesServiceError::Sql(source) => {
            error!("promo code storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use super::*;

    #[test]
    fn service_errors_map_to_status_codes() {
        let cases = [
            (PromoCodesServiceError::NotFound, StatusCode::NOT_FOUND),
            (PromoCodesServiceError::AlreadyExists, StatusCode::CONFLICT),
            (
                PromoCodesServiceError::Validation("code must not be empty"),
                StatusCode::BAD_REQUEST,
            ),
            (
                PromoCodesServiceError::Sql(sqlx::Error::PoolTimedOut),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            let message = error.to_string();

            assert_eq!(into_status_error(error).code, expected, "{message}");
        }
    }
}
