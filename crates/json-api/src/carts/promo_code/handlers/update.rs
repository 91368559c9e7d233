//! Apply Promo Code Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    carts::{cart_identity, errors::into_status_error, responses::CartResponse},
    extensions::*,
    state::State,
};

/// Apply Promo Code Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ApplyPromoCodeRequest {
    pub code: String,
}

/// Apply Promo Code Handler
///
/// Validates the code against the cart's current subtotal and attaches it.
#[endpoint(
    tags("carts"),
    summary = "Apply Promo Code",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Promo code applied"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart or promo code not found"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Cart subtotal below the promo code minimum"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "carts.promo_code.apply", skip(json, req, depot), err)]
pub(crate) async fn handler(
    json: JsonBody<ApplyPromoCodeRequest>,
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    if request.code.trim().is_empty() {
        return Err(StatusError::bad_request().brief("Promo code is required"));
    }

    let cart = state
        .carts
        .apply_promo_code(cart_identity(req, depot), &request.code, Timestamp::now())
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use pillbox_app::domain::carts::{CartsServiceError, MockCartsService};
    use rust_decimal_macros::dec;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::test_helpers::{carts_service, make_cart};

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        carts_service(carts, Router::with_path("cart/promo-code").put(handler))
    }

    #[tokio::test]
    async fn test_apply_promo_code_success() -> TestResult {
        let cart = make_cart(None);
        let mut carts = MockCartsService::new();

        carts
            .expect_apply_promo_code()
            .once()
            .withf(|_, code, _| code.trim() == "SAVE20")
            .return_once(move |_, _, _| Ok(cart));

        let mut res = TestClient::put("http://example.com/cart/promo-code")
            .json(&json!({ "code": "SAVE20" }))
            .send(&make_service(carts))
            .await;

        let body: CartResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.items.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_blank_code_returns_400() -> TestResult {
        let mut carts = MockCartsService::new();

        carts.expect_apply_promo_code().never();

        let res = TestClient::put("http://example.com/cart/promo-code")
            .json(&json!({ "code": "   " }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_code_returns_404() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_apply_promo_code()
            .once()
            .return_once(|_, _, _| Err(CartsServiceError::PromoCodeNotFound));

        let res = TestClient::put("http://example.com/cart/promo-code")
            .json(&json!({ "code": "EXPIRED" }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_below_minimum_returns_422() -> TestResult {
        let mut carts = MockCartsService::new();

        carts.expect_apply_promo_code().once().return_once(|_, _, _| {
            Err(CartsServiceError::BelowMinimum {
                minimum: dec!(200),
                subtotal: dec!(175),
            })
        });

        let res = TestClient::put("http://example.com/cart/promo-code")
            .json(&json!({ "code": "TAKE200" }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));

        Ok(())
    }
}
