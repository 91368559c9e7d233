//! Remove Promo Code Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    carts::{cart_identity, errors::into_status_error, responses::CartResponse},
    extensions::*,
    state::State,
};

/// Remove Promo Code Handler
#[endpoint(
    tags("carts"),
    summary = "Remove Promo Code",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Promo code removed"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found or no promo code applied"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let cart = state
        .carts
        .remove_promo_code(cart_identity(req, depot))
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use pillbox_app::domain::carts::{CartsServiceError, MockCartsService};
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{carts_service, make_cart};

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        carts_service(carts, Router::with_path("cart/promo-code").delete(handler))
    }

    #[tokio::test]
    async fn test_remove_promo_code_success() -> TestResult {
        let cart = make_cart(None);
        let mut carts = MockCartsService::new();

        carts
            .expect_remove_promo_code()
            .once()
            .return_once(move |_| Ok(cart));

        let mut res = TestClient::delete("http://example.com/cart/promo-code")
            .send(&make_service(carts))
            .await;

        let body: CartResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(body.promo_code.is_none());
        assert!(body.totals.promo_discount.abs() < f64::EPSILON);

        Ok(())
    }

    #[tokio::test]
    async fn test_nothing_applied_returns_404() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_remove_promo_code()
            .once()
            .return_once(|_| Err(CartsServiceError::PromoCodeNotApplied));

        let res = TestClient::delete("http://example.com/cart/promo-code")
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
