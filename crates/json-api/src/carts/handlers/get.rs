//! Get Cart Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    carts::{cart_identity, errors::into_status_error, responses::CartResponse},
    extensions::*,
    state::State,
};

/// Get Cart Handler
///
/// Returns the caller's cart priced with live catalog prices.
#[endpoint(
    tags("carts"),
    summary = "Get Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
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
        .get_cart(cart_identity(req, depot))
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use pillbox_app::domain::carts::{CartsServiceError, MockCartsService, models::CartIdentity};
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{
        TEST_CLIENT_IP, TEST_CUSTOMER_UUID, anonymous_carts_service, carts_service, make_cart,
    };

    use super::*;

    #[tokio::test]
    async fn test_get_returns_priced_cart() -> TestResult {
        let mut carts = MockCartsService::new();
        let cart = make_cart(Some(TEST_CUSTOMER_UUID));
        let uuid = cart.uuid;

        carts
            .expect_get_cart()
            .once()
            .withf(|identity| identity.customer == Some(TEST_CUSTOMER_UUID))
            .return_once(move |_| Ok(cart));

        let mut res = TestClient::get("http://example.com/cart")
            .send(&carts_service(carts, Router::with_path("cart").get(handler)))
            .await;

        let body: CartResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.uuid, uuid.into_uuid());
        assert_eq!(body.items.len(), 2);
        assert!((body.totals.subtotal - 175.0).abs() < f64::EPSILON);
        assert!((body.totals.total - 150.0).abs() < f64::EPSILON);
        assert!(body.totals.shipping_charge.abs() < f64::EPSILON);

        Ok(())
    }

    #[tokio::test]
    async fn test_anonymous_cart_is_keyed_by_forwarded_address() -> TestResult {
        let mut carts = MockCartsService::new();
        let cart = make_cart(None);

        carts
            .expect_get_cart()
            .once()
            .withf(|identity| {
                *identity == CartIdentity::new(None, TEST_CLIENT_IP.parse().ok())
            })
            .return_once(move |_| Ok(cart));

        let res = TestClient::get("http://example.com/cart")
            .add_header("x-forwarded-for", format!("{TEST_CLIENT_IP}, 10.0.0.1"), true)
            .send(&anonymous_carts_service(
                carts,
                Router::with_path("cart").get(handler),
            ))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_missing_cart_returns_404() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_get_cart()
            .once()
            .return_once(|_| Err(CartsServiceError::NotFound));

        let res = TestClient::get("http://example.com/cart")
            .send(&carts_service(carts, Router::with_path("cart").get(handler)))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
