//! Update Cart Handler

use std::sync::Arc;

use pillbox::pricing::{PricingError, Quantity};
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pillbox_app::domain::carts::models::{CartItemUpdate, CartUpdate};

use crate::{
    carts::{
        cart_identity, contact::CartContactBody, errors::into_status_error,
        responses::CartResponse,
    },
    extensions::*,
    state::State,
};

/// Update Cart Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateCartRequest {
    /// Contact fields to set. Omitted fields keep their current value.
    #[serde(default)]
    pub contact: CartContactBody,

    /// Lines to set. Quantities replace whatever is already in the cart.
    #[serde(default)]
    pub items: Vec<CartItemRequest>,
}

/// Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemRequest {
    pub product_uuid: Uuid,
    pub pack_size_uuid: Uuid,
    pub quantity: u32,
}

impl TryFrom<UpdateCartRequest> for CartUpdate {
    type Error = PricingError;

    fn try_from(request: UpdateCartRequest) -> Result<Self, Self::Error> {
        let items = request
            .items
            .into_iter()
            .map(|item| {
                Ok(CartItemUpdate {
                    product: item.product_uuid.into(),
                    pack_size: item.pack_size_uuid.into(),
                    quantity: Quantity::new(item.quantity)?,
                })
            })
            .collect::<Result<Vec<_>, PricingError>>()?;

        Ok(CartUpdate {
            contact: request.contact.into(),
            items,
        })
    }
}

/// Update Cart Handler
///
/// Creates the caller's cart on first use.
#[endpoint(
    tags("carts"),
    summary = "Update Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Pack size not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid quantity or contact details"),
        (status_code = StatusCode::CONFLICT, description = "Cart was modified concurrently"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "carts.update",
    skip(json, req, depot),
    fields(item_count = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<UpdateCartRequest>,
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    tracing::Span::current().record("item_count", request.items.len());

    let update = CartUpdate::try_from(request)
        .map_err(|error| StatusError::bad_request().brief(error.to_string()))?;

    let cart = state
        .carts
        .upsert_cart(cart_identity(req, depot), update)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use pillbox_app::domain::{
        carts::{CartsServiceError, MockCartsService},
        catalog::models::{PackSizeUuid, ProductUuid},
        orders::models::ContactError,
    };
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::test_helpers::{TEST_CUSTOMER_UUID, carts_service, make_cart};

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        carts_service(carts, Router::with_path("cart").put(handler))
    }

    #[tokio::test]
    async fn test_update_sets_quantities_and_contact() -> TestResult {
        let product = ProductUuid::new();
        let pack_size = PackSizeUuid::new();
        let cart = make_cart(Some(TEST_CUSTOMER_UUID));

        let mut carts = MockCartsService::new();

        carts
            .expect_upsert_cart()
            .once()
            .withf(move |identity, update| {
                identity.customer == Some(TEST_CUSTOMER_UUID)
                    && update.contact.city.as_deref() == Some("Springfield")
                    && update.contact.name.is_none()
                    && update.items
                        == [CartItemUpdate {
                            product,
                            pack_size,
                            quantity: Quantity::new(3).unwrap_or(Quantity::ONE),
                        }]
            })
            .return_once(move |_, _| Ok(cart));

        let mut res = TestClient::put("http://example.com/cart")
            .json(&json!({
                "contact": { "city": "Springfield" },
                "items": [
                    { "product_uuid": product, "pack_size_uuid": pack_size, "quantity": 3 }
                ]
            }))
            .send(&make_service(carts))
            .await;

        let body: CartResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.customer_uuid, Some(TEST_CUSTOMER_UUID.into_uuid()));

        Ok(())
    }

    #[tokio::test]
    async fn test_zero_quantity_returns_400() -> TestResult {
        let mut carts = MockCartsService::new();

        carts.expect_upsert_cart().never();

        let res = TestClient::put("http://example.com/cart")
            .json(&json!({
                "items": [
                    {
                        "product_uuid": ProductUuid::new(),
                        "pack_size_uuid": PackSizeUuid::new(),
                        "quantity": 0
                    }
                ]
            }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_contact_returns_400() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_upsert_cart()
            .once()
            .withf(|_, update| update.contact.email.as_deref() == Some("jane at example"))
            .return_once(|_, _| {
                Err(CartsServiceError::InvalidContact(
                    ContactError::InvalidEmail,
                ))
            });

        let res = TestClient::put("http://example.com/cart")
            .json(&json!({ "contact": { "email": "jane at example" } }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_pack_size_returns_404() -> TestResult {
        let product = ProductUuid::new();
        let pack_size = PackSizeUuid::new();

        let mut carts = MockCartsService::new();

        carts
            .expect_upsert_cart()
            .once()
            .return_once(move |_, _| {
                Err(CartsServiceError::PackSizeNotFound { product, pack_size })
            });

        let res = TestClient::put("http://example.com/cart")
            .json(&json!({
                "items": [
                    { "product_uuid": product, "pack_size_uuid": pack_size, "quantity": 1 }
                ]
            }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_modification_returns_409() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_upsert_cart()
            .once()
            .return_once(|_, _| Err(CartsServiceError::Conflict));

        let res = TestClient::put("http://example.com/cart")
            .json(&json!({ "contact": { "name": "Jane" } }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }
}
