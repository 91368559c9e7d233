//! Checkout Cart Handler

use std::sync::Arc;

use pillbox_app::domain::carts::models::CartIdentity;
use salvo::{http::header::LOCATION, oapi::extract::JsonBody, prelude::*};

use crate::{
    extensions::*,
    observability::record_order_placed,
    orders::{errors::into_status_error, requests::CheckoutRequest, responses::OrderResponse},
    state::State,
};

/// Checkout Cart Handler
///
/// Turns the caller's cart into an order and deletes the cart.
#[endpoint(
    tags("orders"),
    summary = "Checkout Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order created from the cart"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid contact details"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Authentication required"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Cart has no items"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "orders.checkout", skip(json, req, depot, res), err)]
pub(crate) async fn handler(
    json: JsonBody<CheckoutRequest>,
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let customer = depot.customer_uuid_or_401()?;
    let identity = CartIdentity::new(Some(customer), req.client_ip());

    let order = state
        .orders
        .checkout_cart(identity, json.into_inner().contact.into())
        .await
        .map_err(into_status_error)?;

    record_order_placed("checkout");

    res.add_header(LOCATION, format!("/orders/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(order.into()))
}
