//! Create Order Handler

use std::sync::Arc;

use jiff::Timestamp;
use pillbox_app::domain::orders::models::NewOrder;
use salvo::{http::header::LOCATION, oapi::extract::JsonBody, prelude::*};

use crate::{
    extensions::*,
    observability::record_order_placed,
    orders::{errors::into_status_error, requests::CreateOrderRequest, responses::OrderResponse},
    state::State,
};

/// Create Order Handler
///
/// Places an order for explicit lines, priced from the live catalog with shipping applied.
#[endpoint(
    tags("orders"),
    summary = "Create Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid contact details or pack sizes"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Authentication required"),
        (status_code = StatusCode::NOT_FOUND, description = "Promo code not found"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Order subtotal below the promo code minimum"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "orders.create",
    skip(json, depot, res),
    fields(customer_uuid = tracing::field::Empty, order_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CreateOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let customer = depot.customer_uuid_or_401()?;

    tracing::Span::current().record("customer_uuid", tracing::field::display(customer));

    let order = NewOrder::try_from(json.into_inner())
        .map_err(|error| StatusError::bad_request().brief(error.to_string()))?;

    let order = state
        .orders
        .create_order(customer, order, Timestamp::now())
        .await
        .map_err(into_status_error)?;

    tracing::Span::current().record("order_uuid", tracing::field::display(order.uuid));

    record_order_placed("order");

    res.add_header(LOCATION, format!("/orders/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(order.into()))
}
