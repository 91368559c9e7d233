//! Update Order Handler

use std::sync::Arc;

use pillbox_app::domain::orders::models::OrderUpdate;
use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, requests::UpdateOrderRequest, responses::OrderResponse},
    state::State,
};

/// Update Order Handler
///
/// Cancels an order or records payment details against it.
#[endpoint(
    tags("orders"),
    summary = "Update Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Authentication required"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::CONFLICT, description = "Order can no longer be cancelled"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "orders.update", skip(order, json, depot), err)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<UpdateOrderRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let customer = depot.customer_uuid_or_401()?;

    let update = OrderUpdate::try_from(json.into_inner())
        .map_err(|error| StatusError::bad_request().brief(error.to_string()))?;

    let order = state
        .orders
        .update_order(customer, order.into_inner().into(), update)
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}
