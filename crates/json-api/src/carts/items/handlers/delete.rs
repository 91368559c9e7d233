//! Delete Cart Item Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    carts::{cart_identity, errors::into_status_error, responses::CartResponse},
    extensions::*,
    state::State,
};

/// Delete Cart Item Handler
///
/// Removes a pack size from the caller's cart and returns the repriced cart.
#[endpoint(
    tags("carts"),
    summary = "Delete Cart Item",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart item deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart or cart item not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    )
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    pack_size: PathParam<Uuid>,
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let cart = state
        .carts
        .remove_item(
            cart_identity(req, depot),
            product.into_inner().into(),
            pack_size.into_inner().into(),
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}
