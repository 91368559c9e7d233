//! Delete Cart Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    carts::{cart_identity, errors::into_status_error},
    extensions::*,
    state::State,
};

/// Delete Cart Handler
///
/// Empties and removes the caller's cart.
#[endpoint(
    tags("carts"),
    summary = "Delete Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Cart deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "carts.delete", skip(req, depot), err)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    state
        .carts
        .clear_cart(cart_identity(req, depot))
        .await
        .map_err(into_status_error)?;

    tracing::info!("deleted cart");

    Ok(StatusCode::NO_CONTENT)
}
