//! Get Promo Code Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{oapi::extract::PathParam, prelude::*};

use crate::{
    extensions::*,
    promo_codes::{errors::into_status_error, responses::PromoCodeResponse},
    state::State,
};

/// Get Promo Code Handler
///
/// Looks a promo code up by the code customers type in.
#[endpoint(
    tags("promo-codes"),
    summary = "Get Promo Code",
    responses(
        (status_code = StatusCode::OK, description = "Promo code"),
        (status_code = StatusCode::NOT_FOUND, description = "Promo code not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    )
)]
pub(crate) async fn handler(
    code: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<PromoCodeResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let promo_code = state
        .promo_codes
        .find_by_code(&code.into_inner())
        .await
        .map_err(into_status_error)?;

    Ok(Json(PromoCodeResponse::at(promo_code, Timestamp::now())))
}
