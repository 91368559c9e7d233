//! Auth middleware.

use std::sync::Arc;

use pillbox_app::{auth::AuthServiceError, domain::customers::models::CustomerUuid};
use salvo::{http::header::AUTHORIZATION, prelude::*};
use tracing::error;

use crate::{extensions::*, state::State};

/// Reject requests without a valid bearer token.
#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(token) = extract_bearer_token(req) else {
        res.render(StatusError::unauthorized().brief("Missing or invalid Authorization header"));
        ctrl.skip_rest();

        return;
    };

    match authenticate(depot, token).await {
        Ok(customer) => depot.insert_customer_uuid(customer),
        Err(status_error) => {
            res.render(status_error);
            ctrl.skip_rest();

            return;
        }
    }

    ctrl.call_next(req, depot, res).await;
}

/// Resolve the customer when a bearer token is sent. Anonymous requests pass through, but a
/// token that is sent must be valid.
#[salvo::handler]
pub(crate) async fn optional(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    if req.headers().contains_key(AUTHORIZATION) {
        let Some(token) = extract_bearer_token(req) else {
            res.render(
                StatusError::unauthorized().brief("Missing or invalid Authorization header"),
            );
            ctrl.skip_rest();

            return;
        };

        match authenticate(depot, token).await {
            Ok(customer) => depot.insert_customer_uuid(customer),
            Err(status_error) => {
                res.render(status_error);
                ctrl.skip_rest();

                return;
            }
        }
    }

    ctrl.call_next(req, depot, res).await;
}

async fn authenticate(depot: &Depot, token: &str) -> Result<CustomerUuid, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    state
        .auth
        .authenticate_bearer(token)
        .await
        .map_err(|auth_error| match auth_error {
            AuthServiceError::NotFound | AuthServiceError::UnknownCustomer => {
                StatusError::unauthorized().brief("Invalid API token")
            }
            AuthServiceError::Sql(source) => {
                error!("failed to validate api token: {source}");

                StatusError::internal_server_error()
            }
            AuthServiceError::Token(source) => {
                error!("failed to process api token: {source}");

                StatusError::internal_server_error()
            }
        })
}

fn extract_bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.splitn(2, ' ');

    let scheme = parts.next()?;
    let token = parts.next()?.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}
