//! Get Order Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, responses::OrderResponse},
    state::State,
};

/// Get Order Handler
///
/// Returns one of the caller's orders as it was priced when placed.
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Authentication required"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let customer = depot.customer_uuid_or_401()?;

    let order = state
        .orders
        .get_order(customer, order.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use pillbox_app::domain::orders::{MockOrdersService, OrdersServiceError, models::OrderUuid};
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{TEST_CUSTOMER_UUID, make_order, orders_service};

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        orders_service(orders, Router::with_path("orders/{order}").get(handler))
    }

    #[tokio::test]
    async fn test_get_order_success() -> TestResult {
        let order = make_order();
        let uuid = order.uuid;

        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .withf(move |customer, order| *customer == TEST_CUSTOMER_UUID && *order == uuid)
            .return_once(move |_, _| Ok(order));

        let mut res = TestClient::get(format!("http://example.com/orders/{uuid}"))
            .send(&make_service(orders))
            .await;

        let body: OrderResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.uuid, uuid.into_uuid());
        assert_eq!(body.items.len(), 2);
        assert!((body.totals.shipping_charge - 25.0).abs() < f64::EPSILON);
        assert!((body.totals.grand_total - 175.0).abs() < f64::EPSILON);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_order_not_found() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::NotFound));

        let res = TestClient::get(format!("http://example.com/orders/{}", OrderUuid::new()))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_order_invalid_uuid_returns_400() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_get_order().never();

        let res = TestClient::get("http://example.com/orders/not-a-uuid")
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
