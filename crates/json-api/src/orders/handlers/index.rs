//! Order Index Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, responses::OrdersResponse},
    state::State,
};

/// Order Index Handler
///
/// Returns the caller's orders, newest first.
#[endpoint(
    tags("orders"),
    summary = "List Orders",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<OrdersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let customer = depot.customer_uuid_or_401()?;

    let orders = state
        .orders
        .list_orders(customer)
        .await
        .map_err(into_status_error)?;

    Ok(Json(OrdersResponse {
        orders: orders.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use pillbox_app::domain::orders::{MockOrdersService, OrdersServiceError};
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{TEST_CUSTOMER_UUID, make_order, orders_service};

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        orders_service(orders, Router::with_path("orders").get(handler))
    }

    #[tokio::test]
    async fn test_list_orders_success() -> TestResult {
        let first = make_order();
        let second = make_order();
        let uuids = vec![first.uuid.into_uuid(), second.uuid.into_uuid()];

        let mut orders = MockOrdersService::new();

        orders
            .expect_list_orders()
            .once()
            .withf(|customer| *customer == TEST_CUSTOMER_UUID)
            .return_once(move |_| Ok(vec![first, second]));

        let mut res = TestClient::get("http://example.com/orders")
            .send(&make_service(orders))
            .await;

        let body: OrdersResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(
            body.orders.iter().map(|order| order.uuid).collect::<Vec<_>>(),
            uuids
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_list_orders_empty() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_list_orders()
            .once()
            .return_once(|_| Ok(Vec::new()));

        let mut res = TestClient::get("http://example.com/orders")
            .send(&make_service(orders))
            .await;

        let body: OrdersResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(body.orders.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_list_orders_storage_error_returns_500() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_list_orders()
            .once()
            .return_once(|_| Err(OrdersServiceError::Sql(sqlx::Error::PoolTimedOut)));

        let res = TestClient::get("http://example.com/orders")
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }
}
