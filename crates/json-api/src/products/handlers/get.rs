//! Get Product Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    products::{errors::into_status_error, responses::ProductResponse},
    state::State,
};

/// Get Product Handler
///
/// Returns a product with its offer plan and the live price of every pack size.
#[endpoint(
    tags("products"),
    summary = "Get Product",
    responses(
        (status_code = StatusCode::OK, description = "Product"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    )
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let product = state
        .catalog
        .get_product(product.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(product.into()))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use pillbox::{
        discounts::{DiscountError, DiscountRule},
        pricing::OfferPlanStatus,
    };
    use pillbox_app::domain::catalog::{
        CatalogServiceError, MockCatalogService,
        models::{OfferPlan, OfferPlanUuid, PackSize, PackSizeUuid, Product, ProductUuid},
    };
    use rust_decimal_macros::dec;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::catalog_service;

    use super::*;

    fn make_service(catalog: MockCatalogService) -> Service {
        catalog_service(catalog, Router::with_path("products/{product}").get(handler))
    }

    fn make_product(uuid: ProductUuid, status: OfferPlanStatus) -> Result<Product, DiscountError> {
        Ok(Product {
            uuid,
            title: "Vitamin D3".to_string(),
            slug: "vitamin-d3".to_string(),
            offer_plan: Some(OfferPlan {
                uuid: OfferPlanUuid::new(),
                name: "Spring sale".to_string(),
                rule: DiscountRule::percentage(20)?,
                status,
                created_at: Timestamp::UNIX_EPOCH,
                updated_at: Timestamp::UNIX_EPOCH,
            }),
            pack_sizes: vec![PackSize {
                uuid: PackSizeUuid::new(),
                product: uuid,
                size: "60 capsules".to_string(),
                price: dec!(12.50),
                created_at: Timestamp::UNIX_EPOCH,
                updated_at: Timestamp::UNIX_EPOCH,
            }],
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        })
    }

    #[tokio::test]
    async fn test_get_product_prices_pack_sizes_with_the_offer() -> TestResult {
        let uuid = ProductUuid::new();
        let product = make_product(uuid, OfferPlanStatus::Active)?;

        let mut catalog = MockCatalogService::new();

        catalog
            .expect_get_product()
            .once()
            .withf(move |requested| *requested == uuid)
            .return_once(move |_| Ok(product));

        let mut res = TestClient::get(format!("http://example.com/products/{uuid}"))
            .send(&make_service(catalog))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: ProductResponse = res.take_json().await?;

        assert_eq!(body.uuid, uuid.into_uuid());
        assert!(
            body.pack_sizes
                .first()
                .is_some_and(|pack_size| (pack_size.offer_price - 10.0).abs() < f64::EPSILON),
            "20% off 12.50 should be 10.00"
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_inactive_offer_leaves_price_unchanged() -> TestResult {
        let uuid = ProductUuid::new();
        let product = make_product(uuid, OfferPlanStatus::Inactive)?;

        let mut catalog = MockCatalogService::new();

        catalog
            .expect_get_product()
            .once()
            .return_once(move |_| Ok(product));

        let mut res = TestClient::get(format!("http://example.com/products/{uuid}"))
            .send(&make_service(catalog))
            .await;

        let body: ProductResponse = res.take_json().await?;

        assert!(
            body.pack_sizes
                .first()
                .is_some_and(|pack_size| (pack_size.offer_price - 12.5).abs() < f64::EPSILON),
            "inactive offer plans do not discount"
        );
        assert_eq!(
            body.offer_plan.map(|plan| plan.status),
            Some("inactive".to_string())
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_product_returns_404() -> TestResult {
        let mut catalog = MockCatalogService::new();

        catalog
            .expect_get_product()
            .once()
            .return_once(|_| Err(CatalogServiceError::NotFound));

        let res = TestClient::get(format!("http://example.com/products/{}", ProductUuid::new()))
            .send(&make_service(catalog))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_uuid_returns_400() -> TestResult {
        let mut catalog = MockCatalogService::new();

        catalog.expect_get_product().never();

        let res = TestClient::get("http://example.com/products/not-a-uuid")
            .send(&make_service(catalog))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
