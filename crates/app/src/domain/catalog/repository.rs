//! Catalog Repository

use jiff::Timestamp;
use pillbox::pricing::{OfferPlan as PricingOfferPlan, OfferPlanStatus};
use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    database::{
        try_get_discount_rule, try_get_optional_discount_rule, try_get_parsed, try_get_timestamp,
    },
    domain::catalog::models::{
        NewOfferPlan, NewPackSize, NewProduct, OfferPlan, OfferPlanUuid, PackSize, PackSizeQuote,
        PackSizeUuid, ProductUuid,
    },
};

const CREATE_OFFER_PLAN_SQL: &str = include_str!("sql/create_offer_plan.sql");
const GET_OFFER_PLAN_SQL: &str = include_str!("sql/get_offer_plan.sql");
const SET_OFFER_PLAN_STATUS_SQL: &str = include_str!("sql/set_offer_plan_status.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const SET_PRODUCT_OFFER_PLAN_SQL: &str = include_str!("sql/set_product_offer_plan.sql");
const LIST_PACK_SIZES_SQL: &str = include_str!("sql/list_pack_sizes.sql");
const CREATE_PACK_SIZE_SQL: &str = include_str!("sql/create_pack_size.sql");
const UPDATE_PACK_SIZE_PRICE_SQL: &str = include_str!("sql/update_pack_size_price.sql");
const DELETE_PACK_SIZE_SQL: &str = include_str!("sql/delete_pack_size.sql");
const QUOTE_PACK_SIZES_SQL: &str = include_str!("sql/quote_pack_sizes.sql");

/// Product header without its offer plan and pack sizes.
#[derive(Debug, Clone)]
pub(crate) struct ProductRow {
    pub uuid: ProductUuid,
    pub title: String,
    pub slug: String,
    pub offer_plan: Option<OfferPlanUuid>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCatalogRepository;

impl PgCatalogRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_offer_plan(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        plan: &NewOfferPlan,
    ) -> Result<OfferPlan, sqlx::Error> {
        query_as::<Postgres, OfferPlan>(CREATE_OFFER_PLAN_SQL)
            .bind(plan.uuid.into_uuid())
            .bind(&plan.name)
            .bind(plan.rule.kind().as_str())
            .bind(plan.rule.amount())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_offer_plan(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        plan: OfferPlanUuid,
    ) -> Result<OfferPlan, sqlx::Error> {
        query_as::<Postgres, OfferPlan>(GET_OFFER_PLAN_SQL)
            .bind(plan.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_offer_plan_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        plan: OfferPlanUuid,
        status: OfferPlanStatus,
    ) -> Result<OfferPlan, sqlx::Error> {
        query_as::<Postgres, OfferPlan>(SET_OFFER_PLAN_STATUS_SQL)
            .bind(plan.into_uuid())
            .bind(status.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: &NewProduct,
    ) -> Result<ProductRow, sqlx::Error> {
        query_as::<Postgres, ProductRow>(CREATE_PRODUCT_SQL)
            .bind(product.uuid.into_uuid())
            .bind(&product.title)
            .bind(&product.slug)
            .bind(product.offer_plan.map(OfferPlanUuid::into_uuid))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<ProductRow, sqlx::Error> {
        query_as::<Postgres, ProductRow>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_product_offer_plan(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        plan: Option<OfferPlanUuid>,
    ) -> Result<ProductRow, sqlx::Error> {
        query_as::<Postgres, ProductRow>(SET_PRODUCT_OFFER_PLAN_SQL)
            .bind(product.into_uuid())
            .bind(plan.map(OfferPlanUuid::into_uuid))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_pack_sizes(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Vec<PackSize>, sqlx::Error> {
        query_as::<Postgres, PackSize>(LIST_PACK_SIZES_SQL)
            .bind(product.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn create_pack_size(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        pack_size: &NewPackSize,
    ) -> Result<PackSize, sqlx::Error> {
        query_as::<Postgres, PackSize>(CREATE_PACK_SIZE_SQL)
            .bind(pack_size.uuid.into_uuid())
            .bind(pack_size.product.into_uuid())
            .bind(&pack_size.size)
            .bind(pack_size.price)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_pack_size_price(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        pack_size: PackSizeUuid,
        price: Decimal,
    ) -> Result<PackSize, sqlx::Error> {
        query_as::<Postgres, PackSize>(UPDATE_PACK_SIZE_PRICE_SQL)
            .bind(pack_size.into_uuid())
            .bind(price)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_pack_size(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        pack_size: PackSizeUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PACK_SIZE_SQL)
            .bind(pack_size.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Current prices and offer plans for the given pack sizes. Unknown UUIDs are skipped.
    pub(crate) async fn quote_pack_sizes(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        pack_sizes: &[PackSizeUuid],
    ) -> Result<Vec<PackSizeQuote>, sqlx::Error> {
        let uuids: Vec<Uuid> = pack_sizes.iter().map(|uuid| uuid.into_uuid()).collect();

        query_as::<Postgres, PackSizeQuote>(QUOTE_PACK_SIZES_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for OfferPlan {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OfferPlanUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            rule: try_get_discount_rule(row, "discount_type", "discount_amount")?,
            status: try_get_parsed(row, "status")?,
            created_at: try_get_timestamp(row, "created_at")?,
            updated_at: try_get_timestamp(row, "updated_at")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for ProductRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            title: row.try_get("title")?,
            slug: row.try_get("slug")?,
            offer_plan: row
                .try_get::<Option<Uuid>, _>("offer_plan_uuid")?
                .map(OfferPlanUuid::from_uuid),
            created_at: try_get_timestamp(row, "created_at")?,
            updated_at: try_get_timestamp(row, "updated_at")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for PackSize {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: PackSizeUuid::from_uuid(row.try_get("uuid")?),
            product: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            size: row.try_get("size")?,
            price: row.try_get("price")?,
            created_at: try_get_timestamp(row, "created_at")?,
            updated_at: try_get_timestamp(row, "updated_at")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for PackSizeQuote {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            pack_size: PackSizeUuid::from_uuid(row.try_get("pack_size_uuid")?),
            product: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            product_title: row.try_get("product_title")?,
            size: row.try_get("size")?,
            price: row.try_get("price")?,
            offer_plan: try_get_offer_plan(row, "offer")?,
        })
    }
}

/// Decode the `{prefix}_discount_type`, `{prefix}_discount_amount` and `{prefix}_status`
/// columns of a left-joined offer plan.
pub(crate) fn try_get_offer_plan(
    row: &PgRow,
    prefix: &str,
) -> Result<Option<PricingOfferPlan>, sqlx::Error> {
    let type_col = format!("{prefix}_discount_type");
    let amount_col = format!("{prefix}_discount_amount");
    let status_col = format!("{prefix}_status");

    let Some(rule) = try_get_optional_discount_rule(row, &type_col, &amount_col)? else {
        return Ok(None);
    };

    Ok(Some(PricingOfferPlan {
        rule,
        status: try_get_parsed(row, &status_col)?,
    }))
}
