//! Catalog service.

use async_trait::async_trait;
use mockall::automock;
use pillbox::pricing::{MAX_UNIT_PRICE, OfferPlanStatus};
use rust_decimal::Decimal;
use sqlx::{Postgres, Transaction};
use tracing::info;

use crate::{
    database::Db,
    domain::catalog::{
        errors::CatalogServiceError,
        models::{
            NewOfferPlan, NewPackSize, NewProduct, OfferPlan, OfferPlanUuid, PackSize,
            PackSizeUuid, Product, ProductUuid,
        },
        repository::{PgCatalogRepository, ProductRow},
    },
};

#[derive(Debug, Clone)]
pub struct PgCatalogService {
    db: Db,
    repository: PgCatalogRepository,
}

impl PgCatalogService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCatalogRepository::new(),
        }
    }

    async fn load_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        row: ProductRow,
    ) -> Result<Product, CatalogServiceError> {
        let offer_plan = match row.offer_plan {
            Some(plan) => Some(self.repository.get_offer_plan(tx, plan).await?),
            None => None,
        };

        let pack_sizes = self.repository.list_pack_sizes(tx, row.uuid).await?;

        Ok(Product {
            uuid: row.uuid,
            title: row.title,
            slug: row.slug,
            offer_plan,
            pack_sizes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn ensure_price(price: Decimal) -> Result<(), CatalogServiceError> {
    if price < Decimal::ZERO || price > MAX_UNIT_PRICE {
        return Err(CatalogServiceError::InvalidData);
    }

    Ok(())
}

#[async_trait]
impl CatalogService for PgCatalogService {
    #[tracing::instrument(
        name = "catalog.service.create_offer_plan",
        skip(self, plan),
        fields(offer_plan_uuid = %plan.uuid),
        err
    )]
    async fn create_offer_plan(
        &self,
        plan: NewOfferPlan,
    ) -> Result<OfferPlan, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.repository.create_offer_plan(&mut tx, &plan).await?;

        tx.commit().await?;

        info!(offer_plan_uuid = %created.uuid, "created offer plan");

        Ok(created)
    }

    #[tracing::instrument(
        name = "catalog.service.set_offer_plan_status",
        skip(self),
        fields(offer_plan_uuid = %plan, status = status.as_str()),
        err
    )]
    async fn set_offer_plan_status(
        &self,
        plan: OfferPlanUuid,
        status: OfferPlanStatus,
    ) -> Result<OfferPlan, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .set_offer_plan_status(&mut tx, plan, status)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[tracing::instrument(
        name = "catalog.service.create_product",
        skip(self, product),
        fields(product_uuid = %product.uuid),
        err
    )]
    async fn create_product(&self, product: NewProduct) -> Result<Product, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let row = self.repository.create_product(&mut tx, &product).await?;
        let created = self.load_product(&mut tx, row).await?;

        tx.commit().await?;

        Ok(created)
    }

    #[tracing::instrument(
        name = "catalog.service.get_product",
        skip(self),
        fields(product_uuid = %product),
        err
    )]
    async fn get_product(&self, product: ProductUuid) -> Result<Product, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let row = self.repository.get_product(&mut tx, product).await?;
        let product = self.load_product(&mut tx, row).await?;

        tx.commit().await?;

        Ok(product)
    }

    #[tracing::instrument(
        name = "catalog.service.set_product_offer_plan",
        skip(self),
        fields(product_uuid = %product),
        err
    )]
    async fn set_product_offer_plan(
        &self,
        product: ProductUuid,
        plan: Option<OfferPlanUuid>,
    ) -> Result<Product, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let row = self
            .repository
            .set_product_offer_plan(&mut tx, product, plan)
            .await?;

        let updated = self.load_product(&mut tx, row).await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[tracing::instrument(
        name = "catalog.service.create_pack_size",
        skip(self, pack_size),
        fields(pack_size_uuid = %pack_size.uuid, product_uuid = %pack_size.product),
        err
    )]
    async fn create_pack_size(
        &self,
        pack_size: NewPackSize,
    ) -> Result<PackSize, CatalogServiceError> {
        ensure_price(pack_size.price)?;

        let mut tx = self.db.begin().await?;

        let created = self.repository.create_pack_size(&mut tx, &pack_size).await?;

        tx.commit().await?;

        Ok(created)
    }

    #[tracing::instrument(
        name = "catalog.service.update_pack_size_price",
        skip(self),
        fields(pack_size_uuid = %pack_size),
        err
    )]
    async fn update_pack_size_price(
        &self,
        pack_size: PackSizeUuid,
        price: Decimal,
    ) -> Result<PackSize, CatalogServiceError> {
        ensure_price(price)?;

        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_pack_size_price(&mut tx, pack_size, price)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[tracing::instrument(
        name = "catalog.service.delete_pack_size",
        skip(self),
        fields(pack_size_uuid = %pack_size),
        err
    )]
    async fn delete_pack_size(&self, pack_size: PackSizeUuid) -> Result<(), CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self
            .repository
            .delete_pack_size(&mut tx, pack_size)
            .await
            .map_err(|error| match CatalogServiceError::from(error) {
                CatalogServiceError::InvalidReference => CatalogServiceError::InUse,
                other => other,
            })?;

        if rows_affected == 0 {
            return Err(CatalogServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Creates an active offer plan.
    async fn create_offer_plan(
        &self,
        plan: NewOfferPlan,
    ) -> Result<OfferPlan, CatalogServiceError>;

    /// Switches an offer plan on or off for every product it is attached to.
    async fn set_offer_plan_status(
        &self,
        plan: OfferPlanUuid,
        status: OfferPlanStatus,
    ) -> Result<OfferPlan, CatalogServiceError>;

    /// Creates a product, optionally attached to an offer plan.
    async fn create_product(&self, product: NewProduct) -> Result<Product, CatalogServiceError>;

    /// Retrieve a product with its offer plan and pack sizes.
    async fn get_product(&self, product: ProductUuid) -> Result<Product, CatalogServiceError>;

    /// Attach a product to an offer plan, or detach it with `None`.
    async fn set_product_offer_plan(
        &self,
        product: ProductUuid,
        plan: Option<OfferPlanUuid>,
    ) -> Result<Product, CatalogServiceError>;

    /// Adds a purchasable pack size to a product.
    async fn create_pack_size(
        &self,
        pack_size: NewPackSize,
    ) -> Result<PackSize, CatalogServiceError>;

    /// Changes the live price of a pack size. Existing orders keep the price they were placed at.
    async fn update_pack_size_price(
        &self,
        pack_size: PackSizeUuid,
        price: Decimal,
    ) -> Result<PackSize, CatalogServiceError>;

    /// Deletes a pack size that no order refers to. Cart lines for it are removed too.
    async fn delete_pack_size(&self, pack_size: PackSizeUuid) -> Result<(), CatalogServiceError>;
}
