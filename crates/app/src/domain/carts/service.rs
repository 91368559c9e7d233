//! Carts service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use pillbox::totals::{ShippingPolicy, Totals, aggregate};
use sqlx::{Postgres, Transaction};
use tracing::{debug, info};

use crate::{
    database::Db,
    domain::{
        carts::{
            errors::CartsServiceError,
            models::{CartIdentity, CartUpdate, CartUuid, PricedCart, PricedCartItem},
            repositories::{CartLine, CartRow, PgCartItemsRepository, PgCartsRepository},
        },
        catalog::models::{PackSizeUuid, ProductUuid},
        promo_codes::{models::PromoCode, repository::PgPromoCodesRepository},
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
    promo_codes_repository: PgPromoCodesRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
            promo_codes_repository: PgPromoCodesRepository::new(),
        }
    }

    /// Price a cart's lines with live catalog data and its attached promo code.
    ///
    /// The attached code is applied as stored, even if it has since expired or been switched
    /// off. Soft-deleted codes are no longer visible and are ignored.
    async fn price_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        row: CartRow,
    ) -> Result<PricedCart, CartsServiceError> {
        let items: Vec<PricedCartItem> = self
            .items_repository
            .get_cart_items(tx, row.uuid)
            .await?
            .into_iter()
            .map(CartLine::priced)
            .collect();

        let promo_code = match row.promo_code {
            Some(uuid) => self.promo_codes_repository.find_by_uuid(tx, uuid).await?,
            None => None,
        };

        let totals = cart_totals(&items, promo_code.as_ref());

        Ok(PricedCart {
            uuid: row.uuid,
            customer: row.customer,
            ip_address: row.ip_address,
            contact: row.contact,
            items,
            promo_code,
            totals,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    async fn lock_existing_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        identity: &CartIdentity,
    ) -> Result<CartRow, CartsServiceError> {
        require_identity(identity)?;

        self.carts_repository
            .lock_cart(tx, identity)
            .await?
            .ok_or(CartsServiceError::NotFound)
    }
}

fn require_identity(identity: &CartIdentity) -> Result<String, CartsServiceError> {
    identity.key().ok_or(CartsServiceError::InvalidIdentity)
}

/// Cart view totals: shipping is shown separately, so it is left out here.
fn cart_totals(items: &[PricedCartItem], promo_code: Option<&PromoCode>) -> Totals {
    aggregate(
        items.iter().map(|item| &item.price),
        promo_code.map(|promo_code| &promo_code.terms.rule),
        ShippingPolicy::Excluded,
    )
}

#[async_trait]
impl CartsService for PgCartsService {
    #[tracing::instrument(name = "carts.service.get_cart", skip(self), err)]
    async fn get_cart(&self, identity: CartIdentity) -> Result<PricedCart, CartsServiceError> {
        require_identity(&identity)?;

        let mut tx = self.db.begin().await?;

        let row = self
            .carts_repository
            .find_cart(&mut tx, &identity)
            .await?
            .ok_or(CartsServiceError::NotFound)?;

        let cart = self.price_cart(&mut tx, row).await?;

        tx.commit().await?;

        Ok(cart)
    }

    #[tracing::instrument(
        name = "carts.service.upsert_cart",
        skip(self, update),
        fields(item_count = update.items.len()),
        err
    )]
    async fn upsert_cart(
        &self,
        identity: CartIdentity,
        update: CartUpdate,
    ) -> Result<PricedCart, CartsServiceError> {
        let identity_key = require_identity(&identity)?;

        let contact = update.contact.validated()?;

        let mut tx = self.db.begin().await?;

        let row = match self.carts_repository.lock_cart(&mut tx, &identity).await? {
            Some(existing) => {
                self.carts_repository
                    .update_cart(
                        &mut tx,
                        existing.uuid,
                        &identity_key,
                        &identity,
                        &contact,
                    )
                    .await?
            }
            None => {
                self.carts_repository
                    .create_cart(
                        &mut tx,
                        CartUuid::new(),
                        &identity_key,
                        &identity,
                        &contact,
                    )
                    .await?
            }
        };

        for item in &update.items {
            let rows_affected = self
                .items_repository
                .upsert_cart_item(&mut tx, row.uuid, item)
                .await?;

            if rows_affected == 0 {
                return Err(CartsServiceError::PackSizeNotFound {
                    product: item.product,
                    pack_size: item.pack_size,
                });
            }
        }

        let cart = self.price_cart(&mut tx, row).await?;

        tx.commit().await?;

        info!(cart_uuid = %cart.uuid, items = cart.items.len(), "updated cart");

        Ok(cart)
    }

    #[tracing::instrument(
        name = "carts.service.remove_item",
        skip(self),
        fields(product_uuid = %product, pack_size_uuid = %pack_size),
        err
    )]
    async fn remove_item(
        &self,
        identity: CartIdentity,
        product: ProductUuid,
        pack_size: PackSizeUuid,
    ) -> Result<PricedCart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let row = self.lock_existing_cart(&mut tx, &identity).await?;

        let rows_affected = self
            .items_repository
            .delete_cart_item(&mut tx, row.uuid, product, pack_size)
            .await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::ItemNotFound);
        }

        let cart = self.price_cart(&mut tx, row).await?;

        tx.commit().await?;

        Ok(cart)
    }

    #[tracing::instrument(name = "carts.service.clear_cart", skip(self), err)]
    async fn clear_cart(&self, identity: CartIdentity) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let row = self.lock_existing_cart(&mut tx, &identity).await?;

        self.carts_repository.delete_cart(&mut tx, row.uuid).await?;

        tx.commit().await?;

        info!(cart_uuid = %row.uuid, "cleared cart");

        Ok(())
    }

    #[tracing::instrument(name = "carts.service.apply_promo_code", skip(self), err)]
    async fn apply_promo_code(
        &self,
        identity: CartIdentity,
        code: &str,
        now: Timestamp,
    ) -> Result<PricedCart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let row = self.lock_existing_cart(&mut tx, &identity).await?;

        let promo_code = self
            .promo_codes_repository
            .find_by_code(&mut tx, code.trim())
            .await?
            .ok_or(CartsServiceError::PromoCodeNotFound)?;

        let mut cart = self
            .price_cart(
                &mut tx,
                CartRow {
                    promo_code: None,
                    ..row
                },
            )
            .await?;

        promo_code.terms.validate(now, cart.totals.subtotal)?;

        self.carts_repository
            .set_promo_code(&mut tx, cart.uuid, Some(promo_code.uuid))
            .await?;

        tx.commit().await?;

        debug!(cart_uuid = %cart.uuid, code = %promo_code.terms.code, "applied promo code");

        cart.totals = cart_totals(&cart.items, Some(&promo_code));
        cart.promo_code = Some(promo_code);

        Ok(cart)
    }

    #[tracing::instrument(name = "carts.service.remove_promo_code", skip(self), err)]
    async fn remove_promo_code(
        &self,
        identity: CartIdentity,
    ) -> Result<PricedCart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let row = self.lock_existing_cart(&mut tx, &identity).await?;

        if row.promo_code.is_none() {
            return Err(CartsServiceError::PromoCodeNotApplied);
        }

        self.carts_repository
            .set_promo_code(&mut tx, row.uuid, None)
            .await?;

        let cart = self
            .price_cart(
                &mut tx,
                CartRow {
                    promo_code: None,
                    ..row
                },
            )
            .await?;

        tx.commit().await?;

        Ok(cart)
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve the identity's cart, priced with live catalog prices.
    async fn get_cart(&self, identity: CartIdentity) -> Result<PricedCart, CartsServiceError>;

    /// Create the identity's cart if needed, merge contact details and set line quantities.
    /// Nothing is saved if any line is invalid.
    async fn upsert_cart(
        &self,
        identity: CartIdentity,
        update: CartUpdate,
    ) -> Result<PricedCart, CartsServiceError>;

    /// Remove a pack size from the cart.
    async fn remove_item(
        &self,
        identity: CartIdentity,
        product: ProductUuid,
        pack_size: PackSizeUuid,
    ) -> Result<PricedCart, CartsServiceError>;

    /// Delete the cart and all of its lines.
    async fn clear_cart(&self, identity: CartIdentity) -> Result<(), CartsServiceError>;

    /// Validate a promo code against the cart's subtotal and attach it.
    async fn apply_promo_code(
        &self,
        identity: CartIdentity,
        code: &str,
        now: Timestamp,
    ) -> Result<PricedCart, CartsServiceError>;

    /// Detach the cart's promo code.
    async fn remove_promo_code(
        &self,
        identity: CartIdentity,
    ) -> Result<PricedCart, CartsServiceError>;
}
